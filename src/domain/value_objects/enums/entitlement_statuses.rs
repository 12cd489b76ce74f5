use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum EntitlementStatus {
    #[default]
    Active,
    Expired,
    Cancelled,
}

impl Display for EntitlementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            EntitlementStatus::Active => "active",
            EntitlementStatus::Expired => "expired",
            EntitlementStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", status)
    }
}

impl EntitlementStatus {
    pub fn from_str(value: &str) -> Self {
        match value {
            "active" => EntitlementStatus::Active,
            "expired" => EntitlementStatus::Expired,
            "cancelled" => EntitlementStatus::Cancelled,
            _ => EntitlementStatus::Expired,
        }
    }
}
