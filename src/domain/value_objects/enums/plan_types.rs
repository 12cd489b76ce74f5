use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Label tokens that mark a half-yearly purchase. Checked case-insensitively
/// and before any yearly token, so a label carrying both resolves to
/// half-yearly.
const HALF_LABEL_TOKENS: &[&str] = &["half", "نصف"];
const HALF_SKU_TOKENS: &[&str] = &["half", "6m"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    HalfYearly,
    Yearly,
}

impl PlanType {
    pub fn duration_days(&self) -> i64 {
        match self {
            PlanType::HalfYearly => 180,
            PlanType::Yearly => 365,
        }
    }

    /// Upgrade ranking. A grant is only valid when its level is strictly
    /// above every active entitlement's level.
    pub fn level(&self) -> i32 {
        match self {
            PlanType::HalfYearly => 1,
            PlanType::Yearly => 2,
        }
    }

    /// Fixed reference price in minor units, not the charged amount.
    pub fn price_minor(&self) -> i32 {
        match self {
            PlanType::HalfYearly => 9900,
            PlanType::Yearly => 17900,
        }
    }

    /// Infers the purchased plan from a product label and optional SKU.
    /// Unrecognized input falls back to yearly, never to an error.
    pub fn infer(product_label: &str, sku: Option<&str>) -> Self {
        let label = product_label.to_lowercase();
        if HALF_LABEL_TOKENS.iter().any(|token| label.contains(token)) {
            return PlanType::HalfYearly;
        }

        if let Some(sku) = sku {
            let sku = sku.to_lowercase();
            if HALF_SKU_TOKENS.iter().any(|token| sku.contains(token)) {
                return PlanType::HalfYearly;
            }
        }

        PlanType::Yearly
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "half_yearly" => PlanType::HalfYearly,
            _ => PlanType::Yearly,
        }
    }
}

impl Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let plan = match self {
            PlanType::HalfYearly => "half_yearly",
            PlanType::Yearly => "yearly",
        };
        write!(f, "{}", plan)
    }
}
