use std::fmt::Display;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::value_objects::enums::plan_types::PlanType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    DuplicatePlan,
    NotAnUpgrade,
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            RejectReason::DuplicatePlan => "duplicate-plan",
            RejectReason::NotAnUpgrade => "not-an-upgrade",
        };
        write!(f, "{}", reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotCompleted,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            SkipReason::NotCompleted => "not-completed",
        };
        write!(f, "{}", reason)
    }
}

/// Verdict of the entitlement guard for one prospective grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantDecision {
    Approved,
    Rejected(RejectReason),
}

/// The part of a granted entitlement the transports report back.
#[derive(Debug, Clone, PartialEq)]
pub struct GrantedEntitlement {
    pub user_id: Uuid,
    pub plan: PlanType,
    pub ends_at: DateTime<Utc>,
}

/// Terminal outcome of one ingestion run. Failures travel separately as
/// [`IngestError`].
#[derive(Debug, Clone, PartialEq)]
pub enum IngestionOutcome {
    Granted(GrantedEntitlement),
    Skipped(SkipReason),
    Rejected(RejectReason),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{0}")]
    Validation(String),

    #[error(
        "no account matches email {email:?} or phone {phone:?}; create the account or correct the order contact details"
    )]
    IdentityNotFound {
        email: Option<String>,
        phone: Option<String>,
    },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
