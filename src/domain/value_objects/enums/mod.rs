pub mod entitlement_statuses;
pub mod plan_types;
