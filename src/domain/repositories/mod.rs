pub mod entitlements;
pub mod identities;
