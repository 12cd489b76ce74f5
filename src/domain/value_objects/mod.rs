pub mod entitlements;
pub mod enums;
pub mod identities;
pub mod ingestion;
pub mod phone_numbers;
pub mod purchase_events;
