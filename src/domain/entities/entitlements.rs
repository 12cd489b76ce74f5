use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::entitlements;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = entitlements)]
pub struct EntitlementEntity {
    pub id: i64,
    pub user_id: Uuid,
    pub plan_type: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: String,
    pub price_minor: i32,
    pub transaction_ref: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = entitlements)]
pub struct InsertEntitlementEntity {
    pub user_id: Uuid,
    pub plan_type: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: String,
    pub price_minor: i32,
    pub transaction_ref: String,
    pub verified: bool,
}
