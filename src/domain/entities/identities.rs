use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{app_users, user_profiles};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = app_users)]
pub struct AppUserEntity {
    pub id: Uuid,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Selectable, Queryable)]
#[diesel(table_name = user_profiles)]
pub struct UserProfileEntity {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// One candidate row for the phone scan, from either phone column.
#[derive(Debug, Clone, Queryable)]
pub struct PhoneRecordEntity {
    pub user_id: Uuid,
    pub phone_number: String,
}
