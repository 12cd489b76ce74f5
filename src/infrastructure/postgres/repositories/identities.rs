use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use std::sync::Arc;

use crate::{
    domain::{
        entities::identities::{AppUserEntity, PhoneRecordEntity, UserProfileEntity},
        repositories::identities::IdentityRepository,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{app_users, user_profiles},
    },
};

diesel::define_sql_function! {
    fn lower(value: Nullable<Text>) -> Nullable<Text>;
}

pub struct IdentityPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl IdentityPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl IdentityRepository for IdentityPostgres {
    async fn find_by_email(&self, email: String) -> Result<Option<AppUserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = app_users::table
            .filter(lower(app_users::email).eq(email.to_lowercase()))
            .select(AppUserEntity::as_select())
            .first::<AppUserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_profile_email(&self, email: String) -> Result<Option<UserProfileEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = user_profiles::table
            .filter(lower(user_profiles::email).eq(email.to_lowercase()))
            .select(UserProfileEntity::as_select())
            .first::<UserProfileEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_profile_phones(&self) -> Result<Vec<PhoneRecordEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = user_profiles::table
            .filter(user_profiles::phone_number.is_not_null())
            .select((
                user_profiles::user_id,
                user_profiles::phone_number.assume_not_null(),
            ))
            .load::<PhoneRecordEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_account_phones(&self) -> Result<Vec<PhoneRecordEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = app_users::table
            .filter(app_users::phone_number.is_not_null())
            .select((app_users::id, app_users::phone_number.assume_not_null()))
            .load::<PhoneRecordEntity>(&mut conn)?;

        Ok(results)
    }
}
