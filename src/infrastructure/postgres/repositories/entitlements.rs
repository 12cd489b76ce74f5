use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::entitlements::{EntitlementEntity, InsertEntitlementEntity},
        repositories::entitlements::EntitlementRepository,
        value_objects::enums::entitlement_statuses::EntitlementStatus,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::entitlements},
};

pub struct EntitlementPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl EntitlementPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl EntitlementRepository for EntitlementPostgres {
    async fn list_active_for_user(&self, user_id: Uuid) -> Result<Vec<EntitlementEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = entitlements::table
            .filter(entitlements::user_id.eq(user_id))
            .filter(entitlements::status.eq(EntitlementStatus::Active.to_string()))
            .select(EntitlementEntity::as_select())
            .load::<EntitlementEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_transaction_ref(
        &self,
        transaction_ref: String,
    ) -> Result<Option<EntitlementEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = entitlements::table
            .filter(entitlements::transaction_ref.eq(transaction_ref))
            .select(EntitlementEntity::as_select())
            .first::<EntitlementEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn insert_if_absent(
        &self,
        insert_entitlement_entity: InsertEntitlementEntity,
    ) -> Result<EntitlementEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Conflicts come from either the unique transaction_ref or the
        // partial one-active-row-per-plan index; both mean the grant is
        // already satisfied, so the existing row is the result.
        insert_into(entitlements::table)
            .values(&insert_entitlement_entity)
            .on_conflict_do_nothing()
            .execute(&mut conn)?;

        if let Some(row) = entitlements::table
            .filter(entitlements::transaction_ref.eq(&insert_entitlement_entity.transaction_ref))
            .select(EntitlementEntity::as_select())
            .first::<EntitlementEntity>(&mut conn)
            .optional()?
        {
            return Ok(row);
        }

        let row = entitlements::table
            .filter(entitlements::user_id.eq(insert_entitlement_entity.user_id))
            .filter(entitlements::plan_type.eq(&insert_entitlement_entity.plan_type))
            .filter(entitlements::status.eq(EntitlementStatus::Active.to_string()))
            .select(EntitlementEntity::as_select())
            .first::<EntitlementEntity>(&mut conn)?;

        Ok(row)
    }
}
