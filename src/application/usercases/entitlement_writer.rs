use anyhow::Result;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    repositories::entitlements::EntitlementRepository,
    value_objects::{
        entitlements::{EntitlementModel, InsertEntitlementModel},
        enums::plan_types::PlanType,
    },
};

/// Computes the validity window and persists the grant. Idempotent on the
/// transaction reference: replaying a delivery returns the already-written
/// row instead of creating a second one.
pub struct EntitlementWriter {
    repository: Arc<dyn EntitlementRepository + Send + Sync>,
}

impl EntitlementWriter {
    pub fn new(repository: Arc<dyn EntitlementRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    pub async fn write(
        &self,
        user_id: Uuid,
        plan: PlanType,
        transaction_ref: String,
    ) -> Result<EntitlementModel> {
        if let Some(existing) = self
            .repository
            .find_by_transaction_ref(transaction_ref.clone())
            .await?
        {
            info!(
                %user_id,
                transaction_ref,
                "entitlement_writer: transaction already granted, returning existing row"
            );
            return Ok(existing.into());
        }

        let now = Utc::now();
        let insert_model = InsertEntitlementModel {
            user_id,
            plan,
            starts_at: now,
            ends_at: now + Duration::days(plan.duration_days()),
            transaction_ref,
        };

        let entity = self
            .repository
            .insert_if_absent(insert_model.to_entity())
            .await?;

        info!(
            %user_id,
            %plan,
            entitlement_id = entity.id,
            ends_at = %entity.ends_at,
            "entitlement_writer: entitlement granted"
        );
        Ok(entity.into())
    }
}
