use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::info;

use crate::application::usercases::{
    entitlement_guard::EntitlementGuard, entitlement_writer::EntitlementWriter,
    identity_resolver::IdentityResolver,
};
use crate::domain::{
    repositories::{entitlements::EntitlementRepository, identities::IdentityRepository},
    value_objects::{
        enums::plan_types::PlanType,
        ingestion::{GrantDecision, GrantedEntitlement, IngestError, IngestionOutcome, SkipReason},
        purchase_events::{PurchaseEvent, StorefrontWebhook},
    },
};

/// Glues resolution, plan inference, the grant policy and the writer into
/// one pipeline shared by the live webhook and the batch backfill.
pub struct PurchaseIngestionUseCase {
    resolver: IdentityResolver,
    guard: EntitlementGuard,
    writer: EntitlementWriter,
}

impl PurchaseIngestionUseCase {
    pub fn new(
        identity_repository: Arc<dyn IdentityRepository + Send + Sync>,
        entitlement_repository: Arc<dyn EntitlementRepository + Send + Sync>,
    ) -> Self {
        Self {
            resolver: IdentityResolver::new(identity_repository),
            guard: EntitlementGuard::new(Arc::clone(&entitlement_repository)),
            writer: EntitlementWriter::new(entitlement_repository),
        }
    }

    pub async fn ingest(&self, event: PurchaseEvent) -> Result<IngestionOutcome, IngestError> {
        self.run(event, false).await
    }

    /// Dry-run variant: every stage except the writer, reporting the
    /// would-be outcome.
    pub async fn preview(&self, event: PurchaseEvent) -> Result<IngestionOutcome, IngestError> {
        self.run(event, true).await
    }

    pub async fn ingest_storefront(
        &self,
        webhook: StorefrontWebhook,
    ) -> Result<IngestionOutcome, IngestError> {
        info!(event = %webhook.event, "purchase_ingestion: storefront event received");

        if webhook.data.is_completed() == Some(false) {
            info!(event = %webhook.event, "purchase_ingestion: order not completed, skipping");
            return Ok(IngestionOutcome::Skipped(SkipReason::NotCompleted));
        }

        let event = webhook.data.to_purchase_event().ok_or_else(|| {
            IngestError::Validation("storefront order is missing an order id".to_string())
        })?;

        self.run(event, false).await
    }

    async fn run(
        &self,
        event: PurchaseEvent,
        dry_run: bool,
    ) -> Result<IngestionOutcome, IngestError> {
        if !event.has_contact() {
            return Err(IngestError::Validation(
                "purchase event carries neither email nor phone".to_string(),
            ));
        }

        let plan = event
            .plan
            .unwrap_or_else(|| PlanType::infer(&event.product_label, event.sku.as_deref()));

        let identity = self
            .resolver
            .resolve(event.email.as_deref(), event.phone.as_deref())
            .await?
            .ok_or_else(|| IngestError::IdentityNotFound {
                email: event.email.clone(),
                phone: event.phone.clone(),
            })?;

        match self.guard.authorize(identity.id, plan).await? {
            GrantDecision::Rejected(reason) => {
                info!(
                    user_id = %identity.id,
                    %plan,
                    %reason,
                    transaction_ref = event.transaction_ref,
                    "purchase_ingestion: grant rejected"
                );
                Ok(IngestionOutcome::Rejected(reason))
            }
            GrantDecision::Approved if dry_run => {
                let now = Utc::now();
                Ok(IngestionOutcome::Granted(GrantedEntitlement {
                    user_id: identity.id,
                    plan,
                    ends_at: now + Duration::days(plan.duration_days()),
                }))
            }
            GrantDecision::Approved => {
                let entitlement = self
                    .writer
                    .write(identity.id, plan, event.transaction_ref.clone())
                    .await?;
                Ok(IngestionOutcome::Granted(GrantedEntitlement {
                    user_id: entitlement.user_id,
                    plan: entitlement.plan_type,
                    ends_at: entitlement.ends_at,
                }))
            }
        }
    }
}
