use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::application::usercases::purchase_ingestion::PurchaseIngestionUseCase;
use crate::domain::value_objects::purchase_events::{PurchaseEvent, STOREFRONT_REF_TAG};

/// One historical order row from the backfill input file.
#[derive(Debug, Clone, Deserialize)]
pub struct BackfillOrderRecord {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub product_name: Option<String>,
    pub order_id: i64,
}

impl BackfillOrderRecord {
    pub fn to_purchase_event(&self) -> PurchaseEvent {
        PurchaseEvent {
            email: self
                .email
                .as_deref()
                .map(|email| email.trim().to_lowercase())
                .filter(|email| !email.is_empty()),
            phone: self
                .phone
                .as_deref()
                .map(|phone| phone.trim().to_string())
                .filter(|phone| !phone.is_empty()),
            product_label: self.product_name.clone().unwrap_or_default(),
            sku: None,
            transaction_ref: format!("{STOREFRONT_REF_TAG}-{}", self.order_id),
            plan: None,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BackfillSummary {
    pub granted: usize,
    pub skipped: usize,
    pub rejected: usize,
    pub errors: usize,
}

/// Replays historical orders through the ingestion pipeline, one at a time.
/// Sequential on purpose: per-record report lines stay readable and the
/// idempotency check keeps its read-then-write shape.
pub struct BackfillUseCase {
    ingestion: Arc<PurchaseIngestionUseCase>,
}

impl BackfillUseCase {
    pub fn new(ingestion: Arc<PurchaseIngestionUseCase>) -> Self {
        Self { ingestion }
    }

    pub async fn run(&self, records: &[BackfillOrderRecord], dry_run: bool) -> BackfillSummary {
        use crate::domain::value_objects::ingestion::IngestionOutcome;

        let total = records.len();
        let mut summary = BackfillSummary::default();
        info!(total, dry_run, "backfill: starting");

        for (index, record) in records.iter().enumerate() {
            let line = index + 1;
            let event = record.to_purchase_event();
            let result = if dry_run {
                self.ingestion.preview(event).await
            } else {
                self.ingestion.ingest(event).await
            };

            match result {
                Ok(IngestionOutcome::Granted(granted)) => {
                    summary.granted += 1;
                    let verb = if dry_run { "would grant" } else { "granted" };
                    println!(
                        "[{line}/{total}] done: order {} {verb} {} to user {} until {}",
                        record.order_id,
                        granted.plan,
                        granted.user_id,
                        granted.ends_at.date_naive()
                    );
                }
                Ok(IngestionOutcome::Rejected(reason)) => {
                    summary.rejected += 1;
                    println!(
                        "[{line}/{total}] skip: order {} rejected ({reason})",
                        record.order_id
                    );
                }
                Ok(IngestionOutcome::Skipped(reason)) => {
                    summary.skipped += 1;
                    println!(
                        "[{line}/{total}] skip: order {} skipped ({reason})",
                        record.order_id
                    );
                }
                Err(error) => {
                    summary.errors += 1;
                    println!("[{line}/{total}] error: order {}: {error}", record.order_id);
                }
            }
        }

        let suffix = if dry_run { " (dry run)" } else { "" };
        println!(
            "backfill finished: {} granted, {} rejected, {} skipped, {} errors{suffix}",
            summary.granted, summary.rejected, summary.skipped, summary.errors
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{
            entitlements::EntitlementEntity,
            identities::AppUserEntity,
        },
        repositories::{
            entitlements::MockEntitlementRepository, identities::MockIdentityRepository,
        },
    };
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn record_maps_to_storefront_tagged_event() {
        let record: BackfillOrderRecord = serde_json::from_value(json!({
            "email": " Buyer@X.com ",
            "phone": "0551234567",
            "product_name": "Premium yearly",
            "order_id": 1204
        }))
        .unwrap();

        let event = record.to_purchase_event();
        assert_eq!(event.email.as_deref(), Some("buyer@x.com"));
        assert_eq!(event.phone.as_deref(), Some("0551234567"));
        assert_eq!(event.transaction_ref, "storefront-1204");
        assert_eq!(event.plan, None);
    }

    #[test]
    fn blank_contact_fields_become_none() {
        let record: BackfillOrderRecord = serde_json::from_value(json!({
            "email": "  ",
            "phone": null,
            "product_name": null,
            "order_id": 7
        }))
        .unwrap();

        let event = record.to_purchase_event();
        assert_eq!(event.email, None);
        assert_eq!(event.phone, None);
        assert_eq!(event.product_label, "");
    }

    fn record(order_id: i64, email: Option<&str>) -> BackfillOrderRecord {
        BackfillOrderRecord {
            email: email.map(str::to_string),
            phone: None,
            product_name: Some("Premium yearly".to_string()),
            order_id,
        }
    }

    fn ingestion_granting_for(user_id: Uuid, email: &str) -> PurchaseIngestionUseCase {
        let mut identity_repository = MockIdentityRepository::new();
        let email = email.to_string();
        identity_repository
            .expect_find_by_email()
            .returning(move |candidate| {
                let found = candidate == email;
                let user = AppUserEntity {
                    id: user_id,
                    email: Some(email.clone()),
                    phone_number: None,
                    status: "active".to_string(),
                    created_at: Utc::now(),
                };
                Box::pin(async move { Ok(found.then_some(user)) })
            });
        identity_repository
            .expect_find_by_profile_email()
            .returning(|_| Box::pin(async { Ok(None) }));

        let mut entitlement_repository = MockEntitlementRepository::new();
        entitlement_repository
            .expect_list_active_for_user()
            .returning(|_| Box::pin(async { Ok(vec![]) }));
        entitlement_repository
            .expect_find_by_transaction_ref()
            .returning(|_| Box::pin(async { Ok(None) }));
        entitlement_repository
            .expect_insert_if_absent()
            .returning(|entity| {
                let row = EntitlementEntity {
                    id: 1,
                    user_id: entity.user_id,
                    plan_type: entity.plan_type.clone(),
                    starts_at: entity.starts_at,
                    ends_at: entity.ends_at,
                    status: entity.status.clone(),
                    price_minor: entity.price_minor,
                    transaction_ref: entity.transaction_ref.clone(),
                    verified: entity.verified,
                    created_at: entity.starts_at,
                };
                Box::pin(async move { Ok(row) })
            });

        PurchaseIngestionUseCase::new(
            Arc::new(identity_repository),
            Arc::new(entitlement_repository),
        )
    }

    #[tokio::test]
    async fn tallies_each_record_outcome() {
        let user_id = Uuid::new_v4();
        let backfill =
            BackfillUseCase::new(Arc::new(ingestion_granting_for(user_id, "buyer@x.com")));

        let records = vec![
            record(1, Some("buyer@x.com")),
            record(2, Some("stranger@x.com")),
            record(3, None),
        ];

        let summary = backfill.run(&records, false).await;
        assert_eq!(
            summary,
            BackfillSummary {
                granted: 1,
                skipped: 0,
                rejected: 0,
                errors: 2,
            }
        );
    }

    #[tokio::test]
    async fn dry_run_reports_without_writing() {
        let user_id = Uuid::new_v4();

        let mut identity_repository = MockIdentityRepository::new();
        identity_repository
            .expect_find_by_email()
            .returning(move |_| {
                let user = AppUserEntity {
                    id: user_id,
                    email: Some("buyer@x.com".to_string()),
                    phone_number: None,
                    status: "active".to_string(),
                    created_at: Utc::now(),
                };
                Box::pin(async move { Ok(Some(user)) })
            });
        let mut entitlement_repository = MockEntitlementRepository::new();
        entitlement_repository
            .expect_list_active_for_user()
            .returning(|_| Box::pin(async { Ok(vec![]) }));
        // No write expectations: reaching the writer would fail the test.

        let backfill = BackfillUseCase::new(Arc::new(PurchaseIngestionUseCase::new(
            Arc::new(identity_repository),
            Arc::new(entitlement_repository),
        )));

        let summary = backfill.run(&[record(1, Some("buyer@x.com"))], true).await;
        assert_eq!(summary.granted, 1);
        assert_eq!(summary.errors, 0);
    }
}
