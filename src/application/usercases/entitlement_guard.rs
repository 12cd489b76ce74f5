use anyhow::Result;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    repositories::entitlements::EntitlementRepository,
    value_objects::{
        enums::plan_types::PlanType,
        ingestion::{GrantDecision, RejectReason},
    },
};

/// Policy check over the account's active entitlements: renewing the same
/// tier through this channel is not supported, and the effective
/// entitlement level never decreases.
pub struct EntitlementGuard {
    repository: Arc<dyn EntitlementRepository + Send + Sync>,
}

impl EntitlementGuard {
    pub fn new(repository: Arc<dyn EntitlementRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    pub async fn authorize(&self, user_id: Uuid, plan: PlanType) -> Result<GrantDecision> {
        let active = self.repository.list_active_for_user(user_id).await?;

        let has_same_plan = active
            .iter()
            .any(|entitlement| PlanType::from_str(&entitlement.plan_type) == plan);
        let max_active_level = active
            .iter()
            .map(|entitlement| PlanType::from_str(&entitlement.plan_type).level())
            .max()
            .unwrap_or(0);

        if has_same_plan {
            debug!(%user_id, %plan, "entitlement_guard: same plan already active");
            return Ok(GrantDecision::Rejected(RejectReason::DuplicatePlan));
        }

        if max_active_level > 0 && plan.level() <= max_active_level {
            debug!(
                %user_id,
                %plan,
                max_active_level,
                "entitlement_guard: active tier is not below the candidate"
            );
            return Ok(GrantDecision::Rejected(RejectReason::NotAnUpgrade));
        }

        Ok(GrantDecision::Approved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::entitlements::EntitlementEntity,
        repositories::entitlements::MockEntitlementRepository,
        value_objects::enums::entitlement_statuses::EntitlementStatus,
    };
    use chrono::{Duration, Utc};
    use mockall::predicate::eq;

    fn active_entitlement(user_id: Uuid, plan: PlanType) -> EntitlementEntity {
        let now = Utc::now();
        EntitlementEntity {
            id: 1,
            user_id,
            plan_type: plan.to_string(),
            starts_at: now - Duration::days(1),
            ends_at: now + Duration::days(plan.duration_days()),
            status: EntitlementStatus::Active.to_string(),
            price_minor: plan.price_minor(),
            transaction_ref: "storefront-1".to_string(),
            verified: true,
            created_at: now,
        }
    }

    fn guard_with_active(user_id: Uuid, active: Vec<EntitlementEntity>) -> EntitlementGuard {
        let mut repository = MockEntitlementRepository::new();
        repository
            .expect_list_active_for_user()
            .with(eq(user_id))
            .returning(move |_| {
                let active = active.clone();
                Box::pin(async move { Ok(active) })
            });
        EntitlementGuard::new(Arc::new(repository))
    }

    #[tokio::test]
    async fn approves_when_no_active_entitlements() {
        let user_id = Uuid::new_v4();
        let guard = guard_with_active(user_id, vec![]);

        for plan in [PlanType::HalfYearly, PlanType::Yearly] {
            let decision = guard.authorize(user_id, plan).await.unwrap();
            assert_eq!(decision, GrantDecision::Approved);
        }
    }

    #[tokio::test]
    async fn approves_upgrade_from_half_yearly() {
        let user_id = Uuid::new_v4();
        let guard = guard_with_active(
            user_id,
            vec![active_entitlement(user_id, PlanType::HalfYearly)],
        );

        let decision = guard.authorize(user_id, PlanType::Yearly).await.unwrap();
        assert_eq!(decision, GrantDecision::Approved);
    }

    #[tokio::test]
    async fn rejects_duplicate_plan() {
        let user_id = Uuid::new_v4();
        let guard =
            guard_with_active(user_id, vec![active_entitlement(user_id, PlanType::Yearly)]);

        let decision = guard.authorize(user_id, PlanType::Yearly).await.unwrap();
        assert_eq!(
            decision,
            GrantDecision::Rejected(RejectReason::DuplicatePlan)
        );
    }

    #[tokio::test]
    async fn rejects_downgrade_below_active_tier() {
        let user_id = Uuid::new_v4();
        let guard =
            guard_with_active(user_id, vec![active_entitlement(user_id, PlanType::Yearly)]);

        let decision = guard
            .authorize(user_id, PlanType::HalfYearly)
            .await
            .unwrap();
        assert_eq!(
            decision,
            GrantDecision::Rejected(RejectReason::NotAnUpgrade)
        );
    }
}
