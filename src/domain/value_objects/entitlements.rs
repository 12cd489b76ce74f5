use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::entitlements::{EntitlementEntity, InsertEntitlementEntity};
use crate::domain::value_objects::enums::{
    entitlement_statuses::EntitlementStatus, plan_types::PlanType,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntitlementModel {
    pub id: i64,
    pub user_id: Uuid,
    pub plan_type: PlanType,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: EntitlementStatus,
    pub price_minor: i32,
    pub transaction_ref: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<EntitlementEntity> for EntitlementModel {
    fn from(entity: EntitlementEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            plan_type: PlanType::from_str(&entity.plan_type),
            starts_at: entity.starts_at,
            ends_at: entity.ends_at,
            status: EntitlementStatus::from_str(&entity.status),
            price_minor: entity.price_minor,
            transaction_ref: entity.transaction_ref,
            verified: entity.verified,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertEntitlementModel {
    pub user_id: Uuid,
    pub plan: PlanType,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub transaction_ref: String,
}

impl InsertEntitlementModel {
    pub fn to_entity(&self) -> InsertEntitlementEntity {
        InsertEntitlementEntity {
            user_id: self.user_id,
            plan_type: self.plan.to_string(),
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            status: EntitlementStatus::Active.to_string(),
            price_minor: self.plan.price_minor(),
            transaction_ref: self.transaction_ref.clone(),
            verified: true,
        }
    }
}
