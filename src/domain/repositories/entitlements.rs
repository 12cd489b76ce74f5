use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::entitlements::{EntitlementEntity, InsertEntitlementEntity};

#[async_trait]
#[automock]
pub trait EntitlementRepository {
    async fn list_active_for_user(&self, user_id: Uuid) -> Result<Vec<EntitlementEntity>>;
    async fn find_by_transaction_ref(
        &self,
        transaction_ref: String,
    ) -> Result<Option<EntitlementEntity>>;
    /// Inserts the row unless a conflicting one already exists, in which
    /// case the existing row is returned. Safe under concurrent deliveries.
    async fn insert_if_absent(
        &self,
        insert_entitlement_entity: InsertEntitlementEntity,
    ) -> Result<EntitlementEntity>;
}
