use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::identities::{AppUserEntity, PhoneRecordEntity, UserProfileEntity};

/// Query-only view of the identity store. Accounts are created and edited
/// elsewhere; this core only resolves them.
#[async_trait]
#[automock]
pub trait IdentityRepository {
    async fn find_by_email(&self, email: String) -> Result<Option<AppUserEntity>>;
    async fn find_by_profile_email(&self, email: String) -> Result<Option<UserProfileEntity>>;
    async fn list_profile_phones(&self) -> Result<Vec<PhoneRecordEntity>>;
    async fn list_account_phones(&self) -> Result<Vec<PhoneRecordEntity>>;
}
