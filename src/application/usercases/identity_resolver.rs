use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use crate::domain::{
    entities::identities::PhoneRecordEntity,
    repositories::identities::IdentityRepository,
    value_objects::{identities::IdentityModel, phone_numbers},
};

/// Finds the internal account owning a purchase: exact email match first,
/// then normalized phone matching against profile and account records.
pub struct IdentityResolver {
    repository: Arc<dyn IdentityRepository + Send + Sync>,
}

impl IdentityResolver {
    pub fn new(repository: Arc<dyn IdentityRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    pub async fn resolve(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Option<IdentityModel>> {
        if let Some(email) = email {
            let email = email.trim().to_lowercase();

            if let Some(user) = self.repository.find_by_email(email.clone()).await? {
                debug!(user_id = %user.id, "identity_resolver: matched directory email");
                return Ok(Some(user.into()));
            }

            if let Some(profile) = self.repository.find_by_profile_email(email).await? {
                debug!(user_id = %profile.user_id, "identity_resolver: matched profile email");
                return Ok(Some(profile.into()));
            }
        }

        if let Some(phone) = phone {
            let canonical = phone_numbers::normalize(phone);
            if canonical.len() < 9 {
                debug!(phone, "identity_resolver: phone too short to match");
                return Ok(None);
            }

            let profiles = self.repository.list_profile_phones().await?;
            if let Some(record) = Self::match_phone(profiles, &canonical) {
                debug!(user_id = %record.user_id, "identity_resolver: matched profile phone");
                return Ok(Some(record.into()));
            }

            let accounts = self.repository.list_account_phones().await?;
            if let Some(record) = Self::match_phone(accounts, &canonical) {
                debug!(user_id = %record.user_id, "identity_resolver: matched account phone");
                return Ok(Some(record.into()));
            }
        }

        Ok(None)
    }

    /// First match wins; multiple-account collisions resolve silently to
    /// the earliest record.
    fn match_phone(records: Vec<PhoneRecordEntity>, canonical: &str) -> Option<PhoneRecordEntity> {
        let canonical_tail = phone_numbers::last_nine(canonical);

        records.into_iter().find(|record| {
            let record_canonical = phone_numbers::normalize(&record.phone_number);
            if record_canonical == canonical {
                return true;
            }
            canonical_tail.len() == 9
                && phone_numbers::last_nine(&record.phone_number) == canonical_tail
        })
    }
}
