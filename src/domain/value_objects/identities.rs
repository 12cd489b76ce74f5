use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::identities::{AppUserEntity, PhoneRecordEntity, UserProfileEntity};

/// One internal account as seen by this core. Read-only: the identity store
/// is owned elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentityModel {
    pub id: Uuid,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl From<AppUserEntity> for IdentityModel {
    fn from(entity: AppUserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            phone_number: entity.phone_number,
        }
    }
}

impl From<UserProfileEntity> for IdentityModel {
    fn from(entity: UserProfileEntity) -> Self {
        Self {
            id: entity.user_id,
            email: entity.email,
            phone_number: entity.phone_number,
        }
    }
}

impl From<PhoneRecordEntity> for IdentityModel {
    fn from(entity: PhoneRecordEntity) -> Self {
        Self {
            id: entity.user_id,
            email: None,
            phone_number: Some(entity.phone_number),
        }
    }
}
