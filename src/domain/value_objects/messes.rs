use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::messes::MessEntity;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterMessModel {
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MessDto {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<MessEntity> for MessDto {
    fn from(value: MessEntity) -> Self {
        Self {
            id: value.id,
            owner_id: value.owner_id,
            name: value.name,
            address: value.address,
            is_active: value.is_active,
            created_at: value.created_at,
        }
    }
}
