use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::messes;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = messes)]
pub struct MessEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messes)]
pub struct InsertMessEntity {
    pub owner_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub is_active: bool,
}
