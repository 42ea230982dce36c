use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::mess_credits;

/// Per-mess credit balance. `version` is bumped on every write and compared
/// before a deduction.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = mess_credits)]
#[diesel(primary_key(mess_id))]
pub struct MessCreditsEntity {
    pub mess_id: Uuid,
    pub balance: i32,
    pub member_cost: i32,
    pub version: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = mess_credits)]
pub struct InsertMessCreditsEntity {
    pub mess_id: Uuid,
    pub balance: i32,
    pub member_cost: i32,
}
