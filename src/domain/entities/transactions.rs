use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::transactions;

/// Append-only record of money movement.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = transactions)]
pub struct TransactionEntity {
    pub id: Uuid,
    pub transaction_id: String,
    pub user_id: Uuid,
    pub mess_id: Uuid,
    pub membership_id: Option<Uuid>,
    pub transaction_type: String,
    pub amount_minor: i32,
    pub status: String,
    pub gateway: String,
    pub gateway_ref: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = transactions)]
pub struct InsertTransactionEntity {
    pub transaction_id: String,
    pub user_id: Uuid,
    pub mess_id: Uuid,
    pub membership_id: Option<Uuid>,
    pub transaction_type: String,
    pub amount_minor: i32,
    pub status: String,
    pub gateway: String,
    pub gateway_ref: Option<String>,
    pub description: Option<String>,
}
