use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::credit_ledger;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = credit_ledger)]
pub struct CreditLedgerEntity {
    pub id: Uuid,
    pub mess_id: Uuid,
    pub delta: i32,
    pub balance_after: i32,
    pub reason: String,
    pub reference_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = credit_ledger)]
pub struct InsertCreditLedgerEntity {
    pub mess_id: Uuid,
    pub delta: i32,
    pub balance_after: i32,
    pub reason: String,
    pub reference_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
}
