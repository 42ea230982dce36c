use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::membership_payments;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = membership_payments)]
pub struct MembershipPaymentEntity {
    pub id: Uuid,
    pub membership_id: Uuid,
    pub amount_minor: i32,
    pub payment_method: String,
    pub transaction_id: Option<Uuid>,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub paid_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = membership_payments)]
pub struct InsertMembershipPaymentEntity {
    pub membership_id: Uuid,
    pub amount_minor: i32,
    pub payment_method: String,
    pub transaction_id: Option<Uuid>,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub paid_at: DateTime<Utc>,
}
