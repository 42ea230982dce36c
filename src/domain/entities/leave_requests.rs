use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::leave_requests;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = leave_requests)]
pub struct LeaveRequestEntity {
    pub id: Uuid,
    pub membership_id: Uuid,
    pub user_id: Uuid,
    pub mess_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i32,
    pub reason: Option<String>,
    pub status: String,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = leave_requests)]
pub struct InsertLeaveRequestEntity {
    pub membership_id: Uuid,
    pub user_id: Uuid,
    pub mess_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i32,
    pub reason: Option<String>,
    pub status: String,
}
