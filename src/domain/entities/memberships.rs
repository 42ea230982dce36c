use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::memberships;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = memberships)]
pub struct MembershipEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mess_id: Uuid,
    pub meal_plan_id: Uuid,
    pub status: String,
    pub payment_status: String,
    pub payment_request_status: String,
    pub subscription_start: Option<DateTime<Utc>>,
    pub subscription_end: Option<DateTime<Utc>>,
    pub leave_days_used: i32,
    pub credits_charged: bool,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = memberships)]
pub struct InsertMembershipEntity {
    pub user_id: Uuid,
    pub mess_id: Uuid,
    pub meal_plan_id: Uuid,
    pub status: String,
    pub payment_status: String,
    pub payment_request_status: String,
    pub subscription_start: Option<DateTime<Utc>>,
    pub subscription_end: Option<DateTime<Utc>>,
    pub leave_days_used: i32,
    pub credits_charged: bool,
}

/// Partial update applied under a version check. `None` fields are left as is.
#[derive(Debug, Clone, Default, PartialEq, AsChangeset)]
#[diesel(table_name = memberships)]
pub struct UpdateMembershipEntity {
    pub meal_plan_id: Option<Uuid>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub payment_request_status: Option<String>,
    pub subscription_start: Option<DateTime<Utc>>,
    pub subscription_end: Option<DateTime<Utc>>,
    pub leave_days_used: Option<i32>,
    pub credits_charged: Option<bool>,
}
