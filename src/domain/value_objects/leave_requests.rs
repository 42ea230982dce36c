use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::leave_requests::LeaveRequestEntity,
    value_objects::enums::leave_statuses::LeaveStatus,
};

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitLeaveRequestModel {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

/// Inclusive day count; `None` when the range is inverted.
pub fn leave_span_days(start: NaiveDate, end: NaiveDate) -> Option<i32> {
    if end < start {
        return None;
    }
    i32::try_from((end - start).num_days() + 1).ok()
}

pub fn remaining_leave_days(allowed: i32, used: i32) -> i32 {
    (allowed - used).max(0)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LeaveRequestDto {
    pub id: Uuid,
    pub membership_id: Uuid,
    pub user_id: Uuid,
    pub mess_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i32,
    pub reason: Option<String>,
    pub status: Option<LeaveStatus>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<LeaveRequestEntity> for LeaveRequestDto {
    fn from(value: LeaveRequestEntity) -> Self {
        Self {
            id: value.id,
            membership_id: value.membership_id,
            user_id: value.user_id,
            mess_id: value.mess_id,
            start_date: value.start_date,
            end_date: value.end_date,
            days: value.days,
            reason: value.reason,
            status: LeaveStatus::from_str(&value.status),
            reviewed_at: value.reviewed_at,
            rejection_reason: value.rejection_reason,
            created_at: value.created_at,
        }
    }
}
