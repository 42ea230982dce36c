use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::notifications;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = notifications)]
pub struct NotificationEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mess_id: Option<Uuid>,
    pub notification_type: String,
    pub status: String,
    pub title: String,
    pub message: String,
    pub data: Value,
    pub is_read: bool,
    pub acted_by: Option<Uuid>,
    pub acted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = notifications)]
pub struct InsertNotificationEntity {
    pub user_id: Uuid,
    pub mess_id: Option<Uuid>,
    pub notification_type: String,
    pub status: String,
    pub title: String,
    pub message: String,
    pub data: Value,
    pub is_read: bool,
}
