use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{
    entities::notifications::{InsertNotificationEntity, NotificationEntity},
    value_objects::enums::{
        notification_statuses::NotificationStatus, notification_types::NotificationType,
        payment_methods::PaymentMethod,
    },
};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListNotificationsModel {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListNotificationsFilter {
    pub unread_only: bool,
    pub limit: i64,
    pub offset: i64,
}

impl ListNotificationsModel {
    pub fn into_filter(self) -> Result<ListNotificationsFilter, String> {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(format!("limit must be between 1 and {}", MAX_PAGE_SIZE));
        }
        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err("offset must not be negative".to_string());
        }

        Ok(ListNotificationsFilter {
            unread_only: self.unread_only,
            limit,
            offset,
        })
    }
}

/// Payload of a `join_request` notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JoinRequestData {
    pub requester_id: Uuid,
    pub meal_plan_id: Uuid,
    pub message: Option<String>,
}

/// Payload of a `payment_request` notification. The ids are filled in by the
/// repository once the membership and verification rows exist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRequestData {
    pub requester_id: Uuid,
    pub membership_id: Option<Uuid>,
    pub verification_id: Option<Uuid>,
    pub meal_plan_id: Uuid,
    pub amount_minor: i32,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaveRequestData {
    pub requester_id: Uuid,
    pub membership_id: Uuid,
    pub leave_request_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i32,
}

pub fn decode_data<T: DeserializeOwned>(notification: &NotificationEntity) -> Option<T> {
    serde_json::from_value(notification.data.clone()).ok()
}

/// A request that waits for the owner's decision.
pub fn request_for_owner(
    owner_id: Uuid,
    mess_id: Uuid,
    notification_type: NotificationType,
    title: impl Into<String>,
    message: impl Into<String>,
    data: Value,
) -> InsertNotificationEntity {
    InsertNotificationEntity {
        user_id: owner_id,
        mess_id: Some(mess_id),
        notification_type: notification_type.to_string(),
        status: NotificationStatus::Pending.to_string(),
        title: title.into(),
        message: message.into(),
        data,
        is_read: false,
    }
}

/// An informational notice; nothing to act on.
pub fn notice(
    user_id: Uuid,
    mess_id: Option<Uuid>,
    notification_type: NotificationType,
    title: impl Into<String>,
    message: impl Into<String>,
    data: Value,
) -> InsertNotificationEntity {
    InsertNotificationEntity {
        user_id,
        mess_id,
        notification_type: notification_type.to_string(),
        status: NotificationStatus::Completed.to_string(),
        title: title.into(),
        message: message.into(),
        data,
        is_read: false,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NotificationDto {
    pub id: Uuid,
    pub mess_id: Option<Uuid>,
    pub notification_type: Option<NotificationType>,
    pub status: Option<NotificationStatus>,
    pub title: String,
    pub message: String,
    pub data: Value,
    pub is_read: bool,
    pub acted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationEntity> for NotificationDto {
    fn from(value: NotificationEntity) -> Self {
        Self {
            id: value.id,
            mess_id: value.mess_id,
            notification_type: NotificationType::from_str(&value.notification_type),
            status: NotificationStatus::from_str(&value.status),
            title: value.title,
            message: value.message,
            data: value.data,
            is_read: value.is_read,
            acted_at: value.acted_at,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UnreadCountDto {
    pub unread: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_defaults_and_bounds() {
        let filter = ListNotificationsModel::default().into_filter().unwrap();
        assert_eq!(filter.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(filter.offset, 0);

        let too_big = ListNotificationsModel {
            limit: Some(101),
            ..Default::default()
        };
        assert!(too_big.into_filter().is_err());

        let zero = ListNotificationsModel {
            limit: Some(0),
            ..Default::default()
        };
        assert!(zero.into_filter().is_err());
    }

    #[test]
    fn join_request_payload_reads_back() {
        let data = JoinRequestData {
            requester_id: Uuid::new_v4(),
            meal_plan_id: Uuid::new_v4(),
            message: Some("veg only".to_string()),
        };
        let notification = NotificationEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            mess_id: None,
            notification_type: NotificationType::JoinRequest.to_string(),
            status: NotificationStatus::Pending.to_string(),
            title: "Join request".to_string(),
            message: String::new(),
            data: serde_json::to_value(&data).unwrap(),
            is_read: false,
            acted_by: None,
            acted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(decode_data::<JoinRequestData>(&notification), Some(data));
        assert_eq!(decode_data::<LeaveRequestData>(&notification), None);
    }
}
