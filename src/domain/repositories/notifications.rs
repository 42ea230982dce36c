use anyhow::Result;
use axum::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::notifications::{InsertNotificationEntity, NotificationEntity},
    value_objects::notifications::ListNotificationsFilter,
};

#[automock]
#[async_trait]
pub trait NotificationRepository {
    async fn create(&self, notification: InsertNotificationEntity) -> Result<NotificationEntity>;
    async fn find_by_id(&self, notification_id: Uuid) -> Result<Option<NotificationEntity>>;
    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: ListNotificationsFilter,
    ) -> Result<Vec<NotificationEntity>>;
    async fn count_unread(&self, user_id: Uuid) -> Result<i64>;
    /// `false` when no notification with that id belongs to the user.
    async fn mark_read(&self, notification_id: Uuid, user_id: Uuid) -> Result<bool>;
    async fn mark_all_read(&self, user_id: Uuid) -> Result<usize>;
    async fn has_pending_join_request(&self, mess_id: Uuid, requester_id: Uuid) -> Result<bool>;
}
