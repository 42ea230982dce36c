use anyhow::Result;
use axum::async_trait;
use chrono::Utc;
use diesel::{dsl::count_star, insert_into, prelude::*, update};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::notifications::{InsertNotificationEntity, NotificationEntity},
        repositories::notifications::NotificationRepository,
        value_objects::{
            enums::{
                notification_statuses::NotificationStatus, notification_types::NotificationType,
            },
            notifications::ListNotificationsFilter,
        },
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::notifications},
};

pub struct NotificationPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl NotificationPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl NotificationRepository for NotificationPostgres {
    async fn create(&self, notification: InsertNotificationEntity) -> Result<NotificationEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(notifications::table)
            .values(&notification)
            .returning(NotificationEntity::as_returning())
            .get_result(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, notification_id: Uuid) -> Result<Option<NotificationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = notifications::table
            .filter(notifications::id.eq(notification_id))
            .select(NotificationEntity::as_select())
            .first::<NotificationEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        filter: ListNotificationsFilter,
    ) -> Result<Vec<NotificationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let mut query = notifications::table
            .filter(notifications::user_id.eq(user_id))
            .select(NotificationEntity::as_select())
            .into_boxed();

        if filter.unread_only {
            query = query.filter(notifications::is_read.eq(false));
        }

        let results = query
            .order(notifications::created_at.desc())
            .limit(filter.limit)
            .offset(filter.offset)
            .load::<NotificationEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count_unread(&self, user_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = notifications::table
            .filter(notifications::user_id.eq(user_id))
            .filter(notifications::is_read.eq(false))
            .select(count_star())
            .first::<i64>(&mut conn)?;

        Ok(total)
    }

    async fn mark_read(&self, notification_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(notifications::table)
            .filter(notifications::id.eq(notification_id))
            .filter(notifications::user_id.eq(user_id))
            .set((
                notifications::is_read.eq(true),
                notifications::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(updated > 0)
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(notifications::table)
            .filter(notifications::user_id.eq(user_id))
            .filter(notifications::is_read.eq(false))
            .set((
                notifications::is_read.eq(true),
                notifications::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(updated)
    }

    async fn has_pending_join_request(&self, mess_id: Uuid, requester_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = notifications::table
            .filter(notifications::mess_id.eq(mess_id))
            .filter(notifications::notification_type.eq(NotificationType::JoinRequest.to_string()))
            .filter(notifications::status.eq(NotificationStatus::Pending.to_string()))
            .filter(notifications::data.contains(json!({ "requester_id": requester_id })))
            .select(count_star())
            .first::<i64>(&mut conn)?;

        Ok(total > 0)
    }
}
