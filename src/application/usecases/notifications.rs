use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    repositories::notifications::NotificationRepository,
    value_objects::{
        actors::Actor,
        notifications::{ListNotificationsModel, NotificationDto, UnreadCountDto},
    },
};

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("notification not found")]
    NotFound,
    #[error("invalid query: {0}")]
    Invalid(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl NotificationError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            NotificationError::NotFound => StatusCode::NOT_FOUND,
            NotificationError::Invalid(_) => StatusCode::BAD_REQUEST,
            NotificationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, NotificationError>;

pub struct NotificationUseCase<N>
where
    N: NotificationRepository + Send + Sync + 'static,
{
    notification_repository: Arc<N>,
}

impl<N> NotificationUseCase<N>
where
    N: NotificationRepository + Send + Sync + 'static,
{
    pub fn new(notification_repository: Arc<N>) -> Self {
        Self {
            notification_repository,
        }
    }

    pub async fn list_my_notifications(
        &self,
        actor: Actor,
        query: ListNotificationsModel,
    ) -> UseCaseResult<Vec<NotificationDto>> {
        let user_id = actor.user_id;
        let filter = query.into_filter().map_err(|reason| {
            let err = NotificationError::Invalid(reason);
            warn!(%user_id, status = err.status_code().as_u16(), error = %err, "notifications: bad paging");
            err
        })?;

        let notifications = self
            .notification_repository
            .list_for_user(user_id, filter)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "notifications: failed to list");
                NotificationError::Internal(err)
            })?;

        Ok(notifications.into_iter().map(NotificationDto::from).collect())
    }

    pub async fn unread_count(&self, actor: Actor) -> UseCaseResult<UnreadCountDto> {
        let user_id = actor.user_id;
        let unread = self
            .notification_repository
            .count_unread(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "notifications: failed to count unread");
                NotificationError::Internal(err)
            })?;

        Ok(UnreadCountDto { unread })
    }

    /// Only the recipient can mark a notification; anyone else gets 404.
    pub async fn mark_read(&self, actor: Actor, notification_id: Uuid) -> UseCaseResult<()> {
        let user_id = actor.user_id;
        let updated = self
            .notification_repository
            .mark_read(notification_id, user_id)
            .await
            .map_err(|err| {
                error!(%user_id, %notification_id, db_error = ?err, "notifications: failed to mark read");
                NotificationError::Internal(err)
            })?;

        if !updated {
            let err = NotificationError::NotFound;
            warn!(%user_id, %notification_id, status = err.status_code().as_u16(), "notifications: not the recipient");
            return Err(err);
        }

        Ok(())
    }

    pub async fn mark_all_read(&self, actor: Actor) -> UseCaseResult<usize> {
        let user_id = actor.user_id;
        let updated = self
            .notification_repository
            .mark_all_read(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "notifications: failed to mark all read");
                NotificationError::Internal(err)
            })?;

        info!(%user_id, updated, "notifications: marked all read");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        repositories::notifications::MockNotificationRepository,
        value_objects::{enums::user_roles::UserRole, notifications::ListNotificationsFilter},
    };
    use mockall::predicate::eq;

    #[tokio::test]
    async fn list_applies_default_page() {
        let actor = Actor::new(Uuid::new_v4(), UserRole::User);
        let mut repository = MockNotificationRepository::new();
        repository
            .expect_list_for_user()
            .with(
                eq(actor.user_id),
                eq(ListNotificationsFilter {
                    unread_only: true,
                    limit: 20,
                    offset: 0,
                }),
            )
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let usecase = NotificationUseCase::new(Arc::new(repository));
        let result = usecase
            .list_my_notifications(
                actor,
                ListNotificationsModel {
                    unread_only: true,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn oversized_page_is_rejected() {
        let mut repository = MockNotificationRepository::new();
        repository.expect_list_for_user().never();

        let usecase = NotificationUseCase::new(Arc::new(repository));
        let err = usecase
            .list_my_notifications(
                Actor::new(Uuid::new_v4(), UserRole::User),
                ListNotificationsModel {
                    limit: Some(500),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, NotificationError::Invalid(_)));
    }

    #[tokio::test]
    async fn marking_someone_elses_notification_is_not_found() {
        let mut repository = MockNotificationRepository::new();
        repository.expect_mark_read().returning(|_, _| Ok(false));

        let usecase = NotificationUseCase::new(Arc::new(repository));
        let err = usecase
            .mark_read(Actor::new(Uuid::new_v4(), UserRole::User), Uuid::new_v4())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }
}
