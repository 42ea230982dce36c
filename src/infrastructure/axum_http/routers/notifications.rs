use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    application::usecases::notifications::NotificationUseCase,
    domain::{
        repositories::notifications::NotificationRepository,
        value_objects::notifications::ListNotificationsModel,
    },
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::{ApiResponse, AppError},
            extractors::{Path, Query},
        },
        postgres::{
            postgres_connection::PgPoolSquad, repositories::notifications::NotificationPostgres,
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let notification_repository = NotificationPostgres::new(Arc::clone(&db_pool));
    let notification_usecase = NotificationUseCase::new(Arc::new(notification_repository));

    Router::new()
        .route("/notifications", get(list_my_notifications))
        .route("/notifications/unread-count", get(unread_count))
        .route("/notifications/read-all", post(mark_all_read))
        .route("/notifications/:id/read", post(mark_read))
        .with_state(Arc::new(notification_usecase))
}

pub async fn list_my_notifications<N>(
    State(notification_usecase): State<Arc<NotificationUseCase<N>>>,
    auth: AuthUser,
    Query(query): Query<ListNotificationsModel>,
) -> Result<impl IntoResponse, AppError>
where
    N: NotificationRepository + Send + Sync + 'static,
{
    let notifications = notification_usecase
        .list_my_notifications(auth.actor(), query)
        .await?;
    Ok(ApiResponse::ok("Notifications fetched", notifications))
}

pub async fn unread_count<N>(
    State(notification_usecase): State<Arc<NotificationUseCase<N>>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    N: NotificationRepository + Send + Sync + 'static,
{
    let count = notification_usecase.unread_count(auth.actor()).await?;
    Ok(ApiResponse::ok("Unread count fetched", count))
}

pub async fn mark_read<N>(
    State(notification_usecase): State<Arc<NotificationUseCase<N>>>,
    auth: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    N: NotificationRepository + Send + Sync + 'static,
{
    notification_usecase
        .mark_read(auth.actor(), notification_id)
        .await?;
    Ok(ApiResponse::ok("Notification marked as read", ()))
}

pub async fn mark_all_read<N>(
    State(notification_usecase): State<Arc<NotificationUseCase<N>>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    N: NotificationRepository + Send + Sync + 'static,
{
    let updated = notification_usecase.mark_all_read(auth.actor()).await?;
    Ok(ApiResponse::ok(
        "Notifications marked as read",
        json!({ "updated": updated }),
    ))
}
