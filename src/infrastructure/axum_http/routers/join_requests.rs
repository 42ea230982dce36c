use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    application::usecases::join_requests::JoinRequestUseCase,
    domain::value_objects::join_requests::{ReviewRequestModel, SubmitJoinRequestModel},
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::{ApiResponse, AppError},
            extractors::{Json, Path},
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                chat_groups::ChatGroupPostgres, meal_plans::MealPlanPostgres,
                membership_workflows::MembershipWorkflowPostgres, memberships::MembershipPostgres,
                mess_credits::MessCreditsPostgres, messes::MessPostgres,
                notifications::NotificationPostgres,
            },
        },
    },
};

type JoinRequests = JoinRequestUseCase<
    MessPostgres,
    MealPlanPostgres,
    MembershipPostgres,
    NotificationPostgres,
    MessCreditsPostgres,
    MembershipWorkflowPostgres,
    ChatGroupPostgres,
>;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let join_request_usecase = JoinRequestUseCase::new(
        Arc::new(MessPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MealPlanPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MembershipPostgres::new(Arc::clone(&db_pool))),
        Arc::new(NotificationPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MessCreditsPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MembershipWorkflowPostgres::new(Arc::clone(&db_pool))),
        Arc::new(ChatGroupPostgres::new(Arc::clone(&db_pool))),
    );

    Router::new()
        .route("/messes/:id/join-requests", post(submit_join_request))
        .route("/join-requests/:id/approve", post(approve_join_request))
        .route("/join-requests/:id/reject", post(reject_join_request))
        .with_state(Arc::new(join_request_usecase))
}

pub async fn submit_join_request(
    State(usecase): State<Arc<JoinRequests>>,
    auth: AuthUser,
    Path(mess_id): Path<Uuid>,
    Json(model): Json<SubmitJoinRequestModel>,
) -> Result<impl IntoResponse, AppError> {
    let receipt = usecase
        .submit_join_request(auth.actor(), mess_id, model)
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Join request sent", receipt),
    ))
}

pub async fn approve_join_request(
    State(usecase): State<Arc<JoinRequests>>,
    auth: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    info!(user_id = %auth.user_id, %notification_id, "join_requests: approve request received");
    let membership = usecase
        .approve_join_request(auth.actor(), notification_id)
        .await?;
    Ok(ApiResponse::ok("Join request approved", membership))
}

pub async fn reject_join_request(
    State(usecase): State<Arc<JoinRequests>>,
    auth: AuthUser,
    Path(notification_id): Path<Uuid>,
    body: Option<Json<ReviewRequestModel>>,
) -> Result<impl IntoResponse, AppError> {
    let Json(review) = body.unwrap_or_default();
    usecase
        .reject_join_request(auth.actor(), notification_id, review.reason)
        .await?;
    Ok(ApiResponse::ok("Join request rejected", ()))
}
