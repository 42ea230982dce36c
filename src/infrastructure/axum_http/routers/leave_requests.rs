use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    application::usecases::leave_requests::LeaveRequestUseCase,
    domain::value_objects::{
        join_requests::ReviewRequestModel, leave_requests::SubmitLeaveRequestModel,
    },
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::{ApiResponse, AppError},
            extractors::{Json, Path},
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                leave_requests::LeaveRequestPostgres, meal_plans::MealPlanPostgres,
                memberships::MembershipPostgres, messes::MessPostgres,
            },
        },
    },
};

type LeaveRequests =
    LeaveRequestUseCase<MessPostgres, MealPlanPostgres, MembershipPostgres, LeaveRequestPostgres>;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let leave_usecase = LeaveRequestUseCase::new(
        Arc::new(MessPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MealPlanPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MembershipPostgres::new(Arc::clone(&db_pool))),
        Arc::new(LeaveRequestPostgres::new(Arc::clone(&db_pool))),
    );

    Router::new()
        .route(
            "/memberships/:id/leave-requests",
            get(list_leave_requests).post(submit_leave_request),
        )
        .route("/leave-requests/:id/approve", post(approve_leave_request))
        .route("/leave-requests/:id/reject", post(reject_leave_request))
        .with_state(Arc::new(leave_usecase))
}

pub async fn submit_leave_request(
    State(usecase): State<Arc<LeaveRequests>>,
    auth: AuthUser,
    Path(membership_id): Path<Uuid>,
    Json(model): Json<SubmitLeaveRequestModel>,
) -> Result<impl IntoResponse, AppError> {
    let leave = usecase
        .submit_leave_request(auth.actor(), membership_id, model)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::ok("Leave requested", leave)))
}

pub async fn list_leave_requests(
    State(usecase): State<Arc<LeaveRequests>>,
    auth: AuthUser,
    Path(membership_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let leaves = usecase
        .list_leave_requests(auth.actor(), membership_id)
        .await?;
    Ok(ApiResponse::ok("Leave requests fetched", leaves))
}

pub async fn approve_leave_request(
    State(usecase): State<Arc<LeaveRequests>>,
    auth: AuthUser,
    Path(leave_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let leave = usecase.approve_leave_request(auth.actor(), leave_id).await?;
    Ok(ApiResponse::ok("Leave approved", leave))
}

pub async fn reject_leave_request(
    State(usecase): State<Arc<LeaveRequests>>,
    auth: AuthUser,
    Path(leave_id): Path<Uuid>,
    body: Option<Json<ReviewRequestModel>>,
) -> Result<impl IntoResponse, AppError> {
    let Json(review) = body.unwrap_or_default();
    let leave = usecase
        .reject_leave_request(auth.actor(), leave_id, review.reason)
        .await?;
    Ok(ApiResponse::ok("Leave rejected", leave))
}
