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
    application::usecases::payment_requests::PaymentRequestUseCase,
    domain::value_objects::{
        join_requests::ReviewRequestModel, payment_requests::SubmitPaymentRequestModel,
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
                meal_plans::MealPlanPostgres, membership_workflows::MembershipWorkflowPostgres,
                memberships::MembershipPostgres, mess_credits::MessCreditsPostgres,
                messes::MessPostgres, notifications::NotificationPostgres,
            },
        },
    },
};

type PaymentRequests = PaymentRequestUseCase<
    MessPostgres,
    MealPlanPostgres,
    MembershipPostgres,
    NotificationPostgres,
    MessCreditsPostgres,
    MembershipWorkflowPostgres,
>;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let payment_request_usecase = PaymentRequestUseCase::new(
        Arc::new(MessPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MealPlanPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MembershipPostgres::new(Arc::clone(&db_pool))),
        Arc::new(NotificationPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MessCreditsPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MembershipWorkflowPostgres::new(Arc::clone(&db_pool))),
    );

    Router::new()
        .route("/payment-requests", post(submit_payment_request))
        .route("/payment-requests/:id/approve", post(approve_payment_request))
        .route("/payment-requests/:id/reject", post(reject_payment_request))
        .with_state(Arc::new(payment_request_usecase))
}

pub async fn submit_payment_request(
    State(usecase): State<Arc<PaymentRequests>>,
    auth: AuthUser,
    Json(model): Json<SubmitPaymentRequestModel>,
) -> Result<impl IntoResponse, AppError> {
    let receipt = usecase.submit_payment_request(auth.actor(), model).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Payment request sent", receipt),
    ))
}

pub async fn approve_payment_request(
    State(usecase): State<Arc<PaymentRequests>>,
    auth: AuthUser,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    info!(user_id = %auth.user_id, %notification_id, "payment_requests: approve request received");
    let approval = usecase
        .approve_payment_request(auth.actor(), notification_id)
        .await?;
    Ok(ApiResponse::ok("Payment approved", approval))
}

pub async fn reject_payment_request(
    State(usecase): State<Arc<PaymentRequests>>,
    auth: AuthUser,
    Path(notification_id): Path<Uuid>,
    body: Option<Json<ReviewRequestModel>>,
) -> Result<impl IntoResponse, AppError> {
    let Json(review) = body.unwrap_or_default();
    usecase
        .reject_payment_request(auth.actor(), notification_id, review.reason)
        .await?;
    Ok(ApiResponse::ok("Payment rejected", ()))
}
