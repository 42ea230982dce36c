use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::info;
use uuid::Uuid;

use crate::{
    application::usecases::memberships::MembershipUseCase,
    domain::repositories::{memberships::MembershipRepository, messes::MessRepository},
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::{ApiResponse, AppError},
            extractors::Path,
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{memberships::MembershipPostgres, messes::MessPostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let mess_repository = MessPostgres::new(Arc::clone(&db_pool));
    let membership_repository = MembershipPostgres::new(Arc::clone(&db_pool));
    let membership_usecase =
        MembershipUseCase::new(Arc::new(mess_repository), Arc::new(membership_repository));

    Router::new()
        .route("/memberships/me", get(list_my_memberships))
        .route("/memberships/:id", get(get_membership))
        .route("/memberships/:id/cancel", post(cancel_membership))
        .route("/memberships/:id/payments", get(list_payment_history))
        .route("/messes/:id/members", get(list_mess_members))
        .with_state(Arc::new(membership_usecase))
}

pub async fn list_my_memberships<M, Ms>(
    State(membership_usecase): State<Arc<MembershipUseCase<M, Ms>>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
    Ms: MembershipRepository + Send + Sync + 'static,
{
    let memberships = membership_usecase.list_my_memberships(auth.actor()).await?;
    Ok(ApiResponse::ok("Memberships fetched", memberships))
}

pub async fn list_mess_members<M, Ms>(
    State(membership_usecase): State<Arc<MembershipUseCase<M, Ms>>>,
    auth: AuthUser,
    Path(mess_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
    Ms: MembershipRepository + Send + Sync + 'static,
{
    let members = membership_usecase
        .list_mess_members(auth.actor(), mess_id)
        .await?;
    Ok(ApiResponse::ok("Members fetched", members))
}

pub async fn get_membership<M, Ms>(
    State(membership_usecase): State<Arc<MembershipUseCase<M, Ms>>>,
    auth: AuthUser,
    Path(membership_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
    Ms: MembershipRepository + Send + Sync + 'static,
{
    let membership = membership_usecase
        .get_membership(auth.actor(), membership_id)
        .await?;
    Ok(ApiResponse::ok("Membership fetched", membership))
}

pub async fn cancel_membership<M, Ms>(
    State(membership_usecase): State<Arc<MembershipUseCase<M, Ms>>>,
    auth: AuthUser,
    Path(membership_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
    Ms: MembershipRepository + Send + Sync + 'static,
{
    info!(user_id = %auth.user_id, %membership_id, "memberships: cancel request received");
    let membership = membership_usecase
        .cancel_membership(auth.actor(), membership_id)
        .await?;
    Ok(ApiResponse::ok("Membership cancelled", membership))
}

pub async fn list_payment_history<M, Ms>(
    State(membership_usecase): State<Arc<MembershipUseCase<M, Ms>>>,
    auth: AuthUser,
    Path(membership_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
    Ms: MembershipRepository + Send + Sync + 'static,
{
    let payments = membership_usecase
        .list_payment_history(auth.actor(), membership_id)
        .await?;
    Ok(ApiResponse::ok("Payment history fetched", payments))
}
