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
    application::usecases::credits::CreditUseCase,
    domain::{
        repositories::{mess_credits::MessCreditsRepository, messes::MessRepository},
        value_objects::credits::GrantCreditsModel,
    },
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::{ApiResponse, AppError},
            extractors::{Json, Path},
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{mess_credits::MessCreditsPostgres, messes::MessPostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let mess_repository = MessPostgres::new(Arc::clone(&db_pool));
    let credits_repository = MessCreditsPostgres::new(Arc::clone(&db_pool));
    let credit_usecase = CreditUseCase::new(Arc::new(mess_repository), Arc::new(credits_repository));

    Router::new()
        .route("/messes/:id/credits", get(get_balance))
        .route("/messes/:id/credits/ledger", get(list_ledger))
        .route("/messes/:id/credits/grant", post(grant_credits))
        .with_state(Arc::new(credit_usecase))
}

pub async fn get_balance<M, C>(
    State(credit_usecase): State<Arc<CreditUseCase<M, C>>>,
    auth: AuthUser,
    Path(mess_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
    C: MessCreditsRepository + Send + Sync + 'static,
{
    let balance = credit_usecase.get_balance(auth.actor(), mess_id).await?;
    Ok(ApiResponse::ok("Credit balance fetched", balance))
}

pub async fn list_ledger<M, C>(
    State(credit_usecase): State<Arc<CreditUseCase<M, C>>>,
    auth: AuthUser,
    Path(mess_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
    C: MessCreditsRepository + Send + Sync + 'static,
{
    let ledger = credit_usecase.list_ledger(auth.actor(), mess_id).await?;
    Ok(ApiResponse::ok("Credit ledger fetched", ledger))
}

pub async fn grant_credits<M, C>(
    State(credit_usecase): State<Arc<CreditUseCase<M, C>>>,
    auth: AuthUser,
    Path(mess_id): Path<Uuid>,
    Json(model): Json<GrantCreditsModel>,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
    C: MessCreditsRepository + Send + Sync + 'static,
{
    info!(user_id = %auth.user_id, %mess_id, amount = model.amount, "credits: grant request received");
    let balance = credit_usecase
        .grant_credits(auth.actor(), mess_id, model)
        .await?;
    Ok(ApiResponse::ok("Credits granted", balance))
}
