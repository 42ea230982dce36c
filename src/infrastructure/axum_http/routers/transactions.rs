use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    application::usecases::transactions::TransactionUseCase,
    domain::repositories::{messes::MessRepository, transactions::TransactionRepository},
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::{ApiResponse, AppError},
            extractors::Path,
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{messes::MessPostgres, transactions::TransactionPostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let mess_repository = MessPostgres::new(Arc::clone(&db_pool));
    let transaction_repository = TransactionPostgres::new(Arc::clone(&db_pool));
    let transaction_usecase =
        TransactionUseCase::new(Arc::new(mess_repository), Arc::new(transaction_repository));

    Router::new()
        .route("/transactions/me", get(list_my_transactions))
        .route("/messes/:id/transactions", get(list_mess_transactions))
        .with_state(Arc::new(transaction_usecase))
}

pub async fn list_my_transactions<M, T>(
    State(transaction_usecase): State<Arc<TransactionUseCase<M, T>>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
{
    let transactions = transaction_usecase
        .list_my_transactions(auth.actor())
        .await?;
    Ok(ApiResponse::ok("Transactions fetched", transactions))
}

pub async fn list_mess_transactions<M, T>(
    State(transaction_usecase): State<Arc<TransactionUseCase<M, T>>>,
    auth: AuthUser,
    Path(mess_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
    T: TransactionRepository + Send + Sync + 'static,
{
    let transactions = transaction_usecase
        .list_mess_transactions(auth.actor(), mess_id)
        .await?;
    Ok(ApiResponse::ok("Transactions fetched", transactions))
}
