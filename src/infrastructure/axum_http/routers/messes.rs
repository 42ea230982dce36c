use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    application::usecases::messes::MessUseCase,
    config::config_model::DotEnvyConfig,
    domain::{repositories::messes::MessRepository, value_objects::messes::RegisterMessModel},
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::{ApiResponse, AppError},
            extractors::{Json, Path},
        },
        postgres::{postgres_connection::PgPoolSquad, repositories::messes::MessPostgres},
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let mess_repository = MessPostgres::new(Arc::clone(&db_pool));
    let mess_usecase = MessUseCase::new(Arc::new(mess_repository), config.credits.clone());

    Router::new()
        .route("/messes", get(list_messes).post(register_mess))
        .route("/messes/:id", get(get_mess))
        .with_state(Arc::new(mess_usecase))
}

pub async fn register_mess<M>(
    State(mess_usecase): State<Arc<MessUseCase<M>>>,
    auth: AuthUser,
    Json(model): Json<RegisterMessModel>,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
{
    info!(user_id = %auth.user_id, "messes: register request received");
    let mess = mess_usecase.register_mess(auth.actor(), model).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok("Mess registered", mess)))
}

pub async fn get_mess<M>(
    State(mess_usecase): State<Arc<MessUseCase<M>>>,
    _auth: AuthUser,
    Path(mess_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
{
    let mess = mess_usecase.get_mess(mess_id).await?;
    Ok(ApiResponse::ok("Mess fetched", mess))
}

pub async fn list_messes<M>(
    State(mess_usecase): State<Arc<MessUseCase<M>>>,
    _auth: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    M: MessRepository + Send + Sync + 'static,
{
    let messes = mess_usecase.list_messes().await?;
    Ok(ApiResponse::ok("Messes fetched", messes))
}
