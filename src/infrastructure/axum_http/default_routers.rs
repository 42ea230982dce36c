use axum::{http::StatusCode, response::IntoResponse};
use tracing::info;

use crate::infrastructure::axum_http::error_responses::{ApiResponse, AppError};

pub async fn not_found() -> impl IntoResponse {
    info!("router: not_found handler invoked");
    AppError::NotFound("route not found".to_string())
}

pub async fn health_check() -> impl IntoResponse {
    info!("router: health_check handler invoked");
    (StatusCode::OK, ApiResponse::ok("OK", ()))
}
