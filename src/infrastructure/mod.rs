pub mod axum_http;
pub mod billing;
pub mod postgres;
