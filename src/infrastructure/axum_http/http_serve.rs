use crate::{
    config::config_model::DotEnvyConfig,
    infrastructure::{
        axum_http::{default_routers, routers},
        postgres::postgres_connection::PgPoolSquad,
    },
};
use anyhow::Result;
use axum::{
    Router,
    http::{Method, StatusCode, header},
    routing::get,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};

pub fn api_routes(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Router {
    Router::new()
        .route("/health-check", get(default_routers::health_check))
        .merge(routers::messes::routes(Arc::clone(&db_pool), config))
        .merge(routers::credits::routes(Arc::clone(&db_pool)))
        .merge(routers::meal_plans::routes(Arc::clone(&db_pool)))
        .merge(routers::meals::routes(Arc::clone(&db_pool)))
        .merge(routers::join_requests::routes(Arc::clone(&db_pool)))
        .merge(routers::payment_requests::routes(Arc::clone(&db_pool)))
        .merge(routers::memberships::routes(Arc::clone(&db_pool)))
        .merge(routers::leave_requests::routes(Arc::clone(&db_pool)))
        .merge(routers::meal_activations::routes(Arc::clone(&db_pool)))
        .merge(routers::notifications::routes(Arc::clone(&db_pool)))
        .merge(routers::transactions::routes(db_pool))
}

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let app = Router::new()
        .nest("/api/v1", api_routes(Arc::clone(&config), db_pool))
        .fallback(default_routers::not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.server.timeout),
        ))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = ?err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = ?err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
