use anyhow::Result;
use smartmess::{
    config::config_loader,
    infrastructure::{
        axum_http::http_serve,
        billing::sweep_loop,
        postgres::postgres_connection,
    },
    observability,
};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("SmartMess exited with error: {}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    observability::init_observability("smartmess")?;

    let dotenvy_env = Arc::new(config_loader::load()?);
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let db_pool = Arc::new(postgres_pool);

    let billing_loop = tokio::spawn(sweep_loop::run_billing_loop(
        sweep_loop::billing_usecase(Arc::clone(&db_pool)),
        dotenvy_env.billing.clone(),
    ));

    let server = tokio::spawn(http_serve::start(Arc::clone(&dotenvy_env), db_pool));

    tokio::select! {
        result = server => result??,
        result = billing_loop => result??,
    };
    Ok(())
}
