use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono::Utc;
use tracing::{error, info};

use crate::{
    application::usecases::billing_cycle::BillingCycleUseCase,
    config::config_model::Billing,
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        repositories::{meal_activations::MealActivationPostgres, memberships::MembershipPostgres},
    },
};

type BillingCycle = BillingCycleUseCase<MembershipPostgres, MealActivationPostgres>;

pub fn billing_usecase(db_pool: Arc<PgPoolSquad>) -> Arc<BillingCycle> {
    Arc::new(BillingCycleUseCase::new(
        Arc::new(MembershipPostgres::new(Arc::clone(&db_pool))),
        Arc::new(MealActivationPostgres::new(db_pool)),
    ))
}

/// Runs the billing sweep forever, one pass per configured interval.
pub async fn run_billing_loop(usecase: Arc<BillingCycle>, config: Billing) -> Result<()> {
    let interval = Duration::from_secs(config.sweep_interval_secs.max(1));
    info!(
        interval_secs = interval.as_secs(),
        "billing: sweep loop started"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if let Err(err) = usecase.run_sweep(Utc::now()).await {
            error!(db_error = ?err, "billing: sweep failed");
        }
    }
}
