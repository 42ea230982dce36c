use anyhow::{Context, Result};

use crate::config::{config_model::JwtSecret, stage::Stage};

use super::config_model::DotEnvyConfig;

const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;
const DEFAULT_INITIAL_MESS_CREDITS: i32 = 10;
const DEFAULT_MEMBER_CREDIT_COST: i32 = 1;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = super::config_model::Server {
        port: std::env::var("SERVER_PORT")
            .context("SERVER_PORT is invalid")?
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .context("SERVER_BODY_LIMIT is invalid")?
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .context("SERVER_TIMEOUT is invalid")?
            .parse()?,
    };

    let database = super::config_model::Database {
        url: std::env::var("DATABASE_URL").context("DATABASE_URL is invalid")?,
    };

    let billing = super::config_model::Billing {
        sweep_interval_secs: env_or("BILLING_SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS)?,
    };

    let credits = super::config_model::Credits {
        initial_balance: env_or("INITIAL_MESS_CREDITS", DEFAULT_INITIAL_MESS_CREDITS)?,
        member_cost: env_or("DEFAULT_MEMBER_CREDIT_COST", DEFAULT_MEMBER_CREDIT_COST)?,
    };

    Ok(DotEnvyConfig {
        server,
        database,
        billing,
        credits,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}

pub fn get_jwt_secret() -> Result<JwtSecret> {
    dotenvy::dotenv().ok();

    Ok(JwtSecret {
        secret: std::env::var("JWT_SECRET").context("JWT_SECRET is invalid")?,
    })
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{} is invalid", key)),
        _ => Ok(default),
    }
}
