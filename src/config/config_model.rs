#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub billing: Billing,
    pub credits: Credits,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Billing {
    pub sweep_interval_secs: u64,
}

/// Credit allowance handed to a newly registered mess.
#[derive(Debug, Clone)]
pub struct Credits {
    pub initial_balance: i32,
    pub member_cost: i32,
}

#[derive(Debug, Clone)]
pub struct JwtSecret {
    pub secret: String,
}
