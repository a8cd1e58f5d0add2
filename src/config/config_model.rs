#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub whop: Whop,
    pub livekit: LiveKit,
    pub session: Session,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    /// Request body limit in MiB.
    pub body_limit: u64,
    /// Request timeout in seconds.
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct Whop {
    pub api_key: String,
    pub api_base_url: String,
    pub webhook_secret: String,
    /// Account that receives the platform share of every payment.
    pub platform_account_id: String,
    pub checkout_base_url: String,
}

#[derive(Debug, Clone)]
pub struct LiveKit {
    pub api_key: String,
    pub api_secret: String,
    pub url: String,
    pub token_ttl_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub jwt_secret: String,
}
