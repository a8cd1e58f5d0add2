use anyhow::{Context, Result, anyhow};

use super::config_model::{Database, DotEnvyConfig, LiveKit, Server, Session, Whop};

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_BODY_LIMIT_MIB: u64 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_WHOP_API_BASE_URL: &str = "https://api.whop.com/api/v5";
const DEFAULT_WHOP_CHECKOUT_BASE_URL: &str = "https://whop.com/checkout";
const DEFAULT_LIVEKIT_TOKEN_TTL_SECS: u64 = 6 * 60 * 60;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    load_from(|key| std::env::var(key).ok())
}

/// Builds the config from an arbitrary variable source. Blank values count as missing.
pub fn load_from<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| {
        lookup(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };
    let required = |key: &str| var(key).ok_or_else(|| anyhow!("{key} is missing"));

    let server = Server {
        port: parse_or(var("SERVER_PORT"), "SERVER_PORT", DEFAULT_SERVER_PORT)?,
        body_limit: parse_or(
            var("SERVER_BODY_LIMIT"),
            "SERVER_BODY_LIMIT",
            DEFAULT_BODY_LIMIT_MIB,
        )?,
        timeout: parse_or(var("SERVER_TIMEOUT"), "SERVER_TIMEOUT", DEFAULT_TIMEOUT_SECS)?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
        max_connections: parse_or(
            var("DATABASE_MAX_CONNECTIONS"),
            "DATABASE_MAX_CONNECTIONS",
            DEFAULT_DATABASE_MAX_CONNECTIONS,
        )?,
    };

    let whop = Whop {
        api_key: required("WHOP_API_KEY")?,
        api_base_url: var("WHOP_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_WHOP_API_BASE_URL.to_string()),
        webhook_secret: required("WHOP_WEBHOOK_SECRET")?,
        platform_account_id: required("WHOP_PLATFORM_ACCOUNT_ID")?,
        checkout_base_url: var("WHOP_CHECKOUT_BASE_URL")
            .unwrap_or_else(|| DEFAULT_WHOP_CHECKOUT_BASE_URL.to_string()),
    };

    let livekit = LiveKit {
        api_key: required("LIVEKIT_API_KEY")?,
        api_secret: required("LIVEKIT_API_SECRET")?,
        url: required("LIVEKIT_URL")?,
        token_ttl_seconds: parse_or(
            var("LIVEKIT_TOKEN_TTL_SECONDS"),
            "LIVEKIT_TOKEN_TTL_SECONDS",
            DEFAULT_LIVEKIT_TOKEN_TTL_SECS,
        )?,
    };

    let session = Session {
        jwt_secret: required("SESSION_JWT_SECRET")?,
    };

    Ok(DotEnvyConfig {
        server,
        database,
        whop,
        livekit,
        session,
    })
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .parse()
            .with_context(|| format!("{key} is invalid: {value}")),
        None => Ok(default),
    }
}
