use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    /// Use X-Real-Ip / X-Forwarded-For when resolving the check-in address. Only safe behind
    /// a proxy that overwrites those headers, otherwise clients can claim any address.
    pub trust_proxy_headers: bool,
    pub run_migrations: bool,
    pub log_dir: String,
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{} must be set", key))
}

fn optional<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("{} has an invalid value: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Reads configuration from the environment (a `.env` file is honoured by the caller).
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            access_token_ttl: optional("ACCESS_TOKEN_TTL", 900)?, // default 15 min
            refresh_token_ttl: optional("REFRESH_TOKEN_TTL", 604_800)?, // default 7 days

            rate_login_per_min: optional("RATE_LOGIN_PER_MIN", 60)?,
            rate_protected_per_min: optional("RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: optional("API_PREFIX", "/api".to_string())?,

            trust_proxy_headers: optional("TRUST_PROXY_HEADERS", false)?,
            run_migrations: optional("RUN_MIGRATIONS", true)?,
            log_dir: optional("LOG_DIR", "logs".to_string())?,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            database_url: String::new(),
            jwt_secret: "test-secret".into(),
            server_addr: "127.0.0.1:0".into(),
            access_token_ttl: 900,
            refresh_token_ttl: 604_800,
            rate_login_per_min: 60,
            rate_protected_per_min: 1000,
            api_prefix: "/api".into(),
            // handler tests stand in for the proxy and set X-Real-Ip themselves
            trust_proxy_headers: true,
            run_migrations: false,
            log_dir: "logs".into(),
        }
    }
}
