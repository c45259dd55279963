//! Runtime configuration read from the environment (and `.env` when present).
//!
//! Every external integration is optional: leaving its URL unset disables it and
//! the routes that need it answer with `503`.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::error::AppError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./stakemarket.sqlite?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_IPFS_GATEWAY_URL: &str = "https://gateway.pinata.cloud";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    /// EVM JSON-RPC endpoint used for balance reads and receipt polling
    pub chain_rpc_url: Option<String>,
    /// Upper bound on how long to poll for a transaction receipt
    pub receipt_timeout: Duration,
    pub pinning_api_url: Option<String>,
    pub pinning_jwt: Option<String>,
    pub ipfs_gateway_url: String,
    pub ip_registry_url: Option<String>,
    pub ip_registry_api_key: Option<String>,
    /// Requests per minute per client IP; `None` disables rate limiting
    pub rate_limit_per_minute: Option<u32>,
    pub worker_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            chain_rpc_url: None,
            receipt_timeout: Duration::from_secs(120),
            pinning_api_url: None,
            pinning_jwt: None,
            ipfs_gateway_url: DEFAULT_IPFS_GATEWAY_URL.to_string(),
            ip_registry_url: None,
            ip_registry_api_key: None,
            rate_limit_per_minute: None,
            worker_interval: Duration::from_secs(15 * 60),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env (if present) so values from file are visible
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);
        let defaults = Self::default();

        Ok(Self {
            database_url: vars.optional("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: vars.optional("BIND_ADDR").unwrap_or(defaults.bind_addr),
            chain_rpc_url: vars.url("CHAIN_RPC_URL")?,
            receipt_timeout: vars
                .parse::<u64>("RECEIPT_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.receipt_timeout),
            pinning_api_url: vars.url("PINNING_API_URL")?,
            pinning_jwt: vars.optional("PINNING_JWT"),
            ipfs_gateway_url: vars.url("IPFS_GATEWAY_URL")?.unwrap_or(defaults.ipfs_gateway_url),
            ip_registry_url: vars.url("IP_REGISTRY_URL")?,
            ip_registry_api_key: vars.optional("IP_REGISTRY_API_KEY"),
            rate_limit_per_minute: vars.parse::<u32>("RATE_LIMIT_PER_MINUTE")?.filter(|n| *n > 0),
            worker_interval: vars
                .positive_secs("WORKER_INTERVAL_SECS")?
                .unwrap_or(defaults.worker_interval),
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }

    /// An http(s) URL, without a trailing slash.
    fn url(&self, name: &str) -> Result<Option<String>, AppError> {
        let Some(raw) = self.optional(name) else {
            return Ok(None);
        };
        let parsed = Url::parse(&raw)
            .map_err(|e| AppError::ConfigError(format!("{} has invalid URL '{}': {}", name, raw, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::ConfigError(format!("{} must be an http(s) URL", name)));
        }
        Ok(Some(raw.trim_end_matches('/').to_string()))
    }

    fn parse<T>(&self, name: &str) -> Result<Option<T>, AppError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(name) {
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|e| AppError::ConfigError(format!("{} has invalid value '{}': {}", name, raw, e))),
            None => Ok(None),
        }
    }

    /// A period in whole seconds. Zero is a configuration error.
    fn positive_secs(&self, name: &str) -> Result<Option<Duration>, AppError> {
        match self.parse::<u64>(name)? {
            Some(0) => Err(AppError::ConfigError(format!("{} must be greater than zero", name))),
            other => Ok(other.map(Duration::from_secs)),
        }
    }
}
