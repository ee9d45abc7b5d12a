//! Configuration management module.
//!
//! Handles loading configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::AppError;

/// Default gas price in wei (20 gwei).
pub const DEFAULT_GAS_PRICE: u128 = 20_000_000_000;

/// Default delay between two receipt queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default number of empty receipt answers tolerated before giving up.
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 600;

/// Default lifetime of a cached compiler output (1 hour).
pub const DEFAULT_COMPILE_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Default number of distinct sources kept in the compile cache.
pub const DEFAULT_COMPILE_CACHE_CAPACITY: usize = 64;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ethereum JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Gas price attached to every submitted transaction, in wei.
    pub gas_price: u128,
    /// Receipt polling settings.
    pub poll: PollConfig,
    /// Reuse compiler output for identical contract sources.
    pub compile_cache: bool,
    /// How long a cached compiler output stays valid.
    pub compile_cache_ttl: Duration,
    /// Maximum number of cached compiler outputs.
    pub compile_cache_capacity: usize,
    /// Logging level (default: info).
    pub log_level: String,
}

/// Receipt polling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between two receipt queries.
    pub interval: Duration,
    /// Maximum number of empty answers before timing out. `None` polls forever.
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval: DEFAULT_POLL_INTERVAL, max_attempts: Some(DEFAULT_POLL_MAX_ATTEMPTS) }
    }
}

impl Config {
    /// Build a configuration with defaults for everything but the RPC URL.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            gas_price: DEFAULT_GAS_PRICE,
            poll: PollConfig::default(),
            compile_cache: true,
            compile_cache_ttl: DEFAULT_COMPILE_CACHE_TTL,
            compile_cache_capacity: DEFAULT_COMPILE_CACHE_CAPACITY,
            log_level: "info".to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `ETHEREUM_RPC_URL`: Ethereum JSON-RPC endpoint
    ///
    /// Optional environment variables:
    /// - `GAS_PRICE`: gas price in wei (default: 20 gwei)
    /// - `RECEIPT_POLL_INTERVAL_MS`: delay between receipt polls (default: 500)
    /// - `RECEIPT_POLL_MAX_ATTEMPTS`: polls before timing out, `0` for no limit (default: 600)
    /// - `COMPILE_CACHE`: `true` or `false` (default: true)
    /// - `COMPILE_CACHE_TTL_SECS`: lifetime of a cached output (default: 3600)
    /// - `COMPILE_CACHE_CAPACITY`: cached sources kept at most, at least 1 (default: 64)
    /// - `LOG_LEVEL`: Logging level (default: info)
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let rpc_url = env::var("ETHEREUM_RPC_URL").map_err(|_| {
            AppError::Config("ETHEREUM_RPC_URL environment variable not set".into())
        })?;

        Self::from_lookup(rpc_url, |key| env::var(key).ok())
    }

    /// Build the optional settings from an arbitrary key lookup.
    fn from_lookup<F>(rpc_url: String, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(rpc_url);

        if let Some(raw) = lookup("GAS_PRICE") {
            config.gas_price = parse_var("GAS_PRICE", &raw)?;
        }

        if let Some(raw) = lookup("RECEIPT_POLL_INTERVAL_MS") {
            config.poll.interval = Duration::from_millis(parse_var("RECEIPT_POLL_INTERVAL_MS", &raw)?);
        }

        if let Some(raw) = lookup("RECEIPT_POLL_MAX_ATTEMPTS") {
            let attempts: u32 = parse_var("RECEIPT_POLL_MAX_ATTEMPTS", &raw)?;
            config.poll.max_attempts = (attempts > 0).then_some(attempts);
        }

        if let Some(raw) = lookup("COMPILE_CACHE") {
            config.compile_cache = parse_var("COMPILE_CACHE", &raw)?;
        }

        if let Some(raw) = lookup("COMPILE_CACHE_TTL_SECS") {
            let secs: u64 = parse_var("COMPILE_CACHE_TTL_SECS", &raw)?;
            config.compile_cache_ttl = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("COMPILE_CACHE_CAPACITY") {
            config.compile_cache_capacity = parse_var("COMPILE_CACHE_CAPACITY", &raw)?;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        Ok(config)
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid value for {}: '{}' ({})", key, raw, e)))
}
