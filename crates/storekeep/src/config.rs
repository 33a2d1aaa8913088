//! Facade configuration.
//!
//! Configuration is loaded from environment variables. All sensitive
//! fields are redacted in Debug output.
//!
//! ```rust,ignore
//! let config = Config::from_env()?;
//! let store = RedisStore::from_config(&config).await?;
//! let lock = Lock::with_hold(store.clone(), config.lock_hold());
//! let cache = Cache::with_default_ttl(store, config.cache_ttl());
//! ```

use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default lock hold time in seconds.
pub const DEFAULT_LOCK_HOLD_SECONDS: u64 = 10;

/// Default cache entry TTL in seconds (one hour).
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 3600;

/// Facade configuration.
///
/// Loaded from environment variables with sensible defaults.
/// Sensitive fields are redacted in Debug output.
#[derive(Clone)]
pub struct Config {
    /// Store connection URL.
    /// Protected by `SecretString` to prevent accidental logging.
    pub store_url: SecretString,

    /// Lock hold time in seconds (default: 10).
    pub lock_hold_seconds: u64,

    /// Default cache entry TTL in seconds (default: 3600).
    pub cache_ttl_seconds: u64,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("store_url", &"[REDACTED]")
            .field("lock_hold_seconds", &self.lock_hold_seconds)
            .field("cache_ttl_seconds", &self.cache_ttl_seconds)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let store_url = SecretString::from(
            vars.get("STOREKEEP_STORE_URL")
                .ok_or_else(|| ConfigError::MissingEnvVar("STOREKEEP_STORE_URL".to_string()))?
                .clone(),
        );

        let lock_hold_seconds = parse_or_default(
            vars,
            "STOREKEEP_LOCK_HOLD_SECONDS",
            DEFAULT_LOCK_HOLD_SECONDS,
        )?;

        let cache_ttl_seconds = parse_or_default(
            vars,
            "STOREKEEP_CACHE_TTL_SECONDS",
            DEFAULT_CACHE_TTL_SECONDS,
        )?;

        Ok(Config {
            store_url,
            lock_hold_seconds,
            cache_ttl_seconds,
        })
    }

    /// Lock hold time as a [`Duration`].
    pub fn lock_hold(&self) -> Duration {
        Duration::from_secs(self.lock_hold_seconds)
    }

    /// Default cache TTL as a [`Duration`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

fn parse_or_default(
    vars: &HashMap<String, String>,
    name: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    match vars.get(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("{name}: {raw}"))),
        None => Ok(default),
    }
}
