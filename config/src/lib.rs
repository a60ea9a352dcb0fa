//! # Configuration Management for TableHaus
//!
//! This crate provides centralized configuration structures for all TableHaus components,
//! including query defaults, the cache substrate, the retry policy and user notifications.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{AppConfig, CacheBackend, CacheConfig, RetryConfig};
//!
//! let config = AppConfig {
//!     cache: CacheConfig::new(CacheBackend::Memory, "redis://localhost:6379".to_string(), "orders".to_string(), 600),
//!     retry: RetryConfig::new(2, 3000),
//!     ..AppConfig::default()
//! };
//! assert_eq!(config.query.default_page_size, 10);
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [query]
//! default_page_size = 20
//! page_size_options = [10, 20, 50, 100]
//! stale_window_minutes = 5
//!
//! [cache]
//! backend = "redis"
//! redis_url = "redis://localhost:6379"
//! key_prefix = "tablehaus"
//! default_ttl = 3600
//!
//! [retry]
//! error_retry_count = 2
//! error_retry_interval_ms = 3000
//!
//! [notify]
//! debounce_ms = 500
//! fallback_message = "Request failed, please try again"
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from TABLEHAUS_CONFIG or ./tablehaus.toml, falling back to defaults
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path, time::Duration};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./tablehaus.toml";
const CONFIG_ENV_VAR: &str = "TABLEHAUS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub query: QueryConfig,
    pub cache: CacheConfig,
    pub retry: RetryConfig,
    pub notify: NotifyConfig,
}

/// Table query defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub default_page_size: u32,
    pub page_size_options: Vec<u32>,
    /// Width of the stale-time bucket mixed into every cache key
    pub stale_window_minutes: u64,
}

/// Which cache substrate backs the query cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Memory,
    Redis,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub redis_url: String,
    /// Key prefix for all cache entries
    pub key_prefix: String,
    /// Default TTL for cache entries (in seconds)
    pub default_ttl: u64,
}

/// Fetch retry policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Consecutive failures (the first one included) after which the query gives up
    pub error_retry_count: u32,
    pub error_retry_interval_ms: u64,
}

/// User-facing notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub debounce_ms: u64,
    pub fallback_message: String,
}

impl AppConfig {
    /// Load configuration from the TOML file named in the environment, the default path,
    /// or built-in defaults when neither exists
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is not an error
        dotenvy::dotenv().ok();

        let config = if let Ok(config_path) = env::var(CONFIG_ENV_VAR) {
            Self::from_file(&config_path)?
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Query validations
        if self.query.default_page_size == 0 {
            return Err(ConfigError::Invalid(
                "Query default_page_size must be greater than 0".to_string(),
            ));
        }
        if self.query.page_size_options.is_empty() {
            return Err(ConfigError::Invalid(
                "Query page_size_options cannot be empty".to_string(),
            ));
        }
        if self.query.page_size_options.contains(&0) {
            return Err(ConfigError::Invalid(
                "Query page_size_options cannot contain 0".to_string(),
            ));
        }
        if self.query.stale_window_minutes == 0 {
            return Err(ConfigError::Invalid(
                "Query stale_window_minutes must be greater than 0".to_string(),
            ));
        }

        // Cache validations
        if self.cache.backend == CacheBackend::Redis && self.cache.redis_url.is_empty() {
            return Err(ConfigError::Invalid(
                "Redis URL cannot be empty when the redis backend is selected".to_string(),
            ));
        }
        if self.cache.key_prefix.contains(':') {
            return Err(ConfigError::Invalid(
                "Cache key_prefix cannot contain ':'".to_string(),
            ));
        }
        if self.cache.default_ttl == 0 {
            return Err(ConfigError::Invalid(
                "Cache default_ttl must be greater than 0".to_string(),
            ));
        }

        // Retry validations
        if self.retry.error_retry_count == 0 {
            return Err(ConfigError::Invalid(
                "Retry error_retry_count must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl QueryConfig {
    /// Create a new query configuration
    pub fn new(default_page_size: u32, page_size_options: Vec<u32>, stale_window_minutes: u64) -> Self {
        Self {
            default_page_size,
            page_size_options,
            stale_window_minutes,
        }
    }

    /// Stale window width as Duration
    pub fn stale_window(&self) -> Duration {
        Duration::from_secs(self.stale_window_minutes * 60)
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            page_size_options: vec![10, 20, 50, 100],
            stale_window_minutes: 5,
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration
    pub fn new(backend: CacheBackend, redis_url: String, key_prefix: String, default_ttl: u64) -> Self {
        Self {
            backend,
            redis_url,
            key_prefix,
            default_ttl,
        }
    }

    /// Get TTL as Duration
    pub fn ttl_duration(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            redis_url: "redis://localhost:6379".to_string(),
            key_prefix: "tablehaus".to_string(),
            default_ttl: 3600, // 1 hour
        }
    }
}

impl RetryConfig {
    /// Create a new retry configuration
    pub fn new(error_retry_count: u32, error_retry_interval_ms: u64) -> Self {
        Self {
            error_retry_count,
            error_retry_interval_ms,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.error_retry_interval_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            error_retry_count: 2,
            error_retry_interval_ms: 3000,
        }
    }
}

impl NotifyConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            fallback_message: "Request failed, please try again".to_string(),
        }
    }
}
