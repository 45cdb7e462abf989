//! Configuration validation module.
//!
//! Collects every problem in a loaded configuration so startup fails once
//! with the full list instead of on the first bad value.

use crate::{AppConfig, CacheConfig, DatabaseConfig, ObservabilityConfig, RedisConfig, ServerConfig};
use reviews_core::telemetry::LogFormat;
use std::fmt::Write;
use thiserror::Error;
use url::Url;

/// A single problem found in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("Invalid port for {name}: {value} (must be 1-65535)")]
    InvalidPort { name: String, value: u16 },

    #[error("Invalid pool size: min ({min}) cannot be greater than max ({max})")]
    InvalidPoolSize { min: u32, max: u32 },

    #[error("Pool size {name} = {value} must be between 1 and {maximum}")]
    PoolSizeOutOfRange { name: String, value: u32, maximum: u32 },

    #[error("Invalid {url_type} URL: {message}")]
    InvalidUrl { url_type: String, message: String },

    #[error("'{name}' must be positive")]
    NonPositiveDuration { name: String },

    #[error("Invalid log level: '{value}' (valid: trace, debug, info, warn, error)")]
    InvalidLogLevel { value: String },

    #[error("Invalid log format: '{value}' (valid: pretty, json)")]
    InvalidLogFormat { value: String },

    /// Entries live under `{prefix}:{product_id}`, so the prefix itself
    /// cannot contain the separator.
    #[error("Invalid cache key prefix: '{value}' (must be non-empty, no ':')")]
    InvalidKeyPrefix { value: String },

    #[error("Invalid metrics path: '{value}' (must start with '/')")]
    InvalidMetricsPath { value: String },
}

/// Accumulates validation errors.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<ConfigValidationError>,
}

impl ValidationResult {
    fn add_error(&mut self, error: ConfigValidationError) {
        self.errors.push(error);
    }

    fn require_positive(&mut self, name: &str, value: u64) {
        if value == 0 {
            self.add_error(ConfigValidationError::NonPositiveDuration {
                name: name.to_string(),
            });
        }
    }

    fn into_result(self) -> Result<(), Vec<ConfigValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: u32 = 1000;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut result = ValidationResult::default();

        Self::validate_server(&config.server, &mut result);
        Self::validate_database(&config.database, &mut result);
        Self::validate_redis(&config.redis, &mut result);
        Self::validate_cache(&config.cache, &mut result);
        Self::validate_observability(&config.observability, &mut result);

        result.into_result()
    }

    fn validate_server(config: &ServerConfig, result: &mut ValidationResult) {
        if config.port == 0 {
            result.add_error(ConfigValidationError::InvalidPort {
                name: "server.port".to_string(),
                value: config.port,
            });
        }
        result.require_positive("server.request_timeout_secs", config.request_timeout_secs);
    }

    fn validate_database(config: &DatabaseConfig, result: &mut ValidationResult) {
        if !config.url.starts_with("mysql://") {
            result.add_error(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL must start with mysql://".to_string(),
            });
        } else if let Err(e) = Url::parse(&config.url) {
            result.add_error(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: e.to_string(),
            });
        }

        if config.min_connections > config.max_connections {
            result.add_error(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }
        if config.max_connections == 0 || config.max_connections > Self::MAX_POOL_SIZE {
            result.add_error(ConfigValidationError::PoolSizeOutOfRange {
                name: "database.max_connections".to_string(),
                value: config.max_connections,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        result.require_positive("database.connect_timeout_secs", config.connect_timeout_secs);
        result.require_positive("database.idle_timeout_secs", config.idle_timeout_secs);
    }

    fn validate_redis(config: &RedisConfig, result: &mut ValidationResult) {
        if !config.enabled {
            return;
        }

        if !config.url.starts_with("redis://") && !config.url.starts_with("rediss://") {
            result.add_error(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: "URL must start with redis:// or rediss://".to_string(),
            });
        }

        if config.pool_size == 0 || config.pool_size > Self::MAX_POOL_SIZE {
            result.add_error(ConfigValidationError::PoolSizeOutOfRange {
                name: "redis.pool_size".to_string(),
                value: config.pool_size,
                maximum: Self::MAX_POOL_SIZE,
            });
        }
    }

    fn validate_cache(config: &CacheConfig, result: &mut ValidationResult) {
        result.require_positive("cache.ttl_secs", config.ttl_secs);

        if config.key_prefix.is_empty() || config.key_prefix.contains(':') {
            result.add_error(ConfigValidationError::InvalidKeyPrefix {
                value: config.key_prefix.clone(),
            });
        }
    }

    fn validate_observability(config: &ObservabilityConfig, result: &mut ValidationResult) {
        let level = config.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            result.add_error(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }

        if config
            .log_format
            .parse::<LogFormat>()
            .is_err()
        {
            result.add_error(ConfigValidationError::InvalidLogFormat {
                value: config.log_format.clone(),
            });
        }

        if config.metrics_enabled && !config.metrics_path.starts_with('/') {
            result.add_error(ConfigValidationError::InvalidMetricsPath {
                value: config.metrics_path.clone(),
            });
        }
    }
}

/// Formats validation errors for display.
#[must_use]
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        let _ = writeln!(output, "  {}. {}", i + 1, error);
    }
    output
}
