//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use reviews_core::ReviewsError;
use std::path::Path;
use tracing::{debug, info};

/// Prefix for environment overrides, e.g. `REVIEWS__CACHE__TTL_SECS=30`.
pub const ENV_PREFIX: &str = "REVIEWS";

/// Loads and validates the layered configuration once at startup.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Uncommitted local overrides
    /// 4. Environment variables with `REVIEWS__` prefix
    pub fn new(config_dir: impl AsRef<str>) -> Result<Self, ReviewsError> {
        let config = Self::load_config(config_dir.as_ref())?;
        Ok(Self { config })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, ReviewsError> {
        Self::new("./config")
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, yielding the loaded configuration.
    #[must_use]
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<AppConfig, ReviewsError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = std::env::var(format!("{ENV_PREFIX}_ENVIRONMENT"))
            .unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("server.cors_origins")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_reviews_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_reviews_error)?;

        ConfigValidator::validate(&app_config)
            .map_err(|errors| ReviewsError::Configuration(format_validation_errors(&errors)))?;

        Ok(app_config)
    }
}

fn config_error_to_reviews_error(err: ConfigError) -> ReviewsError {
    ReviewsError::Configuration(err.to_string())
}
