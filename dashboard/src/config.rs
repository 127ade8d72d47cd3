//! Configuration management for the irrigation dashboard
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with IRRIGATION_ prefix

use std::time::Duration;

use config::{Environment, File};
use serde::Deserialize;
use shared::Tables;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    #[validate]
    pub server: ServerConfig,

    /// Remote reading store configuration
    #[validate]
    pub store: StoreConfig,

    /// Refresh cadences
    #[validate]
    pub polling: PollingConfig,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct ServerConfig {
    /// Server port
    #[validate(range(min = 1))]
    pub port: u16,

    /// Server host
    #[validate(length(min = 1))]
    pub host: String,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct StoreConfig {
    /// Base URL of the project, e.g. https://xyz.supabase.co
    #[validate(url)]
    pub url: String,

    /// Anonymous API key sent with every request
    #[validate(length(min = 1, message = "store.anon_key must be set"))]
    pub anon_key: String,

    /// Table holding sensor readings
    #[validate(length(min = 1))]
    pub sensor_table: String,

    /// Table the field controller polls for pump commands
    #[validate(length(min = 1))]
    pub pump_table: String,
}

#[derive(Debug, Deserialize, Clone, Validate)]
pub struct PollingConfig {
    /// Latest reading refresh interval in milliseconds
    #[validate(range(min = 1000, max = 86400000))]
    pub latest_interval_ms: u64,

    /// History refresh interval in milliseconds
    #[validate(range(min = 1000, max = 86400000))]
    pub history_interval_ms: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> AppResult<Self> {
        let environment =
            std::env::var("IRRIGATION_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config: Config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())
            .and_then(|b| b.set_default("server.port", 3000))
            .and_then(|b| b.set_default("server.host", "0.0.0.0"))
            .and_then(|b| b.set_default("store.url", "http://127.0.0.1:54321"))
            .and_then(|b| b.set_default("store.anon_key", ""))
            .and_then(|b| b.set_default("store.sensor_table", "sensor_logs"))
            .and_then(|b| b.set_default("store.pump_table", "pump_control"))
            .and_then(|b| b.set_default("polling.latest_interval_ms", 15_000))
            .and_then(|b| b.set_default("polling.history_interval_ms", 60_000))
            .map_err(|e| AppError::Configuration(e.to_string()))?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (IRRIGATION_ prefix)
            .add_source(
                Environment::with_prefix("IRRIGATION")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::Configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn tables(&self) -> Tables {
        Tables {
            sensor_logs: self.store.sensor_table.clone(),
            pump_control: self.store.pump_table.clone(),
        }
    }
}

impl PollingConfig {
    pub fn latest_interval(&self) -> Duration {
        Duration::from_millis(self.latest_interval_ms)
    }

    pub fn history_interval(&self) -> Duration {
        Duration::from_millis(self.history_interval_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            latest_interval_ms: 15_000,
            history_interval_ms: 60_000,
        }
    }
}
