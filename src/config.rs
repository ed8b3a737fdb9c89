use serde::{Deserialize, Serialize};

use crate::services::error_log::LogSettings;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Environment (dev, staging, prod)
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Maximum number of entries kept in the error log
    #[serde(default = "default_max_log_items")]
    pub max_log_items: usize,

    /// Error log entry ids wrap at this value
    #[serde(default = "default_log_id_wrap")]
    pub log_id_wrap: u32,

    /// Buffered notifications per bus listener before it starts lagging
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables or app.env file
    ///
    /// Runs before tracing is initialized, so the caller reports the outcome.
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load from app.env file first
        if std::path::Path::new("app.env").exists() {
            dotenvy::from_filename("app.env").ok();
        } else {
            dotenvy::dotenv().ok();
        }

        envy::from_env::<Config>().map_err(ConfigError::EnvError)
    }

    /// Default tracing filter when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> String {
        format!(
            "livestyle_worker={level},tower_http={level},axum::rejection=trace,info",
            level = self.log_level
        )
    }

    /// Get the full server address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode
    pub fn is_development(&self) -> bool {
        self.environment.to_lowercase() == "dev" || self.environment.to_lowercase() == "development"
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            capacity: self.max_log_items,
            id_wrap: self.log_id_wrap,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            log_level: default_log_level(),
            max_log_items: default_max_log_items(),
            log_id_wrap: default_log_id_wrap(),
            bus_capacity: default_bus_capacity(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    EnvError(envy::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EnvError(e) => write!(f, "Environment variable error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

// Default value functions
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    54001
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_max_log_items() -> usize {
    50
}

fn default_log_id_wrap() -> u32 {
    10_000
}

fn default_bus_capacity() -> usize {
    100
}
