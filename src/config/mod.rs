//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `EVALIO` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use evalio::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod auth;
mod database;
mod error;
mod interview;
mod report;
mod server;

pub use ai::{AiConfig, AiProvider};
pub use auth::{AuthConfig, MIN_JWT_SECRET_LEN};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use interview::InterviewConfig;
pub use report::{ReportConfig, ReportFormat};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Session token configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// AI provider configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Reply and report exchange parameters
    #[serde(default)]
    pub interview: InterviewConfig,

    /// Report rendering
    #[serde(default)]
    pub report: ReportConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `EVALIO` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `EVALIO__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `EVALIO__AI__API_KEY=...` -> `ai.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("EVALIO")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate(self.is_production())?;
        self.auth.validate()?;
        self.ai.validate()?;
        self.interview.validate()?;
        self.report.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
