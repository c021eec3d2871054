//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `REALTY_AI` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use realty_ai::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod database;
mod error;
mod translation;

pub use ai::AiConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use translation::TranslationConfig;

use serde::Deserialize;

/// Root configuration for the AI gateway.
///
/// Which sections are populated determines capability availability: a
/// missing API key or database URL marks the corresponding dependency
/// unavailable at startup, and stays that way for the process lifetime.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Model provider configuration (OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Translation provider configuration (Google Translate)
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log store database configuration (PostgreSQL)
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads variables with the `REALTY_AI`
    /// prefix, e.g. `REALTY_AI__AI__OPENAI_API_KEY=sk-...` or
    /// `REALTY_AI__DATABASE__URL=postgresql://...`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types. Absent sections are not an error; they mark dependencies
    /// unavailable.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("REALTY_AI")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.translation.validate()?;
        self.database.validate()?;
        Ok(())
    }
}
