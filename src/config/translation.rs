//! Translation provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Translation provider configuration (Google Translate v2)
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationConfig {
    /// Google Cloud API key; absent means translation is unavailable
    pub google_api_key: Option<Secret<String>>,

    /// Google Cloud project id (informational, forwarded on requests)
    pub google_project_id: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl TranslationConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if the translation provider is configured
    pub fn is_configured(&self) -> bool {
        self.google_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate translation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            google_api_key: None,
            google_project_id: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unconfigured() {
        let config = TranslationConfig::default();
        assert!(!config.is_configured());
    }

    #[test]
    fn key_present_is_configured() {
        let config = TranslationConfig {
            google_api_key: Some(Secret::new("AIza-test".to_string())),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert!(config.validate().is_ok());
    }
}
