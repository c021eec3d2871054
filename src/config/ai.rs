//! Model provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Model provider configuration (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key; absent means the model provider is unavailable
    pub openai_api_key: Option<Secret<String>>,

    /// Chat/completions model
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Multimodal model used for image analysis
    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (the provider's own deadline;
    /// the gateway adds none of its own)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if the model provider is configured
    pub fn is_configured(&self) -> bool {
        self.openai_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate model provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.is_configured() && self.chat_model.is_empty() {
            return Err(ValidationError::MissingRequired("AI chat model"));
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            chat_model: default_chat_model(),
            vision_model: default_vision_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_chat_model() -> String {
    "gpt-4".to_string()
}

fn default_vision_model() -> String {
    "gpt-4-vision".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unconfigured() {
        let config = AiConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.chat_model, "gpt-4");
        assert_eq!(config.vision_model, "gpt-4-vision");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn empty_key_counts_as_unconfigured() {
        let config = AiConfig {
            openai_api_key: Some(Secret::new(String::new())),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn key_present_is_configured() {
        let config = AiConfig {
            openai_api_key: Some(Secret::new("sk-test".to_string())),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = AiConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn timeout_duration() {
        let config = AiConfig {
            timeout_secs: 60,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }
}
