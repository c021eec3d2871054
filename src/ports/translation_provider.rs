//! Translation Provider Port - interface to the text translation service.

use async_trait::async_trait;

use crate::domain::foundation::Language;

/// Port for text translation.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Translate text into the target language. A `None` source language
    /// asks the provider to detect it.
    async fn translate(
        &self,
        text: &str,
        target: Language,
        source: Option<&str>,
    ) -> Result<Translation, TranslationError>;
}

/// A completed translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub translated_text: String,
    /// Source language as detected or confirmed by the provider.
    pub detected_source: Option<String>,
}

/// Translation provider errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TranslationError {
    #[error("translation provider error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    #[error("parse error: {0}")]
    Parse(String),
}

impl TranslationError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}
