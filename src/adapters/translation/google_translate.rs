//! Google Translate Provider - TranslationProvider implementation for the
//! Cloud Translation v2 REST API.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::TranslationConfig;
use crate::domain::foundation::Language;
use crate::ports::{Translation, TranslationError, TranslationProvider};

const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com/language/translate/v2";

/// Configuration for the Google Translate provider.
#[derive(Debug, Clone)]
pub struct GoogleTranslateConfig {
    api_key: Secret<String>,
    pub endpoint: String,
    pub timeout: Duration,
}

impl GoogleTranslateConfig {
    /// Creates a configuration with the given API key and defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Builds provider configuration from the app's translation section;
    /// `None` when no API key is configured.
    pub fn from_app_config(config: &TranslationConfig) -> Option<Self> {
        let key = config.google_api_key.as_ref()?;
        if key.expose_secret().is_empty() {
            return None;
        }
        Some(Self {
            api_key: key.clone(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: config.timeout(),
        })
    }

    /// Sets the endpoint (for test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Google Cloud Translation provider.
pub struct GoogleTranslateProvider {
    config: GoogleTranslateConfig,
    client: Client,
}

impl GoogleTranslateProvider {
    /// Creates a provider with the given configuration.
    pub fn new(config: GoogleTranslateConfig) -> Result<Self, TranslationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TranslationError::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslateProvider {
    async fn translate(
        &self,
        text: &str,
        target: Language,
        source: Option<&str>,
    ) -> Result<Translation, TranslationError> {
        let request = WireRequest {
            q: text.to_string(),
            target: target.as_tag().to_string(),
            source: source.map(str::to_string),
            format: "text".to_string(),
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .query(&[("key", self.config.api_key())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslationError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else {
                    TranslationError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::api(status.as_u16(), body));
        }

        let wire_response: WireResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::Parse(format!("invalid response body: {}", e)))?;

        let translation = wire_response
            .data
            .translations
            .into_iter()
            .next()
            .ok_or_else(|| TranslationError::Parse("response contained no translations".into()))?;

        Ok(Translation {
            translated_text: translation.translated_text,
            detected_source: translation.detected_source_language,
        })
    }
}

// ==== Wire types ====

#[derive(Debug, Serialize)]
struct WireRequest {
    q: String,
    target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    format: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    data: WireData,
}

#[derive(Debug, Deserialize)]
struct WireData {
    translations: Vec<WireTranslation>,
}

#[derive(Debug, Deserialize)]
struct WireTranslation {
    #[serde(rename = "translatedText")]
    translated_text: String,
    #[serde(rename = "detectedSourceLanguage")]
    detected_source_language: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_app_config_requires_a_key() {
        assert!(GoogleTranslateConfig::from_app_config(&TranslationConfig::default()).is_none());

        let config = TranslationConfig {
            google_api_key: Some(Secret::new("AIza-test".to_string())),
            ..Default::default()
        };
        assert!(GoogleTranslateConfig::from_app_config(&config).is_some());
    }

    #[test]
    fn wire_request_omits_auto_source() {
        let request = WireRequest {
            q: "hello".to_string(),
            target: "es".to_string(),
            source: None,
            format: "text".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("source").is_none());
        assert_eq!(json["target"], "es");
    }

    #[test]
    fn wire_response_parses_detected_source() {
        let body = r#"{
            "data": {
                "translations": [
                    {"translatedText": "hola", "detectedSourceLanguage": "en"}
                ]
            }
        }"#;
        let parsed: WireResponse = serde_json::from_str(body).unwrap();
        let translation = &parsed.data.translations[0];
        assert_eq!(translation.translated_text, "hola");
        assert_eq!(translation.detected_source_language.as_deref(), Some("en"));
    }
}
