//! OpenAI Provider - ModelProvider implementation for OpenAI's chat
//! completions API.
//!
//! Handles both plain text messages and multimodal text+image parts (used
//! by property image analysis). No streaming: the gateway only needs
//! complete responses.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AiConfig;
use crate::domain::interaction::TokenUsage;
use crate::ports::{
    CompletionRequest, CompletionResponse, ContentPart, MessageContent, MessageRole, ModelError,
    ModelProvider,
};

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    api_key: Secret<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenAiProviderConfig {
    /// Creates a configuration with the given API key and defaults.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Builds provider configuration from the app's AI section; `None`
    /// when no API key is configured.
    pub fn from_app_config(config: &AiConfig) -> Option<Self> {
        let key = config.openai_api_key.as_ref()?;
        if key.expose_secret().is_empty() {
            return None;
        }
        Some(Self {
            api_key: key.clone(),
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
        })
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI chat completions provider.
pub struct OpenAiProvider {
    config: OpenAiProviderConfig,
    client: Client,
}

impl OpenAiProvider {
    /// Creates a provider with the given configuration.
    pub fn new(config: OpenAiProviderConfig) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ModelError::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn to_wire_request(&self, request: &CompletionRequest) -> WireRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| WireMessage {
                role: match m.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: match &m.content {
                    MessageContent::Text(text) => WireContent::Text(text.clone()),
                    MessageContent::Parts(parts) => WireContent::Parts(
                        parts
                            .iter()
                            .map(|part| match part {
                                ContentPart::Text { text } => WirePart::Text { text: text.clone() },
                                ContentPart::ImageUrl { url } => WirePart::ImageUrl {
                                    image_url: WireImageUrl { url: url.clone() },
                                },
                            })
                            .collect(),
                    ),
                },
            })
            .collect();

        WireRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            presence_penalty: request.presence_penalty,
            frequency_penalty: request.frequency_penalty,
        }
    }

    fn handle_error_status(&self, status: reqwest::StatusCode, body: String) -> ModelError {
        match status.as_u16() {
            401 => ModelError::AuthenticationFailed,
            429 => ModelError::RateLimited,
            500..=599 => ModelError::api(status.as_u16(), format!("server error: {}", body)),
            code => ModelError::api(code, body),
        }
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ModelError> {
        let wire_request = self.to_wire_request(&request);

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    ModelError::network(format!("connection failed: {}", e))
                } else {
                    ModelError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.handle_error_status(status, body));
        }

        let wire_response: WireResponse = response
            .json()
            .await
            .map_err(|e| ModelError::parse(format!("invalid response body: {}", e)))?;

        let choice = wire_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::parse("response contained no choices"))?;

        let usage = wire_response
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            usage,
            model: wire_response.model,
        })
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}

// ==== Wire types ====

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: WireContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireContent {
    Text(String),
    Parts(Vec<WirePart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WirePart {
    Text { text: String },
    ImageUrl { image_url: WireImageUrl },
}

#[derive(Debug, Serialize)]
struct WireImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    model: String,
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    #[allow(dead_code)]
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ChatMessage;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new(OpenAiProviderConfig::new("sk-test")).unwrap()
    }

    #[test]
    fn from_app_config_requires_a_key() {
        assert!(OpenAiProviderConfig::from_app_config(&AiConfig::default()).is_none());

        let config = AiConfig {
            openai_api_key: Some(Secret::new("sk-test".to_string())),
            ..Default::default()
        };
        assert!(OpenAiProviderConfig::from_app_config(&config).is_some());
    }

    #[test]
    fn wire_request_serializes_text_messages() {
        let request = CompletionRequest::new("gpt-4", 0.7, 1500)
            .with_message(ChatMessage::system("be helpful"))
            .with_message(ChatMessage::user("hello"))
            .with_penalties(0.6, 0.3);

        let wire = provider().to_wire_request(&request);
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["presence_penalty"], 0.6);
    }

    #[test]
    fn wire_request_serializes_image_parts() {
        let request = CompletionRequest::new("gpt-4-vision", 0.3, 1000).with_message(
            ChatMessage::user_with_image("describe this", "https://img.example/1.jpg"),
        );

        let wire = provider().to_wire_request(&request);
        let json = serde_json::to_value(&wire).unwrap();

        let parts = &json["messages"][0]["content"];
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(parts[1]["image_url"]["url"], "https://img.example/1.jpg");
    }

    #[test]
    fn penalties_are_omitted_when_unset() {
        let request = CompletionRequest::new("gpt-4", 0.3, 1000)
            .with_message(ChatMessage::user("value this"));
        let wire = provider().to_wire_request(&request);
        let json = serde_json::to_value(&wire).unwrap();
        assert!(json.get("presence_penalty").is_none());
    }

    #[test]
    fn wire_response_parses_usage() {
        let body = r#"{
            "model": "gpt-4",
            "choices": [{"message": {"content": "Hello there"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
        }"#;
        let parsed: WireResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("Hello there"));
        assert_eq!(parsed.usage.as_ref().unwrap().prompt_tokens, 12);
    }
}
