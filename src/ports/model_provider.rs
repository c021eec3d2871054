//! Model Provider Port - interface to LLM chat/vision providers.
//!
//! Abstracts the external model service (OpenAI today) behind a
//! provider-agnostic message format so the dispatcher never couples to a
//! specific API. Multimodal parts exist for image analysis; everything
//! else sends plain text messages.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::interaction::TokenUsage;

/// Port for model completions.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Generate a single completion.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ModelError>;

    /// The provider's descriptor ("openai", model names) for log records.
    fn provider_name(&self) -> &str;
}

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// One part of a multimodal message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { url: String },
}

/// Message content: plain text or ordered multimodal parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// A message in the conversation sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: MessageContent,
}

impl ChatMessage {
    /// Creates a plain-text message.
    pub fn text(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::text(MessageRole::System, content)
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::text(MessageRole::User, content)
    }

    /// Creates a user message of text plus an image reference.
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    url: image_url.into(),
                },
            ]),
        }
    }
}

/// Request for a model completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier (e.g. "gpt-4").
    pub model: String,
    /// Ordered conversation messages.
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub presence_penalty: Option<f32>,
    pub frequency_penalty: Option<f32>,
}

impl CompletionRequest {
    /// Creates a request with the given model and sampling basics.
    pub fn new(model: impl Into<String>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature,
            max_tokens,
            presence_penalty: None,
            frequency_penalty: None,
        }
    }

    /// Appends a message.
    pub fn with_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Sets the presence/frequency penalty pair.
    pub fn with_penalties(mut self, presence: f32, frequency: f32) -> Self {
        self.presence_penalty = Some(presence);
        self.frequency_penalty = Some(frequency);
        self
    }
}

/// Response from a model completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated text.
    pub content: String,
    /// Token accounting as reported by the provider.
    pub usage: TokenUsage,
    /// Model that actually served the request.
    pub model: String,
}

/// Model provider errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    /// Rate limited by the provider.
    #[error("rate limited by provider")]
    RateLimited,

    /// API key rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Provider returned a non-success status.
    #[error("provider error {status}: {message}")]
    Api { status: u16, message: String },

    /// Network failure before a response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// The provider's own deadline elapsed.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// Response body did not match the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ModelError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_assembles_request() {
        let request = CompletionRequest::new("gpt-4", 0.7, 1500)
            .with_message(ChatMessage::system("be helpful"))
            .with_message(ChatMessage::user("hello"))
            .with_penalties(0.6, 0.3);

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.presence_penalty, Some(0.6));
        assert_eq!(request.frequency_penalty, Some(0.3));
    }

    #[test]
    fn multimodal_message_orders_parts() {
        let message = ChatMessage::user_with_image("describe this", "https://img.example/1.jpg");
        match message.content {
            MessageContent::Parts(ref parts) => {
                assert_eq!(parts.len(), 2);
                assert!(matches!(parts[0], ContentPart::Text { .. }));
                assert!(matches!(parts[1], ContentPart::ImageUrl { .. }));
            }
            _ => panic!("expected multimodal parts"),
        }
    }

    #[test]
    fn errors_display_with_detail() {
        let err = ModelError::api(500, "upstream exploded");
        assert_eq!(err.to_string(), "provider error 500: upstream exploded");

        let err = ModelError::Timeout { timeout_secs: 120 };
        assert_eq!(err.to_string(), "request timed out after 120s");
    }
}
