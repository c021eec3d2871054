//! Mock model provider for tests.
//!
//! Configurable to return queued responses or errors without calling a
//! real API, with call capture for assertions.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::interaction::TokenUsage;
use crate::ports::{
    CompletionRequest, CompletionResponse, ModelError, ModelProvider,
};

/// A queued mock outcome.
#[derive(Debug, Clone)]
pub enum MockModelResponse {
    Success { content: String, usage: TokenUsage },
    Error(ModelError),
}

/// Mock ModelProvider. Responses are consumed in queue order; an empty
/// queue yields a default success.
///
/// Test-only: lock poisoning panics instead of propagating.
#[derive(Clone, Default)]
pub struct MockModelProvider {
    responses: Arc<Mutex<VecDeque<MockModelResponse>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockModelProvider {
    /// Creates a mock with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response with default usage.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.with_response_full(content, TokenUsage::new(10, 20))
    }

    /// Queues a successful response with explicit usage.
    pub fn with_response_full(self, content: impl Into<String>, usage: TokenUsage) -> Self {
        self.responses
            .lock()
            .expect("MockModelProvider: responses lock poisoned")
            .push_back(MockModelResponse::Success {
                content: content.into(),
                usage,
            });
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: ModelError) -> Self {
        self.responses
            .lock()
            .expect("MockModelProvider: responses lock poisoned")
            .push_back(MockModelResponse::Error(error));
        self
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls
            .lock()
            .expect("MockModelProvider: calls lock poisoned")
            .clone()
    }

    /// Number of completions requested.
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .expect("MockModelProvider: calls lock poisoned")
            .len()
    }
}

#[async_trait]
impl ModelProvider for MockModelProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ModelError> {
        let model = request.model.clone();
        self.calls
            .lock()
            .expect("MockModelProvider: calls lock poisoned")
            .push(request);

        let next = self
            .responses
            .lock()
            .expect("MockModelProvider: responses lock poisoned")
            .pop_front();

        match next {
            Some(MockModelResponse::Success { content, usage }) => Ok(CompletionResponse {
                content,
                usage,
                model,
            }),
            Some(MockModelResponse::Error(error)) => Err(error),
            None => Ok(CompletionResponse {
                content: "mock response".to_string(),
                usage: TokenUsage::new(1, 1),
                model,
            }),
        }
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ChatMessage;

    fn request() -> CompletionRequest {
        CompletionRequest::new("gpt-4", 0.7, 100).with_message(ChatMessage::user("hi"))
    }

    #[tokio::test]
    async fn responses_are_consumed_in_order() {
        let provider = MockModelProvider::new()
            .with_response("first")
            .with_response("second");

        assert_eq!(provider.complete(request()).await.unwrap().content, "first");
        assert_eq!(provider.complete(request()).await.unwrap().content, "second");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn queued_errors_are_returned() {
        let provider = MockModelProvider::new().with_error(ModelError::RateLimited);
        let err = provider.complete(request()).await.unwrap_err();
        assert!(matches!(err, ModelError::RateLimited));
    }

    #[tokio::test]
    async fn empty_queue_yields_default_success() {
        let provider = MockModelProvider::new();
        let response = provider.complete(request()).await.unwrap();
        assert_eq!(response.content, "mock response");
    }
}
