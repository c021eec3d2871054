//! Mock translation provider for tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::foundation::Language;
use crate::ports::{Translation, TranslationError, TranslationProvider};

/// Mock TranslationProvider. Queued outcomes are consumed in order; an
/// empty queue echoes the input text back.
///
/// Test-only: lock poisoning panics instead of propagating.
#[derive(Clone, Default)]
pub struct MockTranslationProvider {
    outcomes: Arc<Mutex<VecDeque<Result<Translation, TranslationError>>>>,
    calls: Arc<Mutex<Vec<(String, Language, Option<String>)>>>,
}

impl MockTranslationProvider {
    /// Creates a mock with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful translation.
    pub fn with_translation(self, translated_text: impl Into<String>) -> Self {
        self.outcomes
            .lock()
            .expect("MockTranslationProvider: outcomes lock poisoned")
            .push_back(Ok(Translation {
                translated_text: translated_text.into(),
                detected_source: None,
            }));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: TranslationError) -> Self {
        self.outcomes
            .lock()
            .expect("MockTranslationProvider: outcomes lock poisoned")
            .push_back(Err(error));
        self
    }

    /// Calls received so far as (text, target, source) tuples.
    pub fn calls(&self) -> Vec<(String, Language, Option<String>)> {
        self.calls
            .lock()
            .expect("MockTranslationProvider: calls lock poisoned")
            .clone()
    }
}

#[async_trait]
impl TranslationProvider for MockTranslationProvider {
    async fn translate(
        &self,
        text: &str,
        target: Language,
        source: Option<&str>,
    ) -> Result<Translation, TranslationError> {
        self.calls
            .lock()
            .expect("MockTranslationProvider: calls lock poisoned")
            .push((text.to_string(), target, source.map(str::to_string)));

        let next = self
            .outcomes
            .lock()
            .expect("MockTranslationProvider: outcomes lock poisoned")
            .pop_front();

        match next {
            Some(outcome) => outcome,
            None => Ok(Translation {
                translated_text: text.to_string(),
                detected_source: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn queued_translation_is_returned() {
        let provider = MockTranslationProvider::new().with_translation("hola");
        let result = provider.translate("hello", Language::Es, None).await.unwrap();
        assert_eq!(result.translated_text, "hola");
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn empty_queue_echoes_input() {
        let provider = MockTranslationProvider::new();
        let result = provider
            .translate("bom dia", Language::En, Some("pt"))
            .await
            .unwrap();
        assert_eq!(result.translated_text, "bom dia");
    }
}
