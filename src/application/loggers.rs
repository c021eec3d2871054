//! Append-only log writers that never surface failures to the caller.
//!
//! A logging failure is reported to the operational stream and swallowed;
//! the user-facing envelope is unaffected. This asymmetry is deliberate:
//! observability failures must not become user-facing failures.

use std::sync::Arc;

use crate::domain::integration::IntegrationLogRecord;
use crate::domain::interaction::AiInteractionRecord;
use crate::ports::{IntegrationStore, InteractionStore};

/// Writer for user-facing AI interaction records.
#[derive(Clone)]
pub struct InteractionLogger {
    store: Option<Arc<dyn InteractionStore>>,
}

impl InteractionLogger {
    /// Creates a logger; `None` disables persistence entirely.
    pub fn new(store: Option<Arc<dyn InteractionStore>>) -> Self {
        Self { store }
    }

    /// A logger that writes nowhere.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    /// Whether a backing store is wired.
    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// The backing store, for point-updates by business-event hooks.
    pub fn store(&self) -> Option<&Arc<dyn InteractionStore>> {
        self.store.as_ref()
    }

    /// Persists a record; failures are logged and swallowed.
    pub async fn log(&self, record: &AiInteractionRecord) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(err) = store.append(record).await {
            tracing::warn!(
                interaction_id = %record.id,
                kind = record.kind.as_str(),
                error = %err,
                "could not persist AI interaction record"
            );
        }
    }
}

/// Writer for outbound third-party call records.
#[derive(Clone)]
pub struct IntegrationLogger {
    store: Option<Arc<dyn IntegrationStore>>,
}

impl IntegrationLogger {
    /// Creates a logger; `None` disables persistence entirely.
    pub fn new(store: Option<Arc<dyn IntegrationStore>>) -> Self {
        Self { store }
    }

    /// A logger that writes nowhere.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    /// Whether a backing store is wired.
    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// Persists a record; failures are logged and swallowed.
    pub async fn log(&self, record: &IntegrationLogRecord) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(err) = store.append(record).await {
            tracing::warn!(
                integration_log_id = %record.id,
                service = record.service.name.as_str(),
                error = %err,
                "could not persist integration log record"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::foundation::{DomainError, InteractionId, SessionId};
    use crate::domain::integration::{
        ActionDescriptor, ActionType, ServiceDescriptor, ServiceName,
    };
    use crate::domain::interaction::{BusinessImpactUpdate, InteractionKind};

    struct FailingInteractionStore {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl InteractionStore for FailingInteractionStore {
        async fn append(&self, _record: &AiInteractionRecord) -> Result<(), DomainError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(DomainError::database("connection refused"))
        }

        async fn record_business_impact(
            &self,
            _id: &InteractionId,
            _update: BusinessImpactUpdate,
        ) -> Result<(), DomainError> {
            Err(DomainError::database("connection refused"))
        }

        async fn mark_as_helpful(
            &self,
            _id: &InteractionId,
            _rating: u8,
            _feedback: Option<String>,
        ) -> Result<(), DomainError> {
            Err(DomainError::database("connection refused"))
        }
    }

    struct FailingIntegrationStore;

    #[async_trait]
    impl IntegrationStore for FailingIntegrationStore {
        async fn append(&self, _record: &IntegrationLogRecord) -> Result<(), DomainError> {
            Err(DomainError::database("connection refused"))
        }
    }

    #[tokio::test]
    async fn interaction_store_failure_is_swallowed() {
        let store = Arc::new(FailingInteractionStore {
            attempts: AtomicUsize::new(0),
        });
        let logger = InteractionLogger::new(Some(store.clone()));

        let record = AiInteractionRecord::new(InteractionKind::Chatbot, SessionId::new());
        logger.log(&record).await;

        assert_eq!(store.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn integration_store_failure_is_swallowed() {
        let logger = IntegrationLogger::new(Some(Arc::new(FailingIntegrationStore)));
        let record = IntegrationLogRecord::new(
            ServiceDescriptor::named(ServiceName::GoogleTranslate),
            ActionDescriptor {
                kind: ActionType::TranslateText,
                description: None,
            },
        );
        logger.log(&record).await;
    }

    #[tokio::test]
    async fn disabled_logger_is_a_no_op() {
        let logger = InteractionLogger::disabled();
        assert!(!logger.is_available());
        let record = AiInteractionRecord::new(InteractionKind::Chatbot, SessionId::new());
        logger.log(&record).await;
    }
}
