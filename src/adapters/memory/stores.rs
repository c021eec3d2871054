//! In-memory log stores with capture helpers for assertions.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, InteractionId};
use crate::domain::integration::IntegrationLogRecord;
use crate::domain::interaction::{AiInteractionRecord, BusinessImpactUpdate};
use crate::ports::{IntegrationStore, InteractionStore};

/// In-memory interaction store.
#[derive(Default)]
pub struct InMemoryInteractionStore {
    records: RwLock<Vec<AiInteractionRecord>>,
}

impl InMemoryInteractionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All appended records (for test assertions).
    pub fn records(&self) -> Vec<AiInteractionRecord> {
        self.records
            .read()
            .expect("InMemoryInteractionStore: lock poisoned")
            .clone()
    }

    /// Count of appended records.
    pub fn record_count(&self) -> usize {
        self.records
            .read()
            .expect("InMemoryInteractionStore: lock poisoned")
            .len()
    }
}

#[async_trait]
impl InteractionStore for InMemoryInteractionStore {
    async fn append(&self, record: &AiInteractionRecord) -> Result<(), DomainError> {
        self.records
            .write()
            .expect("InMemoryInteractionStore: lock poisoned")
            .push(record.clone());
        Ok(())
    }

    async fn record_business_impact(
        &self,
        id: &InteractionId,
        update: BusinessImpactUpdate,
    ) -> Result<(), DomainError> {
        let mut records = self
            .records
            .write()
            .expect("InMemoryInteractionStore: lock poisoned");
        let record = records
            .iter_mut()
            .find(|r| r.id == *id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::InternalError, format!("no interaction {}", id))
            })?;
        record.record_business_impact(update);
        Ok(())
    }

    async fn mark_as_helpful(
        &self,
        id: &InteractionId,
        rating: u8,
        feedback: Option<String>,
    ) -> Result<(), DomainError> {
        let mut records = self
            .records
            .write()
            .expect("InMemoryInteractionStore: lock poisoned");
        let record = records
            .iter_mut()
            .find(|r| r.id == *id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::InternalError, format!("no interaction {}", id))
            })?;
        record.mark_as_helpful(rating, feedback);
        Ok(())
    }
}

/// In-memory integration store.
#[derive(Default)]
pub struct InMemoryIntegrationStore {
    records: RwLock<Vec<IntegrationLogRecord>>,
}

impl InMemoryIntegrationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All appended records (for test assertions).
    pub fn records(&self) -> Vec<IntegrationLogRecord> {
        self.records
            .read()
            .expect("InMemoryIntegrationStore: lock poisoned")
            .clone()
    }

    /// Count of appended records.
    pub fn record_count(&self) -> usize {
        self.records
            .read()
            .expect("InMemoryIntegrationStore: lock poisoned")
            .len()
    }
}

#[async_trait]
impl IntegrationStore for InMemoryIntegrationStore {
    async fn append(&self, record: &IntegrationLogRecord) -> Result<(), DomainError> {
        self.records
            .write()
            .expect("InMemoryIntegrationStore: lock poisoned")
            .push(record.clone());
        Ok(())
    }
}
