//! Integration Store Port - append-only persistence of outbound
//! third-party call records.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::integration::IntegrationLogRecord;

/// Persistence for integration log records.
#[async_trait]
pub trait IntegrationStore: Send + Sync {
    /// Appends a record. Never called twice for the same record.
    async fn append(&self, record: &IntegrationLogRecord) -> Result<(), DomainError>;
}
