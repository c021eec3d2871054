//! Interaction Store Port - append-only persistence of AI interaction
//! records, with later point-updates from business-event hooks.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, InteractionId};
use crate::domain::interaction::{AiInteractionRecord, BusinessImpactUpdate};

/// Persistence for user-facing AI interaction records.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    /// Appends a record. Never called twice for the same record.
    async fn append(&self, record: &AiInteractionRecord) -> Result<(), DomainError>;

    /// Merges business-impact flags into an existing record.
    async fn record_business_impact(
        &self,
        id: &InteractionId,
        update: BusinessImpactUpdate,
    ) -> Result<(), DomainError>;

    /// Records user feedback on an existing record.
    async fn mark_as_helpful(
        &self,
        id: &InteractionId,
        rating: u8,
        feedback: Option<String>,
    ) -> Result<(), DomainError>;
}
