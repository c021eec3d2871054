//! PostgreSQL implementation of InteractionStore.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, InteractionId};
use crate::domain::interaction::{
    AiInteractionRecord, BusinessImpact, BusinessImpactUpdate, QualityMetrics,
};
use crate::ports::InteractionStore;

/// PostgreSQL interaction log store.
#[derive(Clone)]
pub struct PostgresInteractionStore {
    pool: PgPool,
}

impl PostgresInteractionStore {
    /// Creates a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn json_of<T: serde::Serialize>(value: &T, what: &str) -> Result<serde_json::Value, DomainError> {
        serde_json::to_value(value)
            .map_err(|e| DomainError::database(format!("failed to encode {}: {}", what, e)))
    }
}

#[async_trait]
impl InteractionStore for PostgresInteractionStore {
    async fn append(&self, record: &AiInteractionRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO ai_interactions (
                id, user_id, session_id, kind, input, model_info, response,
                quality, business_impact, error, performance, client,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.user_id.map(|u| *u.as_uuid()))
        .bind(record.session_id.as_uuid())
        .bind(record.kind.as_str())
        .bind(Self::json_of(&record.input, "input")?)
        .bind(
            record
                .model_info
                .as_ref()
                .map(|m| Self::json_of(m, "model_info"))
                .transpose()?,
        )
        .bind(
            record
                .response
                .as_ref()
                .map(|r| Self::json_of(r, "response"))
                .transpose()?,
        )
        .bind(Self::json_of(&record.quality, "quality")?)
        .bind(Self::json_of(&record.business_impact, "business_impact")?)
        .bind(Self::json_of(&record.error, "error")?)
        .bind(Self::json_of(&record.performance, "performance")?)
        .bind(Self::json_of(&record.client, "client")?)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("failed to insert AI interaction: {}", e)))?;

        Ok(())
    }

    async fn record_business_impact(
        &self,
        id: &InteractionId,
        update: BusinessImpactUpdate,
    ) -> Result<(), DomainError> {
        let row = sqlx::query("SELECT business_impact FROM ai_interactions WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("failed to fetch AI interaction: {}", e)))?
            .ok_or_else(|| DomainError::database(format!("AI interaction not found: {}", id)))?;

        let stored: serde_json::Value = row
            .try_get("business_impact")
            .map_err(|e| DomainError::database(format!("failed to read business impact: {}", e)))?;
        let mut impact: BusinessImpact = serde_json::from_value(stored)
            .map_err(|e| DomainError::database(format!("failed to decode business impact: {}", e)))?;
        impact.apply(update);

        sqlx::query(
            "UPDATE ai_interactions SET business_impact = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(Self::json_of(&impact, "business_impact")?)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("failed to update business impact: {}", e)))?;

        Ok(())
    }

    async fn mark_as_helpful(
        &self,
        id: &InteractionId,
        rating: u8,
        feedback: Option<String>,
    ) -> Result<(), DomainError> {
        let quality = QualityMetrics::from_rating(rating, feedback);

        let result = sqlx::query(
            "UPDATE ai_interactions SET quality = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(Self::json_of(&quality, "quality")?)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("failed to update quality: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::database(format!(
                "AI interaction not found: {}",
                id
            )));
        }

        Ok(())
    }
}
