//! PostgreSQL implementation of IntegrationStore.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::DomainError;
use crate::domain::integration::IntegrationLogRecord;
use crate::ports::IntegrationStore;

/// PostgreSQL integration log store.
#[derive(Clone)]
pub struct PostgresIntegrationStore {
    pool: PgPool,
}

impl PostgresIntegrationStore {
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
impl IntegrationStore for PostgresIntegrationStore {
    async fn append(&self, record: &IntegrationLogRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO integration_logs (
                id, user_id, service_name, action_type, service, action,
                request, response, performance, error, business_context,
                compliance, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.user_id.map(|u| *u.as_uuid()))
        .bind(record.service.name.as_str())
        .bind(record.action.kind.as_str())
        .bind(Self::json_of(&record.service, "service")?)
        .bind(Self::json_of(&record.action, "action")?)
        .bind(Self::json_of(&record.request, "request")?)
        .bind(Self::json_of(&record.response, "response")?)
        .bind(Self::json_of(&record.performance, "performance")?)
        .bind(Self::json_of(&record.error, "error")?)
        .bind(Self::json_of(&record.business_context, "business_context")?)
        .bind(Self::json_of(&record.compliance, "compliance")?)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("failed to insert integration log: {}", e)))?;

        Ok(())
    }
}
