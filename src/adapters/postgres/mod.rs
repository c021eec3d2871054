//! PostgreSQL adapters for the interaction/integration log stores.

mod integration_log_store;
mod interaction_log_store;

pub use integration_log_store::PostgresIntegrationStore;
pub use interaction_log_store::PostgresInteractionStore;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Connects a pool sized per the database configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(&config.url)
        .await
}

/// Creates the log tables when they do not exist yet.
///
/// The record bodies live in JSONB blobs; only the columns the CRM's
/// reporting queries filter on are first-class.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS ai_interactions (
            id UUID PRIMARY KEY,
            user_id UUID,
            session_id UUID NOT NULL,
            kind TEXT NOT NULL,
            input JSONB NOT NULL,
            model_info JSONB,
            response JSONB,
            quality JSONB NOT NULL,
            business_impact JSONB NOT NULL,
            error JSONB NOT NULL,
            performance JSONB NOT NULL,
            client JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS integration_logs (
            id UUID PRIMARY KEY,
            user_id UUID,
            service_name TEXT NOT NULL,
            action_type TEXT NOT NULL,
            service JSONB NOT NULL,
            action JSONB NOT NULL,
            request JSONB NOT NULL,
            response JSONB NOT NULL,
            performance JSONB NOT NULL,
            error JSONB NOT NULL,
            business_context JSONB NOT NULL,
            compliance JSONB NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
