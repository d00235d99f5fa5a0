use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

const SNAPSHOT_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS portfolio_snapshots (
    id            UUID PRIMARY KEY,
    workspace_id  UUID NOT NULL,
    version       INTEGER NOT NULL,
    template      TEXT NOT NULL,
    theme         TEXT NOT NULL,
    data          JSONB NOT NULL,
    s3_key        TEXT NOT NULL,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (workspace_id, version)
)
"#;

/// Creates the snapshot table if this database has never seen it.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(SNAPSHOT_SCHEMA)
        .execute(pool)
        .await
        .context("Failed to create portfolio_snapshots table")?;
    info!("Snapshot schema ready");
    Ok(())
}
