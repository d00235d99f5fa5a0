use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::portfolio::Portfolio;
use crate::models::snapshot::{SnapshotMeta, SnapshotRow};
use crate::render::render_document;

/// Explicit-save history for a workspace.
///
/// Carried in `AppState` as `Arc<dyn SnapshotArchive>`.
#[async_trait]
pub trait SnapshotArchive: Send + Sync {
    /// Appends a new version holding `portfolio` and its rendered page.
    async fn commit(&self, workspace_id: Uuid, portfolio: &Portfolio) -> Result<SnapshotMeta, AppError>;
    /// All versions, oldest first.
    async fn history(&self, workspace_id: Uuid) -> Result<Vec<SnapshotMeta>, AppError>;
    async fn version(&self, workspace_id: Uuid, version: i32) -> Result<Option<SnapshotRow>, AppError>;
}

pub fn snapshot_key(workspace_id: Uuid, version: i32) -> String {
    format!("portfolios/{workspace_id}/v{version}.html")
}

/// Postgres rows plus the standalone page uploaded to S3.
/// CRITICAL: append-only. Rows are never updated.
///
/// A commit holds a transaction-scoped advisory lock on the workspace from
/// picking the version until the row is committed, so `v{n}.html` is only
/// ever written by the commit that owns version `n`.
pub struct PgSnapshotArchive {
    pool: PgPool,
    s3: aws_sdk_s3::Client,
    bucket: String,
}

impl PgSnapshotArchive {
    pub fn new(pool: PgPool, s3: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            pool,
            s3,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl SnapshotArchive for PgSnapshotArchive {
    async fn commit(&self, workspace_id: Uuid, portfolio: &Portfolio) -> Result<SnapshotMeta, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Serialize commits per workspace across instances, then pick the next version
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(workspace_id)
            .execute(&mut *tx)
            .await?;
        let current_max: Option<i32> = sqlx::query_scalar(
            "SELECT MAX(version) FROM portfolio_snapshots WHERE workspace_id = $1",
        )
        .bind(workspace_id)
        .fetch_one(&mut *tx)
        .await?;
        let version = current_max.unwrap_or(0) + 1;
        let s3_key = snapshot_key(workspace_id, version);

        // 2. Append-only INSERT, visible only once the page is uploaded
        let data = serde_json::to_value(portfolio)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("{e}")))?;
        let meta = sqlx::query_as::<_, SnapshotMeta>(
            r#"
            INSERT INTO portfolio_snapshots
                (id, workspace_id, version, template, theme, data, s3_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, version, template, theme, s3_key, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(workspace_id)
        .bind(version)
        .bind(portfolio.settings.template.as_str())
        .bind(portfolio.settings.theme.as_str())
        .bind(&data)
        .bind(&s3_key)
        .fetch_one(&mut *tx)
        .await?;

        // 3. Upload the rendered page. A failed upload drops `tx`, rolling back the row.
        let document = render_document(portfolio, portfolio.settings.template);
        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(&s3_key)
            .body(ByteStream::from(document.into_bytes()))
            .content_type("text/html; charset=utf-8")
            .send()
            .await
            .map_err(|e| AppError::S3(format!("upload of {s3_key} failed: {e}")))?;

        info!("Uploaded portfolio page to s3://{}/{}", self.bucket, s3_key);

        tx.commit().await?;
        info!("Committed portfolio snapshot v{version} for workspace {workspace_id}");
        Ok(meta)
    }

    async fn history(&self, workspace_id: Uuid) -> Result<Vec<SnapshotMeta>, AppError> {
        Ok(sqlx::query_as::<_, SnapshotMeta>(
            r#"
            SELECT id, version, template, theme, s3_key, created_at
            FROM portfolio_snapshots
            WHERE workspace_id = $1
            ORDER BY version ASC
            "#,
        )
        .bind(workspace_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn version(&self, workspace_id: Uuid, version: i32) -> Result<Option<SnapshotRow>, AppError> {
        Ok(sqlx::query_as::<_, SnapshotRow>(
            "SELECT * FROM portfolio_snapshots WHERE workspace_id = $1 AND version = $2",
        )
        .bind(workspace_id)
        .bind(version)
        .fetch_optional(&self.pool)
        .await?)
    }
}
