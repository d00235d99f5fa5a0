use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One explicit save of a workspace. Rows are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRow {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub version: i32,
    pub template: String,
    pub theme: String,
    pub data: Value,
    pub s3_key: String,
    pub created_at: DateTime<Utc>,
}

/// Snapshot listing entry without the state payload.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub id: Uuid,
    pub version: i32,
    pub template: String,
    pub theme: String,
    pub s3_key: String,
    pub created_at: DateTime<Utc>,
}

impl From<&SnapshotRow> for SnapshotMeta {
    fn from(row: &SnapshotRow) -> Self {
        SnapshotMeta {
            id: row.id,
            version: row.version,
            template: row.template.clone(),
            theme: row.theme.clone(),
            s3_key: row.s3_key.clone(),
            created_at: row.created_at,
        }
    }
}
