use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::portfolio::Portfolio;

/// Key-value persistence for the working copy of each workspace.
///
/// Carried in `AppState` behind `DraftBuffer` as `Arc<dyn DraftStore>`.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// `Ok(None)` when nothing usable is stored.
    async fn load(&self, workspace_id: Uuid) -> Result<Option<Portfolio>, AppError>;
    async fn save(&self, workspace_id: Uuid, portfolio: &Portfolio) -> Result<(), AppError>;
    async fn clear(&self, workspace_id: Uuid) -> Result<(), AppError>;
    async fn suggestions(&self, workspace_id: Uuid) -> Result<Vec<String>, AppError>;
    async fn remember_skill(&self, workspace_id: Uuid, skill: &str) -> Result<(), AppError>;
}

/// Storage key for a workspace's draft.
pub fn draft_key(prefix: &str, workspace_id: Uuid) -> String {
    format!("{prefix}:{workspace_id}")
}

pub fn suggestions_key(prefix: &str, workspace_id: Uuid) -> String {
    format!("{prefix}:{workspace_id}:suggested-skills")
}

/// Parses a stored draft. A value that no longer parses is reported as
/// `None` so the caller can drop it and start from defaults.
pub fn decode_draft(workspace_id: Uuid, raw: &str) -> Option<Portfolio> {
    match serde_json::from_str(raw) {
        Ok(portfolio) => Some(portfolio),
        Err(e) => {
            warn!(%workspace_id, "discarding unreadable stored draft: {e}");
            None
        }
    }
}

pub fn encode_draft(portfolio: &Portfolio) -> Result<String, AppError> {
    serde_json::to_string(portfolio)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize draft: {e}")))
}

/// Suggestion lists are stored as a JSON array; garbage reads as empty.
pub fn decode_suggestions(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}
