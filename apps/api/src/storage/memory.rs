//! In-process stores. Used by tests and by `DRAFT_BACKEND=memory` for local runs
//! without Redis; snapshots kept here vanish with the process.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::portfolio::Portfolio;
use crate::models::snapshot::{SnapshotMeta, SnapshotRow};
use crate::portfolio::suggestions::remember;
use crate::render::render_document;
use crate::storage::archive::{snapshot_key, SnapshotArchive};
use crate::storage::drafts::{decode_draft, encode_draft, DraftStore};

/// Drafts are kept as serialized JSON so reads go through the same decode
/// path as the Redis store.
#[derive(Default)]
pub struct MemoryDraftStore {
    drafts: RwLock<HashMap<Uuid, String>>,
    suggestions: RwLock<HashMap<Uuid, Vec<String>>>,
    writes: AtomicUsize,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    /// Number of successful `save` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    /// Stores a raw value bypassing serialization.
    pub async fn put_raw(&self, workspace_id: Uuid, raw: impl Into<String>) {
        self.drafts.write().await.insert(workspace_id, raw.into());
    }

    #[cfg(test)]
    pub async fn contains(&self, workspace_id: Uuid) -> bool {
        self.drafts.read().await.contains_key(&workspace_id)
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn load(&self, workspace_id: Uuid) -> Result<Option<Portfolio>, AppError> {
        let raw = self.drafts.read().await.get(&workspace_id).cloned();
        let Some(raw) = raw else {
            return Ok(None);
        };
        match decode_draft(workspace_id, &raw) {
            Some(portfolio) => Ok(Some(portfolio)),
            None => {
                self.drafts.write().await.remove(&workspace_id);
                Ok(None)
            }
        }
    }

    async fn save(&self, workspace_id: Uuid, portfolio: &Portfolio) -> Result<(), AppError> {
        let raw = encode_draft(portfolio)?;
        self.drafts.write().await.insert(workspace_id, raw);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self, workspace_id: Uuid) -> Result<(), AppError> {
        self.drafts.write().await.remove(&workspace_id);
        Ok(())
    }

    async fn suggestions(&self, workspace_id: Uuid) -> Result<Vec<String>, AppError> {
        Ok(self
            .suggestions
            .read()
            .await
            .get(&workspace_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn remember_skill(&self, workspace_id: Uuid, skill: &str) -> Result<(), AppError> {
        let mut all = self.suggestions.write().await;
        remember(all.entry(workspace_id).or_default(), skill);
        Ok(())
    }
}

/// Snapshot archive holding rows and rendered documents in memory.
#[derive(Default)]
pub struct MemorySnapshotArchive {
    rows: RwLock<HashMap<Uuid, Vec<SnapshotRow>>>,
    documents: RwLock<HashMap<String, String>>,
}

impl MemorySnapshotArchive {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    /// The rendered page stored under an archive key, if any.
    pub async fn document(&self, key: &str) -> Option<String> {
        self.documents.read().await.get(key).cloned()
    }
}

#[async_trait]
impl SnapshotArchive for MemorySnapshotArchive {
    async fn commit(&self, workspace_id: Uuid, portfolio: &Portfolio) -> Result<SnapshotMeta, AppError> {
        let data = serde_json::to_value(portfolio)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("{e}")))?;
        let mut rows = self.rows.write().await;
        let history = rows.entry(workspace_id).or_default();
        let version = history.last().map_or(0, |r| r.version) + 1;
        let key = snapshot_key(workspace_id, version);

        let document = render_document(portfolio, portfolio.settings.template);
        self.documents.write().await.insert(key.clone(), document);

        let row = SnapshotRow {
            id: Uuid::new_v4(),
            workspace_id,
            version,
            template: portfolio.settings.template.as_str().to_string(),
            theme: portfolio.settings.theme.as_str().to_string(),
            data,
            s3_key: key,
            created_at: Utc::now(),
        };
        let meta = SnapshotMeta::from(&row);
        history.push(row);
        Ok(meta)
    }

    async fn history(&self, workspace_id: Uuid) -> Result<Vec<SnapshotMeta>, AppError> {
        Ok(self
            .rows
            .read()
            .await
            .get(&workspace_id)
            .map(|rows| rows.iter().map(SnapshotMeta::from).collect())
            .unwrap_or_default())
    }

    async fn version(&self, workspace_id: Uuid, version: i32) -> Result<Option<SnapshotRow>, AppError> {
        Ok(self
            .rows
            .read()
            .await
            .get(&workspace_id)
            .and_then(|rows| rows.iter().find(|r| r.version == version).cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_draft_round_trip() {
        let store = MemoryDraftStore::new();
        let ws = Uuid::new_v4();
        assert!(store.load(ws).await.unwrap().is_none());

        let p = Portfolio {
            full_name: "Ada".into(),
            ..Portfolio::default()
        };
        store.save(ws, &p).await.unwrap();
        assert_eq!(store.load(ws).await.unwrap(), Some(p));
        assert_eq!(store.writes(), 1);

        store.clear(ws).await.unwrap();
        assert!(store.load(ws).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_draft_is_dropped() {
        let store = MemoryDraftStore::new();
        let ws = Uuid::new_v4();
        store.put_raw(ws, "{\"fullName\": ").await;
        assert!(store.load(ws).await.unwrap().is_none());
        assert!(!store.contains(ws).await);
    }

    #[tokio::test]
    async fn test_suggestions_are_per_workspace() {
        let store = MemoryDraftStore::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        store.remember_skill(a, "Rust").await.unwrap();
        store.remember_skill(a, "Rust").await.unwrap();
        store.remember_skill(b, "Go").await.unwrap();
        assert_eq!(store.suggestions(a).await.unwrap(), vec!["Rust"]);
        assert_eq!(store.suggestions(b).await.unwrap(), vec!["Go"]);
    }

    #[tokio::test]
    async fn test_archive_versions_increment() {
        let archive = MemorySnapshotArchive::new();
        let ws = Uuid::new_v4();
        let mut p = Portfolio {
            full_name: "Ada".into(),
            ..Portfolio::default()
        };
        let v1 = archive.commit(ws, &p).await.unwrap();
        p.full_name = "Ada L.".into();
        let v2 = archive.commit(ws, &p).await.unwrap();

        assert_eq!(v1.version, 1);
        assert_eq!(v2.version, 2);
        assert_eq!(v2.s3_key, format!("portfolios/{ws}/v2.html"));

        let history = archive.history(ws).await.unwrap();
        assert_eq!(history.len(), 2);

        let first = archive.version(ws, 1).await.unwrap().unwrap();
        assert_eq!(first.data["fullName"], "Ada");
        assert!(archive.version(ws, 3).await.unwrap().is_none());

        let doc = archive.document(&v2.s3_key).await.unwrap();
        assert!(doc.contains("<title>Ada L.</title>"));
    }
}
