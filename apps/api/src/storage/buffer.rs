//! Debounced draft writes.
//!
//! Free-form form input arrives in bursts. Each `stage` replaces the pending
//! copy for that workspace and re-arms a quiet-period timer; only the timer
//! whose generation is still current writes to the store. Discrete actions go
//! through `persist`, which writes at once and cancels anything pending.
//!
//! Store writes are serialized by `write_lock` so a slow debounced flush can
//! never land after (and overwrite) a newer immediate write.
//!
//! Edits are read-modify-write. Handlers hold `lock_workspace` from the load
//! through the stage or persist so two requests on one workspace apply in
//! turn instead of both starting from the same copy.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::portfolio::Portfolio;
use crate::storage::drafts::DraftStore;

struct PendingDraft {
    portfolio: Portfolio,
    generation: u64,
}

#[derive(Clone)]
pub struct DraftBuffer {
    store: Arc<dyn DraftStore>,
    quiet_period: Duration,
    pending: Arc<Mutex<HashMap<Uuid, PendingDraft>>>,
    write_lock: Arc<Mutex<()>>,
    workspace_locks: Arc<Mutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
    generation: Arc<AtomicU64>,
}

/// Held for the duration of one edit on a workspace.
pub type WorkspaceGuard = OwnedMutexGuard<()>;

impl DraftBuffer {
    pub fn new(store: Arc<dyn DraftStore>, quiet_period: Duration) -> Self {
        Self {
            store,
            quiet_period,
            pending: Arc::new(Mutex::new(HashMap::new())),
            write_lock: Arc::new(Mutex::new(())),
            workspace_locks: Arc::new(Mutex::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn store(&self) -> &Arc<dyn DraftStore> {
        &self.store
    }

    /// Waits until no other edit holds `workspace_id`.
    pub async fn lock_workspace(&self, workspace_id: Uuid) -> WorkspaceGuard {
        let lock = {
            let mut locks = self.workspace_locks.lock().await;
            // Entries nobody else holds or waits on are dropped as we go.
            locks.retain(|id, l| *id == workspace_id || Arc::strong_count(l) > 1);
            locks.entry(workspace_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Latest known draft: a pending copy wins over the stored one.
    pub async fn load(&self, workspace_id: Uuid) -> Result<Option<Portfolio>, AppError> {
        if let Some(pending) = self.pending.lock().await.get(&workspace_id) {
            return Ok(Some(pending.portfolio.clone()));
        }
        self.store.load(workspace_id).await
    }

    /// Queues `portfolio` to be written once input has been quiet for the
    /// configured period.
    pub async fn stage(&self, workspace_id: Uuid, portfolio: Portfolio) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.pending.lock().await.insert(
            workspace_id,
            PendingDraft {
                portfolio,
                generation,
            },
        );

        let buffer = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(buffer.quiet_period).await;
            buffer.flush_if_current(workspace_id, generation).await;
        });
    }

    async fn flush_if_current(&self, workspace_id: Uuid, generation: u64) {
        let _write = self.write_lock.lock().await;
        let portfolio = match self.pending.lock().await.get(&workspace_id) {
            Some(p) if p.generation == generation => p.portfolio.clone(),
            _ => return,
        };

        match self.store.save(workspace_id, &portfolio).await {
            Ok(()) => {
                let mut pending = self.pending.lock().await;
                if pending
                    .get(&workspace_id)
                    .is_some_and(|p| p.generation == generation)
                {
                    pending.remove(&workspace_id);
                }
                debug!(%workspace_id, generation, "debounced draft flushed");
            }
            // Pending copy stays readable; the next stage or persist retries.
            Err(e) => error!(%workspace_id, "debounced draft flush failed: {e}"),
        }
    }

    /// Writes immediately, superseding any pending copy.
    pub async fn persist(&self, workspace_id: Uuid, portfolio: &Portfolio) -> Result<(), AppError> {
        let _write = self.write_lock.lock().await;
        self.pending.lock().await.remove(&workspace_id);
        self.store.save(workspace_id, portfolio).await
    }

    /// Drops the pending copy and the stored draft.
    pub async fn discard(&self, workspace_id: Uuid) -> Result<(), AppError> {
        let _write = self.write_lock.lock().await;
        self.pending.lock().await.remove(&workspace_id);
        self.store.clear(workspace_id).await
    }

    /// Writes every pending draft now. Called on shutdown.
    pub async fn flush_all(&self) {
        let _write = self.write_lock.lock().await;
        let drained: Vec<(Uuid, PendingDraft)> = self.pending.lock().await.drain().collect();
        let count = drained.len();
        for (workspace_id, draft) in drained {
            if let Err(e) = self.store.save(workspace_id, &draft.portfolio).await {
                error!(%workspace_id, "final draft flush failed: {e}");
            }
        }
        info!(count, "pending drafts flushed");
    }

    #[cfg(test)]
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryDraftStore;

    const QUIET: Duration = Duration::from_millis(250);

    fn named(name: &str) -> Portfolio {
        Portfolio {
            full_name: name.into(),
            ..Portfolio::default()
        }
    }

    fn buffer() -> (DraftBuffer, Arc<MemoryDraftStore>) {
        let store = Arc::new(MemoryDraftStore::new());
        (DraftBuffer::new(store.clone(), QUIET), store)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_into_one_write() {
        let (buffer, store) = buffer();
        let ws = Uuid::new_v4();

        for name in ["A", "Ad", "Ada"] {
            buffer.stage(ws, named(name)).await;
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(store.writes(), 0);
        assert_eq!(buffer.load(ws).await.unwrap().unwrap().full_name, "Ada");

        tokio::time::sleep(QUIET + Duration::from_millis(10)).await;
        assert_eq!(store.writes(), 1);
        assert_eq!(store.load(ws).await.unwrap().unwrap().full_name, "Ada");
        assert_eq!(buffer.pending_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quiet_gap_allows_separate_writes() {
        let (buffer, store) = buffer();
        let ws = Uuid::new_v4();

        buffer.stage(ws, named("first")).await;
        tokio::time::sleep(QUIET * 2).await;
        buffer.stage(ws, named("second")).await;
        tokio::time::sleep(QUIET * 2).await;

        assert_eq!(store.writes(), 2);
        assert_eq!(store.load(ws).await.unwrap().unwrap().full_name, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_persist_cancels_pending() {
        let (buffer, store) = buffer();
        let ws = Uuid::new_v4();

        buffer.stage(ws, named("typed")).await;
        buffer.persist(ws, &named("clicked")).await.unwrap();
        tokio::time::sleep(QUIET * 2).await;

        assert_eq!(store.writes(), 1);
        assert_eq!(store.load(ws).await.unwrap().unwrap().full_name, "clicked");
    }

    #[tokio::test(start_paused = true)]
    async fn test_discard_clears_everything() {
        let (buffer, store) = buffer();
        let ws = Uuid::new_v4();

        buffer.persist(ws, &named("saved")).await.unwrap();
        buffer.stage(ws, named("typing")).await;
        buffer.discard(ws).await.unwrap();
        tokio::time::sleep(QUIET * 2).await;

        assert!(buffer.load(ws).await.unwrap().is_none());
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_workspaces_are_independent() {
        let (buffer, store) = buffer();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        buffer.stage(a, named("a")).await;
        buffer.stage(b, named("b")).await;
        tokio::time::sleep(QUIET * 2).await;

        assert_eq!(store.writes(), 2);
        assert_eq!(store.load(a).await.unwrap().unwrap().full_name, "a");
        assert_eq!(store.load(b).await.unwrap().unwrap().full_name, "b");
    }

    #[tokio::test(start_paused = true)]
    async fn test_workspace_lock_serializes_edits() {
        let (buffer, _) = buffer();
        let ws = Uuid::new_v4();
        let log = Arc::new(Mutex::new(Vec::new()));

        let edit = |tag: &'static str| {
            let (buffer, log) = (buffer.clone(), log.clone());
            async move {
                let _guard = buffer.lock_workspace(ws).await;
                log.lock().await.push(format!("{tag}-start"));
                tokio::time::sleep(Duration::from_millis(20)).await;
                log.lock().await.push(format!("{tag}-end"));
            }
        };
        tokio::join!(edit("a"), edit("b"));

        let log = log.lock().await;
        assert_eq!(log[0].split('-').next(), log[1].split('-').next());
        assert_eq!(log.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_workspace_locks_are_independent() {
        let (buffer, _) = buffer();
        let _a = buffer.lock_workspace(Uuid::new_v4()).await;
        let other = tokio::time::timeout(
            Duration::from_millis(10),
            buffer.lock_workspace(Uuid::new_v4()),
        )
        .await;
        assert!(other.is_ok());
    }

    #[tokio::test]
    async fn test_flush_all_writes_pending() {
        let store = Arc::new(MemoryDraftStore::new());
        let buffer = DraftBuffer::new(store.clone(), Duration::from_secs(3600));
        let ws = Uuid::new_v4();

        buffer.stage(ws, named("late")).await;
        buffer.flush_all().await;

        assert_eq!(store.writes(), 1);
        assert_eq!(buffer.pending_count().await, 0);
    }
}
