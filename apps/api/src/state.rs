use std::sync::Arc;

use crate::config::Config;
use crate::storage::{DraftBuffer, SnapshotArchive};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Working copies, debounced in front of the draft store.
    pub drafts: DraftBuffer,
    /// Explicit saves. Postgres + S3 in production.
    pub archive: Arc<dyn SnapshotArchive>,
    pub config: Config,
}
