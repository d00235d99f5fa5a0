// Persistence boundary.
//
// drafts:  the working copy of each workspace (the builder's "local storage"),
//          Redis in production, in-process for tests.
// buffer:  debounced writer in front of the draft store.
// archive: explicit saves, append-only in Postgres with the rendered page in S3.

pub mod archive;
pub mod buffer;
pub mod drafts;
pub mod memory;
pub mod redis_store;

pub use archive::{PgSnapshotArchive, SnapshotArchive};
pub use buffer::DraftBuffer;
pub use drafts::DraftStore;
pub use memory::{MemoryDraftStore, MemorySnapshotArchive};
pub use redis_store::RedisDraftStore;
