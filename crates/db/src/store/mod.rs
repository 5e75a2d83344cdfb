//! Storage backends for the snapshot document.

mod json_file;
mod memory;

use async_trait::async_trait;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::snapshot::Snapshot;

/// Whole-document storage: no partial reads or writes.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the full snapshot.
    async fn load(&self) -> Result<Snapshot, StoreError>;

    /// Replace the stored snapshot with `snapshot`.
    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}
