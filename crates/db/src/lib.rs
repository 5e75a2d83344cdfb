//! Snapshot persistence for the gate-pass service.
//!
//! The whole application state (users and passes) is loaded and saved as
//! one document. [`Database`] serializes every read-modify-write cycle so
//! that concurrent requests in one process never drop each other's updates.

pub mod error;
pub mod repositories;
pub mod snapshot;
pub mod store;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

pub use error::{RepoError, StoreError};
pub use snapshot::Snapshot;
use store::{JsonFileStore, MemoryStore, SnapshotStore};

pub type DbPool = Arc<Database>;

/// Result of a mutation closure passed to [`Database::mutate`].
#[derive(Debug)]
pub enum Mutation<T> {
    /// Persist the modified snapshot, then return the value.
    Commit(T),
    /// Return the value without writing anything back.
    Discard(T),
}

/// Handle over a [`SnapshotStore`] with a single write lock.
pub struct Database {
    store: Arc<dyn SnapshotStore>,
    write_lock: Mutex<()>,
}

impl Database {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Load a fresh copy of the full snapshot.
    pub async fn read(&self) -> Result<Snapshot, StoreError> {
        self.store.load().await
    }

    /// Run `f` against a fresh snapshot while holding the write lock.
    ///
    /// The snapshot is saved only when `f` returns [`Mutation::Commit`].
    pub async fn mutate<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Snapshot) -> Result<Mutation<T>, E>,
        E: From<StoreError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut snapshot = self.store.load().await?;
        match f(&mut snapshot)? {
            Mutation::Commit(value) => {
                self.store.save(&snapshot).await?;
                Ok(value)
            }
            Mutation::Discard(value) => Ok(value),
        }
    }
}

/// Open (or create) the JSON document at `path` and wrap it in a pool.
pub async fn create_pool(path: impl Into<PathBuf>) -> Result<DbPool, StoreError> {
    let store = JsonFileStore::open(path).await?;
    Ok(Arc::new(Database::new(Arc::new(store))))
}

/// A pool backed by an in-memory snapshot.
pub fn memory_pool(snapshot: Snapshot) -> DbPool {
    Arc::new(Database::new(Arc::new(MemoryStore::new(snapshot))))
}

/// Verify the store can be read and its content parses.
///
/// Logs a warning for every user whose role the client will not recognise.
pub async fn health_check(pool: &DbPool) -> Result<(), StoreError> {
    let snapshot = pool.read().await?;
    for user in snapshot.unknown_role_users() {
        tracing::warn!(user_id = %user.id, role = %user.role, "User has an unrecognised role");
    }
    tracing::debug!(
        users = snapshot.users.len(),
        passes = snapshot.passes.len(),
        "Store health check passed"
    );
    Ok(())
}
