use std::ffi::OsString;
use std::path::PathBuf;

use async_trait::async_trait;

use super::SnapshotStore;
use crate::error::StoreError;
use crate::snapshot::Snapshot;

/// Stores the snapshot as a pretty-printed JSON file.
///
/// Saves go to a sibling temp file that is then renamed over the original,
/// so a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open the store at `path`, creating an empty document if none exists.
    ///
    /// Fails if an existing file cannot be read or does not parse.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };

        let exists = tokio::fs::try_exists(&store.path)
            .await
            .map_err(|source| store.io_error(source))?;

        if exists {
            store.load().await?;
            tracing::info!(path = %store.path.display(), "Opened snapshot store");
        } else {
            store.save(&Snapshot::default()).await?;
            tracing::info!(path = %store.path.display(), "Created empty snapshot store");
        }

        Ok(store)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("snapshot"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> Result<Snapshot, StoreError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| self.io_error(source))?;

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(snapshot)?;
        let temp = self.temp_path();

        tokio::fs::write(&temp, body)
            .await
            .map_err(|source| StoreError::Io {
                path: temp.clone(),
                source,
            })?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|source| self.io_error(source))?;

        tracing::debug!(
            path = %self.path.display(),
            passes = snapshot.passes.len(),
            "Snapshot saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use gatepass_core::access::User;

    use super::*;

    #[tokio::test]
    async fn open_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");

        let store = JsonFileStore::open(&path).await.unwrap();

        assert!(path.exists());
        assert_eq!(store.load().await.unwrap(), Snapshot::default());
    }

    #[tokio::test]
    async fn saved_snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        let store = JsonFileStore::open(&path).await.unwrap();

        let snapshot = Snapshot {
            users: vec![User {
                id: "1".into(),
                username: "mod".into(),
                password: "pw".into(),
                role: "moderator".into(),
                name: "Moderator".into(),
            }],
            passes: vec![],
        };
        store.save(&snapshot).await.unwrap();

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(reopened.load().await.unwrap(), snapshot);
        assert!(!reopened.temp_path().exists());
    }

    #[tokio::test]
    async fn file_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        JsonFileStore::open(&path).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"users\""), "got: {text}");
    }

    #[tokio::test]
    async fn malformed_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::open(&path).await.unwrap_err();
        assert_matches!(err, StoreError::Malformed { .. });
    }

    #[tokio::test]
    async fn unreadable_location_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("database.json");

        let err = JsonFileStore::open(&path).await.unwrap_err();
        assert_matches!(err, StoreError::Io { .. });
    }
}
