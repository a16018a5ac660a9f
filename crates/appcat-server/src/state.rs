use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use appcat_store::{CatalogReader, CatalogStore, SnapshotFile};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    persistence: Option<Persistence>,
}

impl AppState {
    /// State without a backing file; mutations live only in memory.
    pub fn in_memory(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            persistence: None,
        }
    }

    pub fn with_persistence(store: Arc<dyn CatalogStore>, file: SnapshotFile) -> Self {
        Self {
            store,
            persistence: Some(Persistence::new(file)),
        }
    }

    /// Write the current catalog to disk after a mutation.
    ///
    /// Best effort: failures are logged and the in-memory catalog is kept.
    pub async fn persist(&self) {
        if let Some(persistence) = &self.persistence {
            persistence.save(Arc::clone(&self.store)).await;
        }
    }
}

/// Serializes snapshot writes.
///
/// The snapshot is taken while holding `write_lock`, so whichever save runs
/// last writes a catalog at least as new as every mutation that preceded it.
#[derive(Clone)]
pub struct Persistence {
    file: SnapshotFile,
    write_lock: Arc<Mutex<()>>,
}

impl Persistence {
    pub fn new(file: SnapshotFile) -> Self {
        Self {
            file,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn save(&self, store: Arc<dyn CatalogStore>) {
        let _guard = self.write_lock.lock().await;
        let file = self.file.clone();
        let result = tokio::task::spawn_blocking(move || {
            let document = store.snapshot()?;
            file.save(&document)
        })
        .await;

        match result {
            Ok(Ok(())) => debug!(path = %self.file.path().display(), "catalog persisted"),
            Ok(Err(e)) => warn!(
                path = %self.file.path().display(),
                error = %e,
                "failed to persist catalog"
            ),
            Err(e) => warn!(error = %e, "persist task failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use appcat_store::{CatalogWriter, InMemoryCatalog};

    use super::*;

    #[tokio::test]
    async fn persist_writes_latest_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("data.json"));
        let store = Arc::new(InMemoryCatalog::new());
        let state = AppState::with_persistence(store.clone(), file.clone());

        store.add_category("VPN").unwrap();
        state.persist().await;

        let saved = file.load().unwrap().unwrap();
        assert_eq!(saved.categories.len(), 1);
        assert_eq!(saved.categories[0].category, "VPN");
    }

    #[tokio::test]
    async fn persist_failure_keeps_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("missing-dir").join("data.json"));
        let store = Arc::new(InMemoryCatalog::new());
        let state = AppState::with_persistence(store.clone(), file);

        store.add_category("VPN").unwrap();
        state.persist().await;
        assert_eq!(store.categories().unwrap(), vec!["VPN"]);
    }

    #[tokio::test]
    async fn in_memory_state_skips_persistence() {
        let store = Arc::new(InMemoryCatalog::new());
        let state = AppState::in_memory(store);
        state.persist().await;
    }
}
