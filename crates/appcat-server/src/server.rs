use std::sync::Arc;

use tokio::net::TcpListener;

use appcat_store::{InMemoryCatalog, SnapshotFile};
use appcat_types::CatalogDocument;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Catalog HTTP server.
pub struct CatalogServer {
    config: ServerConfig,
    state: AppState,
}

impl CatalogServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Load the catalog from `config.data_file` and persist mutations back to it.
    ///
    /// A missing file starts from the default catalog (or an empty one when
    /// `seed_defaults` is off). An unreadable file is an error rather than
    /// an empty start, so a bad file is never silently overwritten.
    pub fn open(config: ServerConfig) -> ServerResult<Self> {
        let file = SnapshotFile::new(&config.data_file);
        let document = if config.seed_defaults {
            file.load_or_seed(CatalogDocument::seed())?
        } else {
            file.load()?.unwrap_or_default()
        };
        let store = Arc::new(InMemoryCatalog::from_document(document));
        let state = AppState::with_persistence(store, file);
        Ok(Self::new(config, state))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone(), &self.config)
    }

    /// Serve requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("appcat server listening on http://{}", self.config.bind_addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use appcat_store::CatalogReader;

    use super::*;

    fn config_in(dir: &std::path::Path) -> ServerConfig {
        ServerConfig {
            data_file: dir.join("data.json"),
            static_dir: None,
            ..ServerConfig::default()
        }
    }

    #[test]
    fn open_seeds_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let server = CatalogServer::open(config_in(dir.path())).unwrap();
        assert_eq!(server.state().store.categories().unwrap(), vec!["VPN", "Security"]);
        assert!(dir.path().join("data.json").exists());
    }

    #[test]
    fn open_without_seed_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            seed_defaults: false,
            ..config_in(dir.path())
        };
        let server = CatalogServer::open(config).unwrap();
        assert!(server.state().store.categories().unwrap().is_empty());
        assert!(!dir.path().join("data.json").exists());
    }

    #[test]
    fn open_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("data.json"), "not json").unwrap();
        assert!(CatalogServer::open(config_in(dir.path())).is_err());
    }

    #[test]
    fn router_builds() {
        let dir = tempfile::tempdir().unwrap();
        let server = CatalogServer::open(config_in(dir.path())).unwrap();
        assert_eq!(server.config().bind_addr.port(), 8080);
        let _router = server.router();
    }
}
