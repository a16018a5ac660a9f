//! HTTP server for appcat.
//!
//! Exposes the catalog store over a small JSON API under `/api`, accepts
//! bulk uploads as multipart files, offers catalog downloads as
//! attachments, and serves the dashboard's static files for everything
//! else. Each successful mutation is followed by a best-effort write of
//! the whole catalog to the configured data file.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::{CorsConfig, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::CatalogServer;
pub use state::{AppState, Persistence};
