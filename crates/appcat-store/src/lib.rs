//! Catalog storage for appcat.
//!
//! The catalog is a list of categories, each holding application entries.
//! All state lives behind a single reader/writer lock so that every
//! operation observes and produces a consistent catalog.
//!
//! # Storage Backends
//!
//! All backends implement [`CatalogReader`] and [`CatalogWriter`]:
//!
//! - [`InMemoryCatalog`] -- `RwLock`-guarded catalog plus a [`RecencyIndex`]
//!
//! [`SnapshotFile`] turns a catalog snapshot into the on-disk JSON document
//! and back. It is driven by the caller after a mutation has released the
//! lock; a failed write never rolls back in-memory state.
//!
//! # Design Rules
//!
//! 1. Category names are unique ignoring case.
//! 2. An application is identified by its first (name, publisher) pair for
//!    duplicate detection.
//! 3. Each operation acquires the lock once; conflict checks and inserts
//!    happen in the same critical section.
//! 4. A rejected operation leaves the catalog unchanged. Bulk merge skips
//!    bad items instead of failing.
//! 5. Categories are never created implicitly by adding an application.

pub mod error;
pub mod memory;
pub mod recency;
pub mod snapshot;
pub mod traits;

pub use error::{CatalogError, CatalogResult, ErrorKind};
pub use memory::InMemoryCatalog;
pub use recency::{RecencyIndex, RecencyKey, RECENT_WINDOW_HOURS};
pub use snapshot::SnapshotFile;
pub use traits::{
    ApplicationListing, CatalogReader, CatalogStore, CatalogWriter, SEARCH_RESULTS_CATEGORY,
};
