//! The read and write interfaces of a catalog backend.

use chrono::{DateTime, Utc};
use serde::Serialize;

use appcat_types::{
    AppEntry, ApplicationRecord, CatalogDocument, CatalogStats, Category, UploadSummary,
};

use crate::error::CatalogResult;

/// Name of the synthetic category that groups search matches.
pub const SEARCH_RESULTS_CATEGORY: &str = "Search Results";

/// Result of listing applications: the whole catalog, or one category when
/// a filter was given.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ApplicationListing {
    Catalog(CatalogDocument),
    Category(Category),
}

/// Read side of a catalog.
///
/// Every method observes a point-in-time consistent catalog; no partially
/// applied mutation is ever visible.
pub trait CatalogReader: Send + Sync {
    /// Look up a category by case-insensitive name.
    fn category(&self, name: &str) -> CatalogResult<Category>;

    /// Category names in stored order.
    fn categories(&self) -> CatalogResult<Vec<String>>;

    /// All applications, or those of one category.
    fn applications(&self, category: Option<&str>) -> CatalogResult<ApplicationListing>;

    /// Case-insensitive substring search over every name and publisher.
    ///
    /// Returns `Ok(None)` when nothing matches.
    fn search(&self, query: &str) -> CatalogResult<Option<Category>>;

    /// Statistics with the recency window ending at `now`.
    fn stats_at(&self, now: DateTime<Utc>) -> CatalogResult<CatalogStats>;

    /// The whole catalog as a serializable document.
    fn snapshot(&self) -> CatalogResult<CatalogDocument>;

    /// Statistics as of the current wall-clock time.
    fn stats(&self) -> CatalogResult<CatalogStats> {
        self.stats_at(Utc::now())
    }

    /// Export the whole catalog, or a single category.
    fn export(&self, category: Option<&str>) -> CatalogResult<CatalogDocument> {
        match category {
            Some(name) => self.category(name).map(CatalogDocument::from_category),
            None => self.snapshot(),
        }
    }
}

/// Write side of a catalog.
///
/// Each method is atomic: it either applies completely or, on error, leaves
/// the catalog unchanged. [`CatalogWriter::merge`] is the exception and
/// skips individual bad records.
pub trait CatalogWriter: Send + Sync {
    /// Append a new empty category.
    fn add_category(&self, name: &str) -> CatalogResult<()>;

    /// Append an application to an existing category.
    ///
    /// Fails with `Conflict` if the record's first pair already appears in
    /// the category.
    fn add_application(&self, category: &str, record: ApplicationRecord) -> CatalogResult<()>;

    /// Rewrite the first occurrence of `old` in place with the first pair of
    /// `replacement`. Other pairs of the application are untouched.
    fn update_application(
        &self,
        category: &str,
        old: &AppEntry,
        replacement: ApplicationRecord,
    ) -> CatalogResult<()>;

    /// Remove the first occurrence of `entry`, dropping its application
    /// once no pairs remain.
    fn delete_application(&self, category: &str, entry: &AppEntry) -> CatalogResult<()>;

    /// Remove a category and all of its applications.
    fn delete_category(&self, name: &str) -> CatalogResult<()>;

    /// Merge a catalog fragment, creating categories as needed and skipping
    /// malformed or already present applications.
    fn merge(&self, document: CatalogDocument) -> CatalogResult<UploadSummary>;
}

/// A complete catalog backend.
pub trait CatalogStore: CatalogReader + CatalogWriter {}

impl<T: CatalogReader + CatalogWriter + ?Sized> CatalogStore for T {}
