//! JSON records exchanged with clients and written to the data file.
//!
//! Field names follow the published format:
//!
//! ```json
//! { "linuxCategories": [
//!     { "category": "VPN",
//!       "applications": [ { "app_name": ["wireguard"], "publisher": ["Snapcrafters"] } ] }
//! ] }
//! ```
//!
//! These records are deliberately lenient: an [`ApplicationRecord`] with
//! mismatched arrays still decodes, so a bulk upload can skip the bad entry
//! instead of rejecting the whole document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Application as two parallel arrays.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(default)]
    pub app_name: Vec<String>,
    #[serde(default)]
    pub publisher: Vec<String>,
}

impl ApplicationRecord {
    pub fn new<N, P>(names: N, publishers: P) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            app_name: names.into_iter().map(Into::into).collect(),
            publisher: publishers.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub category: String,
    #[serde(default)]
    pub applications: Vec<ApplicationRecord>,
}

/// The top-level catalog document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(rename = "linuxCategories", default)]
    pub categories: Vec<CategoryRecord>,
}

impl CatalogDocument {
    pub fn new(categories: Vec<CategoryRecord>) -> Self {
        Self { categories }
    }

    /// Document holding a single category, as returned by a per-category export.
    pub fn from_category(category: Category) -> Self {
        Self {
            categories: vec![category.into()],
        }
    }

    /// The catalog written on first start when no data file exists.
    pub fn seed() -> Self {
        let snap = |name: &str| ApplicationRecord::new([name], ["Snapcrafters"]);
        Self {
            categories: vec![
                CategoryRecord {
                    category: "VPN".into(),
                    applications: vec![snap("gimp"), snap("wireguard")],
                },
                CategoryRecord {
                    category: "Security".into(),
                    applications: vec![snap("wireguard")],
                },
            ],
        }
    }

    /// Total number of application records across all categories.
    pub fn application_count(&self) -> usize {
        self.categories.iter().map(|c| c.applications.len()).sum()
    }
}

impl FromIterator<Category> for CatalogDocument {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        Self {
            categories: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Catalog statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_categories: usize,
    pub total_applications: usize,
    pub category_counts: BTreeMap<String, usize>,
    pub recently_added: usize,
}

/// Counts reported by a bulk merge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub added_categories: usize,
    pub added_applications: usize,
}

impl UploadSummary {
    pub fn is_empty(&self) -> bool {
        self.added_categories == 0 && self.added_applications == 0
    }
}
