use serde::{Deserialize, Serialize};

use crate::application::Application;
use crate::wire::CategoryRecord;

/// A named group of applications, kept in insertion order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "category")]
    pub name: String,
    #[serde(default)]
    pub applications: Vec<Application>,
}

impl Category {
    /// Create an empty category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            applications: Vec::new(),
        }
    }

    /// Number of application entries (not pairs).
    pub fn application_count(&self) -> usize {
        self.applications.len()
    }

    /// Locate the first `(name, publisher)` pair, scanning applications in
    /// order and pairs within each application in order.
    ///
    /// Returns `(application index, pair index)`.
    pub fn find_pair(&self, name: &str, publisher: &str) -> Option<(usize, usize)> {
        self.applications
            .iter()
            .enumerate()
            .find_map(|(i, app)| app.position(name, publisher).map(|j| (i, j)))
    }

    pub fn contains_pair(&self, name: &str, publisher: &str) -> bool {
        self.find_pair(name, publisher).is_some()
    }
}

impl From<Category> for CategoryRecord {
    fn from(category: Category) -> Self {
        Self {
            category: category.name,
            applications: category.applications.into_iter().map(Into::into).collect(),
        }
    }
}
