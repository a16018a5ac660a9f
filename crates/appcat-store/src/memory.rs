//! In-memory catalog store.
//!
//! [`InMemoryCatalog`] keeps the category list and the [`RecencyIndex`] in a
//! single `CatalogState` behind one `RwLock`. Readers share the lock;
//! every mutation holds the write lock from its first lookup to its last
//! index update.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use appcat_types::{
    category_eq, validate_category_name, AppEntry, Application, ApplicationRecord,
    CatalogDocument, CatalogStats, Category, UploadSummary,
};

use crate::error::{CatalogError, CatalogResult};
use crate::recency::RecencyIndex;
use crate::traits::{ApplicationListing, CatalogReader, CatalogWriter, SEARCH_RESULTS_CATEGORY};

/// Thread-safe in-memory catalog.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: RwLock<CatalogState>,
}

#[derive(Debug, Default)]
struct CatalogState {
    categories: Vec<Category>,
    recency: RecencyIndex,
}

impl CatalogState {
    fn position(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| category_eq(&c.name, name))
    }

    fn get(&self, name: &str) -> CatalogResult<&Category> {
        self.position(name)
            .map(|i| &self.categories[i])
            .ok_or_else(|| CatalogError::category_not_found(name))
    }

    /// Mutable access to a category together with the recency index.
    fn entry_mut(&mut self, name: &str) -> CatalogResult<(&mut Category, &mut RecencyIndex)> {
        let index = self
            .position(name)
            .ok_or_else(|| CatalogError::category_not_found(name))?;
        Ok((&mut self.categories[index], &mut self.recency))
    }

    /// Fold `document` into the catalog.
    ///
    /// Categories are found or created by case-insensitive name. Only a blank
    /// name is skipped, since no request could address it; other names are
    /// kept as given. When `stamp` is set, every added pair is recorded in
    /// the recency index at that time; loading from disk passes `None`.
    fn merge(&mut self, document: CatalogDocument, stamp: Option<DateTime<Utc>>) -> UploadSummary {
        let mut summary = UploadSummary::default();

        for incoming in document.categories {
            if incoming.category.trim().is_empty() {
                warn!(
                    applications = incoming.applications.len(),
                    "skipping category with blank name"
                );
                continue;
            }

            let index = match self.position(&incoming.category) {
                Some(i) => i,
                None => {
                    self.categories.push(Category::new(incoming.category.clone()));
                    summary.added_categories += 1;
                    self.categories.len() - 1
                }
            };

            for record in incoming.applications {
                let app = match Application::try_from(record) {
                    Ok(app) => app,
                    Err(e) => {
                        warn!(
                            category = %incoming.category,
                            error = %e,
                            "skipping malformed application"
                        );
                        continue;
                    }
                };

                let category = &mut self.categories[index];
                let exists = app
                    .first()
                    .is_some_and(|first| category.contains_pair(&first.name, &first.publisher));
                if exists {
                    debug!(category = %category.name, "application already present, skipping");
                    continue;
                }

                if let Some(at) = stamp {
                    for entry in app.entries() {
                        self.recency.touch(&category.name, entry, at);
                    }
                }
                summary.added_applications += app.len();
                category.applications.push(app);
            }
        }

        summary
    }
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a stored document.
    ///
    /// Malformed applications are skipped and categories whose names differ
    /// only by case are folded together. Loaded pairs do not count as
    /// recently added.
    pub fn from_document(document: CatalogDocument) -> Self {
        let expected = document.application_count();
        let mut state = CatalogState::default();
        let summary = state.merge(document, None);
        info!(
            categories = state.categories.len(),
            applications = summary.added_applications,
            "catalog loaded"
        );
        let loaded: usize = state.categories.iter().map(Category::application_count).sum();
        if loaded != expected {
            warn!(expected, loaded, "some stored applications were dropped while loading");
        }
        Self {
            inner: RwLock::new(state),
        }
    }

    fn read_state(&self) -> CatalogResult<RwLockReadGuard<'_, CatalogState>> {
        self.inner.read().map_err(|_| CatalogError::LockPoisoned)
    }

    fn write_state(&self) -> CatalogResult<RwLockWriteGuard<'_, CatalogState>> {
        self.inner.write().map_err(|_| CatalogError::LockPoisoned)
    }
}

impl CatalogReader for InMemoryCatalog {
    fn category(&self, name: &str) -> CatalogResult<Category> {
        let state = self.read_state()?;
        state.get(name).cloned()
    }

    fn categories(&self) -> CatalogResult<Vec<String>> {
        let state = self.read_state()?;
        Ok(state.categories.iter().map(|c| c.name.clone()).collect())
    }

    fn applications(&self, category: Option<&str>) -> CatalogResult<ApplicationListing> {
        let state = self.read_state()?;
        match category {
            Some(name) => state.get(name).cloned().map(ApplicationListing::Category),
            None => Ok(ApplicationListing::Catalog(
                state.categories.iter().cloned().collect(),
            )),
        }
    }

    fn search(&self, query: &str) -> CatalogResult<Option<Category>> {
        if query.trim().is_empty() {
            return Err(CatalogError::Validation("search query must not be empty".into()));
        }

        let state = self.read_state()?;
        let matches: Vec<Application> = state
            .categories
            .iter()
            .flat_map(|c| c.applications.iter())
            .filter(|app| app.matches(query))
            .cloned()
            .collect();
        debug!(query, hits = matches.len(), "search");

        if matches.is_empty() {
            return Ok(None);
        }
        Ok(Some(Category {
            name: SEARCH_RESULTS_CATEGORY.to_string(),
            applications: matches,
        }))
    }

    fn stats_at(&self, now: DateTime<Utc>) -> CatalogResult<CatalogStats> {
        let state = self.read_state()?;
        let category_counts: BTreeMap<String, usize> = state
            .categories
            .iter()
            .map(|c| (c.name.clone(), c.application_count()))
            .collect();
        Ok(CatalogStats {
            total_categories: state.categories.len(),
            total_applications: category_counts.values().sum(),
            category_counts,
            recently_added: state.recency.recent_count(now),
        })
    }

    fn snapshot(&self) -> CatalogResult<CatalogDocument> {
        let state = self.read_state()?;
        Ok(state.categories.iter().cloned().collect())
    }
}

impl CatalogWriter for InMemoryCatalog {
    fn add_category(&self, name: &str) -> CatalogResult<()> {
        validate_category_name(name)?;

        let mut state = self.write_state()?;
        if let Some(i) = state.position(name) {
            return Err(CatalogError::AlreadyExists {
                category: state.categories[i].name.clone(),
            });
        }
        state.categories.push(Category::new(name));
        info!(category = name, "category added");
        Ok(())
    }

    fn add_application(&self, category: &str, record: ApplicationRecord) -> CatalogResult<()> {
        let app = Application::try_from(record)?;
        let now = Utc::now();

        let mut state = self.write_state()?;
        let (target, recency) = state.entry_mut(category)?;

        if let Some(first) = app.first() {
            if target.contains_pair(&first.name, &first.publisher) {
                return Err(CatalogError::Conflict {
                    category: target.name.clone(),
                    name: first.name.clone(),
                    publisher: first.publisher.clone(),
                });
            }
        }

        for entry in app.entries() {
            recency.touch(&target.name, entry, now);
        }
        info!(category = %target.name, pairs = app.len(), "application added");
        target.applications.push(app);
        Ok(())
    }

    fn update_application(
        &self,
        category: &str,
        old: &AppEntry,
        replacement: ApplicationRecord,
    ) -> CatalogResult<()> {
        let replacement = Application::try_from(replacement)?;
        let new_entry = match replacement.first() {
            Some(entry) => entry.clone(),
            None => return Err(CatalogError::Validation("replacement has no pairs".into())),
        };
        let now = Utc::now();

        let mut state = self.write_state()?;
        let (target, recency) = state.entry_mut(category)?;
        let (app_idx, pair_idx) = target
            .find_pair(&old.name, &old.publisher)
            .ok_or_else(|| CatalogError::pair_not_found(category, &old.name, &old.publisher))?;

        let previous = target.applications[app_idx].replace_at(pair_idx, new_entry.clone());
        recency.forget(&target.name, &previous);
        recency.touch(&target.name, &new_entry, now);
        info!(category = %target.name, from = %previous, to = %new_entry, "application updated");
        Ok(())
    }

    fn delete_application(&self, category: &str, entry: &AppEntry) -> CatalogResult<()> {
        let mut state = self.write_state()?;
        let (target, recency) = state.entry_mut(category)?;
        let (app_idx, pair_idx) = target
            .find_pair(&entry.name, &entry.publisher)
            .ok_or_else(|| CatalogError::pair_not_found(category, &entry.name, &entry.publisher))?;

        let removed = target.applications[app_idx].remove_at(pair_idx);
        if target.applications[app_idx].is_empty() {
            target.applications.remove(app_idx);
        }
        recency.forget(&target.name, &removed);
        info!(category = %target.name, application = %removed, "application deleted");
        Ok(())
    }

    fn delete_category(&self, name: &str) -> CatalogResult<()> {
        let mut state = self.write_state()?;
        let index = state
            .position(name)
            .ok_or_else(|| CatalogError::category_not_found(name))?;
        // Recency entries of the removed category stay until overwritten.
        let removed = state.categories.remove(index);
        info!(category = %removed.name, "category deleted");
        Ok(())
    }

    fn merge(&self, document: CatalogDocument) -> CatalogResult<UploadSummary> {
        let now = Utc::now();
        let mut state = self.write_state()?;
        let summary = state.merge(document, Some(now));
        info!(
            added_categories = summary.added_categories,
            added_applications = summary.added_applications,
            "catalog merged"
        );
        Ok(summary)
    }
}


#[cfg(test)]
mod proptests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn prop_distinct_adds_are_counted(
            pairs in prop::collection::hash_set(("[a-z]{1,6}", "[A-Z][a-z]{0,5}"), 0..30),
        ) {
            let store = InMemoryCatalog::new();
            store.add_category("Props").unwrap();
            for (name, publisher) in &pairs {
                store
                    .add_application(
                        "Props",
                        ApplicationRecord::new([name.as_str()], [publisher.as_str()]),
                    )
                    .unwrap();
            }

            let stats = store.stats().unwrap();
            prop_assert_eq!(stats.total_applications, pairs.len());
            prop_assert_eq!(stats.category_counts.get("Props").copied(), Some(pairs.len()));
            prop_assert_eq!(stats.recently_added, pairs.len());
        }

        #[test]
        fn prop_merge_twice_adds_nothing(
            names in prop::collection::vec("[a-z]{1,4}", 0..20),
        ) {
            let unique: HashSet<_> = names.iter().cloned().collect();
            let doc = CatalogDocument::new(vec![appcat_types::CategoryRecord {
                category: "Merged".into(),
                applications: names
                    .iter()
                    .map(|n| ApplicationRecord::new([n.as_str()], ["p"]))
                    .collect(),
            }]);

            let store = InMemoryCatalog::new();
            let first = store.merge(doc.clone()).unwrap();
            prop_assert_eq!(first.added_applications, unique.len());
            let second = store.merge(doc).unwrap();
            prop_assert!(second.is_empty());
        }
    }
}
