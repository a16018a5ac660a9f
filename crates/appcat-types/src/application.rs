use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ShapeError;
use crate::wire::ApplicationRecord;

/// One (name, publisher) pair of an application entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AppEntry {
    pub name: String,
    pub publisher: String,
}

impl AppEntry {
    pub fn new(name: impl Into<String>, publisher: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            publisher: publisher.into(),
        }
    }

    /// Exact (case-sensitive) comparison against a name and publisher.
    pub fn is(&self, name: &str, publisher: &str) -> bool {
        self.name == name && self.publisher == publisher
    }

    /// Case-insensitive substring match on either field.
    ///
    /// `needle` must already be lower-cased.
    fn matches_lowered(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.publisher.to_lowercase().contains(needle)
    }
}

impl fmt::Display for AppEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.publisher)
    }
}

/// A logical application entry: an ordered list of (name, publisher) pairs
/// that are edited together.
///
/// An `Application` held by a catalog is never empty. Removing the last pair
/// through [`Application::remove_at`] leaves it empty, and the owner is
/// expected to drop it.
///
/// On the wire an application is two parallel arrays; serde goes through
/// [`ApplicationRecord`] so the mismatch check runs on every decode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ApplicationRecord", into = "ApplicationRecord")]
pub struct Application {
    entries: Vec<AppEntry>,
}

impl Application {
    /// Build an application from its pairs.
    pub fn new(entries: Vec<AppEntry>) -> Result<Self, ShapeError> {
        if entries.is_empty() {
            return Err(ShapeError::EmptyApplication);
        }
        Ok(Self { entries })
    }

    /// Shorthand for an application with exactly one pair.
    pub fn single(name: impl Into<String>, publisher: impl Into<String>) -> Self {
        Self {
            entries: vec![AppEntry::new(name, publisher)],
        }
    }

    pub fn entries(&self) -> &[AppEntry] {
        &self.entries
    }

    /// The identifying pair used for duplicate detection.
    pub fn first(&self) -> Option<&AppEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the first pair equal to `(name, publisher)`.
    pub fn position(&self, name: &str, publisher: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.is(name, publisher))
    }

    pub fn contains(&self, name: &str, publisher: &str) -> bool {
        self.position(name, publisher).is_some()
    }

    /// Returns `true` if any name or publisher contains `query`,
    /// ignoring case.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.entries.iter().any(|e| e.matches_lowered(&needle))
    }

    /// Overwrite the pair at `index`, returning the previous one.
    ///
    /// Panics if `index` is out of bounds.
    pub fn replace_at(&mut self, index: usize, entry: AppEntry) -> AppEntry {
        std::mem::replace(&mut self.entries[index], entry)
    }

    /// Remove the pair at `index`, shifting later pairs down.
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> AppEntry {
        self.entries.remove(index)
    }
}

impl TryFrom<ApplicationRecord> for Application {
    type Error = ShapeError;

    fn try_from(record: ApplicationRecord) -> Result<Self, Self::Error> {
        if record.app_name.len() != record.publisher.len() {
            return Err(ShapeError::LengthMismatch {
                names: record.app_name.len(),
                publishers: record.publisher.len(),
            });
        }
        let entries = record
            .app_name
            .into_iter()
            .zip(record.publisher)
            .map(|(name, publisher)| AppEntry { name, publisher })
            .collect();
        Self::new(entries)
    }
}

impl From<Application> for ApplicationRecord {
    fn from(app: Application) -> Self {
        let (app_name, publisher) = app
            .entries
            .into_iter()
            .map(|e| (e.name, e.publisher))
            .unzip();
        Self {
            app_name,
            publisher,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(names: &[&str], publishers: &[&str]) -> ApplicationRecord {
        ApplicationRecord {
            app_name: names.iter().map(|s| s.to_string()).collect(),
            publisher: publishers.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn record_converts_to_pairs() {
        let app = Application::try_from(record(&["gimp", "gimp-beta"], &["Snapcrafters", "GNOME"]))
            .unwrap();
        assert_eq!(app.len(), 2);
        assert_eq!(app.entries()[1], AppEntry::new("gimp-beta", "GNOME"));
        assert_eq!(app.first(), Some(&AppEntry::new("gimp", "Snapcrafters")));
    }

    #[test]
    fn mismatched_record_rejected() {
        let err = Application::try_from(record(&["a", "b"], &["p"])).unwrap_err();
        assert_eq!(err, ShapeError::LengthMismatch { names: 2, publishers: 1 });
    }

    #[test]
    fn empty_record_rejected() {
        let err = Application::try_from(record(&[], &[])).unwrap_err();
        assert_eq!(err, ShapeError::EmptyApplication);
    }

    #[test]
    fn serializes_as_parallel_arrays() {
        let app = Application::new(vec![
            AppEntry::new("wireguard", "Snapcrafters"),
            AppEntry::new("wg-quick", "WireGuard"),
        ])
        .unwrap();
        let json = serde_json::to_value(&app).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "app_name": ["wireguard", "wg-quick"],
                "publisher": ["Snapcrafters", "WireGuard"],
            })
        );
    }

    #[test]
    fn deserialize_rejects_mismatch() {
        let res: Result<Application, _> =
            serde_json::from_str(r#"{"app_name":["a"],"publisher":[]}"#);
        assert!(res.is_err());
    }

    #[test]
    fn match_is_case_insensitive_substring() {
        let app = Application::single("wireguard", "Snapcrafters");
        assert!(app.matches("ware"));
        assert!(app.matches("SNAP"));
        assert!(app.matches("WireGuard"));
        assert!(!app.matches("openvpn"));
    }

    #[test]
    fn position_is_exact() {
        let app = Application::new(vec![
            AppEntry::new("a", "p"),
            AppEntry::new("b", "q"),
        ])
        .unwrap();
        assert_eq!(app.position("b", "q"), Some(1));
        assert_eq!(app.position("B", "q"), None);
        assert!(!app.contains("a", "q"));
    }

    #[test]
    fn remove_and_replace_preserve_order() {
        let mut app = Application::new(vec![
            AppEntry::new("a", "p"),
            AppEntry::new("b", "p"),
            AppEntry::new("c", "p"),
        ])
        .unwrap();
        let old = app.replace_at(2, AppEntry::new("z", "q"));
        assert_eq!(old, AppEntry::new("c", "p"));
        app.remove_at(0);
        let names: Vec<_> = app.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "z"]);
        app.remove_at(0);
        app.remove_at(0);
        assert!(app.is_empty());
    }
}
