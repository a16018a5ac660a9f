//! JSON snapshot file for a catalog.
//!
//! The whole catalog is written as one pretty-printed `linuxCategories`
//! document and replaced wholesale on every save. Writes go to a temporary
//! file in the same directory which is then renamed over the target, so a
//! crash mid-write leaves the previous snapshot intact.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use appcat_types::CatalogDocument;

use crate::error::CatalogResult;

/// Location of a catalog snapshot on disk.
#[derive(Clone, Debug)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot. Returns `Ok(None)` if the file does not exist.
    pub fn load(&self) -> CatalogResult<Option<CatalogDocument>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let document: CatalogDocument = serde_json::from_slice(&bytes)?;
        debug!(
            path = %self.path.display(),
            categories = document.categories.len(),
            "snapshot read"
        );
        Ok(Some(document))
    }

    /// Read the snapshot, or write `seed` and return it when none exists.
    pub fn load_or_seed(&self, seed: CatalogDocument) -> CatalogResult<CatalogDocument> {
        match self.load()? {
            Some(document) => Ok(document),
            None => {
                info!(
                    path = %self.path.display(),
                    "no catalog file found, writing default catalog"
                );
                self.save(&seed)?;
                Ok(seed)
            }
        }
    }

    /// Replace the snapshot with `document`.
    pub fn save(&self, document: &CatalogDocument) -> CatalogResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;

        let mut ser = serde_json::Serializer::with_formatter(
            tmp.as_file_mut(),
            PrettyFormatter::with_indent(b"    "),
        );
        document.serialize(&mut ser)?;
        tmp.as_file_mut().write_all(b"\n")?;
        tmp.as_file().sync_all()?;

        tmp.persist(&self.path).map_err(|e| e.error)?;
        debug!(path = %self.path.display(), "snapshot written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use appcat_types::{ApplicationRecord, CategoryRecord};

    use super::*;
    use crate::error::CatalogError;

    #[test]
    fn missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("data.json"));
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn load_or_seed_writes_seed_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let file = SnapshotFile::new(&path);

        let doc = file.load_or_seed(CatalogDocument::seed()).unwrap();
        assert_eq!(doc, CatalogDocument::seed());
        assert!(path.exists());

        // A second call reads the file instead of reseeding.
        let other = CatalogDocument::new(vec![CategoryRecord {
            category: "Other".into(),
            applications: vec![],
        }]);
        file.save(&other).unwrap();
        assert_eq!(file.load_or_seed(CatalogDocument::seed()).unwrap(), other);
    }

    #[test]
    fn save_overwrites_with_indented_json() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("data.json"));
        let doc = CatalogDocument::new(vec![CategoryRecord {
            category: "VPN".into(),
            applications: vec![ApplicationRecord::new(["wireguard"], ["Snapcrafters"])],
        }]);
        file.save(&CatalogDocument::seed()).unwrap();
        file.save(&doc).unwrap();

        let text = fs::read_to_string(file.path()).unwrap();
        assert!(text.starts_with("{\n    \"linuxCategories\""));
        assert_eq!(file.load().unwrap(), Some(doc));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{ not json").unwrap();
        let err = SnapshotFile::new(&path).load().unwrap_err();
        assert!(matches!(err, CatalogError::Serialization(_)));
    }
}
