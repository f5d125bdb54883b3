//! # Section Stores
//!
//! The lookup the exporter depends on, plus two simple implementations:
//! an in-memory store used by tests and a store loaded from a JSON file.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::errors::{StoreError, StoreResult};
use super::types::ConvertedSection;

/// Lookup of course sections by quarter
pub trait SectionStore: Send + Sync + std::fmt::Debug {
    /// Return every section of `quarter`, in store order.
    ///
    /// An unknown quarter yields an empty list, not an error.
    fn find_by_quarter(&self, quarter: &str) -> StoreResult<Vec<ConvertedSection>>;
}

/// In-memory section store
#[derive(Debug, Default)]
pub struct MemorySectionStore {
    by_quarter: HashMap<String, Vec<ConvertedSection>>,
}

impl MemorySectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from documents, grouping them by quarter
    pub fn from_sections(sections: impl IntoIterator<Item = ConvertedSection>) -> Self {
        let mut store = Self::new();
        for section in sections {
            store.insert(section);
        }
        store
    }

    pub fn insert(&mut self, section: ConvertedSection) {
        self.by_quarter
            .entry(section.course_info.quarter.clone())
            .or_default()
            .push(section);
    }

    pub fn len(&self) -> usize {
        self.by_quarter.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SectionStore for MemorySectionStore {
    fn find_by_quarter(&self, quarter: &str) -> StoreResult<Vec<ConvertedSection>> {
        Ok(self.by_quarter.get(quarter).cloned().unwrap_or_default())
    }
}

/// Section store backed by a JSON array of section documents
///
/// The file is read once when the store is opened.
#[derive(Debug)]
pub struct JsonFileSectionStore {
    path: PathBuf,
    inner: MemorySectionStore,
}

impl JsonFileSectionStore {
    pub fn open(path: &Path) -> StoreResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            StoreError::Unavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        let sections: Vec<ConvertedSection> = serde_json::from_str(&content)?;

        debug!(path = %path.display(), sections = sections.len(), "loaded section documents");

        Ok(Self {
            path: path.to_path_buf(),
            inner: MemorySectionStore::from_sections(sections),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl SectionStore for JsonFileSectionStore {
    fn find_by_quarter(&self, quarter: &str) -> StoreResult<Vec<ConvertedSection>> {
        validate_quarter(quarter)?;
        self.inner.find_by_quarter(quarter)
    }
}

/// Check that `quarter` is in yyyyq form with q in 1..=4
pub fn validate_quarter(quarter: &str) -> StoreResult<()> {
    static YYYYQ: OnceLock<Regex> = OnceLock::new();
    let re = YYYYQ.get_or_init(|| Regex::new(r"^[0-9]{4}[1-4]$").expect("static regex"));

    if re.is_match(quarter) {
        Ok(())
    } else {
        Err(StoreError::InvalidQuarter(quarter.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::types::{CourseInfo, Section};
    use std::io::Write;

    fn section(quarter: &str, enroll_code: &str) -> ConvertedSection {
        ConvertedSection {
            course_info: CourseInfo {
                quarter: quarter.into(),
                course_id: "CMPSC 156".into(),
                title: "ADV APP PROGRAM".into(),
                ..Default::default()
            },
            section: Section {
                enroll_code: enroll_code.into(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_memory_store_preserves_insertion_order() {
        let store = MemorySectionStore::from_sections(vec![
            section("20252", "003"),
            section("20251", "999"),
            section("20252", "001"),
        ]);

        let found = store.find_by_quarter("20252").unwrap();
        let codes: Vec<_> = found.iter().map(|s| s.section.enroll_code.as_str()).collect();
        assert_eq!(codes, vec!["003", "001"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_memory_store_unknown_quarter_is_empty() {
        let store = MemorySectionStore::new();
        assert!(store.find_by_quarter("20244").unwrap().is_empty());
    }

    #[test]
    fn test_validate_quarter() {
        assert!(validate_quarter("20252").is_ok());
        assert!(validate_quarter("20244").is_ok());
        assert!(validate_quarter("20255").is_err());
        assert!(validate_quarter("2025").is_err());
        assert!(validate_quarter("W25").is_err());
        assert!(validate_quarter("").is_err());
    }

    #[test]
    fn test_json_file_store_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let docs = vec![section("20252", "08078"), section("20244", "12345")];
        write!(file, "{}", serde_json::to_string(&docs).unwrap()).unwrap();

        let store = JsonFileSectionStore::open(file.path()).unwrap();
        assert_eq!(store.path(), file.path());
        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_quarter("20252").unwrap().len(), 1);
        assert!(matches!(
            store.find_by_quarter("bogus"),
            Err(StoreError::InvalidQuarter(_))
        ));
    }

    #[test]
    fn test_json_file_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonFileSectionStore::open(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn test_json_file_store_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let err = JsonFileSectionStore::open(file.path()).unwrap_err();
        assert!(matches!(err, StoreError::ParseError(_)));
    }
}
