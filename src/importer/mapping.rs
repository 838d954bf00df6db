//! Ordered source-to-destination filename table

use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Files imported by default, in sidebar order.
pub const DEFAULT_MAPPING: &[(&str, &str)] = &[
    ("01_quick_start.md", "quickstart.md"),
    ("02_architecture.md", "architecture.md"),
    ("03_folder_structure.md", "folder-structure.md"),
    ("04_api_reference.md", "api-reference.md"),
    ("05_database.md", "database.md"),
    ("06_build_release.md", "build-and-release.md"),
    ("07_env_and_secrets.md", "environment-and-secrets.md"),
    ("08_testing.md", "testing.md"),
    ("09_troubleshooting.md", "troubleshooting.md"),
    ("10_maintenance_and_contrib.md", "maintenance.md"),
    ("11_references.md", "references.md"),
    ("12_security_privacy.md", "security.md"),
    ("13_performance.md", "performance.md"),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("source file {0:?} is mapped more than once")]
    DuplicateSource(String),
}

/// One row of a [`FileMapping`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingEntry {
    pub source: String,
    pub dest: String,
    /// One-based sidebar position
    pub position: usize,
}

impl MappingEntry {
    /// Document id the site generator derives from the destination name
    pub fn doc_id(&self) -> &str {
        Path::new(&self.dest)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.dest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMapping {
    entries: Vec<MappingEntry>,
}

impl FileMapping {
    /// Build a mapping from `(source, dest)` pairs; positions follow the given order.
    pub fn new<S, D>(pairs: impl IntoIterator<Item = (S, D)>) -> Result<Self, MappingError>
    where
        S: Into<String>,
        D: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for (index, (source, dest)) in pairs.into_iter().enumerate() {
            let source = source.into();
            if !seen.insert(source.clone()) {
                return Err(MappingError::DuplicateSource(source));
            }
            entries.push(MappingEntry {
                source,
                dest: dest.into(),
                position: index + 1,
            });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Destination document ids in sidebar order
    pub fn doc_ids(&self) -> Vec<&str> {
        self.entries.iter().map(MappingEntry::doc_id).collect()
    }

    /// One formatted row per entry: position, source, destination, doc id
    pub fn listing(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{:>2}  {:<32} {:<28} {}",
                    entry.position,
                    entry.source,
                    entry.dest,
                    entry.doc_id()
                )
            })
            .collect()
    }
}

impl Default for FileMapping {
    fn default() -> Self {
        // DEFAULT_MAPPING has unique sources; checked by test_default_mapping_is_valid
        Self {
            entries: DEFAULT_MAPPING
                .iter()
                .enumerate()
                .map(|(index, (source, dest))| MappingEntry {
                    source: source.to_string(),
                    dest: dest.to_string(),
                    position: index + 1,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping_is_valid() {
        let checked = FileMapping::new(DEFAULT_MAPPING.iter().copied()).unwrap();
        assert_eq!(checked, FileMapping::default());
        assert_eq!(checked.len(), 13);
    }

    #[test]
    fn test_positions_follow_declared_order() {
        let mapping = FileMapping::new([("z.md", "first.md"), ("a.md", "second.md")]).unwrap();
        assert_eq!(mapping.entries()[0].position, 1);
        assert_eq!(mapping.entries()[0].source, "z.md");
        assert_eq!(mapping.entries()[1].position, 2);
    }

    #[test]
    fn test_duplicate_source_rejected() {
        let err = FileMapping::new([("a.md", "x.md"), ("a.md", "y.md")]).unwrap_err();
        assert_eq!(err, MappingError::DuplicateSource("a.md".to_string()));
    }

    #[test]
    fn test_listing_follows_mapping_order() {
        let mapping = FileMapping::new([("b.md", "zeta.md"), ("a.md", "alpha.md")]).unwrap();
        let rows = mapping.listing();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with(" 1  b.md "));
        assert!(rows[0].ends_with(" zeta"));
        assert!(rows[1].starts_with(" 2  a.md "));
        assert!(rows[1].ends_with(" alpha"));

        let defaults = FileMapping::default().listing();
        assert!(defaults[12].starts_with("13  13_performance.md"));
    }

    #[test]
    fn test_doc_ids() {
        let mapping = FileMapping::default();
        let ids = mapping.doc_ids();
        assert_eq!(ids[0], "quickstart");
        assert_eq!(ids[5], "build-and-release");
        assert_eq!(ids[12], "performance");
    }
}
