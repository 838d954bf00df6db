//! Copies mapped markdown files into the docs directory

use super::mapping::{FileMapping, MappingEntry};
use super::options::{ExpressionPolicy, ImportOptions};
use super::report::{FileOutcome, FileStatus, ImportReport};
use super::transform::render_document;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to create destination directory {path:?}: {source}")]
    CreateDir {
        #[source]
        source: io::Error,
        path: PathBuf,
    },
    #[error("failed to read {path:?}: {source}")]
    Read {
        #[source]
        source: io::Error,
        path: PathBuf,
    },
    #[error("failed to write {path:?}: {source}")]
    Write {
        #[source]
        source: io::Error,
        path: PathBuf,
    },
}

/// One source file on its way to the docs directory
#[derive(Debug)]
pub struct DocumentRecord {
    pub source_path: PathBuf,
    pub dest_path: PathBuf,
    pub raw: String,
    pub transformed: String,
}

impl DocumentRecord {
    /// Read the entry's source file. `Ok(None)` when it does not exist.
    pub fn load(
        entry: &MappingEntry,
        source_dir: &Path,
        dest_dir: &Path,
    ) -> Result<Option<Self>, ImportError> {
        let source_path = source_dir.join(&entry.source);
        if !source_path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&source_path).map_err(|source| ImportError::Read {
            source,
            path: source_path.clone(),
        })?;
        let raw = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                log::warn!(
                    "{} is not valid UTF-8; invalid bytes replaced with U+FFFD",
                    source_path.display()
                );
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        };
        Ok(Some(Self {
            source_path,
            dest_path: dest_dir.join(&entry.dest),
            raw,
            transformed: String::new(),
        }))
    }

    pub fn transform(&mut self, position: usize, expressions: ExpressionPolicy) {
        self.transformed = render_document(position, &self.raw, expressions);
    }

    pub fn write(&self) -> Result<(), ImportError> {
        fs::write(&self.dest_path, &self.transformed).map_err(|source| ImportError::Write {
            source,
            path: self.dest_path.clone(),
        })
    }
}

/// Imports every file of a [`FileMapping`] from one directory into another
pub struct MarkdownImporter {
    mapping: FileMapping,
    options: ImportOptions,
}

impl MarkdownImporter {
    pub fn new(mapping: FileMapping, options: ImportOptions) -> Self {
        Self { mapping, options }
    }

    pub fn mapping(&self) -> &FileMapping {
        &self.mapping
    }

    pub fn import_dir(&self, source_dir: &Path, dest_dir: &Path) -> Result<ImportReport, ImportError> {
        self.import_dir_with(source_dir, dest_dir, |_| {})
    }

    /// Import all mapped files, calling `on_file` after each entry is handled.
    ///
    /// Files are processed one at a time in mapping order. An I/O error
    /// aborts the run; files written before it stay written.
    pub fn import_dir_with(
        &self,
        source_dir: &Path,
        dest_dir: &Path,
        mut on_file: impl FnMut(&FileOutcome),
    ) -> Result<ImportReport, ImportError> {
        let start_time = Instant::now();
        let mut report = ImportReport::new(
            &source_dir.display().to_string(),
            &dest_dir.display().to_string(),
            self.options.expressions,
            self.options.dry_run,
        );

        if !self.options.dry_run && !dest_dir.exists() {
            log::debug!("Creating {}", dest_dir.display());
            fs::create_dir_all(dest_dir).map_err(|source| ImportError::CreateDir {
                source,
                path: dest_dir.to_path_buf(),
            })?;
        }

        for entry in self.mapping.entries() {
            let outcome = match DocumentRecord::load(entry, source_dir, dest_dir)? {
                Some(mut record) => {
                    record.transform(entry.position, self.options.expressions);
                    if !self.options.dry_run {
                        record.write()?;
                    }
                    log::debug!(
                        "{} -> {} ({} bytes)",
                        record.source_path.display(),
                        record.dest_path.display(),
                        record.transformed.len()
                    );
                    FileOutcome {
                        source: entry.source.clone(),
                        dest: entry.dest.clone(),
                        position: entry.position,
                        status: FileStatus::Processed,
                        bytes: record.transformed.len(),
                    }
                }
                None => {
                    log::warn!(
                        "Skipping {}: not found in {}",
                        entry.source,
                        source_dir.display()
                    );
                    FileOutcome {
                        source: entry.source.clone(),
                        dest: entry.dest.clone(),
                        position: entry.position,
                        status: FileStatus::Missing,
                        bytes: 0,
                    }
                }
            };
            on_file(&outcome);
            report.push(outcome);
        }

        report.duration_ms = start_time.elapsed().as_millis() as u64;
        log::info!(
            "Imported {} of {} files into {}",
            report.processed(),
            self.mapping.len(),
            dest_dir.display()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn importer(pairs: &[(&str, &str)]) -> MarkdownImporter {
        MarkdownImporter::new(
            FileMapping::new(pairs.iter().copied()).unwrap(),
            ImportOptions::default(),
        )
    }

    #[test]
    fn test_load_missing_returns_none() {
        let dir = TempDir::new().unwrap();
        let mapping = FileMapping::new([("absent.md", "out.md")]).unwrap();
        let record = DocumentRecord::load(&mapping.entries()[0], dir.path(), dir.path()).unwrap();
        assert!(record.is_none());
    }

    #[test]
    fn test_creates_missing_dest_dir() {
        let src = TempDir::new().unwrap();
        let dest_root = TempDir::new().unwrap();
        let dest = dest_root.path().join("docs");
        std::fs::write(src.path().join("a.md"), "body\n").unwrap();

        importer(&[("a.md", "b.md")]).import_dir(src.path(), &dest).unwrap();

        let written = std::fs::read_to_string(dest.join("b.md")).unwrap();
        assert_eq!(written, "---\nsidebar_position: 1\n---\n\nbody\n");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let src = TempDir::new().unwrap();
        let dest_root = TempDir::new().unwrap();
        let dest = dest_root.path().join("docs");
        std::fs::write(src.path().join("a.md"), "body\n").unwrap();

        let importer = MarkdownImporter::new(
            FileMapping::new([("a.md", "b.md")]).unwrap(),
            ImportOptions::default().with_dry_run(true),
        );
        let report = importer.import_dir(src.path(), &dest).unwrap();

        assert_eq!(report.processed(), 1);
        assert!(report.dry_run);
        assert!(!dest.exists());
    }

    #[test]
    fn test_callback_sees_every_entry() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        std::fs::write(src.path().join("a.md"), "x").unwrap();

        let mut seen = Vec::new();
        importer(&[("a.md", "a-out.md"), ("b.md", "b-out.md")])
            .import_dir_with(src.path(), dest.path(), |o| seen.push((o.dest.clone(), o.status)))
            .unwrap();

        assert_eq!(
            seen,
            vec![
                ("a-out.md".to_string(), FileStatus::Processed),
                ("b-out.md".to_string(), FileStatus::Missing),
            ]
        );
    }

    #[test]
    fn test_load_decodes_invalid_utf8_lossily() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("cafe.md"), b"caf\xe9\n").unwrap();
        let mapping = FileMapping::new([("cafe.md", "out.md")]).unwrap();

        let record = DocumentRecord::load(&mapping.entries()[0], dir.path(), dir.path())
            .unwrap()
            .unwrap();
        assert_eq!(record.raw, "caf\u{FFFD}\n");
    }

    #[test]
    fn test_unreadable_source_is_an_error() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        // a directory where a file is expected exists but cannot be read as text
        std::fs::create_dir(src.path().join("a.md")).unwrap();

        let err = importer(&[("a.md", "b.md")])
            .import_dir(src.path(), dest.path())
            .unwrap_err();
        assert!(matches!(err, ImportError::Read { .. }));
    }
}
