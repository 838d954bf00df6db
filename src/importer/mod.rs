//! Markdown importer for the documentation site
//!
//! Copies a fixed, ordered set of project docs into the site generator's
//! docs directory. Each output file gets `sidebar_position` front matter
//! and a few syntax fixes the MDX renderer needs.

mod converter;
mod mapping;
mod options;
mod report;
pub mod transform;

pub use converter::{DocumentRecord, ImportError, MarkdownImporter};
pub use mapping::{FileMapping, MappingEntry, MappingError, DEFAULT_MAPPING};
pub use options::{ExpressionPolicy, ImportOptions};
pub use report::{FileOutcome, FileStatus, ImportReport};
