//! `docs-import.toml` loading and directory resolution

use crate::importer::ExpressionPolicy;
use serde::Deserialize;
use std::{env, fs, path::Path, path::PathBuf};
use thiserror::Error;

pub const CONFIG_FILENAME: &str = "docs-import.toml";

const DEFAULT_SOURCE_DIR: &str = "../docs";
const DEFAULT_DEST_DIR: &str = "docs";

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
    /// Relative paths are resolved against the anchor directory
    #[serde(default)]
    pub source_dir: Option<PathBuf>,
    #[serde(default)]
    pub dest_dir: Option<PathBuf>,
    #[serde(default)]
    pub expressions: Option<ExpressionPolicy>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to determine the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    #[error("failed to read config file at {path:?}: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config file at {path:?}: {source}")]
    Parse {
        #[source]
        source: toml::de::Error,
        path: PathBuf,
    },
}

/// Directories and policy after defaults and overrides are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub anchor: PathBuf,
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub expressions: ExpressionPolicy,
}

pub fn load_config(path: &Path) -> Result<ImportConfig, ConfigError> {
    let config_text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        source,
        path: path.to_path_buf(),
    })?;

    toml::from_str(&config_text).map_err(|source| ConfigError::Parse {
        source,
        path: path.to_path_buf(),
    })
}

/// The config file's directory, or the current directory without one.
pub fn anchor_dir(config_path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(parent) = config_path.and_then(Path::parent) {
        if !parent.as_os_str().is_empty() {
            return Ok(parent.to_path_buf());
        }
    }
    env::current_dir().map_err(ConfigError::CurrentDir)
}

impl ImportConfig {
    pub fn resolve(&self, anchor: &Path) -> ResolvedPaths {
        let source = self
            .source_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR));
        let dest = self
            .dest_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DEST_DIR));
        ResolvedPaths {
            anchor: anchor.to_path_buf(),
            source_dir: anchor.join(source),
            dest_dir: anchor.join(dest),
            expressions: self.expressions.unwrap_or_default(),
        }
    }
}
