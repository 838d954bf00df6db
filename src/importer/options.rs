//! Import options

use serde::{Deserialize, Serialize};

/// Which `{...}` placeholders are removed from imported documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpressionPolicy {
    /// Remove every brace-delimited span, code included
    #[default]
    StripAll,
    /// Remove spans in prose only; fenced blocks and inline code keep their braces
    OutsideCode,
}

impl std::fmt::Display for ExpressionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpressionPolicy::StripAll => write!(f, "strip-all"),
            ExpressionPolicy::OutsideCode => write!(f, "outside-code"),
        }
    }
}

/// Options for a docs import run
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub expressions: ExpressionPolicy,
    /// Transform in memory without touching the destination directory
    pub dry_run: bool,
}

impl ImportOptions {
    pub fn new(expressions: ExpressionPolicy) -> Self {
        Self {
            expressions,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_display() {
        assert_eq!(ExpressionPolicy::StripAll.to_string(), "strip-all");
        assert_eq!(ExpressionPolicy::OutsideCode.to_string(), "outside-code");
    }

    #[test]
    fn test_default_options() {
        let opts = ImportOptions::default();
        assert_eq!(opts.expressions, ExpressionPolicy::StripAll);
        assert!(!opts.dry_run);
    }

    #[test]
    fn test_options_builder() {
        let opts = ImportOptions::new(ExpressionPolicy::OutsideCode).with_dry_run(true);
        assert_eq!(opts.expressions, ExpressionPolicy::OutsideCode);
        assert!(opts.dry_run);
    }
}
