//! Per-run import report

use super::options::ExpressionPolicy;
use serde::Serialize;

/// Outcome for one mapping entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Transformed and written (or would have been, in a dry run)
    Processed,
    /// Source file not found; nothing written
    Missing,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::Processed => write!(f, "processed"),
            FileStatus::Missing => write!(f, "missing"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub source: String,
    pub dest: String,
    pub position: usize,
    pub status: FileStatus,
    /// Bytes written, zero when missing
    pub bytes: usize,
}

impl FileOutcome {
    /// Console line for a handled file; `None` for missing sources.
    pub fn confirmation(&self, dry_run: bool) -> Option<String> {
        if self.status != FileStatus::Processed {
            return None;
        }
        let verb = if dry_run { "Would process" } else { "Processed" };
        Some(format!("{}: {} -> {}", verb, self.source, self.dest))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub source_dir: String,
    pub dest_dir: String,
    pub expressions: ExpressionPolicy,
    pub dry_run: bool,
    pub timestamp: String,
    pub duration_ms: u64,
    pub files: Vec<FileOutcome>,
}

impl ImportReport {
    pub fn new(source_dir: &str, dest_dir: &str, expressions: ExpressionPolicy, dry_run: bool) -> Self {
        Self {
            source_dir: source_dir.to_string(),
            dest_dir: dest_dir.to_string(),
            expressions,
            dry_run,
            timestamp: chrono::Utc::now().to_rfc3339(),
            duration_ms: 0,
            files: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: FileOutcome) {
        self.files.push(outcome);
    }

    pub fn processed(&self) -> usize {
        self.count(FileStatus::Processed)
    }

    pub fn missing(&self) -> usize {
        self.count(FileStatus::Missing)
    }

    fn count(&self, status: FileStatus) -> usize {
        self.files.iter().filter(|f| f.status == status).count()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert to human-readable text format
    pub fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str("Docs Import Report\n");
        output.push_str("==================\n");
        output.push_str(&format!("Source:      {}\n", self.source_dir));
        output.push_str(&format!("Destination: {}\n", self.dest_dir));
        output.push_str(&format!("Expressions: {}\n", self.expressions));
        output.push_str(&format!("Date:        {}\n", self.timestamp));
        output.push_str(&format!("Time:        {}ms\n\n", self.duration_ms));

        output.push_str("Files\n");
        output.push_str("-----\n");
        for file in &self.files {
            let icon = match file.status {
                FileStatus::Processed => "✓",
                FileStatus::Missing => "⚠",
            };
            output.push_str(&format!(
                "{} {:>2}. {} -> {} ({})\n",
                icon, file.position, file.source, file.dest, file.status
            ));
        }
        output.push('\n');

        output.push_str("Result\n");
        output.push_str("------\n");
        output.push_str(&format!(
            "{} processed, {} missing\n",
            self.processed(),
            self.missing()
        ));
        if self.dry_run {
            output.push_str("ℹ Dry run - no files were written\n");
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ImportReport {
        let mut report = ImportReport::new("../docs", "docs", ExpressionPolicy::StripAll, false);
        report.push(FileOutcome {
            source: "01_quick_start.md".to_string(),
            dest: "quickstart.md".to_string(),
            position: 1,
            status: FileStatus::Processed,
            bytes: 42,
        });
        report.push(FileOutcome {
            source: "02_architecture.md".to_string(),
            dest: "architecture.md".to_string(),
            position: 2,
            status: FileStatus::Missing,
            bytes: 0,
        });
        report
    }

    #[test]
    fn test_confirmation_lines() {
        let report = sample();
        assert_eq!(
            report.files[0].confirmation(false).as_deref(),
            Some("Processed: 01_quick_start.md -> quickstart.md")
        );
        assert_eq!(
            report.files[0].confirmation(true).as_deref(),
            Some("Would process: 01_quick_start.md -> quickstart.md")
        );
        assert_eq!(report.files[1].confirmation(false), None);
    }

    #[test]
    fn test_counts() {
        let report = sample();
        assert_eq!(report.processed(), 1);
        assert_eq!(report.missing(), 1);
    }

    #[test]
    fn test_report_to_json() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"expressions\": \"strip-all\""));
        assert!(json.contains("\"status\": \"missing\""));
    }

    #[test]
    fn test_report_to_text() {
        let text = sample().to_text();
        assert!(text.contains("Docs Import Report"));
        assert!(text.contains("✓  1. 01_quick_start.md -> quickstart.md (processed)"));
        assert!(text.contains("⚠  2. 02_architecture.md -> architecture.md (missing)"));
        assert!(text.contains("1 processed, 1 missing"));
        assert!(!text.contains("Dry run"));
    }
}
