//! docs-import - Copy project markdown into the documentation site
//!
//! Usage:
//!   docs-import
//!   docs-import --config scripts/docs-import.toml
//!   docs-import --source ../docs --dest docs --expressions outside-code
//!   docs-import --dry-run --report import.txt --report-format text

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser as ClapParser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};

use docs_importer::config::{self, ImportConfig};
use docs_importer::importer::{
    ExpressionPolicy, FileMapping, ImportOptions, ImportReport, MarkdownImporter,
};

#[derive(ValueEnum, Clone, Debug)]
enum ExpressionsArg {
    /// Remove every {...} span, code included
    StripAll,
    /// Keep {...} inside fenced blocks and inline code
    OutsideCode,
}

#[derive(ValueEnum, Clone, Debug)]
enum ReportFormat {
    /// JSON format
    Json,
    /// Human-readable text
    Text,
}

#[derive(ClapParser)]
#[command(
    version,
    about = "Import project markdown into the documentation site",
    long_about = "Copies the mapped markdown files from the source docs directory into the \
                  site's docs directory, adding sidebar_position front matter and fixing \
                  syntax the MDX renderer rejects.\n\n\
                  Relative directories are resolved against the config file's directory, \
                  or the current directory when no config file is given."
)]
struct Cli {
    /// Config file (docs-import.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the source markdown files
    #[arg(short, long, value_name = "DIR")]
    source: Option<PathBuf>,

    /// Directory the site generator reads docs from
    #[arg(short, long, value_name = "DIR")]
    dest: Option<PathBuf>,

    /// Which {...} placeholders to remove
    #[arg(long, value_enum)]
    expressions: Option<ExpressionsArg>,

    /// Show what would be imported without writing
    #[arg(long)]
    dry_run: bool,

    /// Print the file mapping and exit
    #[arg(long)]
    list: bool,

    /// Write an import report
    #[arg(long, value_name = "REPORT_FILE")]
    report: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "json")]
    report_format: ReportFormat,

    /// debug log file
    #[arg(long, value_name = "FILE")]
    debuglogfile: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn init_logger(filter_level: log::LevelFilter, logfile: Option<&Path>) -> anyhow::Result<()> {
    let mut loggers: Vec<Box<dyn simplelog::SharedLogger>> = vec![simplelog::TermLogger::new(
        filter_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )];
    if let Some(filename) = logfile {
        let file = File::create(filename)
            .with_context(|| format!("cannot create log file {}", filename.display()))?;
        loggers.push(simplelog::WriteLogger::new(
            filter_level,
            simplelog::Config::default(),
            file,
        ));
    }
    simplelog::CombinedLogger::init(loggers)?;
    Ok(())
}

fn write_report(report: &ImportReport, path: &Path, format: &ReportFormat) -> anyhow::Result<()> {
    let content = match format {
        ReportFormat::Json => report.to_json()?,
        ReportFormat::Text => report.to_text(),
    };
    fs::write(path, content).with_context(|| format!("cannot write report {}", path.display()))?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logger(args.verbose.log_level_filter(), args.debuglogfile.as_deref())?;

    let mapping = FileMapping::default();
    if args.list {
        for row in mapping.listing() {
            println!("{}", row);
        }
        return Ok(());
    }

    let file_config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => ImportConfig::default(),
    };
    let anchor = config::anchor_dir(args.config.as_deref())?;
    let mut resolved = file_config.resolve(&anchor);
    if let Some(source) = &args.source {
        resolved.source_dir = anchor.join(source);
    }
    if let Some(dest) = &args.dest {
        resolved.dest_dir = anchor.join(dest);
    }
    if let Some(expressions) = &args.expressions {
        resolved.expressions = match expressions {
            ExpressionsArg::StripAll => ExpressionPolicy::StripAll,
            ExpressionsArg::OutsideCode => ExpressionPolicy::OutsideCode,
        };
    }
    log::debug!("Resolved directories: {:?}", resolved);

    let options = ImportOptions::new(resolved.expressions).with_dry_run(args.dry_run);
    let importer = MarkdownImporter::new(mapping, options);

    let report = importer
        .import_dir_with(&resolved.source_dir, &resolved.dest_dir, |outcome| {
            if let Some(line) = outcome.confirmation(args.dry_run) {
                println!("{}", line);
            }
        })
        .with_context(|| {
            format!(
                "import from {} into {} failed",
                resolved.source_dir.display(),
                resolved.dest_dir.display()
            )
        })?;

    if let Some(report_path) = &args.report {
        write_report(&report, report_path, &args.report_format)?;
        eprintln!("✓ Report written to {}", report_path.display());
    }

    Ok(())
}
