//! Batch processing command for multiple statement files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use finstat_core::models::config::FinstatConfig;
use finstat_core::models::statement::StatementData;
use finstat_core::statement::StatementExtractor;

use super::input::{is_supported, load_config, load_pages};
use super::process::{render, write_pages, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Treat every page as its own statement
    #[arg(long)]
    per_page: bool,

    /// Include derived metrics in JSON output
    #[arg(long)]
    metrics: bool,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Extraction output for one input file.
struct FileOutcome {
    pages: usize,
    /// One statement for the whole file, or one per page.
    statements: Vec<StatementData>,
}

impl FileOutcome {
    fn items(&self) -> usize {
        self.statements.iter().map(|s| s.categories.item_count()).sum()
    }

    /// Distinct statement types in page order, joined by ';'.
    fn statement_types(&self) -> String {
        let mut types: Vec<&str> = Vec::new();
        for statement in &self.statements {
            let name = statement.statement_type.as_str();
            if !types.contains(&name) {
                types.push(name);
            }
        }
        types.join(";")
    }
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    outcome: Option<FileOutcome>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = StatementExtractor::from_config(&config)?;
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_file(&path, &extractor, &args, &config);

        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(outcome) => {
                results.push(ProcessResult {
                    path,
                    outcome: Some(outcome),
                    error: None,
                    processing_time_ms,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        outcome: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| r.outcome.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(outcome) = &result.outcome {
                write_outputs(output_dir, &result.path, outcome, &args, &config)?;
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(
    path: &Path,
    extractor: &StatementExtractor,
    args: &BatchArgs,
    config: &FinstatConfig,
) -> anyhow::Result<FileOutcome> {
    let pages = load_pages(path, config)?;

    let statements = if args.per_page {
        extractor.extract_each_page(&pages)
    } else {
        vec![extractor.extract(&pages)]
    };

    Ok(FileOutcome {
        pages: pages.len(),
        statements,
    })
}

/// Write `<stem>.<ext>`, or `<stem>/page_NNN_<table>.<ext>` per page.
fn write_outputs(
    output_dir: &Path,
    input: &Path,
    outcome: &FileOutcome,
    args: &BatchArgs,
    config: &FinstatConfig,
) -> anyhow::Result<()> {
    let output_name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("statement");

    if args.per_page {
        let page_dir = output_dir.join(output_name);
        write_pages(&page_dir, &outcome.statements, args.format, args.metrics, config)?;
        debug!("Wrote {} pages to {}", outcome.statements.len(), page_dir.display());
        return Ok(());
    }

    for data in &outcome.statements {
        let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));
        fs::write(&output_path, render(data, args.format, args.metrics, config)?)?;
        debug!("Wrote output to {}", output_path.display());
    }
    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "statement_type",
        "pages",
        "items",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(outcome) = &result.outcome {
            wtr.write_record([
                filename,
                "success",
                &outcome.statement_types(),
                &outcome.pages.to_string(),
                &outcome.items().to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
