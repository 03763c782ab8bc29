//! Process command - extract line items from a single statement.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use finstat_core::models::config::FinstatConfig;
use finstat_core::models::statement::StatementData;
use finstat_core::statement::{
    derived_metrics, to_table, ReportFormatter, StatementExtractor, StatementTable,
};

use super::input::{load_config, load_pages};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or form-feed separated text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file, or output directory with --per-page (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Treat every page as its own statement
    #[arg(long)]
    per_page: bool,

    /// Include derived metrics in JSON output
    #[arg(long)]
    metrics: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Loading pages...");
    pb.set_position(10);
    let pages = load_pages(&args.input, &config)?;

    pb.set_message("Extracting line items...");
    pb.set_position(50);
    let extractor = StatementExtractor::from_config(&config)?;

    if args.per_page {
        let statements = extractor.extract_each_page(&pages);
        pb.finish_and_clear();
        write_per_page(&args, &config, &statements)?;
    } else {
        let data = extractor.extract(&pages);
        pb.finish_and_clear();

        let output = render(&data, args.format, args.metrics, &config)?;
        if let Some(output_path) = &args.output {
            fs::write(output_path, &output)?;
            println!(
                "{} Output written to {}",
                style("✓").green(),
                output_path.display()
            );
        } else {
            print!("{}", output);
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn write_per_page(
    args: &ProcessArgs,
    config: &FinstatConfig,
    statements: &[StatementData],
) -> anyhow::Result<()> {
    match &args.output {
        Some(output_dir) => {
            let written = write_pages(output_dir, statements, args.format, args.metrics, config)?;
            println!(
                "{} Wrote {} files to {}",
                style("✓").green(),
                written.len(),
                output_dir.display()
            );
        }
        None => {
            for (idx, data) in statements.iter().enumerate() {
                println!("==> page {:03} ({}) <==", idx + 1, data.statement_type);
                print!("{}", render(data, args.format, args.metrics, config)?);
            }
        }
    }
    Ok(())
}

/// Write one file per page, named `page_NNN_<table>.<ext>`.
pub fn write_pages(
    output_dir: &Path,
    statements: &[StatementData],
    format: OutputFormat,
    metrics: bool,
    config: &FinstatConfig,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(statements.len());
    for (idx, data) in statements.iter().enumerate() {
        let table = to_table(data);
        let path = output_dir.join(format!(
            "page_{:03}_{}.{}",
            idx + 1,
            table.name(),
            format.extension()
        ));
        fs::write(&path, render(data, format, metrics, config)?)?;
        debug!("Saved {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Render extracted data in the requested format.
pub fn render(
    data: &StatementData,
    format: OutputFormat,
    metrics: bool,
    config: &FinstatConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(data, metrics),
        OutputFormat::Csv => format_csv(&to_table(data)),
        OutputFormat::Text => Ok(ReportFormatter::from_config(config).format(data)),
    }
}

fn format_json(data: &StatementData, metrics: bool) -> anyhow::Result<String> {
    let mut value = serde_json::to_value(data)?;
    if metrics {
        if let Some(obj) = value.as_object_mut() {
            obj.insert("metrics".to_string(), serde_json::to_value(derived_metrics(data))?);
        }
    }
    let mut output = serde_json::to_string_pretty(&value)?;
    output.push('\n');
    Ok(output)
}

/// Serialize the table rows, one CSV record per line item.
pub fn format_csv(table: &StatementTable) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    match table {
        StatementTable::OperatingResults(rows) => {
            for row in rows {
                wtr.serialize(row)?;
            }
        }
        StatementTable::BranchBreakdown(rows) => {
            for row in rows {
                wtr.serialize(row)?;
            }
        }
        StatementTable::BalanceSheet(rows) => {
            for row in rows {
                wtr.serialize(row)?;
            }
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}
