//! Headers command - print the first lines of every page.

use std::path::PathBuf;

use clap::Args;
use console::style;

use finstat_core::source::{page_headers, PageHeader};

use super::input::{load_config, load_pages};

/// Arguments for the headers command.
#[derive(Args)]
pub struct HeadersArgs {
    /// Input file (PDF or form-feed separated text)
    #[arg(required = true)]
    input: PathBuf,

    /// Number of lines to take from each page
    #[arg(short = 'n', long, default_value = "4")]
    lines: usize,

    /// Output CSV file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: HeadersArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let pages = load_pages(&args.input, &config)?;
    let headers = page_headers(&pages, args.lines);

    match &args.output {
        Some(path) => {
            let wtr = csv::Writer::from_path(path)?;
            write_headers(wtr, &headers, args.lines)?;
            println!(
                "{} Wrote headers of {} pages to {}",
                style("✓").green(),
                headers.len(),
                path.display()
            );
        }
        None => {
            let wtr = csv::Writer::from_writer(std::io::stdout());
            write_headers(wtr, &headers, args.lines)?;
        }
    }

    Ok(())
}

/// Write `page,header_1..header_N`; short pages are padded with empty cells.
fn write_headers<W: std::io::Write>(
    mut wtr: csv::Writer<W>,
    headers: &[PageHeader],
    n_lines: usize,
) -> anyhow::Result<()> {
    let mut columns = vec!["page".to_string()];
    columns.extend((1..=n_lines).map(|i| format!("header_{}", i)));
    wtr.write_record(&columns)?;

    for header in headers {
        let mut record = vec![header.page.to_string()];
        record.extend(header.lines.iter().map(|l| l.trim().to_string()));
        record.resize(n_lines + 1, String::new());
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
