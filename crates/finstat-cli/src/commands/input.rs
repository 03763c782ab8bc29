//! Loading configuration and page texts for the commands.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use finstat_core::models::config::FinstatConfig;
use finstat_core::pdf::{PdfExtractor, PdfProcessor, PdfType};
use finstat_core::source::{PageSource, TextPages};

/// Extensions accepted as statement input.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["pdf", "txt"];

/// Per-user configuration file, used when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("finstat")
        .join("config.json")
}

/// Load the configuration named by `--config`, else the per-user file if
/// present, else the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FinstatConfig> {
    let path = match config_path {
        Some(path) => PathBuf::from(path),
        None => {
            let path = default_config_path();
            if !path.exists() {
                debug!("No config file at {}, using defaults", path.display());
                return Ok(FinstatConfig::default());
            }
            path
        }
    };

    debug!("Loading config from {}", path.display());
    Ok(FinstatConfig::from_file(&path)?)
}

/// Lowercased file extension, empty when there is none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

pub fn is_supported(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension_of(path).as_str())
}

/// Read the ordered page texts of a PDF or form-feed separated text file.
pub fn load_pages(path: &Path, config: &FinstatConfig) -> anyhow::Result<Vec<String>> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let pages = match extension_of(path).as_str() {
        "pdf" => load_pdf_pages(path, config)?,
        "txt" => TextPages::from_file(path)?.page_texts()?,
        other => anyhow::bail!("Unsupported file format: {}", other),
    };

    if pages.is_empty() {
        anyhow::bail!("No pages found in {}", path.display());
    }

    debug!("Loaded {} pages from {}", pages.len(), path.display());
    Ok(pages)
}

fn load_pdf_pages(path: &Path, config: &FinstatConfig) -> anyhow::Result<Vec<String>> {
    let data = fs::read(path)?;
    let mut extractor = PdfExtractor::new()
        .with_max_pages(config.pdf.max_pages)
        .with_min_text_length(config.pdf.min_text_length);
    extractor.load(&data)?;

    debug!("PDF has {} pages", extractor.page_count());

    let content = extractor.extract_all()?;
    if content.pdf_type == PdfType::Empty {
        anyhow::bail!("PDF has no extractable text: {}", path.display());
    }

    Ok(content.pages.into_iter().map(|page| page.text).collect())
}
