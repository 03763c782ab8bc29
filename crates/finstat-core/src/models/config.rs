//! Configuration structures for the extraction pipeline.
//!
//! The marker and identifier tables of every statement layout live here as
//! data, so a new layout is a configuration change rather than a new
//! pipeline branch.

use serde::{Deserialize, Serialize};

use crate::models::statement::StatementType;

/// Main configuration for the finstat pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinstatConfig {
    /// Statement type detection markers.
    pub detection: DetectionConfig,

    /// Section and summary-line tables per statement type.
    pub layouts: LayoutsConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Text report configuration.
    pub report: ReportConfig,
}

/// Marker phrases used to classify a document, checked in field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub branch_breakdown: String,
    pub operating_results: String,
    pub balance_sheet: String,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            branch_breakdown: "Branch of Service".to_string(),
            operating_results: "Actual vs Budget".to_string(),
            balance_sheet: "Statement of Financial Condition".to_string(),
        }
    }
}

impl DetectionConfig {
    /// Markers paired with their statement type, in priority order.
    pub fn markers(&self) -> [(&str, StatementType); 3] {
        [
            (self.branch_breakdown.as_str(), StatementType::BranchBreakdown),
            (self.operating_results.as_str(), StatementType::OperatingResults),
            (self.balance_sheet.as_str(), StatementType::BalanceSheet),
        ]
    }
}

/// A section of page text bounded by two marker phrases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRule {
    /// Category the section's items are stored under.
    pub category: String,
    /// Phrase opening the section.
    pub start: String,
    /// Phrase closing the section, searched after `start`.
    pub end: String,
}

/// A singleton named line located anywhere on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRule {
    /// Category the line is stored under.
    pub category: String,
    /// Substring identifying the line.
    pub identifier: String,
    /// Item name the parsed line is stored as.
    pub item: String,
}

/// Extraction tables for one statement layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Categories present in the output, in order, even when empty.
    pub categories: Vec<String>,
    /// Sections parsed for bulk line items.
    pub sections: Vec<SectionRule>,
    /// Named summary lines.
    pub summary_lines: Vec<SummaryRule>,
}

impl LayoutConfig {
    /// Layout shared by the branch breakdown and operating results statements.
    pub fn income_statement() -> Self {
        let section = |category: &str, start: &str, end: &str| SectionRule {
            category: category.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        };
        let summary = |category: &str, identifier: &str, item: &str| SummaryRule {
            category: category.to_string(),
            identifier: identifier.to_string(),
            item: item.to_string(),
        };

        Self {
            categories: [
                "revenue",
                "direct_reimbursement",
                "net_revenue",
                "operating_expenses",
                "net_operating_income",
                "other_income",
                "net_income",
                "distributions",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            sections: vec![
                section("revenue", "Revenue", "Direct NAFI"),
                section("direct_reimbursement", "Direct NAFI", "Net Revenue"),
                section("operating_expenses", "Operating Expenses", "Total Operating Expenses"),
            ],
            summary_lines: vec![
                summary("net_revenue", "Net Revenue", "Net Revenue"),
                summary("net_operating_income", "Net Operating Income", "Net Operating Income"),
                summary("other_income", "Interest Revenue", "Interest Revenue"),
                summary("net_income", "Net Income/(Loss)", "Net Income"),
            ],
        }
    }

    /// Statement of financial condition layout.
    pub fn balance_sheet() -> Self {
        let section = |category: &str, start: &str, end: &str| SectionRule {
            category: category.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        };

        Self {
            categories: vec!["assets".to_string(), "liabilities".to_string(), "equity".to_string()],
            sections: vec![
                section("assets", "ASSETS", "LIABILITIES"),
                section("liabilities", "LIABILITIES", "EQUITY"),
                section("equity", "EQUITY", "TOTAL LIABILITIES"),
            ],
            summary_lines: Vec::new(),
        }
    }

    /// Placeholder layout for documents of unknown type.
    pub fn unknown() -> Self {
        Self {
            categories: vec!["unknown_data".to_string()],
            sections: Vec::new(),
            summary_lines: Vec::new(),
        }
    }
}

/// Layout tables for every statement type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutsConfig {
    pub branch_breakdown: LayoutConfig,
    pub operating_results: LayoutConfig,
    pub balance_sheet: LayoutConfig,
    pub unknown: LayoutConfig,

    /// Regex of label prefixes stripped from balance-sheet item names.
    pub balance_label_prefix: String,
}

impl Default for LayoutsConfig {
    fn default() -> Self {
        Self {
            branch_breakdown: LayoutConfig::income_statement(),
            operating_results: LayoutConfig::income_statement(),
            balance_sheet: LayoutConfig::balance_sheet(),
            unknown: LayoutConfig::unknown(),
            balance_label_prefix: r"^(Cash--|Less\s+)".to_string(),
        }
    }
}

impl LayoutsConfig {
    /// Tables for the given statement type.
    pub fn for_type(&self, statement_type: StatementType) -> &LayoutConfig {
        match statement_type {
            StatementType::BranchBreakdown => &self.branch_breakdown,
            StatementType::OperatingResults => &self.operating_results,
            StatementType::BalanceSheet => &self.balance_sheet,
            StatementType::Unknown => &self.unknown,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,

    /// Minimum text length to consider a PDF as text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            min_text_length: 50,
        }
    }
}

/// Text report configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Number of expense lines listed under the top variances heading.
    pub top_expense_variances: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_expense_variances: 5,
        }
    }
}

impl FinstatConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FinstatError;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: FinstatConfig =
            serde_json::from_str(r#"{"report": {"top_expense_variances": 3}}"#).unwrap();

        assert_eq!(config.report.top_expense_variances, 3);
        assert_eq!(config.detection, DetectionConfig::default());
        assert_eq!(config.layouts.balance_sheet.sections.len(), 3);
    }

    #[test]
    fn test_config_file_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let mut config = FinstatConfig::default();
        config.pdf.max_pages = 12;
        config.save(&path).unwrap();

        let loaded = FinstatConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_malformed_config_is_json_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{\"report\": ").unwrap();

        let err = FinstatConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, FinstatError::Json(_)));
    }

    #[test]
    fn test_missing_config_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();

        let err = FinstatConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, FinstatError::Io(_)));
    }

    #[test]
    fn test_net_income_stored_under_short_name() {
        let layout = LayoutConfig::income_statement();
        let rule = layout
            .summary_lines
            .iter()
            .find(|r| r.identifier == "Net Income/(Loss)")
            .unwrap();
        assert_eq!(rule.category, "net_income");
        assert_eq!(rule.item, "Net Income");
    }
}
