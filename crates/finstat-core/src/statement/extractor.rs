//! Statement extraction: detect the layout once, then run the layout's
//! section and summary-line tables over every page.

use regex::Regex;
use tracing::{debug, info};

use crate::error::{FinstatError, Result};
use crate::models::config::{FinstatConfig, LayoutConfig, LayoutsConfig};
use crate::models::statement::{CategoryMap, StatementData, StatementType};
use crate::source::PageSource;

use super::rules::{
    extract_section, find_summary_line, BalanceItemParser, LineItemParser, SectionParser,
    StatementTypeDetector,
};

/// Extracts category-keyed line items from the pages of a statement.
#[derive(Debug, Clone)]
pub struct StatementExtractor {
    detector: StatementTypeDetector,
    layouts: LayoutsConfig,
    balance_parser: BalanceItemParser,
}

impl StatementExtractor {
    /// Create an extractor with the default layout tables.
    pub fn new() -> Self {
        Self {
            detector: StatementTypeDetector::default(),
            layouts: LayoutsConfig::default(),
            balance_parser: BalanceItemParser::new(),
        }
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &FinstatConfig) -> Result<Self> {
        let label_prefix = Regex::new(&config.layouts.balance_label_prefix).map_err(|e| {
            FinstatError::Config(format!(
                "invalid balance_label_prefix {:?}: {}",
                config.layouts.balance_label_prefix, e
            ))
        })?;

        Ok(Self {
            detector: StatementTypeDetector::new(config.detection.clone()),
            layouts: config.layouts.clone(),
            balance_parser: BalanceItemParser::new().with_label_prefix(label_prefix),
        })
    }

    /// Detect the statement type of a whole document.
    pub fn detect<S: AsRef<str>>(&self, pages: &[S]) -> StatementType {
        let mut full_text = String::new();
        for page in pages {
            full_text.push_str(page.as_ref());
            full_text.push('\n');
        }
        self.detector.detect(&full_text)
    }

    /// Detect the document type and extract every page into one result.
    pub fn extract<S: AsRef<str>>(&self, pages: &[S]) -> StatementData {
        let statement_type = self.detect(pages);
        info!("Extracting {} pages as {}", pages.len(), statement_type);
        self.extract_as(statement_type, pages)
    }

    /// Extract every page with a known statement type.
    ///
    /// Pages are merged in order; an item name seen on a later page replaces
    /// the earlier record.
    pub fn extract_as<S: AsRef<str>>(
        &self,
        statement_type: StatementType,
        pages: &[S],
    ) -> StatementData {
        let layout = self.layouts.for_type(statement_type);
        let mut categories = CategoryMap::with_categories(layout.categories.iter().cloned());

        for (idx, page) in pages.iter().enumerate() {
            let page_items = self.extract_page(statement_type, page.as_ref());
            debug!("Page {}: {} line items", idx + 1, page_items.item_count());
            categories.merge(page_items);
        }

        StatementData::new(statement_type, categories)
    }

    /// Extract a single page with a known statement type.
    pub fn extract_page(&self, statement_type: StatementType, text: &str) -> CategoryMap {
        let layout = self.layouts.for_type(statement_type);
        let mut categories = CategoryMap::with_categories(layout.categories.iter().cloned());

        match statement_type.column_layout() {
            Some(columns) => {
                let parser = LineItemParser::new(columns);
                parse_sections(&parser, layout, text, &mut categories);

                for rule in &layout.summary_lines {
                    match find_summary_line(text, &rule.identifier, columns) {
                        Some(record) => {
                            categories.category_mut(&rule.category).insert(&rule.item, record);
                        }
                        None => debug!("Summary line {:?} not on page", rule.identifier),
                    }
                }
            }
            None => parse_sections(&self.balance_parser, layout, text, &mut categories),
        }

        categories
    }

    /// Treat every page as its own document.
    pub fn extract_each_page<S: AsRef<str>>(&self, pages: &[S]) -> Vec<StatementData> {
        pages
            .iter()
            .map(|page| self.extract(std::slice::from_ref(page)))
            .collect()
    }

    /// Read pages from a collaborator and extract them as one document.
    ///
    /// Only a failure of the page source is an error.
    pub fn extract_from_source(&self, source: &impl PageSource) -> Result<StatementData> {
        let pages = source.page_texts()?;
        Ok(self.extract(&pages))
    }
}

impl Default for StatementExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_sections(
    parser: &dyn SectionParser,
    layout: &LayoutConfig,
    text: &str,
    categories: &mut CategoryMap,
) {
    for rule in &layout.sections {
        let section = extract_section(text, &rule.start, &rule.end);
        if section.is_empty() {
            continue;
        }

        let items = parser.parse_section(section);
        debug!(
            "Section {:?} ({} bytes): {} items",
            rule.category,
            section.len(),
            items.len()
        );
        categories.category_mut(&rule.category).merge(items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::statement::{LineItemRecord, OperatingRecord};
    use crate::source::TextPages;
    use pretty_assertions::assert_eq;

    const OPERATING_PAGE: &str = "\
Armed Forces Recreation Machine Program
Operating Results - Actual vs Budget
                            March                           Year to Date
                  Actual    Budget   Variance     Actual     Budget    Variance
Revenue
Gaming Machine Revenue   125,000.00  100,000.00  25,000.00-  980,000 900,000 80,000-
Other Revenue                 500.00      400.00     100.00    4,000   3,000  1,000
Direct NAFI Reimbursement
Club Commissions           2,000.00    2,500.00     500.00   18,000  20,000  2,000
Net Revenue              123,500.00   97,900.00  25,600.00  966,000 883,000 83,000
Operating Expenses
Salaries                  40,000.00   42,000.00   2,000.00  330,000 336,000  6,000
Repairs                    1,000.00        0.00   1,000.00-   9,000       0  9,000-
Total Operating Expenses  41,000.00   42,000.00   1,000.00  339,000 336,000  3,000-
Net Operating Income      82,500.00   55,900.00  26,600.00  627,000 547,000 80,000
Interest Revenue             100.00      100.00       0.00      800     800      0
Net Income/(Loss)         82,600.00   56,000.00  26,600.00  627,800 547,800 80,000
";

    fn operating(values: [f64; 6]) -> LineItemRecord {
        LineItemRecord::Operating(OperatingRecord {
            march_actual: values[0],
            march_budget: values[1],
            march_variance: values[2],
            ytd_actual: values[3],
            ytd_budget: values[4],
            ytd_variance: values[5],
        })
    }

    #[test]
    fn test_extract_operating_results() {
        let data = StatementExtractor::new().extract(&[OPERATING_PAGE]);
        let cats = &data.categories;

        assert_eq!(data.statement_type, StatementType::OperatingResults);
        assert_eq!(
            cats.item("revenue", "Gaming Machine Revenue"),
            Some(&operating([125000.0, 100000.0, -25000.0, 980000.0, 900000.0, -80000.0]))
        );
        assert!(cats.item("direct_reimbursement", "Club Commissions").is_some());
        assert_eq!(
            cats.item("operating_expenses", "Repairs"),
            Some(&operating([1000.0, 0.0, -1000.0, 9000.0, 0.0, -9000.0]))
        );
        assert!(cats.item("net_revenue", "Net Revenue").is_some());
        assert!(cats.item("net_operating_income", "Net Operating Income").is_some());
        assert!(cats.item("other_income", "Interest Revenue").is_some());
        assert_eq!(
            cats.item("net_income", "Net Income"),
            Some(&operating([82600.0, 56000.0, 26600.0, 627800.0, 547800.0, 80000.0]))
        );
        assert!(cats.get("distributions").unwrap().is_empty());
    }

    #[test]
    fn test_category_order_is_fixed() {
        let data = StatementExtractor::new().extract(&[OPERATING_PAGE]);
        let names: Vec<&str> = data.categories.iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec![
                "revenue",
                "direct_reimbursement",
                "net_revenue",
                "operating_expenses",
                "net_operating_income",
                "other_income",
                "net_income",
                "distributions",
            ]
        );
    }

    #[test]
    fn test_later_page_overwrites_item() {
        let page1 = "Branch of Service\nRevenue\nSlots 10 5 3 2\nBingo 4 2 1 1\nDirect NAFI\n";
        let page2 = "Branch of Service\nRevenue\nSlots 20 10 6 4\nDirect NAFI\n";

        let data = StatementExtractor::new().extract(&[page1, page2]);
        let revenue = data.categories.get("revenue").unwrap();

        assert_eq!(data.statement_type, StatementType::BranchBreakdown);
        assert_eq!(revenue.len(), 2);
        assert_eq!(revenue.get("Slots").unwrap().as_branch().unwrap().armp_total, 20.0);
        assert_eq!(revenue.get("Bingo").unwrap().as_branch().unwrap().armp_total, 4.0);
    }

    #[test]
    fn test_extract_balance_sheet() {
        let page = "\
Statement of Financial Condition
ASSETS
Cash--Operating Fund          12,345.67
Less Allowance for Losses        500.00-
LIABILITIES
Accounts Payable               2,000.00
EQUITY
Retained Earnings              9,845.67
TOTAL LIABILITIES AND EQUITY  11,845.67
";
        let data = StatementExtractor::new().extract(&[page]);
        let cats = &data.categories;

        assert_eq!(data.statement_type, StatementType::BalanceSheet);
        assert_eq!(
            cats.item("assets", "Operating Fund")
                .and_then(|r| r.as_balance())
                .map(|r| r.amount),
            Some(12345.67)
        );
        assert_eq!(
            cats.item("assets", "Allowance for Losses")
                .and_then(|r| r.as_balance())
                .map(|r| r.amount),
            Some(-500.0)
        );
        assert!(cats.item("liabilities", "Accounts Payable").is_some());
        assert!(cats.item("equity", "Retained Earnings").is_some());
        assert!(cats.item("equity", "TOTAL LIABILITIES AND EQUITY").is_none());
    }

    #[test]
    fn test_unknown_document_yields_placeholder() {
        let data = StatementExtractor::new().extract(&["Cover page\nTotal 1 2 3 4 5 6"]);

        assert_eq!(data.statement_type, StatementType::Unknown);
        let names: Vec<&str> = data.categories.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["unknown_data"]);
        assert!(data.categories.is_empty());
    }

    #[test]
    fn test_empty_page_yields_empty_categories() {
        let extractor = StatementExtractor::new();
        for statement_type in [
            StatementType::BranchBreakdown,
            StatementType::OperatingResults,
            StatementType::BalanceSheet,
        ] {
            let data = extractor.extract_as(statement_type, &[""]);
            assert!(data.categories.is_empty());
            assert!(data.categories.iter().count() > 0);
        }
    }

    #[test]
    fn test_extract_each_page_detects_independently() {
        let pages = ["Branch of Service\nRevenue\nSlots 10 5 3 2\n", "Cover page"];
        let results = StatementExtractor::new().extract_each_page(&pages);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].statement_type, StatementType::BranchBreakdown);
        assert_eq!(results[1].statement_type, StatementType::Unknown);
    }

    #[test]
    fn test_extract_from_text_source() {
        let source = TextPages::new(format!("{}\u{000c}", OPERATING_PAGE));
        let data = StatementExtractor::new().extract_from_source(&source).unwrap();
        assert_eq!(data.categories.get("revenue").unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_prefix_regex_is_config_error() {
        let mut config = FinstatConfig::default();
        config.layouts.balance_label_prefix = "(unclosed".to_string();

        assert!(matches!(
            StatementExtractor::from_config(&config),
            Err(FinstatError::Config(_))
        ));
    }
}
