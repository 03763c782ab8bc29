//! Rule-based line parsers for fixed-layout statement text.

pub mod amounts;
pub mod balance;
pub mod detect;
pub mod line_items;
pub mod patterns;
pub mod sections;
pub mod summary;

pub use amounts::{amount_tokens, leading_amounts, parse_amount, tokenize_amounts};
pub use balance::BalanceItemParser;
pub use detect::{detect_statement_type, StatementTypeDetector};
pub use line_items::LineItemParser;
pub use sections::extract_section;
pub use summary::find_summary_line;

use crate::models::statement::{LineItemRecord, LineItems};

/// Trait for parsers turning a section of text into named line items.
pub trait SectionParser {
    /// Parse a single line, returning `None` for lines that do not carry an item.
    fn parse_line(&self, line: &str) -> Option<(String, LineItemRecord)>;

    /// Parse every line of a section. Later items overwrite earlier ones
    /// with the same name.
    fn parse_section(&self, section: &str) -> LineItems {
        section.lines().filter_map(|line| self.parse_line(line)).collect()
    }
}
