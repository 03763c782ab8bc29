//! Common regex patterns for statement line parsing.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Amount token: digits with optional comma grouping, optional decimals,
    // optional trailing minus (the report's negative convention, e.g. 1,234.56-)
    pub static ref AMOUNT_TOKEN: Regex = Regex::new(
        r"[\d,]+\.?\d*-?"
    ).unwrap();

    // Item label: everything before the first run of digits/commas
    pub static ref ITEM_LABEL: Regex = Regex::new(
        r"^(.+?)\s+[\d,]"
    ).unwrap();

    // Balance-sheet line: label, whitespace, one amount at end of line
    pub static ref BALANCE_LINE: Regex = Regex::new(
        r"(.+?)\s+([\d,]+\.?\d*)-?$"
    ).unwrap();

    // Label prefixes dropped from balance-sheet item names
    pub static ref BALANCE_LABEL_PREFIX: Regex = Regex::new(
        r"^(Cash--|Less\s+)"
    ).unwrap();
}
