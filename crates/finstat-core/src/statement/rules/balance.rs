//! Single-amount balance-sheet line parsing.

use regex::Regex;
use tracing::trace;

use crate::models::statement::{BalanceRecord, LineItemRecord};

use super::amounts::parse_amount;
use super::patterns::{BALANCE_LABEL_PREFIX, BALANCE_LINE};
use super::SectionParser;

/// Parser for `label   amount` lines, with an optional trailing minus.
#[derive(Debug, Clone)]
pub struct BalanceItemParser {
    label_prefix: Regex,
}

impl BalanceItemParser {
    /// Parser stripping the default `Cash--` and `Less ` label prefixes.
    pub fn new() -> Self {
        Self {
            label_prefix: BALANCE_LABEL_PREFIX.clone(),
        }
    }

    /// Use a custom regex for label prefixes to strip.
    pub fn with_label_prefix(mut self, label_prefix: Regex) -> Self {
        self.label_prefix = label_prefix;
        self
    }
}

impl Default for BalanceItemParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionParser for BalanceItemParser {
    fn parse_line(&self, line: &str) -> Option<(String, LineItemRecord)> {
        let line = line.trim();
        let caps = BALANCE_LINE.captures(line)?;

        // The captured amount never carries the minus; the sign comes from the line
        let amount = match parse_amount(&caps[2]) {
            Ok(amount) if line.ends_with('-') => -amount,
            Ok(amount) => amount,
            Err(e) => {
                trace!("Skipping balance line {:?}: {}", line, e);
                return None;
            }
        };

        let name = self.label_prefix.replace(caps[1].trim(), "").into_owned();
        Some((name, LineItemRecord::Balance(BalanceRecord { amount })))
    }
}
