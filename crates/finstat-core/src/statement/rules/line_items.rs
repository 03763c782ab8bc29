//! Multi-column line-item parsing.

use tracing::trace;

use crate::models::statement::{ColumnLayout, LineItemRecord};

use super::amounts::{amount_tokens, leading_amounts};
use super::patterns::ITEM_LABEL;
use super::SectionParser;

/// Parser for lines carrying a label followed by a fixed number of amounts.
#[derive(Debug, Clone, Copy)]
pub struct LineItemParser {
    layout: ColumnLayout,
}

impl LineItemParser {
    pub fn new(layout: ColumnLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> ColumnLayout {
        self.layout
    }
}

impl SectionParser for LineItemParser {
    fn parse_line(&self, line: &str) -> Option<(String, LineItemRecord)> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('-') || line.starts_with('=') {
            return None;
        }

        let arity = self.layout.arity();
        if amount_tokens(line).len() < arity {
            return None;
        }

        let name = ITEM_LABEL.captures(line)?.get(1)?.as_str().trim().to_string();

        match leading_amounts(line, arity) {
            Ok(Some(values)) => self.layout.record(&values).map(|record| (name, record)),
            Ok(None) => None,
            Err(e) => {
                trace!("Skipping line {:?}: {}", line, e);
                None
            }
        }
    }
}
