//! Locating singleton summary lines such as "Net Revenue".

use tracing::trace;

use crate::models::statement::{ColumnLayout, LineItemRecord};

use super::amounts::leading_amounts;

/// Find the first line containing `identifier` that parses with `layout`.
///
/// Lines that contain the identifier but carry too few amounts, or a
/// malformed one, are passed over. `None` means the text does not carry the
/// summary line.
pub fn find_summary_line(
    text: &str,
    identifier: &str,
    layout: ColumnLayout,
) -> Option<LineItemRecord> {
    text.lines()
        .filter(|line| line.contains(identifier))
        .find_map(|line| match leading_amounts(line, layout.arity()) {
            Ok(Some(values)) => layout.record(&values),
            Ok(None) => None,
            Err(e) => {
                trace!("Summary candidate {:?} rejected: {}", line, e);
                None
            }
        })
}
