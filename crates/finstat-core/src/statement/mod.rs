//! Financial statement extraction: rules, orchestration, metrics and output forms.

pub mod extractor;
pub mod metrics;
pub mod report;
pub mod rules;
pub mod table;

pub use extractor::StatementExtractor;
pub use metrics::{derived_metrics, DerivedMetrics};
pub use report::ReportFormatter;
pub use table::{to_table, StatementTable};
