//! Core library for extracting line items from fixed-layout financial statements.
//!
//! This crate provides:
//! - Page text sources (PDF via lopdf/pdf-extract, form-feed separated text)
//! - Statement type detection and rule-based line-item parsing
//! - Derived variance, branch share and margin metrics
//! - Flattened tables and plain-text summary reports

pub mod error;
pub mod models;
pub mod pdf;
pub mod source;
pub mod statement;

pub use error::{AmountError, FinstatError, PdfError, Result};
pub use models::config::FinstatConfig;
pub use models::statement::{
    BalanceRecord, BranchRecord, CategoryMap, LineItemRecord, LineItems, NamedMap,
    OperatingRecord, StatementData, StatementType,
};
pub use pdf::{PdfContent, PdfExtractor, PdfProcessor, PdfType};
pub use source::{page_headers, PageHeader, PageSource, TextPages};
pub use statement::{
    derived_metrics, to_table, DerivedMetrics, ReportFormatter, StatementExtractor,
    StatementTable,
};
