//! Statement type detection from marker phrases.

use crate::models::config::DetectionConfig;
use crate::models::statement::StatementType;

/// Classifies documents by the first marker phrase they contain.
#[derive(Debug, Clone, Default)]
pub struct StatementTypeDetector {
    markers: DetectionConfig,
}

impl StatementTypeDetector {
    pub fn new(markers: DetectionConfig) -> Self {
        Self { markers }
    }

    /// Detect the statement type of a document's concatenated text.
    pub fn detect(&self, text: &str) -> StatementType {
        self.markers
            .markers()
            .into_iter()
            .find(|(marker, _)| !marker.is_empty() && text.contains(marker))
            .map(|(_, statement_type)| statement_type)
            .unwrap_or(StatementType::Unknown)
    }
}

/// Detect the statement type using the default marker phrases.
pub fn detect_statement_type(text: &str) -> StatementType {
    StatementTypeDetector::default().detect(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_each_type() {
        assert_eq!(
            detect_statement_type("ARMP Results by Branch of Service"),
            StatementType::BranchBreakdown
        );
        assert_eq!(
            detect_statement_type("Operating Results - Actual vs Budget"),
            StatementType::OperatingResults
        );
        assert_eq!(
            detect_statement_type("Statement of Financial Condition\nASSETS"),
            StatementType::BalanceSheet
        );
        assert_eq!(detect_statement_type("Cover page"), StatementType::Unknown);
        assert_eq!(detect_statement_type(""), StatementType::Unknown);
    }

    #[test]
    fn test_branch_marker_has_priority() {
        let text = "Actual vs Budget\nStatement of Financial Condition\nBranch of Service";
        assert_eq!(detect_statement_type(text), StatementType::BranchBreakdown);
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        assert_eq!(detect_statement_type("ACTUAL VS BUDGET"), StatementType::Unknown);
    }

    #[test]
    fn test_custom_markers() {
        let detector = StatementTypeDetector::new(DetectionConfig {
            branch_breakdown: String::new(),
            operating_results: "Budget Comparison".to_string(),
            ..DetectionConfig::default()
        });
        assert_eq!(detector.detect("Budget Comparison"), StatementType::OperatingResults);
    }
}
