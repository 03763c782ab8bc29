//! Plain-text summary reports.

use crate::models::config::FinstatConfig;
use crate::models::statement::{CategoryMap, StatementData, StatementType};

use super::metrics::{operating_margin, percent_of, BranchShare};

const DEFAULT_TOP_EXPENSE_VARIANCES: usize = 5;

/// Renders extracted statement data as a human-readable summary.
///
/// Formatting never mutates its input, so the same data always renders to
/// the same text.
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    top_expense_variances: usize,
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter {
    pub fn new() -> Self {
        Self {
            top_expense_variances: DEFAULT_TOP_EXPENSE_VARIANCES,
        }
    }

    pub fn from_config(config: &FinstatConfig) -> Self {
        Self {
            top_expense_variances: config.report.top_expense_variances,
        }
    }

    /// Number of expense lines listed under the top variances header.
    pub fn with_top_expense_variances(mut self, count: usize) -> Self {
        self.top_expense_variances = count;
        self
    }

    /// Render the report for the statement's type. Balance sheets and
    /// unrecognized documents share the generic summary.
    pub fn format(&self, data: &StatementData) -> String {
        match data.statement_type {
            StatementType::OperatingResults => self.operating_summary(&data.categories),
            StatementType::BranchBreakdown => self.branch_summary(&data.categories),
            StatementType::BalanceSheet | StatementType::Unknown => {
                self.financial_summary(&data.categories)
            }
        }
    }

    fn operating_summary(&self, categories: &CategoryMap) -> String {
        let mut report = String::from("OPERATING RESULTS SUMMARY\n");
        report.push_str(&"=".repeat(50));
        report.push_str("\n\n");

        if let Some(net_revenue) = categories
            .item("net_revenue", "Net Revenue")
            .and_then(|r| r.as_operating())
        {
            report.push_str("KEY PERFORMANCE INDICATORS:\n");
            report.push_str(&format!(
                "  YTD Net Revenue: {}\n",
                format_currency(net_revenue.ytd_actual)
            ));
            report.push_str(&format!(
                "  YTD Budget: {}\n",
                format_currency(net_revenue.ytd_budget)
            ));
            report.push_str(&format!(
                "  YTD Variance: {}\n\n",
                format_currency(net_revenue.ytd_variance)
            ));
        }

        if let Some(revenue) = categories.get("revenue") {
            report.push_str("REVENUE PERFORMANCE:\n");
            for (name, record) in revenue.iter() {
                let Some(record) = record.as_operating() else {
                    continue;
                };
                let variance_pct = percent_of(record.ytd_variance, record.ytd_budget);
                report.push_str(&format!("  {}:\n", name));
                report.push_str(&format!(
                    "    YTD Actual: {}\n",
                    format_currency(record.ytd_actual)
                ));
                report.push_str(&format!(
                    "    YTD Budget: {}\n",
                    format_currency(record.ytd_budget)
                ));
                report.push_str(&format!(
                    "    Variance: {}\n\n",
                    format_signed_percent(variance_pct)
                ));
            }
        }

        if let Some(expenses) = categories.get("operating_expenses") {
            report.push_str("TOP EXPENSE VARIANCES (YTD):\n");
            let mut variances: Vec<(&str, f64, f64)> = expenses
                .iter()
                .filter_map(|(name, record)| {
                    let record = record.as_operating()?;
                    (record.ytd_budget != 0.0).then(|| {
                        (
                            name,
                            record.ytd_variance / record.ytd_budget * 100.0,
                            record.ytd_variance,
                        )
                    })
                })
                .collect();
            // Stable, so equal magnitudes keep document order
            variances.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

            for (name, pct, amount) in variances.into_iter().take(self.top_expense_variances) {
                report.push_str(&format!(
                    "  {}: {} ({})\n",
                    name,
                    format_signed_percent(pct),
                    format_signed_currency(amount)
                ));
            }
        }

        report
    }

    fn branch_summary(&self, categories: &CategoryMap) -> String {
        let mut report = String::from("BRANCH OF SERVICE PERFORMANCE SUMMARY\n");
        report.push_str(&"=".repeat(55));
        report.push_str("\n\n");

        if let Some(revenue) = categories.get("revenue") {
            report.push_str("REVENUE BY BRANCH:\n");
            for (name, record) in revenue.iter() {
                let Some(record) = record.as_branch() else {
                    continue;
                };
                let share = BranchShare::of(record);
                report.push_str(&format!("  {}: {}\n", name, format_currency(record.armp_total)));
                report.push_str(&format!(
                    "    Army: {} ({})\n",
                    format_currency(record.army),
                    format_percent(share.army_share_pct)
                ));
                report.push_str(&format!(
                    "    Navy: {} ({})\n",
                    format_currency(record.navy),
                    format_percent(share.navy_share_pct)
                ));
                report.push_str(&format!(
                    "    USMC: {} ({})\n\n",
                    format_currency(record.usmc),
                    format_percent(share.usmc_share_pct)
                ));
            }
        }

        if let Some(net_operating_income) = categories.get("net_operating_income") {
            report.push_str("OPERATING INCOME BY BRANCH:\n");
            if let Some(record) = net_operating_income
                .get("Net Operating Income")
                .and_then(|r| r.as_branch())
            {
                report.push_str(&format!("  Total: {}\n", format_currency(record.armp_total)));
                report.push_str(&format!("    Army: {}\n", format_currency(record.army)));
                report.push_str(&format!("    Navy: {}\n", format_currency(record.navy)));
                report.push_str(&format!("    USMC: {}\n\n", format_currency(record.usmc)));
            }
        }

        if let Some(margin) = operating_margin(categories) {
            report.push_str("OPERATING MARGINS BY BRANCH:\n");
            report.push_str(&format!("  Army: {}\n", format_percent(margin.army_margin_pct)));
            report.push_str(&format!("  Navy: {}\n", format_percent(margin.navy_margin_pct)));
            report.push_str(&format!("  USMC: {}\n", format_percent(margin.usmc_margin_pct)));
            report.push_str(&format!("  Overall: {}\n\n", format_percent(margin.armp_margin_pct)));
        }

        report
    }

    fn financial_summary(&self, categories: &CategoryMap) -> String {
        let mut report = String::from("FINANCIAL STATEMENT SUMMARY\n");
        report.push_str(&"=".repeat(40));
        report.push_str("\n\n");

        for (category, items) in categories.iter() {
            if items.is_empty() {
                continue;
            }
            let heading = category.to_uppercase();
            report.push_str(&format!("{}:\n", heading));

            let mut total = 0.0;
            for (name, record) in items.iter() {
                if let Some(record) = record.as_balance() {
                    report.push_str(&format!("  {}: {}\n", name, format_currency(record.amount)));
                    total += record.amount;
                }
            }
            report.push_str(&format!("  TOTAL {}: {}\n\n", heading, format_currency(total)));
        }

        report
    }
}

/// Group the integer digits of an unsigned decimal string by thousands.
fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

fn sign_and_magnitude(value: f64, always_sign: bool) -> String {
    let magnitude = group_thousands(&format!("{:.2}", value.abs()));
    if value.is_sign_negative() {
        format!("-{}", magnitude)
    } else if always_sign {
        format!("+{}", magnitude)
    } else {
        magnitude
    }
}

/// `$1,234.56`; negative values render as `$-1,234.56`.
pub fn format_currency(value: f64) -> String {
    format!("${}", sign_and_magnitude(value, false))
}

/// Like [`format_currency`] but always signed: `$+1,234.56`.
pub fn format_signed_currency(value: f64) -> String {
    format!("${}", sign_and_magnitude(value, true))
}

/// One decimal place followed by `%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// One decimal place, always signed: `+12.5%`.
pub fn format_signed_percent(value: f64) -> String {
    format!("{:+.1}%", value)
}
