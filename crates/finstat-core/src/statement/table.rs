//! Flattened one-row-per-item tables for CSV and other tabular emitters.

use serde::Serialize;

use crate::models::statement::{StatementData, StatementType};

use super::metrics::{BranchShare, VarianceMetrics};

/// Row of an operating results table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatingRow {
    pub category: String,
    pub line_item: String,
    pub march_actual: f64,
    pub march_budget: f64,
    pub march_variance: f64,
    pub ytd_actual: f64,
    pub ytd_budget: f64,
    pub ytd_variance: f64,
    pub march_variance_pct: f64,
    pub ytd_variance_pct: f64,
}

/// Row of a branch breakdown table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchRow {
    pub category: String,
    pub line_item: String,
    pub armp_total: f64,
    pub army: f64,
    pub navy: f64,
    pub usmc: f64,
    pub army_pct: f64,
    pub navy_pct: f64,
    pub usmc_pct: f64,
}

/// Row of a balance sheet table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceRow {
    pub category: String,
    pub item: String,
    pub amount: f64,
}

/// Flattened rows of one statement, in category then item order.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementTable {
    OperatingResults(Vec<OperatingRow>),
    BranchBreakdown(Vec<BranchRow>),
    BalanceSheet(Vec<BalanceRow>),
}

impl StatementTable {
    /// Table name, used to name exported files.
    pub fn name(&self) -> &'static str {
        match self {
            StatementTable::OperatingResults(_) => "operating_results",
            StatementTable::BranchBreakdown(_) => "branch_breakdown",
            StatementTable::BalanceSheet(_) => "balance_sheet",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            StatementTable::OperatingResults(rows) => rows.len(),
            StatementTable::BranchBreakdown(rows) => rows.len(),
            StatementTable::BalanceSheet(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Flatten extracted data into the table shape of its statement type.
///
/// Unrecognized documents use the balance sheet shape.
pub fn to_table(data: &StatementData) -> StatementTable {
    let records = data.categories.iter().flat_map(|(category, items)| {
        items
            .iter()
            .map(move |(name, record)| (category, name, record))
    });

    match data.statement_type {
        StatementType::OperatingResults => StatementTable::OperatingResults(
            records
                .filter_map(|(category, name, record)| {
                    let r = record.as_operating()?;
                    let pct = VarianceMetrics::of(r);
                    Some(OperatingRow {
                        category: category.to_string(),
                        line_item: name.to_string(),
                        march_actual: r.march_actual,
                        march_budget: r.march_budget,
                        march_variance: r.march_variance,
                        ytd_actual: r.ytd_actual,
                        ytd_budget: r.ytd_budget,
                        ytd_variance: r.ytd_variance,
                        march_variance_pct: pct.march_variance_pct,
                        ytd_variance_pct: pct.ytd_variance_pct,
                    })
                })
                .collect(),
        ),
        StatementType::BranchBreakdown => StatementTable::BranchBreakdown(
            records
                .filter_map(|(category, name, record)| {
                    let r = record.as_branch()?;
                    let share = BranchShare::of(r);
                    Some(BranchRow {
                        category: category.to_string(),
                        line_item: name.to_string(),
                        armp_total: r.armp_total,
                        army: r.army,
                        navy: r.navy,
                        usmc: r.usmc,
                        army_pct: share.army_share_pct,
                        navy_pct: share.navy_share_pct,
                        usmc_pct: share.usmc_share_pct,
                    })
                })
                .collect(),
        ),
        StatementType::BalanceSheet | StatementType::Unknown => StatementTable::BalanceSheet(
            records
                .filter_map(|(category, name, record)| {
                    Some(BalanceRow {
                        category: category.to_string(),
                        item: name.to_string(),
                        amount: record.as_balance()?.amount,
                    })
                })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::statement::{
        BalanceRecord, BranchRecord, CategoryMap, LineItemRecord, OperatingRecord,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn test_operating_rows_carry_variance_pct() {
        let mut categories = CategoryMap::with_categories(["revenue", "operating_expenses"]);
        categories.category_mut("revenue").insert(
            "Slots",
            LineItemRecord::Operating(OperatingRecord {
                march_actual: 125.0,
                march_budget: 100.0,
                march_variance: 25.0,
                ytd_actual: 980.0,
                ytd_budget: 0.0,
                ytd_variance: 980.0,
            }),
        );

        let table = to_table(&StatementData::new(StatementType::OperatingResults, categories));
        assert_eq!(table.name(), "operating_results");
        assert_eq!(
            table,
            StatementTable::OperatingResults(vec![OperatingRow {
                category: "revenue".to_string(),
                line_item: "Slots".to_string(),
                march_actual: 125.0,
                march_budget: 100.0,
                march_variance: 25.0,
                ytd_actual: 980.0,
                ytd_budget: 0.0,
                ytd_variance: 980.0,
                march_variance_pct: 25.0,
                ytd_variance_pct: 0.0,
            }])
        );
    }

    #[test]
    fn test_branch_rows_zero_total() {
        let mut categories = CategoryMap::with_categories(["revenue"]);
        categories.category_mut("revenue").insert(
            "Bingo",
            LineItemRecord::Branch(BranchRecord {
                armp_total: 0.0,
                army: 5.0,
                navy: -5.0,
                usmc: 0.0,
            }),
        );
        categories.category_mut("revenue").insert(
            "Slots",
            LineItemRecord::Branch(BranchRecord {
                armp_total: 40.0,
                army: 20.0,
                navy: 10.0,
                usmc: 10.0,
            }),
        );

        let table = to_table(&StatementData::new(StatementType::BranchBreakdown, categories));
        let StatementTable::BranchBreakdown(rows) = table else {
            panic!("expected branch table");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].army_pct, rows[0].navy_pct), (0.0, 0.0));
        assert_eq!((rows[1].army_pct, rows[1].navy_pct, rows[1].usmc_pct), (50.0, 25.0, 25.0));
    }

    #[test]
    fn test_balance_and_unknown_share_shape() {
        let mut categories = CategoryMap::with_categories(["assets", "liabilities"]);
        categories
            .category_mut("liabilities")
            .insert("Accounts Payable", LineItemRecord::Balance(BalanceRecord { amount: 2000.0 }));

        let table = to_table(&StatementData::new(StatementType::BalanceSheet, categories));
        assert_eq!(
            table,
            StatementTable::BalanceSheet(vec![BalanceRow {
                category: "liabilities".to_string(),
                item: "Accounts Payable".to_string(),
                amount: 2000.0,
            }])
        );

        let unknown = to_table(&StatementData::new(
            StatementType::Unknown,
            CategoryMap::with_categories(["unknown_data"]),
        ));
        assert_eq!(unknown.name(), "balance_sheet");
        assert!(unknown.is_empty());
    }
}
