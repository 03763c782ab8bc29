//! Derived metrics computed from an extracted category map.
//!
//! Nothing here is cached: every call recomputes from the map it is given.

use serde::Serialize;

use crate::models::statement::{
    BranchRecord, CategoryMap, NamedMap, OperatingRecord, StatementData, StatementType,
};

const REVENUE: &str = "revenue";
const NET_OPERATING_INCOME: &str = "net_operating_income";
const NET_OPERATING_INCOME_ITEM: &str = "Net Operating Income";
const GAMING_MACHINE_REVENUE: &str = "Gaming Machine Revenue";

/// `part / whole * 100`, defined as 0 when `whole` is 0.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Variance as a percentage of budget for both reporting periods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VarianceMetrics {
    pub march_variance_pct: f64,
    pub ytd_variance_pct: f64,
}

impl VarianceMetrics {
    pub fn of(record: &OperatingRecord) -> Self {
        Self {
            march_variance_pct: percent_of(record.march_variance, record.march_budget),
            ytd_variance_pct: percent_of(record.ytd_variance, record.ytd_budget),
        }
    }
}

/// Share of the ARMP total taken by each branch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BranchShare {
    pub army_share_pct: f64,
    pub navy_share_pct: f64,
    pub usmc_share_pct: f64,
}

impl BranchShare {
    pub fn of(record: &BranchRecord) -> Self {
        Self {
            army_share_pct: percent_of(record.army, record.armp_total),
            navy_share_pct: percent_of(record.navy, record.armp_total),
            usmc_share_pct: percent_of(record.usmc, record.armp_total),
        }
    }
}

/// Net operating income as a percentage of revenue, per branch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OperatingMargin {
    pub army_margin_pct: f64,
    pub navy_margin_pct: f64,
    pub usmc_margin_pct: f64,
    pub armp_margin_pct: f64,
}

impl OperatingMargin {
    pub fn of(net_operating_income: &BranchRecord, revenue: &BranchRecord) -> Self {
        Self {
            army_margin_pct: percent_of(net_operating_income.army, revenue.army),
            navy_margin_pct: percent_of(net_operating_income.navy, revenue.navy),
            usmc_margin_pct: percent_of(net_operating_income.usmc, revenue.usmc),
            armp_margin_pct: percent_of(net_operating_income.armp_total, revenue.armp_total),
        }
    }
}

/// Variance percentages by category and item.
pub type VarianceAnalysis = NamedMap<NamedMap<VarianceMetrics>>;

/// Variance percentages for every budget-carrying record, by category.
pub fn variance_analysis(categories: &CategoryMap) -> VarianceAnalysis {
    categories
        .iter()
        .map(|(category, items)| {
            let metrics = items
                .iter()
                .filter_map(|(name, record)| {
                    record
                        .as_operating()
                        .map(|r| (name.to_string(), VarianceMetrics::of(r)))
                })
                .collect();
            (category.to_string(), metrics)
        })
        .collect()
}

/// Revenue shares and operating margin by branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchPerformance {
    /// Branch shares of each revenue item.
    pub revenue_shares: NamedMap<BranchShare>,
    /// Present when both the revenue base and net operating income were found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_margin: Option<OperatingMargin>,
}

/// The revenue item margins are measured against: the first whose name
/// contains "Total" or is exactly "Gaming Machine Revenue".
pub fn margin_revenue_base(categories: &CategoryMap) -> Option<&BranchRecord> {
    categories
        .get(REVENUE)?
        .iter()
        .find(|(name, _)| name.contains("Total") || *name == GAMING_MACHINE_REVENUE)
        .and_then(|(_, record)| record.as_branch())
}

/// Operating margin per branch, if the map carries both inputs.
pub fn operating_margin(categories: &CategoryMap) -> Option<OperatingMargin> {
    let net_operating_income = categories
        .item(NET_OPERATING_INCOME, NET_OPERATING_INCOME_ITEM)?
        .as_branch()?;
    let revenue = margin_revenue_base(categories)?;
    Some(OperatingMargin::of(net_operating_income, revenue))
}

/// Branch shares of every revenue item plus the operating margin.
pub fn branch_performance(categories: &CategoryMap) -> BranchPerformance {
    let revenue_shares = categories
        .get(REVENUE)
        .map(|items| {
            items
                .iter()
                .filter_map(|(name, record)| {
                    record
                        .as_branch()
                        .map(|r| (name.to_string(), BranchShare::of(r)))
                })
                .collect()
        })
        .unwrap_or_default();

    BranchPerformance {
        revenue_shares,
        operating_margin: operating_margin(categories),
    }
}

/// Derived metrics for one statement, by statement type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedMetrics {
    Variance(VarianceAnalysis),
    Branch(BranchPerformance),
    None,
}

/// Compute the metrics that apply to the statement's type.
pub fn derived_metrics(data: &StatementData) -> DerivedMetrics {
    match data.statement_type {
        StatementType::OperatingResults => {
            DerivedMetrics::Variance(variance_analysis(&data.categories))
        }
        StatementType::BranchBreakdown => {
            DerivedMetrics::Branch(branch_performance(&data.categories))
        }
        StatementType::BalanceSheet | StatementType::Unknown => DerivedMetrics::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::statement::LineItemRecord;
    use pretty_assertions::assert_eq;

    fn branch(armp_total: f64, army: f64, navy: f64, usmc: f64) -> LineItemRecord {
        LineItemRecord::Branch(BranchRecord {
            armp_total,
            army,
            navy,
            usmc,
        })
    }

    fn operating(
        march_budget: f64,
        march_variance: f64,
        ytd_budget: f64,
        ytd_variance: f64,
    ) -> LineItemRecord {
        LineItemRecord::Operating(OperatingRecord {
            march_actual: 0.0,
            march_budget,
            march_variance,
            ytd_actual: 0.0,
            ytd_budget,
            ytd_variance,
        })
    }

    #[test]
    fn test_percent_of_zero_whole() {
        assert_eq!(percent_of(123.0, 0.0), 0.0);
        assert_eq!(percent_of(-5.0, 0.0), 0.0);
        assert_eq!(percent_of(25.0, 200.0), 12.5);
    }

    #[test]
    fn test_variance_zero_budget_is_zero() {
        for variance in [-1000.0, 0.0, 42.5, 1e9] {
            let metrics = VarianceMetrics::of(&OperatingRecord {
                march_actual: 17.0,
                march_budget: 0.0,
                march_variance: variance,
                ytd_actual: 3.0,
                ytd_budget: 0.0,
                ytd_variance: variance,
            });
            assert_eq!(metrics.march_variance_pct, 0.0);
            assert_eq!(metrics.ytd_variance_pct, 0.0);
        }
    }

    #[test]
    fn test_variance_analysis_covers_all_categories() {
        let mut map =
            CategoryMap::with_categories(["revenue", "operating_expenses", "distributions"]);
        map.category_mut("revenue")
            .insert("Slots", operating(100.0, -25.0, 1000.0, 50.0));
        map.category_mut("operating_expenses")
            .insert("Repairs", operating(0.0, 10.0, 200.0, -20.0));

        let analysis = variance_analysis(&map);
        let slots = analysis.get("revenue").unwrap().get("Slots").unwrap();
        assert_eq!(slots.march_variance_pct, -25.0);
        assert_eq!(slots.ytd_variance_pct, 5.0);

        let repairs = analysis.get("operating_expenses").unwrap().get("Repairs").unwrap();
        assert_eq!(repairs.march_variance_pct, 0.0);
        assert_eq!(repairs.ytd_variance_pct, -10.0);

        assert!(analysis.get("distributions").unwrap().is_empty());
    }

    #[test]
    fn test_branch_shares() {
        let share = BranchShare::of(&BranchRecord {
            armp_total: 200.0,
            army: 100.0,
            navy: 60.0,
            usmc: 40.0,
        });
        assert_eq!(
            share,
            BranchShare {
                army_share_pct: 50.0,
                navy_share_pct: 30.0,
                usmc_share_pct: 20.0,
            }
        );

        let zero = BranchShare::of(&BranchRecord::default());
        assert_eq!(zero.army_share_pct, 0.0);
    }

    #[test]
    fn test_operating_margin_uses_first_matching_revenue_item() {
        let mut map = CategoryMap::with_categories(["revenue", "net_operating_income"]);
        map.category_mut("revenue").insert("Other Revenue", branch(10.0, 10.0, 0.0, 0.0));
        map.category_mut("revenue")
            .insert("Gaming Machine Revenue", branch(1000.0, 500.0, 0.0, 200.0));
        map.category_mut("revenue").insert("Total Revenue", branch(5.0, 5.0, 5.0, 5.0));
        map.category_mut("net_operating_income")
            .insert("Net Operating Income", branch(250.0, 100.0, 50.0, 100.0));

        let margin = operating_margin(&map).unwrap();
        assert_eq!(margin.armp_margin_pct, 25.0);
        assert_eq!(margin.army_margin_pct, 20.0);
        // Navy revenue of zero defines the margin as zero
        assert_eq!(margin.navy_margin_pct, 0.0);
        assert_eq!(margin.usmc_margin_pct, 50.0);
    }

    #[test]
    fn test_operating_margin_needs_both_inputs() {
        let mut map = CategoryMap::with_categories(["revenue", "net_operating_income"]);
        map.category_mut("revenue").insert("Bingo Revenue", branch(10.0, 5.0, 3.0, 2.0));
        map.category_mut("net_operating_income")
            .insert("Net Operating Income", branch(1.0, 1.0, 0.0, 0.0));
        assert_eq!(operating_margin(&map), None);

        let performance = branch_performance(&map);
        assert_eq!(performance.revenue_shares.len(), 1);
        assert!(performance.operating_margin.is_none());
    }

    #[test]
    fn test_metrics_follow_map_changes() {
        let mut data = StatementData::new(
            StatementType::OperatingResults,
            CategoryMap::with_categories(["revenue"]),
        );
        data.categories
            .category_mut("revenue")
            .insert("Slots", operating(100.0, 10.0, 100.0, 10.0));
        let before = derived_metrics(&data);

        data.categories
            .category_mut("revenue")
            .insert("Slots", operating(100.0, 50.0, 100.0, 10.0));
        let after = derived_metrics(&data);

        assert_ne!(before, after);
        match after {
            DerivedMetrics::Variance(analysis) => {
                let slots = analysis.get("revenue").unwrap().get("Slots").unwrap();
                assert_eq!(slots.march_variance_pct, 50.0);
            }
            other => panic!("unexpected metrics: {:?}", other),
        }
    }
}
