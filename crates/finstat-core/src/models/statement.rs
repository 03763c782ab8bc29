//! Statement data models: statement types, typed line-item records and the
//! category-keyed result structure.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Layout of a financial statement document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementType {
    /// Revenue and expenses split by branch of service (ARMP total, Army, Navy, USMC).
    BranchBreakdown,
    /// Monthly and year-to-date actual vs budget figures.
    OperatingResults,
    /// Statement of financial condition (assets, liabilities, equity).
    BalanceSheet,
    /// No known layout marker was found.
    #[default]
    Unknown,
}

impl StatementType {
    /// Snake-case identifier, also used as the flattened table name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementType::BranchBreakdown => "branch_breakdown",
            StatementType::OperatingResults => "operating_results",
            StatementType::BalanceSheet => "balance_sheet",
            StatementType::Unknown => "unknown",
        }
    }

    /// Column layout of multi-column line items, if this type has one.
    pub fn column_layout(&self) -> Option<ColumnLayout> {
        match self {
            StatementType::BranchBreakdown => Some(ColumnLayout::Branch),
            StatementType::OperatingResults => Some(ColumnLayout::BudgetActual),
            StatementType::BalanceSheet | StatementType::Unknown => None,
        }
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric column layout of a multi-column line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnLayout {
    /// Month actual, budget, variance followed by YTD actual, budget, variance.
    BudgetActual,
    /// ARMP total followed by Army, Navy, USMC.
    Branch,
}

impl ColumnLayout {
    /// Number of numeric columns a line must carry.
    pub fn arity(&self) -> usize {
        match self {
            ColumnLayout::BudgetActual => 6,
            ColumnLayout::Branch => 4,
        }
    }

    /// Build a record from the leading columns of `values`.
    ///
    /// Returns `None` when fewer than [`arity`](Self::arity) values are given.
    pub fn record(&self, values: &[f64]) -> Option<LineItemRecord> {
        match *self {
            ColumnLayout::BudgetActual => match values {
                [
                    march_actual,
                    march_budget,
                    march_variance,
                    ytd_actual,
                    ytd_budget,
                    ytd_variance,
                    ..,
                ] => {
                    Some(LineItemRecord::Operating(OperatingRecord {
                        march_actual: *march_actual,
                        march_budget: *march_budget,
                        march_variance: *march_variance,
                        ytd_actual: *ytd_actual,
                        ytd_budget: *ytd_budget,
                        ytd_variance: *ytd_variance,
                    }))
                }
                _ => None,
            },
            ColumnLayout::Branch => match values {
                [armp_total, army, navy, usmc, ..] => Some(LineItemRecord::Branch(BranchRecord {
                    armp_total: *armp_total,
                    army: *army,
                    navy: *navy,
                    usmc: *usmc,
                })),
                _ => None,
            },
        }
    }
}

/// Actual vs budget figures for the reporting month and year to date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatingRecord {
    pub march_actual: f64,
    pub march_budget: f64,
    pub march_variance: f64,
    pub ytd_actual: f64,
    pub ytd_budget: f64,
    pub ytd_variance: f64,
}

/// Figures split by branch of service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchRecord {
    /// Aggregate across the three branches.
    pub armp_total: f64,
    pub army: f64,
    pub navy: f64,
    pub usmc: f64,
}

/// A single balance-sheet amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub amount: f64,
}

/// Numeric payload of one line item, shaped by the statement type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LineItemRecord {
    Operating(OperatingRecord),
    Branch(BranchRecord),
    Balance(BalanceRecord),
}

impl LineItemRecord {
    pub fn as_operating(&self) -> Option<&OperatingRecord> {
        match self {
            LineItemRecord::Operating(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_branch(&self) -> Option<&BranchRecord> {
        match self {
            LineItemRecord::Branch(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_balance(&self) -> Option<&BalanceRecord> {
        match self {
            LineItemRecord::Balance(r) => Some(r),
            _ => None,
        }
    }
}

/// Values keyed by name in first-seen order.
///
/// Inserting an existing name replaces its value but keeps its position.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedMap<V> {
    entries: Vec<(String, V)>,
}

/// Line items of one category.
pub type LineItems = NamedMap<LineItemRecord>;

impl<V> NamedMap<V> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Insert a value, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Merge `other` into `self`; values of `other` win on name collision.
    pub fn merge(&mut self, other: NamedMap<V>) {
        for (name, value) in other.entries {
            self.insert(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for NamedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(String, V)> for NamedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = NamedMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for NamedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Category name to line items, in category declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMap {
    categories: Vec<(String, LineItems)>,
}

impl CategoryMap {
    /// Create a map holding an empty entry for each category.
    pub fn with_categories<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map = CategoryMap::default();
        for name in names {
            map.category_mut(name);
        }
        map
    }

    pub fn get(&self, category: &str) -> Option<&LineItems> {
        self.categories.iter().find(|(n, _)| n == category).map(|(_, items)| items)
    }

    /// Items of `category`, appending an empty category if it is missing.
    pub fn category_mut(&mut self, category: impl Into<String>) -> &mut LineItems {
        let category = category.into();
        let idx = match self.categories.iter().position(|(n, _)| *n == category) {
            Some(idx) => idx,
            None => {
                self.categories.push((category, LineItems::new()));
                self.categories.len() - 1
            }
        };
        &mut self.categories[idx].1
    }

    /// Look up one item in one category.
    pub fn item(&self, category: &str, name: &str) -> Option<&LineItemRecord> {
        self.get(category).and_then(|items| items.get(name))
    }

    /// Merge `other` into `self` category by category, last write wins.
    pub fn merge(&mut self, other: CategoryMap) {
        for (category, items) in other.categories {
            self.category_mut(category).merge(items);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LineItems)> {
        self.categories.iter().map(|(n, items)| (n.as_str(), items))
    }

    /// Total number of line items across all categories.
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|(_, items)| items.len()).sum()
    }

    /// True when no category holds any item.
    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|(_, items)| items.is_empty())
    }
}

impl Serialize for CategoryMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Result of extracting one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementData {
    /// Detected layout.
    pub statement_type: StatementType,
    /// Extracted line items by category.
    pub categories: CategoryMap,
}

impl StatementData {
    pub fn new(statement_type: StatementType, categories: CategoryMap) -> Self {
        Self {
            statement_type,
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn balance(amount: f64) -> LineItemRecord {
        LineItemRecord::Balance(BalanceRecord { amount })
    }

    #[test]
    fn test_column_layout_record() {
        let record = ColumnLayout::Branch.record(&[10.0, 5.0, 3.0, 2.0, 99.0]).unwrap();
        assert_eq!(
            record,
            LineItemRecord::Branch(BranchRecord {
                armp_total: 10.0,
                army: 5.0,
                navy: 3.0,
                usmc: 2.0,
            })
        );

        assert!(ColumnLayout::BudgetActual.record(&[1.0, 2.0, 3.0, 4.0, 5.0]).is_none());
    }

    #[test]
    fn test_line_items_overwrite_keeps_position() {
        let mut items = LineItems::new();
        items.insert("Cash", balance(1.0));
        items.insert("Inventory", balance(2.0));
        let replaced = items.insert("Cash", balance(3.0));

        assert_eq!(replaced, Some(balance(1.0)));
        let names: Vec<&str> = items.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Cash", "Inventory"]);
        assert_eq!(items.get("Cash"), Some(&balance(3.0)));
    }

    #[test]
    fn test_category_map_merge_last_write_wins() {
        let mut first = CategoryMap::with_categories(["assets", "equity"]);
        first.category_mut("assets").insert("Cash", balance(1.0));

        let mut second = CategoryMap::with_categories(["assets", "equity"]);
        second.category_mut("assets").insert("Cash", balance(7.0));
        second.category_mut("equity").insert("Retained Earnings", balance(4.0));

        first.merge(second);

        assert_eq!(first.item("assets", "Cash"), Some(&balance(7.0)));
        assert_eq!(first.item("equity", "Retained Earnings"), Some(&balance(4.0)));
        assert_eq!(first.item_count(), 2);
    }

    #[test]
    fn test_serialize_preserves_order() {
        let mut map = CategoryMap::with_categories(["liabilities", "assets"]);
        map.category_mut("assets").insert("Cash", balance(-2.5));

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"liabilities":{},"assets":{"Cash":{"amount":-2.5}}}"#);
    }
}
