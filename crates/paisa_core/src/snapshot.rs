//! Financial snapshot types handed in by the host application.
//!
//! The snapshot is a read-only summary of the user's finances assembled by
//! the host application (dashboard totals, top spending category and day,
//! recent transactions, optional goals and budgets). The dispatch layer
//! never computes these figures; it only renders them into prompts.
//!
//! Field names serialize in camelCase so snapshots exported by the web
//! frontend deserialize unchanged.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Aggregate monthly totals.
///
/// # Examples
///
/// ```
/// use paisa_core::SnapshotTotals;
///
/// let totals = SnapshotTotals::builder()
///     .income(85_000.0)
///     .expenses(52_000.0)
///     .net(33_000.0)
///     .savings_rate(39.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(*totals.income(), 85_000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotTotals {
    /// Total income for the period
    income: f64,
    /// Total expenses for the period
    expenses: f64,
    /// Income minus expenses
    net: f64,
    /// Savings rate as a percentage of income
    savings_rate: f64,
}

impl SnapshotTotals {
    /// Creates a new builder for `SnapshotTotals`.
    pub fn builder() -> SnapshotTotalsBuilder {
        SnapshotTotalsBuilder::default()
    }
}

/// Spending total for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct CategorySpend {
    /// Category name
    category: String,
    /// Amount spent in the category
    amount: f64,
}

impl CategorySpend {
    /// Creates a new builder for `CategorySpend`.
    pub fn builder() -> CategorySpendBuilder {
        CategorySpendBuilder::default()
    }
}

/// Spending total for one day of the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct DaySpend {
    /// Day label (e.g. "Sat")
    day: String,
    /// Amount spent on that day
    amount: f64,
}

impl DaySpend {
    /// Creates a new builder for `DaySpend`.
    pub fn builder() -> DaySpendBuilder {
        DaySpendBuilder::default()
    }
}

/// One recent transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct RecentTransaction {
    /// Transaction description
    name: String,
    /// Transaction category
    category: String,
    /// Transaction amount
    amount: f64,
    /// Transaction date as an opaque display string
    date: String,
}

impl RecentTransaction {
    /// Creates a new builder for `RecentTransaction`.
    pub fn builder() -> RecentTransactionBuilder {
        RecentTransactionBuilder::default()
    }
}

/// Progress toward one savings goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    /// Goal name
    name: String,
    /// Amount saved so far
    current: f64,
    /// Target amount
    target: f64,
    /// Completion percentage
    progress: f64,
}

impl GoalProgress {
    /// Creates a new builder for `GoalProgress`.
    pub fn builder() -> GoalProgressBuilder {
        GoalProgressBuilder::default()
    }
}

/// Spending against one budget envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    /// Budget category
    category: String,
    /// Budget limit
    limit: f64,
    /// Amount spent
    spent: f64,
    /// Percentage of the limit consumed
    percent_used: f64,
}

impl BudgetStatus {
    /// Creates a new builder for `BudgetStatus`.
    pub fn builder() -> BudgetStatusBuilder {
        BudgetStatusBuilder::default()
    }
}

/// A read-only summary of the user's finances.
///
/// # Examples
///
/// ```
/// use paisa_core::{FinancialSnapshot, RecentTransaction, SnapshotTotals};
///
/// let snapshot = FinancialSnapshot::builder()
///     .totals(
///         SnapshotTotals::builder()
///             .income(85_000.0)
///             .expenses(52_000.0)
///             .net(33_000.0)
///             .savings_rate(39.0)
///             .build()
///             .unwrap(),
///     )
///     .recent(vec![
///         RecentTransaction::builder()
///             .name("Groceries")
///             .category("Food")
///             .amount(2_400.0)
///             .date("2026-08-01")
///             .build()
///             .unwrap(),
///     ])
///     .build()
///     .unwrap();
///
/// assert_eq!(snapshot.recent().len(), 1);
/// assert!(snapshot.goals().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    /// Aggregate totals
    totals: SnapshotTotals,
    /// Highest spending category, if any spending occurred
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    highest_category: Option<CategorySpend>,
    /// Highest spending day, if any spending occurred
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    top_day: Option<DaySpend>,
    /// Recent transactions, most recent first
    #[builder(default)]
    #[serde(default)]
    recent: Vec<RecentTransaction>,
    /// Savings goals, if the user has any
    #[builder(default)]
    #[serde(default)]
    goals: Vec<GoalProgress>,
    /// Budget envelopes, if the user has any
    #[builder(default)]
    #[serde(default)]
    budgets: Vec<BudgetStatus>,
}

impl FinancialSnapshot {
    /// Creates a new builder for `FinancialSnapshot`.
    pub fn builder() -> FinancialSnapshotBuilder {
        FinancialSnapshotBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_export() {
        let json = r#"{
            "totals": {"income": 50000, "expenses": 30000, "net": 20000, "savingsRate": 40},
            "highestCategory": {"category": "Food", "amount": 12000},
            "topDay": {"day": "Sat", "amount": 4000},
            "recent": [
                {"name": "Chai", "category": "Food", "amount": 40, "date": "2026-08-01"}
            ]
        }"#;

        let snapshot: FinancialSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(*snapshot.totals().savings_rate(), 40.0);
        assert_eq!(
            snapshot.highest_category().as_ref().unwrap().category(),
            "Food"
        );
        assert_eq!(snapshot.top_day().as_ref().unwrap().day(), "Sat");
        assert!(snapshot.goals().is_empty());
        assert!(snapshot.budgets().is_empty());
    }
}
