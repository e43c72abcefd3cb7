//! Offline rule-based insights.
//!
//! Quick observations computed locally from the snapshot, shown while the
//! AI analysis loads or when no credential is configured. No network, no
//! dispatcher.

use paisa_core::FinancialSnapshot;

/// Compute rule-based insights from a snapshot.
///
/// # Examples
///
/// ```
/// use paisa::local_insights;
/// use paisa_core::{FinancialSnapshot, SnapshotTotals};
///
/// let snapshot = FinancialSnapshot::builder()
///     .totals(
///         SnapshotTotals::builder()
///             .income(80_000.0)
///             .expenses(48_000.0)
///             .net(32_000.0)
///             .savings_rate(40.0)
///             .build()
///             .unwrap(),
///     )
///     .build()
///     .unwrap();
///
/// let insights = local_insights(&snapshot);
/// assert!(insights[0].contains("40%"));
/// ```
pub fn local_insights(snapshot: &FinancialSnapshot) -> Vec<String> {
    let mut insights = Vec::new();
    let totals = snapshot.totals();
    let savings_rate = *totals.savings_rate();

    // Savings rate banding against the common 20% guideline
    if savings_rate >= 30.0 {
        insights.push(format!(
            "🌟 Excellent! Your {}% savings rate is above the recommended 20%. Keep it up!",
            savings_rate
        ));
    } else if savings_rate >= 20.0 {
        insights.push(format!(
            "👍 Good job! Your {}% savings rate meets the recommended target.",
            savings_rate
        ));
    } else if savings_rate > 0.0 {
        insights.push(format!(
            "💡 Your savings rate is {}%. Try to reach 20% by cutting discretionary spending.",
            savings_rate
        ));
    } else {
        insights.push(
            "⚠️ You're spending more than you earn. Review your expenses to find areas to cut."
                .to_string(),
        );
    }

    // Share of spending going to the top category
    if let Some(category) = snapshot.highest_category()
        && *totals.expenses() > 0.0
    {
        let percent = (category.amount() / totals.expenses() * 100.0).round();
        insights.push(format!(
            "📊 {} is your biggest expense ({}% of total). Is this aligned with your priorities?",
            category.category(),
            percent
        ));
    }

    // Weekend spending pattern
    if let Some(day) = snapshot.top_day()
        && (day.day() == "Sat" || day.day() == "Sun")
    {
        insights.push(
            "📅 You spend most on weekends. Consider planning weekend activities that cost less."
                .to_string(),
        );
    }

    // Expense-to-income ratio banding
    if *totals.income() > 0.0 {
        let ratio = totals.expenses() / totals.income();
        if ratio > 0.9 {
            insights.push(format!(
                "🔴 You're using {}% of income on expenses. Build an emergency buffer.",
                (ratio * 100.0).round()
            ));
        } else if ratio > 0.7 {
            insights.push(format!(
                "🟡 {}% of income goes to expenses. Good, but there's room to save more.",
                (ratio * 100.0).round()
            ));
        }
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use paisa_core::{CategorySpend, DaySpend, SnapshotTotals};

    fn snapshot_with_rate(income: f64, expenses: f64, savings_rate: f64) -> FinancialSnapshot {
        FinancialSnapshot::builder()
            .totals(
                SnapshotTotals::builder()
                    .income(income)
                    .expenses(expenses)
                    .net(income - expenses)
                    .savings_rate(savings_rate)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn strong_saver_is_praised() {
        let insights = local_insights(&snapshot_with_rate(100_000.0, 60_000.0, 40.0));
        assert!(insights[0].contains("Excellent"));
    }

    #[test]
    fn overspending_triggers_warning() {
        let insights = local_insights(&snapshot_with_rate(50_000.0, 60_000.0, -20.0));
        assert!(insights[0].contains("spending more than you earn"));
    }

    #[test]
    fn top_category_share_is_reported() {
        let snapshot = FinancialSnapshot::builder()
            .totals(
                SnapshotTotals::builder()
                    .income(100_000.0)
                    .expenses(50_000.0)
                    .net(50_000.0)
                    .savings_rate(50.0)
                    .build()
                    .unwrap(),
            )
            .highest_category(Some(
                CategorySpend::builder()
                    .category("Rent")
                    .amount(25_000.0)
                    .build()
                    .unwrap(),
            ))
            .build()
            .unwrap();

        let insights = local_insights(&snapshot);
        assert!(insights.iter().any(|i| i.contains("Rent") && i.contains("50%")));
    }

    #[test]
    fn weekend_pattern_is_flagged() {
        let snapshot = FinancialSnapshot::builder()
            .totals(
                SnapshotTotals::builder()
                    .income(100_000.0)
                    .expenses(50_000.0)
                    .net(50_000.0)
                    .savings_rate(50.0)
                    .build()
                    .unwrap(),
            )
            .top_day(Some(
                DaySpend::builder().day("Sat").amount(8_000.0).build().unwrap(),
            ))
            .build()
            .unwrap();

        let insights = local_insights(&snapshot);
        assert!(insights.iter().any(|i| i.contains("weekends")));
    }

    #[test]
    fn tight_budget_ratio_is_flagged() {
        let insights = local_insights(&snapshot_with_rate(50_000.0, 47_500.0, 5.0));
        assert!(insights.iter().any(|i| i.contains("95%")));
    }
}
