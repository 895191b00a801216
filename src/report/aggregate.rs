use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sqlx::SqlitePool;

use super::format::format_percent;
use super::models::{BudgetAlert, BudgetStatus, MonthTotal};
use crate::budget::models::Budget;
use crate::budget::BudgetService;
use crate::errors::AppError;
use crate::models::{DateRange, Kind, Month};
use crate::money;

/// Sums over the transaction ledger.
///
/// Ranges are inclusive and compared as `yyyy-MM-dd` text. Empty results
/// yield 0 or an empty map, never an error. Amounts are fetched as stored
/// and summed as `Decimal`.
pub struct AggregationService;

impl AggregationService {
    pub async fn total_amount(
        pool: &SqlitePool,
        owner: &str,
        kind: Kind,
        range: &DateRange,
    ) -> Result<Decimal, AppError> {
        let amounts = sqlx::query_scalar::<_, String>(
            r#"
            SELECT amount
            FROM transactions
            WHERE owner_email = ? AND kind = ? AND date >= ? AND date <= ?
            "#,
        )
        .bind(owner)
        .bind(kind)
        .bind(&range.start)
        .bind(&range.end)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        money::sum(amounts)
    }

    /// Sum per category name. Only categories with matching transactions
    /// appear; ids that no longer resolve are summed under "Unknown".
    pub async fn total_by_category(
        pool: &SqlitePool,
        owner: &str,
        kind: Kind,
        range: &DateRange,
    ) -> Result<BTreeMap<String, Decimal>, AppError> {
        let rows = sqlx::query_as::<_, (String, String)>(
            r#"
            SELECT COALESCE(c.name, 'Unknown') AS name, t.amount
            FROM transactions t
            LEFT JOIN categories c ON c.id = t.category_id
            WHERE t.owner_email = ? AND t.kind = ? AND t.date >= ? AND t.date <= ?
            "#,
        )
        .bind(owner)
        .bind(kind)
        .bind(&range.start)
        .bind(&range.end)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        let mut totals = BTreeMap::new();
        for (name, amount) in rows {
            let amount =
                money::parse(&amount).map_err(|e| AppError::InternalError(e.to_string()))?;
            *totals.entry(name).or_insert(Decimal::ZERO) += amount;
        }
        for total in totals.values_mut() {
            *total = total.normalize();
        }
        Ok(totals)
    }

    /// Expense total of a category within the month's `-01`..`-31` window
    pub async fn spending_for_category(
        pool: &SqlitePool,
        owner: &str,
        category_id: i64,
        month: Month,
    ) -> Result<Decimal, AppError> {
        Self::spending_for_category_in_range(pool, owner, category_id, &month.window()).await
    }

    pub async fn spending_for_category_in_range(
        pool: &SqlitePool,
        owner: &str,
        category_id: i64,
        range: &DateRange,
    ) -> Result<Decimal, AppError> {
        let amounts = sqlx::query_scalar::<_, String>(
            r#"
            SELECT amount
            FROM transactions
            WHERE owner_email = ? AND kind = 'EXPENSE' AND category_id = ?
              AND date >= ? AND date <= ?
            "#,
        )
        .bind(owner)
        .bind(category_id)
        .bind(&range.start)
        .bind(&range.end)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        money::sum(amounts)
    }

    /// Expense totals of the `month_count` months ending at `current`,
    /// oldest first.
    pub async fn monthly_expense_series(
        pool: &SqlitePool,
        owner: &str,
        month_count: u32,
        current: Month,
    ) -> Result<Vec<MonthTotal>, AppError> {
        let mut series = Vec::with_capacity(month_count as usize);
        for back in (0..month_count as i32).rev() {
            let month = current.shift(-back);
            let total = Self::total_amount(pool, owner, Kind::Expense, &month.window()).await?;
            series.push(MonthTotal {
                month: month.key(),
                label: month.label(),
                total,
            });
        }
        Ok(series)
    }

    /// Budgets of the month with alerts enabled whose spend reached the
    /// alert threshold
    pub async fn budget_alerts(
        pool: &SqlitePool,
        owner: &str,
        month: Month,
    ) -> Result<Vec<BudgetAlert>, AppError> {
        let budgets = BudgetService::list_for_month(pool, owner, month).await?;

        let alerts = budgets
            .items
            .into_iter()
            .filter(|b| b.budget.alert_enabled && b.status.is_over_threshold)
            .map(|b| BudgetAlert {
                message: alert_message(&b.category_name, &b.status),
                budget_id: b.budget.id,
                category_id: b.budget.category_id,
                category_name: b.category_name,
                month: b.budget.month,
                limit: b.budget.limit,
                spent: b.spent,
                alert_threshold: b.budget.alert_threshold,
                status: b.status,
            })
            .collect();

        Ok(alerts)
    }
}

/// Percent used, over-threshold and over-limit flags for a budget.
///
/// Flags compare exact amounts; only the reported percentage is rounded.
pub fn budget_status(budget: &Budget, spent: Decimal) -> BudgetStatus {
    let exact = money::percent_of(spent, budget.limit);
    let threshold_amount = budget.limit * budget.alert_threshold / Decimal::ONE_HUNDRED;

    BudgetStatus {
        percent_used: money::round_cents(exact),
        is_over_threshold: spent >= threshold_amount,
        is_over_limit: exact >= Decimal::ONE_HUNDRED,
    }
}

fn alert_message(category_name: &str, status: &BudgetStatus) -> String {
    let percent = format_percent(status.percent_used);
    if status.is_over_limit {
        format!("{category_name}: budget exceeded ({percent})")
    } else {
        format!("{category_name}: {percent} of budget used")
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn budget(limit: &str, alert_threshold: &str) -> Budget {
        Budget {
            id: 1,
            owner_email: "a@test.com".to_string(),
            category_id: 1,
            limit: dec(limit),
            month: "2024-06".to_string(),
            alert_enabled: true,
            alert_threshold: dec(alert_threshold),
        }
    }

    #[test]
    fn test_status_over_threshold_under_limit() {
        let status = budget_status(&budget("100", "50"), dec("60"));
        assert_eq!(status.percent_used, dec("60"));
        assert!(status.is_over_threshold);
        assert!(!status.is_over_limit);
    }

    #[test]
    fn test_status_nothing_spent() {
        let status = budget_status(&budget("100", "50"), Decimal::ZERO);
        assert_eq!(status.percent_used, Decimal::ZERO);
        assert!(!status.is_over_threshold);
        assert!(!status.is_over_limit);
    }

    #[test]
    fn test_status_zero_limit_never_divides() {
        let status = budget_status(&budget("0", "50"), dec("25"));
        assert_eq!(status.percent_used, Decimal::ZERO);
        assert!(!status.is_over_limit);
    }

    #[test]
    fn test_status_spent_equals_limit() {
        for threshold in ["0", "25", "50", "99.5", "100"] {
            let status = budget_status(&budget("80", threshold), dec("80"));
            assert!(status.is_over_limit, "threshold {threshold}");
            assert!(status.is_over_threshold, "threshold {threshold}");
        }
    }

    #[test]
    fn test_status_spent_exactly_at_threshold() {
        let status = budget_status(&budget("100", "55"), dec("55"));
        assert!(status.is_over_threshold);
        assert!(!status.is_over_limit);
        assert_eq!(status.percent_used, dec("55"));

        let status = budget_status(&budget("100", "55"), dec("54.99"));
        assert!(!status.is_over_threshold);
    }

    #[test]
    fn test_status_fractional_threshold_on_cents() {
        // 0.3 of 0.1 + 0.2 is a full limit
        let status = budget_status(&budget("0.3", "100"), dec("0.1") + dec("0.2"));
        assert!(status.is_over_limit);
        assert!(status.is_over_threshold);
        assert_eq!(status.percent_used, dec("100"));
    }

    #[test]
    fn test_percent_used_is_rounded_to_cents() {
        let status = budget_status(&budget("27", "50"), dec("25"));
        assert_eq!(status.percent_used.to_string(), "92.59");
    }

    #[test]
    fn test_alert_message() {
        let status = budget_status(&budget("100", "50"), dec("60"));
        assert_eq!(alert_message("Food", &status), "Food: 60.0% of budget used");

        let status = budget_status(&budget("100", "50"), dec("120"));
        assert_eq!(
            alert_message("Food", &status),
            "Food: budget exceeded (120.0%)"
        );
    }
}
