use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use super::aggregate::AggregationService;
use super::format::{format_currency, format_percent};
use super::models::{CategoryBreakdown, CategorySlice, Dashboard, ReportQuery, Summary};
use crate::auth::AuthService;
use crate::budget::BudgetService;
use crate::errors::AppError;
use crate::models::{DateRange, Kind, Month, Period};
use crate::money;
use crate::transaction::TransactionService;

const DASHBOARD_MONTHS: u32 = 6;
const DASHBOARD_RECENT: i64 = 5;

/// Reporting window chosen for a request
#[derive(Debug, Clone)]
pub struct ReportWindow {
    pub period: Period,
    /// "Today", "Last 7 days", "This month" or "Custom range"
    pub label: String,
    pub range: DateRange,
}

impl ReportWindow {
    /// Explicit start and end dates win over the period; the period falls
    /// back to the session default.
    pub fn resolve(
        query: &ReportQuery,
        default_period: Period,
        today: NaiveDate,
    ) -> Result<Self, AppError> {
        let period = query.period.unwrap_or(default_period);

        match (query.start_date, query.end_date) {
            (Some(start), Some(end)) => {
                if end < start {
                    return Err(AppError::field(
                        "endDate",
                        "End date must not be before start date",
                    ));
                }
                Ok(Self {
                    period,
                    label: "Custom range".to_string(),
                    range: DateRange::from_dates(start, end),
                })
            }
            (None, None) => Ok(Self {
                period,
                label: period.label().to_string(),
                range: period.range(today),
            }),
            (None, Some(_)) => Err(AppError::field("startDate", "Start date is required")),
            (Some(_), None) => Err(AppError::field("endDate", "End date is required")),
        }
    }
}

/// Display-ready figures built on the aggregation sums.
pub struct ReportService;

impl ReportService {
    pub async fn summary(
        pool: &SqlitePool,
        owner: &str,
        range: &DateRange,
    ) -> Result<Summary, AppError> {
        let total_income =
            AggregationService::total_amount(pool, owner, Kind::Income, range).await?;
        let total_expense =
            AggregationService::total_amount(pool, owner, Kind::Expense, range).await?;

        Ok(Summary {
            range: range.clone(),
            total_income,
            total_expense,
            balance: (total_income - total_expense).normalize(),
        })
    }

    /// Per-category slices of one kind, largest first.
    pub async fn category_breakdown(
        pool: &SqlitePool,
        owner: &str,
        kind: Kind,
        range: &DateRange,
    ) -> Result<CategoryBreakdown, AppError> {
        let totals = AggregationService::total_by_category(pool, owner, kind, range).await?;
        let total = totals.values().sum::<Decimal>().normalize();

        let mut slices: Vec<CategorySlice> = totals
            .into_iter()
            .map(|(name, amount)| CategorySlice {
                percent: share(amount, total),
                name,
                amount,
            })
            .collect();
        // BTreeMap order makes ties fall back to the name.
        slices.sort_by(|a, b| b.amount.cmp(&a.amount));

        Ok(CategoryBreakdown {
            kind,
            range: range.clone(),
            total,
            slices,
        })
    }

    pub async fn dashboard(
        pool: &SqlitePool,
        owner: &str,
        window: &ReportWindow,
        today: NaiveDate,
    ) -> Result<Dashboard, AppError> {
        let summary = Self::summary(pool, owner, &window.range).await?;
        let expenses = Self::category_breakdown(pool, owner, Kind::Expense, &window.range).await?;

        let compared = summary.total_income + summary.total_expense;
        let income_vs_expense = vec![
            CategorySlice {
                name: "Income".to_string(),
                amount: summary.total_income,
                percent: share(summary.total_income, compared),
            },
            CategorySlice {
                name: "Expense".to_string(),
                amount: summary.total_expense,
                percent: share(summary.total_expense, compared),
            },
        ];

        let current = Month::of(today);
        let monthly_expenses =
            AggregationService::monthly_expense_series(pool, owner, DASHBOARD_MONTHS, current)
                .await?;
        let budget_alerts = AggregationService::budget_alerts(pool, owner, current).await?;
        let recent = TransactionService::recent(pool, owner, DASHBOARD_RECENT).await?;

        Ok(Dashboard {
            period: window.period,
            period_label: window.label.clone(),
            summary,
            expense_breakdown: expenses.slices,
            income_vs_expense,
            monthly_expenses,
            budget_alerts,
            recent_transactions: recent.into_iter().map(Into::into).collect(),
        })
    }

    /// Plain-text report suitable for sharing.
    pub async fn text_report(
        pool: &SqlitePool,
        owner: &str,
        window: &ReportWindow,
        today: NaiveDate,
    ) -> Result<String, AppError> {
        let user = AuthService::get_user(pool, owner).await?;
        let summary = Self::summary(pool, owner, &window.range).await?;
        let income = Self::category_breakdown(pool, owner, Kind::Income, &window.range).await?;
        let expenses = Self::category_breakdown(pool, owner, Kind::Expense, &window.range).await?;
        let current = Month::of(today);
        let budgets = BudgetService::list_for_month(pool, owner, current).await?;

        let mut lines = vec![
            "FINANCIAL REPORT".to_string(),
            format!("Prepared for: {} {}", user.first_name, user.last_name),
            format!(
                "Period: {} ({} to {})",
                window.label, window.range.start, window.range.end
            ),
            String::new(),
            "SUMMARY".to_string(),
            format!("Total income: {}", format_currency(summary.total_income)),
            format!("Total expenses: {}", format_currency(summary.total_expense)),
            format!("Balance: {}", format_currency(summary.balance)),
            String::new(),
            "INCOME BY CATEGORY".to_string(),
        ];
        if income.slices.is_empty() {
            lines.push("No income recorded".to_string());
        }
        lines.extend(
            income
                .slices
                .iter()
                .map(|slice| format!("{}: {}", slice.name, format_currency(slice.amount))),
        );

        lines.push(String::new());
        lines.push("EXPENSES BY CATEGORY".to_string());
        if expenses.slices.is_empty() {
            lines.push("No expenses recorded".to_string());
        }
        lines.extend(expenses.slices.iter().map(|slice| {
            format!(
                "{}: {} ({})",
                slice.name,
                format_currency(slice.amount),
                format_percent(slice.percent)
            )
        }));

        lines.push(String::new());
        lines.push(format!("BUDGET STATUS ({})", current.long_label()));
        if budgets.items.is_empty() {
            lines.push("No budgets set".to_string());
        }
        lines.extend(budgets.items.iter().map(|item| {
            format!(
                "{}: {} / {} - {}",
                item.category_name,
                format_currency(item.spent),
                format_currency(item.budget.limit),
                if item.status.is_over_limit { "OVER" } else { "OK" }
            )
        }));

        let mut report = lines.join("\n");
        report.push('\n');
        Ok(report)
    }
}

/// Percentage to the cent, 0 for an empty total
fn share(amount: Decimal, total: Decimal) -> Decimal {
    money::round_cents(money::percent_of(amount, total))
}
