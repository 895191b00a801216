use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{DateRange, Kind, Period};
use crate::transaction::models::TransactionResponse;

/// Spend of a budget measured against its limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    /// `spent / limit * 100` to the cent, or 0 for a zero limit
    #[schema(example = "60")]
    pub percent_used: Decimal,
    /// Spent reached the alert threshold
    pub is_over_threshold: bool,
    /// Spent reached the limit
    pub is_over_limit: bool,
}

/// Total expense of one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthTotal {
    #[schema(example = "2024-06")]
    pub month: String,
    #[schema(example = "Jun")]
    pub label: String,
    #[schema(example = "80")]
    pub total: Decimal,
}

/// Budget whose spend crossed its alert threshold
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlert {
    pub budget_id: i64,
    pub category_id: i64,
    #[schema(example = "Food")]
    pub category_name: String,
    #[schema(example = "2024-06")]
    pub month: String,
    #[schema(example = "100")]
    pub limit: Decimal,
    #[schema(example = "60")]
    pub spent: Decimal,
    #[schema(example = "50")]
    pub alert_threshold: Decimal,
    pub status: BudgetStatus,
    /// Ready-to-show alert text
    #[schema(example = "Food: 60.0% of budget used")]
    pub message: String,
}

/// Income, expense and balance over a date range
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub range: DateRange,
    #[schema(example = "1000")]
    pub total_income: Decimal,
    #[schema(example = "80")]
    pub total_expense: Decimal,
    #[schema(example = "920")]
    pub balance: Decimal,
}

/// One slice of a category chart
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategorySlice {
    #[schema(example = "Food")]
    pub name: String,
    #[schema(example = "80")]
    pub amount: Decimal,
    /// Share of the kind's total, 0-100
    #[schema(example = "100")]
    pub percent: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub kind: Kind,
    pub range: DateRange,
    pub total: Decimal,
    pub slices: Vec<CategorySlice>,
}

/// Everything the home screen shows
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub period: Period,
    #[schema(example = "This month")]
    pub period_label: String,
    pub summary: Summary,
    pub expense_breakdown: Vec<CategorySlice>,
    /// Two-bar comparison, income first
    pub income_vs_expense: Vec<CategorySlice>,
    /// Trailing six months, oldest first
    pub monthly_expenses: Vec<MonthTotal>,
    pub budget_alerts: Vec<BudgetAlert>,
    pub recent_transactions: Vec<TransactionResponse>,
}

/// Query parameters selecting the reporting window.
///
/// `startDate`/`endDate` together win over `period`; without either the
/// session's default period applies.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub period: Option<Period>,
    #[param(value_type = Option<String>, example = "2024-06-01")]
    pub start_date: Option<NaiveDate>,
    #[param(value_type = Option<String>, example = "2024-06-30")]
    pub end_date: Option<NaiveDate>,
    /// Kind for the category breakdown (defaults to EXPENSE)
    pub kind: Option<Kind>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct MonthlyQuery {
    /// Number of trailing months, current month included
    #[validate(range(min = 1, max = 24, message = "Months must be between 1 and 24"))]
    #[serde(default = "default_months")]
    #[param(example = 6)]
    pub months: u32,
}

pub(crate) fn default_months() -> u32 {
    6
}
