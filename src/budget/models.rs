use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::MONTH_REGEX;
use crate::money::{self, validate_limit, validate_percentage};
use crate::report::models::BudgetStatus;

/// Database entity for budgets
#[derive(Debug, Clone)]
pub struct Budget {
    pub id: i64,
    pub owner_email: String,
    pub category_id: i64,
    pub limit: Decimal,
    /// `yyyy-MM`
    pub month: String,
    pub alert_enabled: bool,
    /// Percent of the limit, 0-100
    pub alert_threshold: Decimal,
}

impl<'r> FromRow<'r, SqliteRow> for Budget {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            owner_email: row.try_get("owner_email")?,
            category_id: row.try_get("category_id")?,
            limit: money::decode(row, "budget_limit")?,
            month: row.try_get("month")?,
            alert_enabled: row.try_get("alert_enabled")?,
            alert_threshold: money::decode(row, "alert_threshold")?,
        })
    }
}

/// Budget row with its category name ("Unknown" for a deleted category)
#[derive(Debug, Clone)]
pub struct BudgetRow {
    pub budget: Budget,
    pub category_name: String,
}

impl<'r> FromRow<'r, SqliteRow> for BudgetRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            budget: Budget::from_row(row)?,
            category_name: row.try_get("category_name")?,
        })
    }
}

/// A budget measured against the month's spending
#[derive(Debug, Clone)]
pub struct BudgetWithSpending {
    pub budget: Budget,
    pub category_name: String,
    pub spent: Decimal,
    pub status: BudgetStatus,
}

/// Budgets of one month with their totals
#[derive(Debug, Clone)]
pub struct MonthBudgets {
    pub month: String,
    pub items: Vec<BudgetWithSpending>,
}

impl MonthBudgets {
    pub fn total_limit(&self) -> Decimal {
        self.items.iter().map(|b| b.budget.limit).sum()
    }

    pub fn total_spent(&self) -> Decimal {
        self.items.iter().map(|b| b.spent).sum()
    }
}

/// Budget information returned in responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResponse {
    pub id: i64,
    pub category_id: i64,
    #[schema(example = "Food")]
    pub category_name: String,
    #[schema(example = "100")]
    pub limit: Decimal,
    #[schema(example = "2024-06")]
    pub month: String,
    pub alert_enabled: bool,
    #[schema(example = "50")]
    pub alert_threshold: Decimal,
    #[schema(example = "60")]
    pub spent: Decimal,
    /// Computed: limit - spent
    #[schema(example = "40")]
    pub remaining: Decimal,
    pub status: BudgetStatus,
}

impl From<BudgetWithSpending> for BudgetResponse {
    fn from(b: BudgetWithSpending) -> Self {
        Self {
            id: b.budget.id,
            category_id: b.budget.category_id,
            category_name: b.category_name,
            limit: b.budget.limit,
            month: b.budget.month,
            alert_enabled: b.budget.alert_enabled,
            alert_threshold: b.budget.alert_threshold,
            spent: b.spent,
            remaining: money::round_cents(b.budget.limit - b.spent),
            status: b.status,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetListResponse {
    #[schema(example = "2024-06")]
    pub month: String,
    pub budgets: Vec<BudgetResponse>,
    pub total_limit: Decimal,
    pub total_spent: Decimal,
    pub remaining: Decimal,
}

impl From<MonthBudgets> for BudgetListResponse {
    fn from(month: MonthBudgets) -> Self {
        let total_limit = money::round_cents(month.total_limit());
        let total_spent = money::round_cents(month.total_spent());
        Self {
            month: month.month,
            budgets: month.items.into_iter().map(Into::into).collect(),
            total_limit,
            total_spent,
            remaining: money::round_cents(total_limit - total_spent),
        }
    }
}

fn default_alert_enabled() -> bool {
    true
}

fn default_alert_threshold() -> Decimal {
    Decimal::from(50)
}

/// DTO for creating a budget
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetDto {
    /// An EXPENSE category visible to the user
    pub category_id: i64,

    /// More than zero, at most two decimal places
    #[validate(custom(function = "validate_limit"))]
    #[schema(example = 100.00)]
    pub limit: Decimal,

    #[validate(regex(path = *MONTH_REGEX, message = "Month must be in yyyy-MM format"))]
    #[schema(example = "2024-06")]
    pub month: String,

    #[serde(default = "default_alert_enabled")]
    pub alert_enabled: bool,

    #[validate(custom(function = "validate_percentage"))]
    #[serde(default = "default_alert_threshold")]
    #[schema(example = 50)]
    pub alert_threshold: Decimal,
}

/// DTO for updating a budget (all fields optional for PATCH semantics)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetDto {
    pub category_id: Option<i64>,

    #[validate(custom(function = "validate_limit"))]
    pub limit: Option<Decimal>,

    #[validate(regex(path = *MONTH_REGEX, message = "Month must be in yyyy-MM format"))]
    pub month: Option<String>,

    pub alert_enabled: Option<bool>,

    #[validate(custom(function = "validate_percentage"))]
    pub alert_threshold: Option<Decimal>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct BudgetIdPath {
    pub id: i64,
}

/// Query parameters for listing budgets
#[derive(Debug, Deserialize, Validate, IntoParams)]
pub struct BudgetQuery {
    /// `yyyy-MM`, defaults to the current month
    #[validate(regex(path = *MONTH_REGEX, message = "Month must be in yyyy-MM format"))]
    #[param(example = "2024-06")]
    pub month: Option<String>,
}
