use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::Kind;
use crate::money::{self, validate_amount};

/// Transaction row joined with its category name ("Unknown" when the
/// category was deleted)
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: i64,
    pub owner_email: String,
    pub kind: Kind,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_id: i64,
    pub description: Option<String>,
    pub category_name: String,
}

impl<'r> FromRow<'r, SqliteRow> for Transaction {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            owner_email: row.try_get("owner_email")?,
            kind: row.try_get("kind")?,
            amount: money::decode(row, "amount")?,
            date: row.try_get("date")?,
            category_id: row.try_get("category_id")?,
            description: row.try_get("description")?,
            category_name: row.try_get("category_name")?,
        })
    }
}

/// Transaction information returned in responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: i64,
    pub kind: Kind,
    #[schema(example = "50.25")]
    pub amount: Decimal,
    #[schema(value_type = String, example = "2024-06-05")]
    pub date: NaiveDate,
    pub category_id: i64,
    #[schema(example = "Food")]
    pub category_name: String,
    #[schema(example = "Lunch")]
    pub description: Option<String>,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            kind: t.kind,
            amount: t.amount,
            date: t.date,
            category_id: t.category_id,
            category_name: t.category_name,
            description: t.description,
        }
    }
}

/// Request body for recording a transaction
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionDto {
    pub kind: Kind,

    /// Zero or more, at most two decimal places
    #[validate(custom(function = "validate_amount"))]
    #[schema(example = 50.25)]
    pub amount: Decimal,

    #[schema(value_type = String, example = "2024-06-05")]
    pub date: NaiveDate,

    /// Category of the same kind as the transaction
    pub category_id: i64,

    #[validate(length(max = 200, message = "Description cannot exceed 200 characters"))]
    #[schema(example = "Lunch")]
    pub description: Option<String>,
}

/// Request body for updating a transaction (PATCH - all fields optional)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionDto {
    pub kind: Option<Kind>,

    #[validate(custom(function = "validate_amount"))]
    #[schema(example = 75.00)]
    pub amount: Option<Decimal>,

    #[schema(value_type = Option<String>, example = "2024-06-10")]
    pub date: Option<NaiveDate>,

    pub category_id: Option<i64>,

    #[validate(length(max = 200, message = "Description cannot exceed 200 characters"))]
    pub description: Option<String>,
}

/// Query parameters for listing transactions
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilters {
    pub kind: Option<Kind>,
    pub category_id: Option<i64>,
    /// First day included
    #[param(value_type = Option<String>, example = "2024-06-01")]
    pub start_date: Option<NaiveDate>,
    /// Last day included
    #[param(value_type = Option<String>, example = "2024-06-30")]
    pub end_date: Option<NaiveDate>,

    /// Maximum results (1-100)
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    #[serde(default = "default_limit")]
    #[param(example = 50)]
    pub limit: i64,

    #[validate(range(min = 0, message = "Offset cannot be negative"))]
    #[serde(default)]
    #[param(example = 0)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedTransactionResponse {
    pub data: Vec<TransactionResponse>,
    /// Total count matching filters
    #[schema(example = 100)]
    pub total: i64,
    #[schema(example = 50)]
    pub limit: i64,
    #[schema(example = 0)]
    pub offset: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TransactionIdPath {
    pub id: i64,
}
