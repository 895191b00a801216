use sqlx::SqlitePool;
use tracing::{debug, info};

use super::models::{CreateTransactionDto, Transaction, TransactionFilters, UpdateTransactionDto};
use crate::category::CategoryService;
use crate::errors::AppError;
use crate::models::{date_key, Kind};
use crate::money;

/// Columns of a transaction plus the resolved category name.
const SELECT_TRANSACTION: &str = r#"
    SELECT t.id, t.owner_email, t.kind, t.amount, t.date, t.category_id, t.description,
           COALESCE(c.name, 'Unknown') AS category_name
    FROM transactions t
    LEFT JOIN categories c ON c.id = t.category_id
"#;

const FILTERS: &str = r#"
    WHERE t.owner_email = ?
      AND (? IS NULL OR t.kind = ?)
      AND (? IS NULL OR t.category_id = ?)
      AND (? IS NULL OR t.date >= ?)
      AND (? IS NULL OR t.date <= ?)
"#;

/// Service layer for transaction business logic.
pub struct TransactionService;

impl TransactionService {
    pub async fn create_transaction(
        pool: &SqlitePool,
        owner: &str,
        dto: &CreateTransactionDto,
    ) -> Result<Transaction, AppError> {
        Self::check_category(pool, owner, dto.category_id, dto.kind).await?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO transactions (owner_email, kind, amount, date, category_id, description)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(owner)
        .bind(dto.kind)
        .bind(money::encode(dto.amount))
        .bind(date_key(dto.date))
        .bind(dto.category_id)
        .bind(normalize_description(dto.description.as_deref()))
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        info!(id, kind = %dto.kind, amount = %dto.amount, "Transaction recorded");
        Self::get_transaction(pool, owner, id).await
    }

    pub async fn get_transaction(
        pool: &SqlitePool,
        owner: &str,
        transaction_id: i64,
    ) -> Result<Transaction, AppError> {
        let sql = format!("{SELECT_TRANSACTION} WHERE t.id = ? AND t.owner_email = ?");

        sqlx::query_as::<_, Transaction>(&sql)
            .bind(transaction_id)
            .bind(owner)
            .fetch_optional(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))
    }

    /// Apply the provided fields. Kind and category are re-checked together
    /// whenever either changes.
    pub async fn update_transaction(
        pool: &SqlitePool,
        owner: &str,
        transaction_id: i64,
        dto: &UpdateTransactionDto,
    ) -> Result<Transaction, AppError> {
        let existing = Self::get_transaction(pool, owner, transaction_id).await?;

        let new_kind = dto.kind.unwrap_or(existing.kind);
        let new_category_id = dto.category_id.unwrap_or(existing.category_id);
        if new_kind != existing.kind || new_category_id != existing.category_id {
            Self::check_category(pool, owner, new_category_id, new_kind).await?;
        }

        let new_amount = dto.amount.unwrap_or(existing.amount);
        let new_date = dto.date.unwrap_or(existing.date);
        let new_description = match &dto.description {
            Some(d) => normalize_description(Some(d)),
            None => existing.description,
        };

        sqlx::query(
            r#"
            UPDATE transactions SET
                kind = ?,
                amount = ?,
                date = ?,
                category_id = ?,
                description = ?
            WHERE id = ? AND owner_email = ?
            "#,
        )
        .bind(new_kind)
        .bind(money::encode(new_amount))
        .bind(date_key(new_date))
        .bind(new_category_id)
        .bind(&new_description)
        .bind(transaction_id)
        .bind(owner)
        .execute(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        Self::get_transaction(pool, owner, transaction_id).await
    }

    pub async fn delete_transaction(
        pool: &SqlitePool,
        owner: &str,
        transaction_id: i64,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ? AND owner_email = ?")
            .bind(transaction_id)
            .bind(owner)
            .execute(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Transaction not found".to_string()));
        }

        info!(id = transaction_id, "Transaction deleted");
        Ok(())
    }

    /// Newest first (date, then id), with the total count matching the filters
    pub async fn list_transactions(
        pool: &SqlitePool,
        owner: &str,
        filters: &TransactionFilters,
    ) -> Result<(Vec<Transaction>, i64), AppError> {
        let start = filters.start_date.map(date_key);
        let end = filters.end_date.map(date_key);

        let sql = format!(
            "{SELECT_TRANSACTION} {FILTERS} ORDER BY t.date DESC, t.id DESC LIMIT ? OFFSET ?"
        );
        let transactions = sqlx::query_as::<_, Transaction>(&sql)
            .bind(owner)
            .bind(filters.kind)
            .bind(filters.kind)
            .bind(filters.category_id)
            .bind(filters.category_id)
            .bind(&start)
            .bind(&start)
            .bind(&end)
            .bind(&end)
            .bind(filters.limit.min(100))
            .bind(filters.offset)
            .fetch_all(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let count_sql = format!("SELECT COUNT(*) FROM transactions t {FILTERS}");
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(owner)
            .bind(filters.kind)
            .bind(filters.kind)
            .bind(filters.category_id)
            .bind(filters.category_id)
            .bind(&start)
            .bind(&start)
            .bind(&end)
            .bind(&end)
            .fetch_one(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        debug!(owner, total, "Listed transactions");
        Ok((transactions, total))
    }

    /// Most recent transactions of the owner
    pub async fn recent(
        pool: &SqlitePool,
        owner: &str,
        limit: i64,
    ) -> Result<Vec<Transaction>, AppError> {
        let sql = format!(
            "{SELECT_TRANSACTION} WHERE t.owner_email = ? ORDER BY t.date DESC, t.id DESC LIMIT ?"
        );

        sqlx::query_as::<_, Transaction>(&sql)
            .bind(owner)
            .bind(limit)
            .fetch_all(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))
    }

    /// The category must be visible to the owner and of the transaction's kind.
    async fn check_category(
        pool: &SqlitePool,
        owner: &str,
        category_id: i64,
        kind: Kind,
    ) -> Result<(), AppError> {
        let category = match CategoryService::get_visible(pool, owner, category_id).await {
            Ok(category) => category,
            Err(AppError::NotFound(_)) => {
                return Err(AppError::field("categoryId", "Select a valid category"))
            }
            Err(e) => return Err(e),
        };

        if category.kind != kind {
            return Err(AppError::field(
                "categoryId",
                format!("Category must be an {} category", kind.as_str().to_lowercase()),
            ));
        }
        Ok(())
    }
}

fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}
