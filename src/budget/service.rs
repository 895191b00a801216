use sqlx::SqlitePool;
use tracing::info;

use super::models::{
    Budget, BudgetRow, BudgetWithSpending, CreateBudgetDto, MonthBudgets, UpdateBudgetDto,
};
use crate::category::CategoryService;
use crate::errors::AppError;
use crate::models::{Kind, Month};
use crate::money;
use crate::report::{budget_status, AggregationService};

const SELECT_BUDGET: &str = r#"
    SELECT b.id, b.owner_email, b.category_id, b.budget_limit, b.month,
           b.alert_enabled, b.alert_threshold,
           COALESCE(c.name, 'Unknown') AS category_name
    FROM budgets b
    LEFT JOIN categories c ON c.id = b.category_id
"#;

/// Service layer for budget business logic.
pub struct BudgetService;

impl BudgetService {
    /// Budgets of a month, each with what was spent against it.
    pub async fn list_for_month(
        pool: &SqlitePool,
        owner: &str,
        month: Month,
    ) -> Result<MonthBudgets, AppError> {
        let sql = format!("{SELECT_BUDGET} WHERE b.owner_email = ? AND b.month = ? ORDER BY b.id");
        let rows = sqlx::query_as::<_, BudgetRow>(&sql)
            .bind(owner)
            .bind(month.key())
            .fetch_all(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(Self::measure(pool, row, month).await?);
        }

        Ok(MonthBudgets {
            month: month.key(),
            items,
        })
    }

    pub async fn get_budget(
        pool: &SqlitePool,
        owner: &str,
        budget_id: i64,
    ) -> Result<BudgetWithSpending, AppError> {
        let row = Self::find(pool, owner, budget_id).await?;
        let month = Month::parse(&row.budget.month).ok_or_else(|| {
            AppError::InternalError(format!("Budget {budget_id} has malformed month"))
        })?;

        Self::measure(pool, row, month).await
    }

    /// Create a budget. The category and the (category, month) uniqueness are
    /// checked before anything is written.
    pub async fn create_budget(
        pool: &SqlitePool,
        owner: &str,
        dto: &CreateBudgetDto,
    ) -> Result<BudgetWithSpending, AppError> {
        Self::check_category(pool, owner, dto.category_id).await?;
        Self::check_unique(pool, owner, dto.category_id, &dto.month, None).await?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO budgets
                (owner_email, category_id, budget_limit, month, alert_enabled, alert_threshold)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(owner)
        .bind(dto.category_id)
        .bind(money::encode(dto.limit))
        .bind(&dto.month)
        .bind(dto.alert_enabled)
        .bind(money::encode(dto.alert_threshold))
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        info!(id, category_id = dto.category_id, month = %dto.month, "Budget created");
        Self::get_budget(pool, owner, id).await
    }

    /// Update a budget (partial update - PATCH semantics).
    pub async fn update_budget(
        pool: &SqlitePool,
        owner: &str,
        budget_id: i64,
        dto: &UpdateBudgetDto,
    ) -> Result<BudgetWithSpending, AppError> {
        let current = Self::find(pool, owner, budget_id).await?.budget;

        let new_category_id = dto.category_id.unwrap_or(current.category_id);
        let new_month = dto.month.clone().unwrap_or_else(|| current.month.clone());
        let new_limit = dto.limit.unwrap_or(current.limit);
        let new_alert_enabled = dto.alert_enabled.unwrap_or(current.alert_enabled);
        let new_alert_threshold = dto.alert_threshold.unwrap_or(current.alert_threshold);

        if new_category_id != current.category_id {
            Self::check_category(pool, owner, new_category_id).await?;
        }
        if new_category_id != current.category_id || new_month != current.month {
            Self::check_unique(pool, owner, new_category_id, &new_month, Some(budget_id)).await?;
        }

        sqlx::query(
            r#"
            UPDATE budgets
            SET category_id = ?, budget_limit = ?, month = ?, alert_enabled = ?, alert_threshold = ?
            WHERE id = ? AND owner_email = ?
            "#,
        )
        .bind(new_category_id)
        .bind(money::encode(new_limit))
        .bind(&new_month)
        .bind(new_alert_enabled)
        .bind(money::encode(new_alert_threshold))
        .bind(budget_id)
        .bind(owner)
        .execute(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        Self::get_budget(pool, owner, budget_id).await
    }

    pub async fn delete_budget(
        pool: &SqlitePool,
        owner: &str,
        budget_id: i64,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = ? AND owner_email = ?")
            .bind(budget_id)
            .bind(owner)
            .execute(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Budget not found".to_string()));
        }

        Ok(())
    }

    async fn find(pool: &SqlitePool, owner: &str, budget_id: i64) -> Result<BudgetRow, AppError> {
        let sql = format!("{SELECT_BUDGET} WHERE b.id = ? AND b.owner_email = ?");

        sqlx::query_as::<_, BudgetRow>(&sql)
            .bind(budget_id)
            .bind(owner)
            .fetch_optional(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?
            .ok_or_else(|| AppError::NotFound("Budget not found".to_string()))
    }

    async fn measure(
        pool: &SqlitePool,
        row: BudgetRow,
        month: Month,
    ) -> Result<BudgetWithSpending, AppError> {
        let budget: Budget = row.budget;
        let spent = AggregationService::spending_for_category(
            pool,
            &budget.owner_email,
            budget.category_id,
            month,
        )
        .await?;
        let status = budget_status(&budget, spent);

        Ok(BudgetWithSpending {
            budget,
            category_name: row.category_name,
            spent,
            status,
        })
    }

    async fn check_category(
        pool: &SqlitePool,
        owner: &str,
        category_id: i64,
    ) -> Result<(), AppError> {
        let category = match CategoryService::get_visible(pool, owner, category_id).await {
            Ok(category) => category,
            Err(AppError::NotFound(_)) => {
                return Err(AppError::field("categoryId", "Select a valid category"))
            }
            Err(e) => return Err(e),
        };

        if category.kind != Kind::Expense {
            return Err(AppError::field(
                "categoryId",
                "Budgets can only be set for expense categories",
            ));
        }
        Ok(())
    }

    /// At most one budget per (owner, category, month).
    async fn check_unique(
        pool: &SqlitePool,
        owner: &str,
        category_id: i64,
        month: &str,
        except_id: Option<i64>,
    ) -> Result<(), AppError> {
        let exists = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM budgets
            WHERE owner_email = ? AND category_id = ? AND month = ?
              AND (? IS NULL OR id != ?)
            "#,
        )
        .bind(owner)
        .bind(category_id)
        .bind(month)
        .bind(except_id)
        .bind(except_id)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        if exists > 0 {
            return Err(AppError::conflict(
                "categoryId",
                format!("A budget for this category already exists for {month}"),
            ));
        }
        Ok(())
    }
}
