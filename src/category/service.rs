use sqlx::SqlitePool;
use tracing::info;

use super::models::{Category, CreateCategoryDto, UpdateCategoryDto, UNKNOWN_CATEGORY};
use crate::errors::AppError;
use crate::models::Kind;

/// Service layer for category business logic.
pub struct CategoryService;

impl CategoryService {
    /// Shared defaults plus the owner's custom categories, defaults first.
    pub async fn list(
        pool: &SqlitePool,
        owner: &str,
        kind: Option<Kind>,
    ) -> Result<Vec<Category>, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, kind, owner_email
            FROM categories
            WHERE (owner_email IS NULL OR owner_email = ?)
              AND (? IS NULL OR kind = ?)
            ORDER BY owner_email IS NOT NULL, id
            "#,
        )
        .bind(owner)
        .bind(kind)
        .bind(kind)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    /// Category by id, if it is a default or belongs to the owner
    pub async fn get_visible(
        pool: &SqlitePool,
        owner: &str,
        category_id: i64,
    ) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, kind, owner_email
            FROM categories
            WHERE id = ? AND (owner_email IS NULL OR owner_email = ?)
            "#,
        )
        .bind(category_id)
        .bind(owner)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    /// Name of a category, or "Unknown" when the id no longer exists.
    pub async fn name_or_unknown(pool: &SqlitePool, category_id: i64) -> Result<String, AppError> {
        let name = sqlx::query_scalar::<_, String>("SELECT name FROM categories WHERE id = ?")
            .bind(category_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok(name.unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()))
    }

    pub async fn create(
        pool: &SqlitePool,
        owner: &str,
        dto: &CreateCategoryDto,
    ) -> Result<Category, AppError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, kind, owner_email)
            VALUES (?, ?, ?)
            RETURNING id, name, kind, owner_email
            "#,
        )
        .bind(dto.name.trim())
        .bind(dto.kind)
        .bind(owner)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        info!(id = category.id, kind = %category.kind, "Category created");
        Ok(category)
    }

    /// Rename a custom category. Defaults are read-only.
    pub async fn update(
        pool: &SqlitePool,
        owner: &str,
        category_id: i64,
        dto: &UpdateCategoryDto,
    ) -> Result<Category, AppError> {
        Self::get_owned(pool, owner, category_id).await?;

        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET name = ?
            WHERE id = ? AND owner_email = ?
            RETURNING id, name, kind, owner_email
            "#,
        )
        .bind(dto.name.trim())
        .bind(category_id)
        .bind(owner)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    /// Delete a custom category. Transactions and budgets that reference it
    /// are left in place and resolve to "Unknown" afterwards.
    pub async fn delete(pool: &SqlitePool, owner: &str, category_id: i64) -> Result<(), AppError> {
        Self::get_owned(pool, owner, category_id).await?;

        sqlx::query("DELETE FROM categories WHERE id = ? AND owner_email = ?")
            .bind(category_id)
            .bind(owner)
            .execute(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        info!(id = category_id, "Category deleted");
        Ok(())
    }

    async fn get_owned(
        pool: &SqlitePool,
        owner: &str,
        category_id: i64,
    ) -> Result<Category, AppError> {
        let category = Self::get_visible(pool, owner, category_id).await?;
        if category.is_default() {
            return Err(AppError::ValidationError(
                "Default categories cannot be changed".to_string(),
            ));
        }
        Ok(category)
    }
}
