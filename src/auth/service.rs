use sqlx::SqlitePool;
use tracing::info;

use crate::errors::AppError;

use super::models::{ChangePasswordDto, CreateUserDto, UpdateProfileDto, User};
use super::password::verify_password;

/// User accounts: signup, credential checks and profile changes
pub struct AuthService;

impl AuthService {
    /// Register a new user. Registration does not start a session.
    pub async fn register(pool: &SqlitePool, dto: &CreateUserDto) -> Result<User, AppError> {
        let email = dto.email.trim();

        let existing_user =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = ?")
                .bind(email)
                .fetch_one(pool)
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?;

        if existing_user > 0 {
            return Err(AppError::conflict("email", "Email already registered"));
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, first_name, last_name, password)
            VALUES (?, ?, ?, ?)
            RETURNING email, first_name, last_name, password
            "#,
        )
        .bind(email)
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(&dto.password)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        info!(email = %user.email, "User registered");
        Ok(user)
    }

    /// Check credentials; the caller records the session.
    pub async fn login(pool: &SqlitePool, email: &str, password: &str) -> Result<User, AppError> {
        let user = Self::find(pool, email.trim())
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        if !verify_password(password, &user.password) {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        Ok(user)
    }

    pub async fn get_user(pool: &SqlitePool, email: &str) -> Result<User, AppError> {
        Self::find(pool, email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))
    }

    pub async fn update_profile(
        pool: &SqlitePool,
        email: &str,
        dto: &UpdateProfileDto,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET first_name = ?, last_name = ?
            WHERE email = ?
            RETURNING email, first_name, last_name, password
            "#,
        )
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))
    }

    pub async fn change_password(
        pool: &SqlitePool,
        email: &str,
        dto: &ChangePasswordDto,
    ) -> Result<(), AppError> {
        let user = Self::get_user(pool, email).await?;

        if !verify_password(&dto.current_password, &user.password) {
            return Err(AppError::field(
                "currentPassword",
                "Current password is incorrect",
            ));
        }
        if dto.new_password == dto.current_password {
            return Err(AppError::field(
                "newPassword",
                "New password must differ from the current password",
            ));
        }

        sqlx::query("UPDATE users SET password = ? WHERE email = ?")
            .bind(&dto.new_password)
            .bind(email)
            .execute(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        info!(email, "Password changed");
        Ok(())
    }

    async fn find(pool: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT email, first_name, last_name, password FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }
}
