use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::models::Kind;

pub const DEFAULT_INCOME_CATEGORIES: [&str; 6] = [
    "Salary",
    "Scholarship",
    "Freelance",
    "Investments",
    "Gifts",
    "Other Income",
];

pub const DEFAULT_EXPENSE_CATEGORIES: [&str; 10] = [
    "Food",
    "Bills",
    "Rent",
    "Transportation",
    "Entertainment",
    "Shopping",
    "Healthcare",
    "Education",
    "Groceries",
    "Other Expense",
];

// Category references are not declared as foreign keys: deleting a custom
// category leaves its transactions and budgets pointing at a missing id,
// which readers resolve to "Unknown". Money columns hold decimal TEXT.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        email      TEXT PRIMARY KEY,
        first_name TEXT NOT NULL,
        last_name  TEXT NOT NULL,
        password   TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL,
        kind        TEXT NOT NULL,
        owner_email TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_email TEXT NOT NULL,
        kind        TEXT NOT NULL,
        amount      TEXT NOT NULL,
        date        TEXT NOT NULL,
        category_id INTEGER NOT NULL,
        description TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS budgets (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_email     TEXT NOT NULL,
        category_id     INTEGER NOT NULL,
        budget_limit    TEXT NOT NULL,
        month           TEXT NOT NULL,
        alert_enabled   INTEGER NOT NULL DEFAULT 1,
        alert_threshold TEXT NOT NULL DEFAULT '50'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS preferences (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_transactions_owner_date ON transactions (owner_email, date)",
    "CREATE INDEX IF NOT EXISTS idx_budgets_owner_month ON budgets (owner_email, month)",
];

/// Open (creating if needed) the store and bring its schema up to date.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(false);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory store. Every pooled connection to
/// `sqlite::memory:` is its own database, so the pool is pinned to one
/// connection that never expires.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(false);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    seed_default_categories(pool).await
}

/// Insert the shared default categories the first time the store is opened.
async fn seed_default_categories(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM categories WHERE owner_email IS NULL",
    )
    .fetch_one(pool)
    .await?;

    if existing > 0 {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    let defaults = DEFAULT_INCOME_CATEGORIES
        .iter()
        .map(|name| (*name, Kind::Income))
        .chain(
            DEFAULT_EXPENSE_CATEGORIES
                .iter()
                .map(|name| (*name, Kind::Expense)),
        );

    for (name, kind) in defaults {
        sqlx::query("INSERT INTO categories (name, kind, owner_email) VALUES (?, ?, NULL)")
            .bind(name)
            .bind(kind)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    info!(
        income = DEFAULT_INCOME_CATEGORIES.len(),
        expense = DEFAULT_EXPENSE_CATEGORIES.len(),
        "Seeded default categories"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_defaults_seeded_once() {
        let pool = connect_in_memory().await.expect("Should open store");
        init_schema(&pool).await.expect("Re-running schema should be harmless");

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM categories WHERE owner_email IS NULL",
        )
        .fetch_one(&pool)
        .await
        .expect("Should count");

        assert_eq!(count, 16);
    }

    #[actix_rt::test]
    async fn test_default_kinds() {
        let pool = connect_in_memory().await.expect("Should open store");

        let income = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM categories WHERE kind = 'INCOME'",
        )
        .fetch_one(&pool)
        .await
        .expect("Should count");

        assert_eq!(income, 6);
    }
}
