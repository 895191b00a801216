use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::Period;

use super::models::Preferences;

const KEY_IS_LOGGED_IN: &str = "is_logged_in";
const KEY_USER_EMAIL: &str = "user_email";
const KEY_REMEMBER_ME: &str = "remember_me";
const KEY_DARK_MODE: &str = "dark_mode";
const KEY_DEFAULT_PERIOD: &str = "default_period";

/// Device session and app settings.
///
/// Built once at startup and shared through `web::Data`. Reads come from the
/// in-memory copy; changes are written through to the `preferences` table
/// first and published to memory after the commit.
pub struct SessionStore {
    pool: SqlitePool,
    state: RwLock<Preferences>,
    /// Serializes updates so concurrent changes cannot drop each other
    writer: Mutex<()>,
}

impl SessionStore {
    /// Load the persisted preferences, falling back to defaults for missing keys.
    pub async fn load(pool: SqlitePool) -> Result<Self, AppError> {
        let rows = sqlx::query_as::<_, (String, String)>("SELECT key, value FROM preferences")
            .fetch_all(&pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let mut prefs = Preferences::default();
        for (key, value) in rows {
            match key.as_str() {
                KEY_IS_LOGGED_IN => prefs.logged_in = value == "true",
                KEY_USER_EMAIL => prefs.user_email = Some(value),
                KEY_REMEMBER_ME => prefs.remember_me = value == "true",
                KEY_DARK_MODE => prefs.dark_mode = value == "true",
                KEY_DEFAULT_PERIOD => {
                    prefs.default_period = Period::parse(&value).unwrap_or_default()
                }
                other => debug!(key = other, "Ignoring unknown preference"),
            }
        }

        Ok(Self {
            pool,
            state: RwLock::new(prefs),
            writer: Mutex::new(()),
        })
    }

    pub fn snapshot(&self) -> Preferences {
        self.read().clone()
    }

    /// Email of the logged-in user, if any.
    pub fn current_user(&self) -> Option<String> {
        let state = self.read();
        if state.logged_in {
            state.user_email.clone()
        } else {
            None
        }
    }

    /// Email to pre-fill on the login form; only kept with remember-me.
    pub fn saved_email(&self) -> Option<String> {
        let state = self.read();
        if state.remember_me {
            state.user_email.clone()
        } else {
            None
        }
    }

    pub async fn save_user_session(&self, email: &str, remember_me: bool) -> Result<(), AppError> {
        self.update(|prefs| {
            prefs.logged_in = true;
            prefs.user_email = Some(email.to_string());
            prefs.remember_me = remember_me;
        })
        .await?;

        info!(email, remember_me, "Session started");
        Ok(())
    }

    /// End the session. The email survives only when remember-me is on.
    pub async fn logout(&self) -> Result<(), AppError> {
        self.update(|prefs| {
            prefs.logged_in = false;
            if !prefs.remember_me {
                prefs.user_email = None;
            }
        })
        .await?;
        Ok(())
    }

    /// Drop every session key; settings are kept.
    pub async fn clear_session(&self) -> Result<(), AppError> {
        self.update(|prefs| {
            prefs.logged_in = false;
            prefs.user_email = None;
            prefs.remember_me = false;
        })
        .await?;

        info!("Session cleared");
        Ok(())
    }

    /// Change whichever settings are given, together.
    pub async fn update_settings(
        &self,
        dark_mode: Option<bool>,
        default_period: Option<Period>,
    ) -> Result<Preferences, AppError> {
        self.update(|prefs| {
            if let Some(enabled) = dark_mode {
                prefs.dark_mode = enabled;
            }
            if let Some(period) = default_period {
                prefs.default_period = period;
            }
        })
        .await
    }

    /// Apply `change` to a copy, persist the copy, then publish it.
    ///
    /// The in-memory state only moves once the write has committed, so a
    /// failed write leaves both sides as they were.
    async fn update<F>(&self, change: F) -> Result<Preferences, AppError>
    where
        F: FnOnce(&mut Preferences),
    {
        let _writer = self.writer.lock().await;

        let mut next = self.snapshot();
        change(&mut next);
        self.persist(&next).await?;

        *self.write() = next.clone();
        Ok(next)
    }

    /// Write every key in one transaction.
    async fn persist(&self, prefs: &Preferences) -> Result<(), AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let values = [
            (KEY_IS_LOGGED_IN, bool_value(prefs.logged_in)),
            (KEY_REMEMBER_ME, bool_value(prefs.remember_me)),
            (KEY_DARK_MODE, bool_value(prefs.dark_mode)),
            (KEY_DEFAULT_PERIOD, prefs.default_period.as_str()),
        ];
        for (key, value) in values {
            sqlx::query("INSERT OR REPLACE INTO preferences (key, value) VALUES (?, ?)")
                .bind(key)
                .bind(value)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::InternalError(e.to_string()))?;
        }

        let email = match &prefs.user_email {
            Some(email) => {
                sqlx::query("INSERT OR REPLACE INTO preferences (key, value) VALUES (?, ?)")
                    .bind(KEY_USER_EMAIL)
                    .bind(email)
            }
            None => sqlx::query("DELETE FROM preferences WHERE key = ?").bind(KEY_USER_EMAIL),
        };
        email
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))
    }

    // A panic while holding the lock cannot leave Preferences half-written
    // (all fields are plain values), so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Preferences> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Preferences> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn bool_value(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn store() -> (SqlitePool, SessionStore) {
        let pool = db::connect_in_memory().await.expect("Should open store");
        let store = SessionStore::load(pool.clone())
            .await
            .expect("Should load session");
        (pool, store)
    }

    #[actix_rt::test]
    async fn test_fresh_store_is_logged_out() {
        let (_, store) = store().await;
        let prefs = store.snapshot();

        assert!(!prefs.logged_in);
        assert!(store.current_user().is_none());
        assert_eq!(prefs.default_period, Period::Monthly);
        assert!(!prefs.dark_mode);
    }

    #[actix_rt::test]
    async fn test_logout_keeps_email_with_remember_me() {
        let (_, store) = store().await;
        store.save_user_session("a@test.com", true).await.unwrap();
        store.logout().await.unwrap();

        assert!(store.current_user().is_none());
        assert_eq!(store.saved_email().as_deref(), Some("a@test.com"));
    }

    #[actix_rt::test]
    async fn test_logout_forgets_email_without_remember_me() {
        let (_, store) = store().await;
        store.save_user_session("a@test.com", false).await.unwrap();
        assert_eq!(store.current_user().as_deref(), Some("a@test.com"));

        store.logout().await.unwrap();
        assert!(store.saved_email().is_none());
        assert!(store.snapshot().user_email.is_none());
    }

    #[actix_rt::test]
    async fn test_settings_survive_reload() {
        let (pool, store) = store().await;
        store.save_user_session("a@test.com", true).await.unwrap();
        store
            .update_settings(Some(true), Some(Period::Weekly))
            .await
            .unwrap();

        let reloaded = SessionStore::load(pool).await.unwrap();
        let prefs = reloaded.snapshot();
        assert!(prefs.logged_in);
        assert!(prefs.dark_mode);
        assert_eq!(prefs.default_period, Period::Weekly);
        assert_eq!(reloaded.current_user().as_deref(), Some("a@test.com"));
    }

    #[actix_rt::test]
    async fn test_clear_session_keeps_settings() {
        let (pool, store) = store().await;
        store.save_user_session("a@test.com", true).await.unwrap();
        store.update_settings(Some(true), None).await.unwrap();
        store.clear_session().await.unwrap();

        let reloaded = SessionStore::load(pool).await.unwrap();
        assert!(reloaded.saved_email().is_none());
        assert!(reloaded.snapshot().dark_mode);
    }

    #[actix_rt::test]
    async fn test_failed_write_leaves_session_untouched() {
        let (pool, store) = store().await;
        sqlx::query(
            r#"
            CREATE TRIGGER reject_remember_me BEFORE INSERT ON preferences
            WHEN NEW.key = 'remember_me'
            BEGIN
                SELECT RAISE(ABORT, 'disk full');
            END
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        assert!(store.save_user_session("a@test.com", true).await.is_err());

        assert!(store.current_user().is_none());
        assert!(store.saved_email().is_none());
        let reloaded = SessionStore::load(pool).await.unwrap();
        assert!(!reloaded.snapshot().logged_in);
        assert!(reloaded.snapshot().user_email.is_none());
    }

    #[actix_rt::test]
    async fn test_failed_write_keeps_previous_settings() {
        let (pool, store) = store().await;
        store
            .update_settings(Some(true), Some(Period::Weekly))
            .await
            .unwrap();
        sqlx::query("DROP TABLE preferences")
            .execute(&pool)
            .await
            .unwrap();

        assert!(store
            .update_settings(Some(false), Some(Period::Daily))
            .await
            .is_err());

        let prefs = store.snapshot();
        assert!(prefs.dark_mode);
        assert_eq!(prefs.default_period, Period::Weekly);
    }
}
