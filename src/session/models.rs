use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Period;

/// Session flags and settings kept on the device
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Preferences {
    pub logged_in: bool,
    pub user_email: Option<String>,
    pub remember_me: bool,
    pub dark_mode: bool,
    pub default_period: Period,
}

/// Session state returned to the client
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Whether a user is logged in
    pub logged_in: bool,
    /// Logged-in user's email
    #[schema(example = "user@example.com")]
    pub user_email: Option<String>,
    /// Whether remember-me was chosen at login
    pub remember_me: bool,
    /// Email to pre-fill on the login form
    #[schema(example = "user@example.com")]
    pub saved_email: Option<String>,
}

impl SessionResponse {
    pub fn from_preferences(prefs: &Preferences) -> Self {
        Self {
            logged_in: prefs.logged_in,
            user_email: prefs.user_email.clone().filter(|_| prefs.logged_in),
            remember_me: prefs.remember_me,
            saved_email: prefs.user_email.clone().filter(|_| prefs.remember_me),
        }
    }
}

/// App settings
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub dark_mode: bool,
    pub default_period: Period,
}

impl SettingsResponse {
    pub fn from_preferences(prefs: &Preferences) -> Self {
        Self {
            dark_mode: prefs.dark_mode,
            default_period: prefs.default_period,
        }
    }
}

/// Request body for changing settings (PATCH - all fields optional)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsDto {
    pub dark_mode: Option<bool>,
    pub default_period: Option<Period>,
}
