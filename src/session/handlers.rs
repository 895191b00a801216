use actix_web::{delete, get, patch, web, HttpResponse};

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::CurrentUser;

use super::models::{SessionResponse, SettingsResponse, UpdateSettingsDto};
use super::store::SessionStore;

/// GET /auth/session - Session flags and the remembered email
#[utoipa::path(
    get,
    path = "/auth/session",
    tag = "Auth",
    responses(
        (status = 200, description = "Current session state", body = SessionResponse)
    )
)]
#[get("/auth/session")]
pub async fn get_session(session: web::Data<SessionStore>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(SessionResponse::from_preferences(&session.snapshot())))
}

/// DELETE /auth/session - Log out and forget the remembered email
#[utoipa::path(
    delete,
    path = "/auth/session",
    tag = "Auth",
    responses(
        (status = 200, description = "Session cleared; settings are kept", body = SessionResponse)
    )
)]
#[delete("/auth/session")]
pub async fn clear_session(session: web::Data<SessionStore>) -> Result<HttpResponse, AppError> {
    session.clear_session().await?;

    Ok(HttpResponse::Ok().json(SessionResponse::from_preferences(&session.snapshot())))
}

/// GET /settings - App settings
#[utoipa::path(
    get,
    path = "/settings",
    tag = "Settings",
    responses(
        (status = 200, description = "Current settings", body = SettingsResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[get("/settings")]
pub async fn get_settings(
    session: web::Data<SessionStore>,
    _user: CurrentUser,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(SettingsResponse::from_preferences(&session.snapshot())))
}

/// PATCH /settings - Change dark mode and/or the default reporting period
#[utoipa::path(
    patch,
    path = "/settings",
    tag = "Settings",
    request_body = UpdateSettingsDto,
    responses(
        (status = 200, description = "Settings updated", body = SettingsResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[patch("/settings")]
pub async fn update_settings(
    session: web::Data<SessionStore>,
    _user: CurrentUser,
    body: web::Json<UpdateSettingsDto>,
) -> Result<HttpResponse, AppError> {
    let prefs = session
        .update_settings(body.dark_mode, body.default_period)
        .await?;

    Ok(HttpResponse::Ok().json(SettingsResponse::from_preferences(&prefs)))
}
