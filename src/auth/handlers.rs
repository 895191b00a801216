use actix_web::{get, patch, post, web, HttpResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::CurrentUser;
use crate::session::SessionStore;

use super::models::{
    ChangePasswordDto, CreateUserDto, LoginDto, MessageResponse, UpdateProfileDto, UserResponse,
};
use super::service::AuthService;

/// POST /auth/register - Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    )
)]
#[post("/auth/register")]
pub async fn register(
    pool: web::Data<SqlitePool>,
    body: web::Json<CreateUserDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let user = AuthService::register(pool.get_ref(), &body).await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// POST /auth/login - Check credentials and start a session
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = UserResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[post("/auth/login")]
pub async fn login(
    pool: web::Data<SqlitePool>,
    session: web::Data<SessionStore>,
    body: web::Json<LoginDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let user = AuthService::login(pool.get_ref(), &body.email, &body.password).await?;
    session.save_user_session(&user.email, body.remember_me).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// POST /auth/logout - End the session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[post("/auth/logout")]
pub async fn logout(
    session: web::Data<SessionStore>,
    _user: CurrentUser,
) -> Result<HttpResponse, AppError> {
    session.logout().await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Logged out")))
}

/// GET /auth/me - Get current user info
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Logged-in user", body = UserResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[get("/auth/me")]
pub async fn me(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
) -> Result<HttpResponse, AppError> {
    let user = AuthService::get_user(pool.get_ref(), &user.email).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// PATCH /profile - Update first and last name
#[utoipa::path(
    patch,
    path = "/profile",
    tag = "Auth",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[patch("/profile")]
pub async fn update_profile(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    body: web::Json<UpdateProfileDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let user = AuthService::update_profile(pool.get_ref(), &user.email, &body).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// POST /profile/password - Change the password
#[utoipa::path(
    post,
    path = "/profile/password",
    tag = "Auth",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[post("/profile/password")]
pub async fn change_password(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    body: web::Json<ChangePasswordDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    AuthService::change_password(pool.get_ref(), &user.email, &body).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Password changed")))
}
