use actix_web::{delete, get, patch, post, web, HttpResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::CurrentUser;
use crate::models::Month;

use super::models::{
    BudgetIdPath, BudgetListResponse, BudgetQuery, BudgetResponse, CreateBudgetDto,
    UpdateBudgetDto,
};
use super::service::BudgetService;

/// GET /budgets - Budgets of a month with spending and totals
#[utoipa::path(
    get,
    path = "/budgets",
    tag = "Budgets",
    params(BudgetQuery),
    responses(
        (status = 200, description = "Budgets of the month", body = BudgetListResponse),
        (status = 400, description = "Invalid month", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[get("/budgets")]
pub async fn list_budgets(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    query: web::Query<BudgetQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let month = match &query.month {
        Some(key) => Month::parse(key)
            .ok_or_else(|| AppError::field("month", "Month must be in yyyy-MM format"))?,
        None => Month::current(),
    };

    let budgets = BudgetService::list_for_month(pool.get_ref(), &user.email, month).await?;

    Ok(HttpResponse::Ok().json(BudgetListResponse::from(budgets)))
}

/// GET /budgets/{id} - Get a specific budget by ID
#[utoipa::path(
    get,
    path = "/budgets/{id}",
    tag = "Budgets",
    params(BudgetIdPath),
    responses(
        (status = 200, description = "Budget details", body = BudgetResponse),
        (status = 404, description = "Budget not found", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[get("/budgets/{id}")]
pub async fn get_budget(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    path: web::Path<BudgetIdPath>,
) -> Result<HttpResponse, AppError> {
    let budget = BudgetService::get_budget(pool.get_ref(), &user.email, path.id).await?;

    Ok(HttpResponse::Ok().json(BudgetResponse::from(budget)))
}

/// POST /budgets - Create a budget for an expense category and month
#[utoipa::path(
    post,
    path = "/budgets",
    tag = "Budgets",
    request_body = CreateBudgetDto,
    responses(
        (status = 201, description = "Budget created", body = BudgetResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Budget already exists for category and month", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[post("/budgets")]
pub async fn create_budget(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    body: web::Json<CreateBudgetDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let budget = BudgetService::create_budget(pool.get_ref(), &user.email, &body).await?;

    Ok(HttpResponse::Created().json(BudgetResponse::from(budget)))
}

/// PATCH /budgets/{id} - Update a budget
#[utoipa::path(
    patch,
    path = "/budgets/{id}",
    tag = "Budgets",
    params(BudgetIdPath),
    request_body = UpdateBudgetDto,
    responses(
        (status = 200, description = "Budget updated", body = BudgetResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Budget not found", body = ErrorResponse),
        (status = 409, description = "Budget already exists for category and month", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[patch("/budgets/{id}")]
pub async fn update_budget(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    path: web::Path<BudgetIdPath>,
    body: web::Json<UpdateBudgetDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let budget = BudgetService::update_budget(pool.get_ref(), &user.email, path.id, &body).await?;

    Ok(HttpResponse::Ok().json(BudgetResponse::from(budget)))
}

/// DELETE /budgets/{id} - Delete a budget
#[utoipa::path(
    delete,
    path = "/budgets/{id}",
    tag = "Budgets",
    params(BudgetIdPath),
    responses(
        (status = 204, description = "Budget deleted"),
        (status = 404, description = "Budget not found", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[delete("/budgets/{id}")]
pub async fn delete_budget(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    path: web::Path<BudgetIdPath>,
) -> Result<HttpResponse, AppError> {
    BudgetService::delete_budget(pool.get_ref(), &user.email, path.id).await?;

    Ok(HttpResponse::NoContent().finish())
}
