use actix_web::{delete, get, patch, post, web, HttpResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::CurrentUser;

use super::models::{
    CategoryIdPath, CategoryQuery, CategoryResponse, CreateCategoryDto, UpdateCategoryDto,
};
use super::service::CategoryService;

/// GET /categories - Default and custom categories visible to the user
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Visible categories", body = Vec<CategoryResponse>),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[get("/categories")]
pub async fn list_categories(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    query: web::Query<CategoryQuery>,
) -> Result<HttpResponse, AppError> {
    let categories = CategoryService::list(pool.get_ref(), &user.email, query.kind).await?;

    let response: Vec<CategoryResponse> = categories.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// GET /categories/{id} - Get a specific category
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "Categories",
    params(CategoryIdPath),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[get("/categories/{id}")]
pub async fn get_category(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    path: web::Path<CategoryIdPath>,
) -> Result<HttpResponse, AppError> {
    let category = CategoryService::get_visible(pool.get_ref(), &user.email, path.id).await?;

    Ok(HttpResponse::Ok().json(CategoryResponse::from(category)))
}

/// POST /categories - Create a custom category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[post("/categories")]
pub async fn create_category(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    body: web::Json<CreateCategoryDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let category = CategoryService::create(pool.get_ref(), &user.email, &body).await?;

    Ok(HttpResponse::Created().json(CategoryResponse::from(category)))
}

/// PATCH /categories/{id} - Rename a custom category
#[utoipa::path(
    patch,
    path = "/categories/{id}",
    tag = "Categories",
    params(CategoryIdPath),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category renamed", body = CategoryResponse),
        (status = 400, description = "Validation error or default category", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[patch("/categories/{id}")]
pub async fn update_category(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    path: web::Path<CategoryIdPath>,
    body: web::Json<UpdateCategoryDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let category = CategoryService::update(pool.get_ref(), &user.email, path.id, &body).await?;

    Ok(HttpResponse::Ok().json(CategoryResponse::from(category)))
}

/// DELETE /categories/{id} - Delete a custom category
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "Categories",
    params(CategoryIdPath),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, description = "Default category", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[delete("/categories/{id}")]
pub async fn delete_category(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    path: web::Path<CategoryIdPath>,
) -> Result<HttpResponse, AppError> {
    CategoryService::delete(pool.get_ref(), &user.email, path.id).await?;

    Ok(HttpResponse::NoContent().finish())
}
