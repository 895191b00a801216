use actix_web::{delete, get, patch, post, web, HttpResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::CurrentUser;

use super::models::{
    CreateTransactionDto, PaginatedTransactionResponse, TransactionFilters, TransactionIdPath,
    TransactionResponse, UpdateTransactionDto,
};
use super::service::TransactionService;

/// GET /transactions - List transactions with filters
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "Transactions",
    params(TransactionFilters),
    responses(
        (status = 200, description = "Paginated list of transactions", body = PaginatedTransactionResponse),
        (status = 400, description = "Invalid filters", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[get("/transactions")]
pub async fn list_transactions(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    query: web::Query<TransactionFilters>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let (transactions, total) =
        TransactionService::list_transactions(pool.get_ref(), &user.email, &query).await?;

    Ok(HttpResponse::Ok().json(PaginatedTransactionResponse {
        data: transactions.into_iter().map(Into::into).collect(),
        total,
        limit: query.limit,
        offset: query.offset,
    }))
}

/// GET /transactions/{id} - Get a single transaction
#[utoipa::path(
    get,
    path = "/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    responses(
        (status = 200, description = "Transaction", body = TransactionResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[get("/transactions/{id}")]
pub async fn get_transaction(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    path: web::Path<TransactionIdPath>,
) -> Result<HttpResponse, AppError> {
    let transaction =
        TransactionService::get_transaction(pool.get_ref(), &user.email, path.id).await?;

    Ok(HttpResponse::Ok().json(TransactionResponse::from(transaction)))
}

/// POST /transactions - Record an income or expense
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "Transactions",
    request_body = CreateTransactionDto,
    responses(
        (status = 201, description = "Transaction created", body = TransactionResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[post("/transactions")]
pub async fn create_transaction(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    body: web::Json<CreateTransactionDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let transaction =
        TransactionService::create_transaction(pool.get_ref(), &user.email, &body).await?;

    Ok(HttpResponse::Created().json(TransactionResponse::from(transaction)))
}

/// PATCH /transactions/{id} - Update a transaction
#[utoipa::path(
    patch,
    path = "/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    request_body = UpdateTransactionDto,
    responses(
        (status = 200, description = "Transaction updated", body = TransactionResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[patch("/transactions/{id}")]
pub async fn update_transaction(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    path: web::Path<TransactionIdPath>,
    body: web::Json<UpdateTransactionDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let transaction =
        TransactionService::update_transaction(pool.get_ref(), &user.email, path.id, &body)
            .await?;

    Ok(HttpResponse::Ok().json(TransactionResponse::from(transaction)))
}

/// DELETE /transactions/{id} - Delete a transaction
#[utoipa::path(
    delete,
    path = "/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    responses(
        (status = 204, description = "Transaction deleted"),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[delete("/transactions/{id}")]
pub async fn delete_transaction(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    path: web::Path<TransactionIdPath>,
) -> Result<HttpResponse, AppError> {
    TransactionService::delete_transaction(pool.get_ref(), &user.email, path.id).await?;

    Ok(HttpResponse::NoContent().finish())
}
