use actix_web::{get, web, HttpResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::CurrentUser;
use crate::models::{today, Kind, Month};
use crate::session::SessionStore;

use super::aggregate::AggregationService;
use super::models::{
    BudgetAlert, CategoryBreakdown, Dashboard, MonthTotal, MonthlyQuery, ReportQuery, Summary,
};
use super::service::{ReportService, ReportWindow};

fn window(query: &ReportQuery, session: &SessionStore) -> Result<ReportWindow, AppError> {
    ReportWindow::resolve(query, session.snapshot().default_period, today())
}

/// GET /reports/summary - Income, expense and balance for a period or range
#[utoipa::path(
    get,
    path = "/reports/summary",
    tag = "Reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Totals for the window", body = Summary),
        (status = 400, description = "Invalid range", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[get("/reports/summary")]
pub async fn summary(
    pool: web::Data<SqlitePool>,
    session: web::Data<SessionStore>,
    user: CurrentUser,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
    let window = window(&query, &session)?;

    let summary = ReportService::summary(pool.get_ref(), &user.email, &window.range).await?;

    Ok(HttpResponse::Ok().json(summary))
}

/// GET /reports/categories - Totals per category with shares
#[utoipa::path(
    get,
    path = "/reports/categories",
    tag = "Reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Category breakdown, largest first", body = CategoryBreakdown),
        (status = 400, description = "Invalid range", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[get("/reports/categories")]
pub async fn categories(
    pool: web::Data<SqlitePool>,
    session: web::Data<SessionStore>,
    user: CurrentUser,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
    let window = window(&query, &session)?;
    let kind = query.kind.unwrap_or(Kind::Expense);

    let breakdown =
        ReportService::category_breakdown(pool.get_ref(), &user.email, kind, &window.range)
            .await?;

    Ok(HttpResponse::Ok().json(breakdown))
}

/// GET /reports/monthly - Expense totals of the trailing months
#[utoipa::path(
    get,
    path = "/reports/monthly",
    tag = "Reports",
    params(MonthlyQuery),
    responses(
        (status = 200, description = "Monthly expenses, oldest first", body = Vec<MonthTotal>),
        (status = 400, description = "Invalid month count", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[get("/reports/monthly")]
pub async fn monthly(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
    query: web::Query<MonthlyQuery>,
) -> Result<HttpResponse, AppError> {
    query.validate()?;

    let series = AggregationService::monthly_expense_series(
        pool.get_ref(),
        &user.email,
        query.months,
        Month::current(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(series))
}

/// GET /reports/budget-alerts - Budgets of the current month over their threshold
#[utoipa::path(
    get,
    path = "/reports/budget-alerts",
    tag = "Reports",
    responses(
        (status = 200, description = "Triggered alerts", body = Vec<BudgetAlert>),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[get("/reports/budget-alerts")]
pub async fn budget_alerts(
    pool: web::Data<SqlitePool>,
    user: CurrentUser,
) -> Result<HttpResponse, AppError> {
    let alerts =
        AggregationService::budget_alerts(pool.get_ref(), &user.email, Month::current()).await?;

    Ok(HttpResponse::Ok().json(alerts))
}

/// GET /reports/dashboard - Home screen bundle
#[utoipa::path(
    get,
    path = "/reports/dashboard",
    tag = "Reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Dashboard", body = Dashboard),
        (status = 400, description = "Invalid range", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[get("/reports/dashboard")]
pub async fn dashboard(
    pool: web::Data<SqlitePool>,
    session: web::Data<SessionStore>,
    user: CurrentUser,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
    let window = window(&query, &session)?;

    let dashboard = ReportService::dashboard(pool.get_ref(), &user.email, &window, today()).await?;

    Ok(HttpResponse::Ok().json(dashboard))
}

/// GET /reports/text - Shareable plain-text report
#[utoipa::path(
    get,
    path = "/reports/text",
    tag = "Reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Report text", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid range", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    )
)]
#[get("/reports/text")]
pub async fn text(
    pool: web::Data<SqlitePool>,
    session: web::Data<SessionStore>,
    user: CurrentUser,
    query: web::Query<ReportQuery>,
) -> Result<HttpResponse, AppError> {
    let window = window(&query, &session)?;

    let report = ReportService::text_report(pool.get_ref(), &user.email, &window, today()).await?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(report))
}
