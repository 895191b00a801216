pub mod auth;
pub mod budget;
pub mod category;
pub mod config;
pub mod db;
pub mod errors;
pub mod extractors;
pub mod models;
pub mod money;
pub mod openapi;
pub mod report;
pub mod session;
pub mod transaction;

use actix_web::{get, web, HttpResponse, Responder};
use sqlx::SqlitePool;

/// Health check endpoint that verifies database connectivity
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Store reachable"),
        (status = 503, description = "Store unreachable")
    )
)]
#[get("/health")]
pub async fn health_check(pool: web::Data<SqlitePool>) -> impl Responder {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(_) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "database": "disconnected"
        })),
    }
}

/// Routes that start a session. `main` puts these behind the rate limiter.
pub fn configure_auth(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register).service(auth::login);
}

/// Every other route. Expects `web::Data<SqlitePool>` and
/// `web::Data<SessionStore>` to be registered on the app.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        // Auth and session
        .service(auth::logout)
        .service(auth::me)
        .service(session::get_session)
        .service(session::clear_session)
        .service(auth::update_profile)
        .service(auth::change_password)
        .service(session::get_settings)
        .service(session::update_settings)
        // Categories
        .service(category::list_categories)
        .service(category::get_category)
        .service(category::create_category)
        .service(category::update_category)
        .service(category::delete_category)
        // Transactions
        .service(transaction::list_transactions)
        .service(transaction::get_transaction)
        .service(transaction::create_transaction)
        .service(transaction::update_transaction)
        .service(transaction::delete_transaction)
        // Budgets
        .service(budget::list_budgets)
        .service(budget::get_budget)
        .service(budget::create_budget)
        .service(budget::update_budget)
        .service(budget::delete_budget)
        // Reports
        .service(report::summary)
        .service(report::categories)
        .service(report::monthly)
        .service(report::budget_alerts)
        .service(report::dashboard)
        .service(report::text);
}
