use utoipa::OpenApi;

use crate::auth::models::{
    ChangePasswordDto, CreateUserDto, LoginDto, MessageResponse, UpdateProfileDto, UserResponse,
};
use crate::budget::models::{BudgetListResponse, BudgetResponse, CreateBudgetDto, UpdateBudgetDto};
use crate::category::models::{CategoryResponse, CreateCategoryDto, UpdateCategoryDto};
use crate::errors::ErrorResponse;
use crate::models::{DateRange, Kind, Period};
use crate::report::models::{
    BudgetAlert, BudgetStatus, CategoryBreakdown, CategorySlice, Dashboard, MonthTotal, Summary,
};
use crate::session::models::{SessionResponse, SettingsResponse, UpdateSettingsDto};
use crate::transaction::models::{
    CreateTransactionDto, PaginatedTransactionResponse, TransactionResponse, UpdateTransactionDto,
};

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Finance Ledger API",
        version = "1.0.0",
        description = "Personal income and expense ledger with budgets and reports",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Signup, login, session and profile"),
        (name = "Settings", description = "Dark mode and default reporting period"),
        (name = "Categories", description = "Default and custom categories"),
        (name = "Transactions", description = "Income and expense records"),
        (name = "Budgets", description = "Monthly spending limits per expense category"),
        (name = "Reports", description = "Totals, breakdowns, trends and alerts")
    ),
    paths(
        crate::health_check,
        // Auth endpoints
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::logout,
        crate::auth::handlers::me,
        crate::auth::handlers::update_profile,
        crate::auth::handlers::change_password,
        crate::session::handlers::get_session,
        crate::session::handlers::clear_session,
        // Settings endpoints
        crate::session::handlers::get_settings,
        crate::session::handlers::update_settings,
        // Category endpoints
        crate::category::handlers::list_categories,
        crate::category::handlers::get_category,
        crate::category::handlers::create_category,
        crate::category::handlers::update_category,
        crate::category::handlers::delete_category,
        // Transaction endpoints
        crate::transaction::handlers::list_transactions,
        crate::transaction::handlers::get_transaction,
        crate::transaction::handlers::create_transaction,
        crate::transaction::handlers::update_transaction,
        crate::transaction::handlers::delete_transaction,
        // Budget endpoints
        crate::budget::handlers::list_budgets,
        crate::budget::handlers::get_budget,
        crate::budget::handlers::create_budget,
        crate::budget::handlers::update_budget,
        crate::budget::handlers::delete_budget,
        // Report endpoints
        crate::report::handlers::summary,
        crate::report::handlers::categories,
        crate::report::handlers::monthly,
        crate::report::handlers::budget_alerts,
        crate::report::handlers::dashboard,
        crate::report::handlers::text,
    ),
    components(
        schemas(
            ErrorResponse,
            Kind,
            Period,
            DateRange,
            // Auth schemas
            CreateUserDto,
            LoginDto,
            UserResponse,
            UpdateProfileDto,
            ChangePasswordDto,
            MessageResponse,
            SessionResponse,
            // Settings schemas
            SettingsResponse,
            UpdateSettingsDto,
            // Category schemas
            CategoryResponse,
            CreateCategoryDto,
            UpdateCategoryDto,
            // Transaction schemas
            TransactionResponse,
            PaginatedTransactionResponse,
            CreateTransactionDto,
            UpdateTransactionDto,
            // Budget schemas
            BudgetResponse,
            BudgetListResponse,
            CreateBudgetDto,
            UpdateBudgetDto,
            // Report schemas
            BudgetStatus,
            BudgetAlert,
            MonthTotal,
            Summary,
            CategorySlice,
            CategoryBreakdown,
            Dashboard,
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_report_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/reports/dashboard"));
        assert!(doc.paths.paths.contains_key("/budgets/{id}"));

        let session = &doc.paths.paths["/auth/session"];
        assert!(session.get.is_some());
        assert!(session.delete.is_some());
    }
}
