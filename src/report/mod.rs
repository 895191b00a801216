mod aggregate;
pub mod format;
pub mod handlers;
pub mod models;
mod service;

pub use aggregate::{budget_status, AggregationService};
pub use handlers::{budget_alerts, categories, dashboard, monthly, summary, text};
pub use service::{ReportService, ReportWindow};
