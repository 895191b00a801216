use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;
use tracing::error;
use utoipa::ToSchema;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    FieldError { field: &'static str, message: String },
    Unauthorized(String),
    NotFound(String),
    Conflict { field: &'static str, message: String },
    InternalError(String),
}

impl AppError {
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        AppError::FieldError {
            field,
            message: message.into(),
        }
    }

    pub fn conflict(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Conflict {
            field,
            message: message.into(),
        }
    }
}

/// Standard error response format
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type code (e.g., "VALIDATION_ERROR", "NOT_FOUND")
    #[schema(example = "VALIDATION_ERROR")]
    pub error: String,
    /// Human-readable error message
    #[schema(example = "Amount is required")]
    pub message: String,
    /// Input field the error belongs to, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "amount")]
    pub field: Option<String>,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            AppError::FieldError { field, message } => {
                write!(f, "Validation error on {field}: {message}")
            }
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::NotFound(msg) => write!(f, "Not found: {msg}"),
            AppError::Conflict { field, message } => write!(f, "Conflict on {field}: {message}"),
            AppError::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_type, message, field) = match self {
            AppError::ValidationError(msg) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
            ),
            AppError::FieldError { field, message } => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                message.clone(),
                Some(field.to_string()),
            ),
            AppError::Unauthorized(msg) => (
                actix_web::http::StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                msg.clone(),
                None,
            ),
            AppError::NotFound(msg) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
                None,
            ),
            AppError::Conflict { field, message } => (
                actix_web::http::StatusCode::CONFLICT,
                "CONFLICT",
                message.clone(),
                Some(field.to_string()),
            ),
            AppError::InternalError(msg) => {
                // Log the store failure, the client only gets a generic notice
                error!("Internal error: {msg}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "The operation failed. Please try again.".to_string(),
                    None,
                )
            }
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message,
            field,
        })
    }
}

// Convenience conversion from sqlx::Error
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::InternalError(err.to_string()),
        }
    }
}

/// Report the first failing field of a validated DTO, the way a form shows one
/// message per input.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("{field} is invalid"));
                AppError::FieldError {
                    field: static_field_name(field),
                    message,
                }
            }
            None => AppError::ValidationError(errors.to_string()),
        }
    }
}

// validator reports Rust field names; responses use the camelCase names the
// client sent. DTO fields are a closed set, so map them to static strings.
fn static_field_name(field: &str) -> &'static str {
    const KNOWN: &[(&str, &str)] = &[
        ("first_name", "firstName"),
        ("last_name", "lastName"),
        ("email", "email"),
        ("password", "password"),
        ("confirm_password", "confirmPassword"),
        ("current_password", "currentPassword"),
        ("new_password", "newPassword"),
        ("confirm_new_password", "confirmNewPassword"),
        ("name", "name"),
        ("amount", "amount"),
        ("date", "date"),
        ("description", "description"),
        ("limit", "limit"),
        ("month", "month"),
        ("alert_threshold", "alertThreshold"),
        ("offset", "offset"),
        ("months", "months"),
    ];
    KNOWN
        .iter()
        .find(|(rust_name, _)| *rust_name == field)
        .map(|(_, json_name)| *json_name)
        .unwrap_or("input")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Form {
        #[validate(length(min = 1, message = "Amount is required"))]
        amount: String,
    }

    #[test]
    fn test_validation_errors_map_to_first_field() {
        let form = Form {
            amount: String::new(),
        };
        let err: AppError = form.validate().unwrap_err().into();
        match err {
            AppError::FieldError { field, message } => {
                assert_eq!(field, "amount");
                assert_eq!(message, "Amount is required");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let response = AppError::InternalError("disk I/O error".to_string()).error_response();
        assert_eq!(response.status(), 500);
    }
}
