use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::password::validate_password_policy;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Request body for user registration
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    #[validate(length(min = 3, message = "First name must be at least 3 characters"))]
    #[schema(example = "Jane")]
    pub first_name: String,
    #[validate(length(min = 3, message = "Last name must be at least 3 characters"))]
    #[schema(example = "Doe")]
    pub last_name: String,
    #[validate(email(message = "Enter a valid email address"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// 6-12 characters with a digit, a lowercase and an uppercase letter
    #[validate(custom(function = "validate_password_policy"))]
    #[schema(example = "Secret1")]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    #[schema(example = "Secret1")]
    pub confirm_password: String,
}

/// Request body for user login
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginDto {
    #[validate(email(message = "Enter a valid email address"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "Secret1")]
    pub password: String,
    /// Keep the email for the next login
    #[serde(default)]
    pub remember_me: bool,
}

/// User information returned in responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "user@example.com")]
    pub email: String,
    #[schema(example = "Jane")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Request body for updating the profile names
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[validate(length(min = 2, message = "First name must be at least 2 characters"))]
    #[schema(example = "Jane")]
    pub first_name: String,
    #[validate(length(min = 2, message = "Last name must be at least 2 characters"))]
    #[schema(example = "Doe")]
    pub last_name: String,
}

/// Request body for changing the password
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(custom(function = "validate_password_policy"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_new_password: String,
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Logged out")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> CreateUserDto {
        CreateUserDto {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            password: "Secret1".to_string(),
            confirm_password: "Secret1".to_string(),
        }
    }

    #[test]
    fn test_valid_signup() {
        assert!(signup().validate().is_ok());
    }

    #[test]
    fn test_signup_short_name() {
        let dto = CreateUserDto {
            first_name: "Jo".to_string(),
            ..signup()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("first_name"));
    }

    #[test]
    fn test_signup_confirmation_mismatch() {
        let dto = CreateUserDto {
            confirm_password: "Secret2".to_string(),
            ..signup()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
    }

    #[test]
    fn test_profile_allows_two_letter_names() {
        let dto = UpdateProfileDto {
            first_name: "Jo".to_string(),
            last_name: "Li".to_string(),
        };
        assert!(dto.validate().is_ok());
    }
}
