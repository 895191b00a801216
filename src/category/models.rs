use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::models::Kind;

/// Display name for a category id that no longer resolves
pub const UNKNOWN_CATEGORY: &str = "Unknown";

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Database entity for categories. `owner_email` is `None` for the shared
/// defaults.
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub kind: Kind,
    pub owner_email: Option<String>,
}

impl Category {
    pub fn is_default(&self) -> bool {
        self.owner_email.is_none()
    }
}

/// Category information returned in responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i64,
    #[schema(example = "Groceries")]
    pub name: String,
    pub kind: Kind,
    /// Shared default category, visible to every user and read-only
    pub is_default: bool,
}

impl From<Category> for CategoryResponse {
    fn from(cat: Category) -> Self {
        let is_default = cat.is_default();
        Self {
            id: cat.id,
            name: cat.name,
            kind: cat.kind,
            is_default,
        }
    }
}

/// Request body for creating a custom category
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryDto {
    #[validate(
        length(max = 50, message = "Name must be at most 50 characters"),
        custom(function = "validate_not_blank", message = "Name is required")
    )]
    #[schema(example = "Pets")]
    pub name: String,
    pub kind: Kind,
}

/// Request body for renaming a custom category
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryDto {
    #[validate(
        length(max = 50, message = "Name must be at most 50 characters"),
        custom(function = "validate_not_blank", message = "Name is required")
    )]
    #[schema(example = "Pet care")]
    pub name: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CategoryIdPath {
    pub id: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CategoryQuery {
    /// Only categories of this kind
    pub kind: Option<Kind>,
}
