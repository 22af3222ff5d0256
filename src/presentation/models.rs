//! API request and response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{User, UserDraft};

/// Request body for creating or replacing a user.
///
/// Every field is optional at the wire level so that validation can report all
/// missing fields together. A client-supplied `id` is ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRequest {
    /// Given name
    #[schema(example = "Ada", max_length = 100)]
    pub first_name: Option<String>,

    /// Family name
    #[schema(example = "Lovelace", max_length = 100)]
    pub last_name: Option<String>,

    /// Email address, unique across users regardless of case
    #[schema(example = "ada.lovelace@example.com", max_length = 254)]
    pub email: Option<String>,

    /// Department the user belongs to
    #[schema(example = "Engineering", max_length = 100)]
    pub department: Option<String>,
}

impl From<UserRequest> for UserDraft {
    fn from(request: UserRequest) -> Self {
        UserDraft {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            department: request.department,
        }
    }
}

/// A stored user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Identifier assigned by the store
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "Ada")]
    pub first_name: String,

    #[schema(example = "Lovelace")]
    pub last_name: String,

    #[schema(example = "ada.lovelace@example.com")]
    pub email: String,

    #[schema(example = "Engineering")]
    pub department: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id.value(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email.to_string(),
            department: user.department,
        }
    }
}

/// Query parameters for listing users
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Number of users to skip
    #[param(example = 0, minimum = 0)]
    pub skip: Option<i64>,

    /// Number of users to return; values above 100 are capped
    #[param(example = 20, minimum = 0)]
    pub take: Option<i64>,
}

/// Error response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code
    #[schema(example = "VALIDATION_ERROR")]
    pub code: String,

    /// Human-readable error message
    #[schema(example = "Invalid user data.")]
    pub message: String,

    /// Individual validation failures, present only for 400 responses
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = json!(["firstName is required.", "email is not a valid email address."]))]
    pub errors: Option<Vec<String>>,

    /// Error occurrence timestamp
    #[schema(example = "2024-01-15T10:30:00Z")]
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            errors: None,
            timestamp: Utc::now(),
        }
    }
}
