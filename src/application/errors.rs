//! Application layer error types

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use thiserror::Error;

use crate::domain::DomainError;
use crate::presentation::models::ErrorResponse;

/// Message returned for duplicate emails, on create and update alike
pub const DUPLICATE_EMAIL_MESSAGE: &str = "A user with this email already exists.";

/// Message returned for anything the client cannot act on
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Application-level errors
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Email already stored: {email}")]
    DuplicateEmail { email: String },
}

impl ApplicationError {
    /// Shorthand for a single-message validation failure
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApplicationError::Domain(DomainError::Validation {
            errors: vec![message.into()],
        })
    }

    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApplicationError::Domain(DomainError::Validation { .. }) => StatusCode::BAD_REQUEST,
            ApplicationError::Domain(DomainError::UserNotFound { .. }) => StatusCode::NOT_FOUND,
            ApplicationError::Domain(DomainError::DuplicateEmail { .. })
            | ApplicationError::Repository(RepositoryError::DuplicateEmail { .. }) => {
                StatusCode::CONFLICT
            }
            ApplicationError::Repository(RepositoryError::Database(_))
            | ApplicationError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code as a string for API responses
    pub fn error_code(&self) -> &'static str {
        match self.status_code() {
            StatusCode::BAD_REQUEST => "VALIDATION_ERROR",
            StatusCode::NOT_FOUND => "NOT_FOUND",
            StatusCode::CONFLICT => "CONFLICT",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (message, errors) = match &self {
            ApplicationError::Domain(DomainError::Validation { errors }) => {
                ("Invalid user data.".to_string(), Some(errors.clone()))
            }
            ApplicationError::Domain(not_found @ DomainError::UserNotFound { .. }) => {
                (not_found.to_string(), None)
            }
            ApplicationError::Domain(DomainError::DuplicateEmail { .. })
            | ApplicationError::Repository(RepositoryError::DuplicateEmail { .. }) => {
                (DUPLICATE_EMAIL_MESSAGE.to_string(), None)
            }
            ApplicationError::Repository(RepositoryError::Database(_))
            | ApplicationError::Configuration { .. } => {
                tracing::error!(error = %self, "Request failed with an internal error");
                (INTERNAL_ERROR_MESSAGE.to_string(), None)
            }
        };

        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message,
            errors,
            timestamp: Utc::now(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    #[test]
    fn maps_domain_errors_to_statuses() {
        let cases = [
            (
                ApplicationError::invalid_input("bad"),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                DomainError::UserNotFound { id: UserId::new(3) }.into(),
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
            (
                DomainError::DuplicateEmail {
                    email: "a@b.co".to_string(),
                }
                .into(),
                StatusCode::CONFLICT,
                "CONFLICT",
            ),
            (
                RepositoryError::DuplicateEmail {
                    email: "a@b.co".to_string(),
                }
                .into(),
                StatusCode::CONFLICT,
                "CONFLICT",
            ),
            (
                RepositoryError::Database(sqlx::Error::PoolTimedOut).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (error, status, code) in cases {
            assert_eq!(error.status_code(), status, "{error}");
            assert_eq!(error.error_code(), code);
        }
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_details() {
        let error: ApplicationError = RepositoryError::Database(sqlx::Error::PoolTimedOut).into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], INTERNAL_ERROR_MESSAGE);
        assert!(body.get("errors").is_none());
        assert!(!bytes.windows(4).any(|w| w == b"pool"));
    }

    #[tokio::test]
    async fn validation_errors_carry_the_error_list() {
        let error: ApplicationError = DomainError::Validation {
            errors: vec!["firstName is required.".to_string(), "email is required.".to_string()],
        }
        .into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Invalid user data.");
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);
    }
}
