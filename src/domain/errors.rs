//! Domain-specific error types

use thiserror::Error;

use super::value_objects::UserId;

/// Domain-level errors for user management
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid user data: {}", errors.join(" "))]
    Validation { errors: Vec<String> },

    #[error("User with id {id} was not found.")]
    UserNotFound { id: UserId },

    #[error("A user with email {email} already exists")]
    DuplicateEmail { email: String },
}
