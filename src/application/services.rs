//! Application services for orchestrating business logic

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::errors::ApplicationError;
use crate::domain::{DomainError, User, UserDraft, UserId};
use crate::infrastructure::UserRepository;

/// Offset and page size for listing users, already bounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: i64,
    pub take: i64,
}

impl PageRequest {
    /// Validate raw skip/take values, capping `take` at `max_take`
    pub fn new(skip: i64, take: i64, max_take: i64) -> Result<Self, ApplicationError> {
        let mut errors = Vec::new();
        if skip < 0 {
            errors.push("skip must be zero or greater.".to_string());
        }
        if take < 0 {
            errors.push("take must be zero or greater.".to_string());
        }
        if !errors.is_empty() {
            return Err(DomainError::Validation { errors }.into());
        }

        Ok(Self {
            skip,
            take: take.min(max_take),
        })
    }
}

/// Service for the user resource
#[async_trait]
pub trait UserService: Send + Sync {
    async fn list_users(&self, page: PageRequest) -> Result<Vec<User>, ApplicationError>;

    async fn get_user(&self, id: UserId) -> Result<User, ApplicationError>;

    async fn create_user(&self, draft: UserDraft) -> Result<User, ApplicationError>;

    async fn update_user(&self, id: UserId, draft: UserDraft) -> Result<User, ApplicationError>;

    async fn delete_user(&self, id: UserId) -> Result<(), ApplicationError>;
}

/// Implementation of the user service over a [`UserRepository`]
pub struct UserServiceImpl {
    repository: Arc<dyn UserRepository>,
}

impl UserServiceImpl {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    fn not_found(id: UserId) -> ApplicationError {
        DomainError::UserNotFound { id }.into()
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn list_users(&self, page: PageRequest) -> Result<Vec<User>, ApplicationError> {
        let users = self.repository.list(page.skip, page.take).await?;
        debug!(
            count = users.len(),
            skip = page.skip,
            take = page.take,
            "Returned users"
        );
        Ok(users)
    }

    async fn get_user(&self, id: UserId) -> Result<User, ApplicationError> {
        match self.repository.find_by_id(id).await? {
            Some(user) => Ok(user),
            None => {
                warn!(%id, "User not found");
                Err(Self::not_found(id))
            }
        }
    }

    async fn create_user(&self, draft: UserDraft) -> Result<User, ApplicationError> {
        let profile = draft.validate().inspect_err(|e| {
            warn!(error = %e, "Invalid user data");
        })?;

        if self.repository.find_by_email(&profile.email).await?.is_some() {
            warn!(email = %profile.email, "Duplicate email attempted");
            return Err(DomainError::DuplicateEmail {
                email: profile.email.to_string(),
            }
            .into());
        }

        let user = self.repository.insert(&profile).await?;
        info!(id = %user.id, email = %user.email, "User created");
        Ok(user)
    }

    async fn update_user(&self, id: UserId, draft: UserDraft) -> Result<User, ApplicationError> {
        let profile = draft.validate().inspect_err(|e| {
            warn!(%id, error = %e, "Invalid user update data");
        })?;

        let Some(mut user) = self.repository.find_by_id(id).await? else {
            warn!(%id, "User not found for update");
            return Err(Self::not_found(id));
        };

        // Keeping one's own address, even with different casing, is not a conflict
        if !user.email.matches(&profile.email) {
            if let Some(owner) = self.repository.find_by_email(&profile.email).await? {
                if owner.id != id {
                    warn!(%id, email = %profile.email, "Duplicate email attempted on update");
                    return Err(DomainError::DuplicateEmail {
                        email: profile.email.to_string(),
                    }
                    .into());
                }
            }
        }

        user.apply(profile);
        if !self.repository.update(&user).await? {
            warn!(%id, "User disappeared before update");
            return Err(Self::not_found(id));
        }

        info!(%id, email = %user.email, "User updated");
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ApplicationError> {
        if !self.repository.delete(id).await? {
            warn!(%id, "User not found for deletion");
            return Err(Self::not_found(id));
        }

        info!(%id, "User deleted");
        Ok(())
    }
}
