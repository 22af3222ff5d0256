//! User Management API - CRUD over user records behind a bearer-token check
//!
//! The crate follows a layered layout: `domain` holds the user entity and its
//! validation rules, `application` the service orchestrating validation and
//! duplicate detection, `infrastructure` the SQLite store, and `presentation`
//! the axum router with its middleware pipeline.

use std::sync::Arc;

use axum::Router;

pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

pub use crate::config::Config;
pub use crate::logging::init_tracing;

use crate::application::{ApplicationError, RepositoryError, UserServiceImpl};
use crate::infrastructure::{SqliteUserRepository, connect_pool, ensure_schema};
use crate::presentation::{AppState, create_router};

/// Connect to the configured database, make sure the schema exists, and build
/// the fully wired router
pub async fn create_app(config: Config) -> Result<Router, ApplicationError> {
    if config.pagination.max_take < 1 {
        return Err(ApplicationError::Configuration {
            message: "pagination.max_take must be at least 1".to_string(),
        });
    }

    let pool = connect_pool(&config.database)
        .await
        .map_err(RepositoryError::from)?;
    ensure_schema(&pool).await.map_err(RepositoryError::from)?;

    let repository = Arc::new(SqliteUserRepository::new(pool));
    let user_service = Arc::new(UserServiceImpl::new(repository));

    let app_state = AppState {
        user_service,
        pagination: config.pagination.clone(),
    };

    Ok(create_router(app_state, &config))
}
