//! User controller for the CRUD endpoints under /api/users

use axum::{
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::application::{ApplicationError, PageRequest, UserService};
use crate::config::PaginationConfig;
use crate::domain::UserId;
use crate::presentation::models::{ErrorResponse, ListUsersQuery, UserRequest, UserResponse};

/// Client-side cache hint attached to list responses
pub const LIST_CACHE_CONTROL: &str = "private, max-age=30";

/// Application state containing services
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub pagination: PaginationConfig,
}

fn user_id(path: Result<Path<i64>, PathRejection>) -> Result<UserId, ApplicationError> {
    let Path(id) = path.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Rejected user id");
        ApplicationError::invalid_input(format!("id must be an integer: {}", rejection.body_text()))
    })?;
    Ok(UserId::new(id))
}

fn user_body(payload: Result<Json<UserRequest>, JsonRejection>) -> Result<UserRequest, ApplicationError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Rejected user payload");
        ApplicationError::invalid_input(rejection.body_text())
    })?;
    Ok(request)
}

/// List users page by page
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(ListUsersQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Page of users, at most 100 entries", body = [UserResponse]),
        (status = 400, description = "Invalid pagination parameters", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApplicationError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Rejected pagination query");
        ApplicationError::invalid_input(rejection.body_text())
    })?;

    let page = PageRequest::new(
        query.skip.unwrap_or(0),
        query.take.unwrap_or(app_state.pagination.default_take),
        app_state.pagination.max_take,
    )?;

    let users: Vec<UserResponse> = app_state
        .user_service
        .list_users(page)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(([(header::CACHE_CONTROL, LIST_CACHE_CONTROL)], Json(users)))
}

/// Fetch a single user
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User identifier")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 404, description = "No user with this id", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<UserResponse>, ApplicationError> {
    let user = app_state.user_service.get_user(user_id(id)?).await?;
    Ok(Json(user.into()))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = UserRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "User created", body = UserResponse,
            headers(("Location" = String, description = "URL of the new user"))),
        (status = 400, description = "Invalid user data", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApplicationError> {
    let request = user_body(payload)?;
    let user = app_state.user_service.create_user(request.into()).await?;

    let location = format!("/api/users/{}", user.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserResponse::from(user)),
    ))
}

/// Replace every field of a user except its id
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UserRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "User updated"),
        (status = 400, description = "Invalid user data", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 404, description = "No user with this id", body = ErrorResponse),
        (status = 409, description = "Email belongs to another user", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<StatusCode, ApplicationError> {
    let id = user_id(id)?;
    let request = user_body(payload)?;
    app_state.user_service.update_user(id, request.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User identifier")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 404, description = "No user with this id", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApplicationError> {
    app_state.user_service.delete_user(user_id(id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
