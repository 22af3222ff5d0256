//! HTTP middleware for the web server

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;

use crate::application::errors::INTERNAL_ERROR_MESSAGE;
use crate::config::AuthConfig;
use crate::presentation::models::ErrorResponse;

const BEARER_PREFIX: &str = "Bearer ";
const MISSING_TOKEN_MESSAGE: &str = "Unauthorized: Missing or invalid token.";
const INVALID_TOKEN_MESSAGE: &str = "Unauthorized: Invalid token.";

/// Header carrying the id assigned by [`logging_middleware`]
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// State for the bearer-token check
#[derive(Clone)]
pub struct AuthState {
    token: Arc<str>,
    exempt_paths: Arc<[String]>,
}

impl AuthState {
    pub fn new(token: impl Into<Arc<str>>, exempt_paths: Vec<String>) -> Self {
        Self {
            token: token.into(),
            exempt_paths: exempt_paths.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.token.as_str(), config.exempt_paths.clone())
    }

    fn is_exempt(&self, path: &str) -> bool {
        self.exempt_paths
            .iter()
            .any(|prefix| starts_with_segments(path, prefix))
    }
}

/// Whether `path` equals `prefix` or continues it with a new segment.
///
/// `/swagger` matches `/swagger` and `/swagger/index.html`, not `/swaggerish`.
/// Comparison ignores ASCII case.
fn starts_with_segments(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    match path.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => {
            let rest = &path[prefix.len()..];
            rest.is_empty() || rest.starts_with('/')
        }
        _ => false,
    }
}

/// Reasons a request fails the bearer-token check
#[derive(Debug, PartialEq, Eq)]
enum TokenRejection {
    Missing,
    Invalid,
}

/// Pick the first `Authorization` value using the bearer scheme and compare it
fn check_bearer(headers: &HeaderMap, expected: &str) -> Result<(), TokenRejection> {
    let value = headers
        .get_all(header::AUTHORIZATION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(BEARER_PREFIX))
        .ok_or(TokenRejection::Missing)?;

    let token = &value[BEARER_PREFIX.len()..];
    if token.is_empty() {
        return Err(TokenRejection::Missing);
    }

    if token != expected {
        return Err(TokenRejection::Invalid);
    }

    Ok(())
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::new("UNAUTHORIZED", message)),
    )
        .into_response()
}

/// Bearer-token authentication middleware.
///
/// Documentation and favicon paths pass through untouched; every other request
/// must present the shared secret or is answered with 401 here.
pub async fn token_auth_middleware(
    State(auth): State<AuthState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path();
    tracing::debug!(path, "Checking bearer token");

    if auth.is_exempt(path) {
        tracing::debug!(path, "Skipping auth for documentation path");
        return next.run(request).await;
    }

    match check_bearer(request.headers(), &auth.token) {
        Ok(()) => {
            tracing::debug!("Token validated");
            next.run(request).await
        }
        Err(TokenRejection::Missing) => {
            tracing::warn!(path, "Missing or invalid Authorization header");
            unauthorized(MISSING_TOKEN_MESSAGE)
        }
        Err(TokenRejection::Invalid) => {
            tracing::warn!(path, "Rejected request with invalid token");
            unauthorized(INVALID_TOKEN_MESSAGE)
        }
    }
}

/// Request logging middleware with timing and request ID
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = Uuid::new_v4();
    let start_time = Instant::now();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Processing request"
    );

    let mut response = next.run(request).await;
    let duration = start_time.elapsed();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Global panic handler: log the payload and answer with a generic 500
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = detail, "Unhandled panic while serving request");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("INTERNAL_ERROR", INTERNAL_ERROR_MESSAGE)),
    )
        .into_response()
}
