//! Route definitions and server setup

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::get,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{Config, ServerConfig};
use crate::presentation::{
    controllers::users::{AppState, create_user, delete_user, get_user, list_users, update_user},
    middleware::{AuthState, handle_panic, logging_middleware, token_auth_middleware},
    models::*,
};

/// Where Swagger UI is mounted; kept in sync with the default auth exemptions
pub const DOCS_PATH: &str = "/swagger";
/// Where the OpenAPI document is served
pub const OPENAPI_PATH: &str = "/swagger/v1/swagger.json";

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::controllers::users::list_users,
        crate::presentation::controllers::users::get_user,
        crate::presentation::controllers::users::create_user,
        crate::presentation::controllers::users::update_user,
        crate::presentation::controllers::users::delete_user
    ),
    components(schemas(UserRequest, UserResponse, ErrorResponse)),
    modifiers(&BearerSecurity),
    tags(
        (name = "users", description = "User registry CRUD endpoints")
    ),
    info(
        title = "User Management API",
        version = "1.0.0",
        description = "CRUD operations over user records. Every endpoint requires an `Authorization: Bearer <token>` header."
    )
)]
pub struct ApiDoc;

/// Registers the bearer scheme referenced by the endpoint `security` entries
struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins = &server.allowed_origins;
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

/// Create the application router.
///
/// Middleware runs outermost first: panic handler, tracing, CORS, timeout,
/// token authentication, request logging, then the matched handler.
pub fn create_router(app_state: AppState, config: &Config) -> Router {
    let mut router = Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(app_state);

    if config.server.enable_docs {
        router = router.merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, ApiDoc::openapi()));
    }

    let auth_state = AuthState::from_config(&config.auth);

    router.layer(
        ServiceBuilder::new()
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.server))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_seconds,
            )))
            .layer(middleware::from_fn_with_state(
                auth_state,
                token_auth_middleware,
            ))
            .layer(middleware::from_fn(logging_middleware)),
    )
}
