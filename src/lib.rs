use axum::{extract::FromRef, http::HeaderName, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod config;
pub mod handlers;
pub mod models;
pub mod notifier;
pub mod repository;
pub mod routing;
pub mod session;

// HTTP layer: the three surfaces the shell exposes.
pub mod routes;
use routes::{notifications, public, shell};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use notifier::{NotificationSurface, NotifierState, SurfaceOptions};
pub use repository::{RepositoryState, UserDirectory};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the shell's
/// API endpoints, served at `/api-docs/openapi.json`. Navigation paths are
/// deliberately absent: they are data (the route table), not individually
/// documented operations.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register_user, handlers::login, handlers::logout, handlers::get_session,
        handlers::list_notifications, handlers::push_notification,
        handlers::dismiss_notification, handlers::hold_notification,
        handlers::release_notification, handlers::pause_notifications,
        handlers::resume_notifications,
    ),
    components(
        schemas(
            models::User, models::RegisterRequest, models::LoginRequest,
            models::LoginResponse, models::ViewResponse, models::PushToastRequest,
            session::Session, session::Role, routing::View,
            notifier::Toast, notifier::Level, notifier::Position, notifier::SurfaceOptions,
        )
    ),
    tags(
        (name = "advenue-portal", description = "AdVenue portal shell API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe container holding the application's shared
/// services: the user directory, the notification surface, and the immutable
/// configuration. Shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Identity layer: user directory plus the session revocation set.
    pub repo: RepositoryState,
    /// The process-wide notification surface.
    pub notifier: NotifierState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These let extractors and handlers pull individual components out of the
// shared AppState instead of depending on the whole of it.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for NotifierState {
    fn from_ref(app_state: &AppState) -> NotifierState {
        app_state.notifier.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global
/// middleware, and registers the application state.
///
/// The shell's access control is not a router layer: the session extractor
/// never rejects, and the dispatcher answers unauthorized navigation with a
/// silent redirect. Wrapping the shell routes in an auth middleware would
/// turn those redirects into 401s, which is exactly the behavior this
/// application must not have.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Session lifecycle + liveness.
        .merge(public::public_routes())
        // The notification surface, independent of navigation.
        .merge(notifications::notification_routes())
        // Navigation routes, registered from the route table.
        .merge(shell::shell_routes())
        // Catch-all: unmatched paths go through the same dispatcher, which
        // resolves them to a redirect to the root path.
        .fallback(handlers::navigate)
        // Apply the unified state to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (applied outermost)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID generation: a unique UUID per incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request tracing: wraps the request/response lifecycle in
                // a span carrying the request id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS layer, outermost.
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes `TraceLayer` span creation: extracts the `x-request-id` header
/// (if present) and includes it alongside the HTTP method and URI, so every
/// log line of a single request is correlated by a unique id.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
