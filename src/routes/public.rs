use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Session lifecycle endpoints plus the liveness probe. All of these are
/// reachable without a session: login and register by necessity, logout and
/// the session probe because they degrade gracefully for anonymous callers
/// (no-op and anonymous snapshot respectively).
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated liveness endpoint for monitoring and load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /register
        // Creates a user in the directory; 409 on a duplicate email.
        .route("/register", post(handlers::register_user))
        // POST /login
        // Credential check + session token mint. The only session creation path.
        .route("/login", post(handlers::login))
        // POST /logout
        // Revokes the presented session token. Idempotent.
        .route("/logout", post(handlers::logout))
        // GET /session
        // Current session snapshot; anonymous callers get the anonymous session.
        .route("/session", get(handlers::get_session))
}
