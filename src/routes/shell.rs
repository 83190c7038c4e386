use crate::{AppState, handlers, routing};
use axum::{Router, routing::get};

/// Shell Router Module
///
/// Registers one GET route per route-table entry, plus the root path. Every
/// one of them lands in the same `navigate` handler; which view renders (or
/// where the caller is redirected) is decided by the dispatcher against the
/// table, not by this router. The table is the single source of truth: adding
/// a view means adding a table row, never another handler.
///
/// Unmatched paths are handled by the application-level fallback (also
/// `navigate`), which the dispatcher resolves to a redirect to `/`.
pub fn shell_routes() -> Router<AppState> {
    let mut router = Router::new()
        // GET /
        // Role dispatch: authenticated users land on their role's dashboard,
        // everyone else on the login view.
        .route(routing::ROOT_PATH, get(handlers::navigate));

    for entry in routing::ROUTE_TABLE {
        router = router.route(entry.path, get(handlers::navigate));
    }
    router
}
