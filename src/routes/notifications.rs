use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Notification Router Module
///
/// The transient-message surface. Deliberately decoupled from the shell
/// router: nothing here consults the route table or the session, and the
/// surface keeps working identically for every role.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        // GET /notifications — active toasts, display order.
        // POST /notifications — publish a toast.
        .route(
            "/notifications",
            get(handlers::list_notifications).post(handlers::push_notification),
        )
        // POST /notifications/pause — focus lost, freeze all timers.
        .route("/notifications/pause", post(handlers::pause_notifications))
        // POST /notifications/resume — focus regained, resume all timers.
        .route(
            "/notifications/resume",
            post(handlers::resume_notifications),
        )
        // DELETE /notifications/{id} — click-dismissal.
        .route("/notifications/{id}", delete(handlers::dismiss_notification))
        // POST /notifications/{id}/hold — hover entered, freeze one timer.
        .route("/notifications/{id}/hold", post(handlers::hold_notification))
        // POST /notifications/{id}/release — hover left, resume one timer.
        .route(
            "/notifications/{id}/release",
            post(handlers::release_notification),
        )
}
