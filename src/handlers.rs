use crate::{
    AppState,
    models::{LoginRequest, LoginResponse, PushToastRequest, RegisterRequest, User, ViewResponse},
    notifier::Toast,
    routing::{self, Outcome},
    session::{self, CurrentSession, Session},
};
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use uuid::Uuid;

// --- Shell Navigation ---

/// navigate
///
/// [Shell Route] The single handler behind every view path, the root path and
/// the catch-all fallback. Resolves the requested path against the route
/// table with the caller's session and answers with either the view
/// descriptor (200) or a redirect (303) with an empty body.
///
/// Unauthorized navigation is indistinguishable from any other redirect here:
/// no error status, no error body, no elevated log level.
pub async fn navigate(
    CurrentSession { session, .. }: CurrentSession,
    uri: Uri,
) -> Response {
    let path = uri.path();
    match routing::resolve(path, &session) {
        Outcome::Render(view) => {
            tracing::debug!(path, view = ?view, "navigation rendered");
            Json(ViewResponse {
                view,
                path: path.to_string(),
            })
            .into_response()
        }
        Outcome::Redirect(target) => {
            tracing::debug!(path, target, "navigation redirected");
            Redirect::to(target).into_response()
        }
    }
}

// --- Session Lifecycle ---

/// register_user
///
/// [Public Route] Creates a user in the directory. The role arrives as a
/// closed-enum value, so an out-of-set role is rejected at deserialization
/// before this handler runs.
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered", body = User),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<User>, StatusCode> {
    match state
        .repo
        .create_user(payload.email, payload.password, payload.role)
        .await
    {
        Some(user) => Ok(Json(user)),
        None => Err(StatusCode::CONFLICT),
    }
}

/// login
///
/// [Public Route] Verifies credentials against the directory and mints the
/// session token. This is the only operation that creates a session; the
/// response carries the token plus the session snapshot the client will see
/// echoed by GET /session.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session created", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, StatusCode> {
    let user = state
        .repo
        .verify_credentials(&payload.email, &payload.password)
        .await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let (token, _jti) = session::mint_token(&user, &state.config).map_err(|e| {
        tracing::error!("session token mint failed: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "session created");
    Ok(Json(LoginResponse {
        token,
        session: Session::authenticated(user.id, Some(user.role)),
    }))
}

/// logout
///
/// [Public Route] Clears the presented session by revoking its token id.
/// Idempotent: logging out an anonymous or already-revoked session is still a
/// 204.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 204, description = "Session cleared"))
)]
pub async fn logout(
    CurrentSession { session, token_id }: CurrentSession,
    State(state): State<AppState>,
) -> StatusCode {
    if let Some(token_id) = token_id {
        state.repo.revoke_session(token_id).await;
        if let Some(user_id) = session.user_id {
            tracing::info!(user_id = %user_id, "session cleared");
        }
    }
    StatusCode::NO_CONTENT
}

/// get_session
///
/// [Public Route] The shell's "who am I" endpoint. Anonymous callers get the
/// anonymous session, not an error; the SPA uses this on boot to decide where
/// to land.
#[utoipa::path(
    get,
    path = "/session",
    responses((status = 200, description = "Current session", body = Session))
)]
pub async fn get_session(CurrentSession { session, .. }: CurrentSession) -> Json<Session> {
    Json(session)
}

// --- Notification Surface ---

/// list_notifications
///
/// [Notification Route] Active toasts in display order (newest first under
/// the default options). Expired toasts are swept on read.
#[utoipa::path(
    get,
    path = "/notifications",
    responses((status = 200, description = "Active toasts", body = [Toast]))
)]
pub async fn list_notifications(State(state): State<AppState>) -> Json<Vec<Toast>> {
    let mut surface = state.notifier.write().expect("notifier lock poisoned");
    surface.sweep(Utc::now());
    Json(surface.snapshot())
}

/// push_notification
///
/// [Notification Route] Publishes a transient message onto the surface.
#[utoipa::path(
    post,
    path = "/notifications",
    request_body = PushToastRequest,
    responses((status = 201, description = "Toast published", body = Toast))
)]
pub async fn push_notification(
    State(state): State<AppState>,
    Json(payload): Json<PushToastRequest>,
) -> impl IntoResponse {
    let mut surface = state.notifier.write().expect("notifier lock poisoned");
    let toast = surface.push(payload.level, payload.message);
    (StatusCode::CREATED, Json(toast))
}

/// dismiss_notification
///
/// [Notification Route] Click-dismissal of a single toast. Rejected with 409
/// when the surface is configured without dismiss-on-click.
#[utoipa::path(
    delete,
    path = "/notifications/{id}",
    params(("id" = Uuid, Path, description = "Toast ID")),
    responses(
        (status = 204, description = "Dismissed"),
        (status = 404, description = "Unknown toast"),
        (status = 409, description = "Surface does not dismiss on click")
    )
)]
pub async fn dismiss_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    let mut surface = state.notifier.write().expect("notifier lock poisoned");
    if !surface.options().dismiss_on_click {
        return StatusCode::CONFLICT;
    }
    if surface.dismiss(id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// hold_notification
///
/// [Notification Route] Hover entered a toast: freeze its dismiss timer until
/// released. Rejected with 409 when the surface is configured without
/// pause-on-hover.
#[utoipa::path(
    post,
    path = "/notifications/{id}/hold",
    params(("id" = Uuid, Path, description = "Toast ID")),
    responses(
        (status = 204, description = "Held"),
        (status = 404, description = "Unknown toast"),
        (status = 409, description = "Surface does not pause on hover")
    )
)]
pub async fn hold_notification(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    let mut surface = state.notifier.write().expect("notifier lock poisoned");
    if !surface.options().pause_on_hover {
        return StatusCode::CONFLICT;
    }
    if surface.hold(id, Utc::now()) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// release_notification
///
/// [Notification Route] Hover left a toast: the held interval extends its
/// dismiss deadline.
#[utoipa::path(
    post,
    path = "/notifications/{id}/release",
    params(("id" = Uuid, Path, description = "Toast ID")),
    responses(
        (status = 204, description = "Released"),
        (status = 404, description = "Unknown toast")
    )
)]
pub async fn release_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    let mut surface = state.notifier.write().expect("notifier lock poisoned");
    if surface.release(id, Utc::now()) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// pause_notifications
///
/// [Notification Route] Window focus lost: freeze every dismiss timer.
/// Rejected with 409 when the surface is configured without
/// pause-on-focus-loss.
#[utoipa::path(
    post,
    path = "/notifications/pause",
    responses(
        (status = 204, description = "All timers held"),
        (status = 409, description = "Surface does not pause on focus loss")
    )
)]
pub async fn pause_notifications(State(state): State<AppState>) -> StatusCode {
    let mut surface = state.notifier.write().expect("notifier lock poisoned");
    if surface.hold_all(Utc::now()) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::CONFLICT
    }
}

/// resume_notifications
///
/// [Notification Route] Window focus regained: resume every dismiss timer.
#[utoipa::path(
    post,
    path = "/notifications/resume",
    responses((status = 204, description = "All timers resumed"))
)]
pub async fn resume_notifications(State(state): State<AppState>) -> StatusCode {
    let mut surface = state.notifier.write().expect("notifier lock poisoned");
    surface.release_all(Utc::now());
    StatusCode::NO_CONTENT
}
