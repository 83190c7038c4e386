use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::notifier::Level;
use crate::routing::View;
use crate::session::{Role, Session};

// --- Core Application Schemas ---

/// User
///
/// A user's canonical identity record in the directory: the minimal data the
/// shell needs to resolve sessions and dispatch by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// The RBAC field, a closed enum. Anything outside it never enters the
    /// directory.
    pub role: Role,
}

// --- Request Payloads (Input Schemas) ---

/// RegisterRequest
///
/// Input payload for the public registration endpoint (POST /register).
/// Deserialization already rejects role values outside the closed set.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// LoginRequest
///
/// Input payload for POST /login. The password is verified against the
/// directory's argon2 hash and never persisted or logged in clear.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// PushToastRequest
///
/// Input payload for publishing a transient message onto the notification
/// surface.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct PushToastRequest {
    pub level: Level,
    pub message: String,
}

// --- Response Schemas (Output) ---

/// LoginResponse
///
/// Output of a successful login: the bearer token the client presents on
/// every navigation, plus a snapshot of the session it encodes.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginResponse {
    pub token: String,
    pub session: Session,
}

/// ViewResponse
///
/// Output of a navigation that passed the guard: which view the SPA should
/// mount, echoing the path that resolved to it.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ViewResponse {
    pub view: View,
    pub path: String,
}
