use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    models::User,
    repository::RepositoryState,
};

/// Role
///
/// The closed set of portal roles. Role strings outside this set (a stale
/// token, a tampered claim) parse to no role at all; such a session is
/// treated by the dispatcher exactly like an unauthenticated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Venue,
    Advertiser,
}

impl Role {
    /// Parses the wire representation of a role. Unknown values map to `None`,
    /// never to a default role.
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "admin" => Some(Role::Admin),
            "venue" => Some(Role::Venue),
            "advertiser" => Some(Role::Advertiser),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Venue => "venue",
            Role::Advertiser => "advertiser",
        }
    }
}

/// Session
///
/// The current user's authentication and role state, resolved once per
/// request and passed into the dispatcher as an immutable value. Sessions are
/// created by login and cleared by logout (token revocation); nothing mutates
/// a `Session` in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Session {
    pub user_id: Option<Uuid>,
    /// `None` either because the session is anonymous or because the stored
    /// role was outside the closed `Role` set.
    pub role: Option<Role>,
    pub is_authenticated: bool,
}

impl Session {
    pub const fn anonymous() -> Self {
        Self {
            user_id: None,
            role: None,
            is_authenticated: false,
        }
    }

    pub fn authenticated(user_id: Uuid, role: Option<Role>) -> Self {
        Self {
            user_id: Some(user_id),
            role,
            is_authenticated: true,
        }
    }
}

/// Claims
///
/// The payload signed into a session token at login. `jti` identifies the
/// individual session so logout can revoke it without any persistent state
/// beyond the revocation set.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's UUID in the directory.
    pub sub: Uuid,
    /// Role at mint time. Informational for clients; the directory remains
    /// authoritative when the session is resolved.
    pub role: String,
    /// Session id, the unit of revocation.
    pub jti: Uuid,
    /// Expiration timestamp; tokens past it resolve to the anonymous session.
    pub exp: usize,
    /// Issued-at timestamp.
    pub iat: usize,
}

/// mint_token
///
/// Signs a fresh session token for a user who just passed the credential
/// check. Returns the encoded token together with its session id so the
/// caller can hand both back to the client.
pub fn mint_token(
    user: &User,
    config: &AppConfig,
) -> Result<(String, Uuid), jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let jti = Uuid::new_v4();
    let claims = Claims {
        sub: user.id,
        role: user.role.as_str().to_string(),
        jti,
        iat: now as usize,
        exp: (now + config.session_ttl_minutes * 60) as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;
    Ok((token, jti))
}

/// CurrentSession
///
/// The per-request session extractor result. `session` is what the guards and
/// the dispatcher consume; `token_id` is carried alongside so logout can
/// revoke the presented token without re-parsing the request.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub session: Session,
    /// `jti` of the presented token. `None` for anonymous sessions and for
    /// sessions resolved through the local bypass header.
    pub token_id: Option<Uuid>,
}

impl CurrentSession {
    pub const fn anonymous() -> Self {
        Self {
            session: Session::anonymous(),
            token_id: None,
        }
    }
}

/// CurrentSession Extractor Implementation
///
/// Resolution order:
/// 1. Local bypass: in `Env::Local` a `x-user-id` header naming a directory
///    user resolves directly, skipping token validation. Inert in Production.
/// 2. Bearer token: decode, check expiry, check the revocation set, then
///    confirm the user still exists in the directory (a deleted user's token
///    must stop resolving immediately).
///
/// This extractor is infallible by construction: every failure path resolves
/// to the anonymous session rather than a rejection. Unauthorized access is
/// answered by the guards with a redirect, not by this layer with a 401.
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        // 1. Local development bypass.
        if config.env == Env::Local {
            if let Some(user_id_header) = parts.headers.get("x-user-id") {
                if let Ok(id_str) = user_id_header.to_str() {
                    if let Ok(user_id) = Uuid::parse_str(id_str) {
                        if let Some(user) = repo.get_user(user_id).await {
                            return Ok(CurrentSession {
                                session: Session::authenticated(user.id, Some(user.role)),
                                token_id: None,
                            });
                        }
                    }
                }
            }
        }

        // 2. Bearer token resolution.
        let Some(auth_header) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
        else {
            return Ok(CurrentSession::anonymous());
        };
        let Some(token) = auth_header.strip_prefix("Bearer ") else {
            return Ok(CurrentSession::anonymous());
        };

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = match decode::<Claims>(token, &decoding_key, &validation) {
            Ok(data) => data,
            // Expired, malformed, or badly signed tokens all degrade to the
            // anonymous session.
            Err(_) => return Ok(CurrentSession::anonymous()),
        };
        let claims = token_data.claims;

        // Logout revokes by jti; a revoked session is indistinguishable from
        // no session at all.
        if repo.is_session_revoked(claims.jti).await {
            return Ok(CurrentSession::anonymous());
        }

        let Some(user) = repo.get_user(claims.sub).await else {
            return Ok(CurrentSession::anonymous());
        };

        Ok(CurrentSession {
            session: Session::authenticated(user.id, Some(user.role)),
            token_id: Some(claims.jti),
        })
    }
}
