use advenue_portal::{
    AppState, NotificationSurface, SurfaceOptions,
    config::{AppConfig, Env},
    models::User,
    repository::Repository,
    session::{Claims, CurrentSession, Role},
};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{Method, Request, Uri, header, request::Parts},
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

// --- Mock Repository for Session Resolution ---

#[derive(Default)]
struct MockRepo {
    user_to_return: Option<User>,
    revoked: HashSet<Uuid>,
}

#[async_trait]
impl Repository for MockRepo {
    async fn get_user(&self, _id: Uuid) -> Option<User> {
        self.user_to_return.clone()
    }
    async fn get_user_by_email(&self, email: &str) -> Option<User> {
        self.user_to_return.clone().filter(|u| u.email == email)
    }
    async fn create_user(&self, _email: String, _password: String, _role: Role) -> Option<User> {
        None
    }
    async fn verify_credentials(&self, _email: &str, _password: &str) -> Option<User> {
        None
    }
    async fn revoke_session(&self, _token_id: Uuid) -> bool {
        false
    }
    async fn is_session_revoked(&self, token_id: Uuid) -> bool {
        self.revoked.contains(&token_id)
    }
}

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";
const TEST_USER_ID: Uuid = Uuid::from_u128(1);

fn test_user(role: Role) -> User {
    User {
        id: TEST_USER_ID,
        email: "venue@example.com".to_string(),
        role,
    }
}

fn create_token(user_id: Uuid, role: Role, jti: Uuid, exp_offset: i64, secret: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.as_str().to_string(),
        jti,
        iat: now as usize,
        // Negative offsets produce already-expired tokens.
        exp: (now + exp_offset) as usize,
    };
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

fn create_app_state(env: Env, repo: MockRepo) -> AppState {
    let config = AppConfig {
        env,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        ..AppConfig::default()
    };
    AppState {
        repo: Arc::new(repo),
        notifier: NotificationSurface::shared(SurfaceOptions::default()),
        config,
    }
}

fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

async fn resolve_session(parts: &mut Parts, state: &AppState) -> CurrentSession {
    // The extractor is infallible; unwrap is just unwrapping Ok.
    CurrentSession::from_request_parts(parts, state)
        .await
        .unwrap()
}

fn bearer(parts: &mut Parts, token: &str) {
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
}

// --- Tests ---

#[tokio::test]
async fn valid_token_resolves_authenticated_session() {
    let jti = Uuid::new_v4();
    let token = create_token(TEST_USER_ID, Role::Venue, jti, 3600, TEST_JWT_SECRET);
    let state = create_app_state(
        Env::Production,
        MockRepo {
            user_to_return: Some(test_user(Role::Venue)),
            ..MockRepo::default()
        },
    );

    let mut parts = get_request_parts(Method::GET, "/venue/dashboard".parse().unwrap());
    bearer(&mut parts, &token);

    let current = resolve_session(&mut parts, &state).await;
    assert!(current.session.is_authenticated);
    assert_eq!(current.session.user_id, Some(TEST_USER_ID));
    assert_eq!(current.session.role, Some(Role::Venue));
    assert_eq!(current.token_id, Some(jti));
}

#[tokio::test]
async fn missing_header_resolves_anonymous_not_an_error() {
    let state = create_app_state(Env::Production, MockRepo::default());
    let mut parts = get_request_parts(Method::GET, "/admin/dashboard".parse().unwrap());

    let current = resolve_session(&mut parts, &state).await;
    assert!(!current.session.is_authenticated);
    assert_eq!(current.session.user_id, None);
    assert_eq!(current.session.role, None);
    assert_eq!(current.token_id, None);
}

#[tokio::test]
async fn malformed_token_resolves_anonymous() {
    let state = create_app_state(
        Env::Production,
        MockRepo {
            user_to_return: Some(test_user(Role::Admin)),
            ..MockRepo::default()
        },
    );
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    bearer(&mut parts, "not-a-jwt");

    let current = resolve_session(&mut parts, &state).await;
    assert!(!current.session.is_authenticated);
}

#[tokio::test]
async fn expired_token_resolves_anonymous() {
    // Expired well past the validator's default leeway.
    let token = create_token(
        TEST_USER_ID,
        Role::Venue,
        Uuid::new_v4(),
        -3600,
        TEST_JWT_SECRET,
    );
    let state = create_app_state(
        Env::Production,
        MockRepo {
            user_to_return: Some(test_user(Role::Venue)),
            ..MockRepo::default()
        },
    );
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    bearer(&mut parts, &token);

    let current = resolve_session(&mut parts, &state).await;
    assert!(!current.session.is_authenticated);
}

#[tokio::test]
async fn token_signed_with_wrong_secret_resolves_anonymous() {
    let token = create_token(
        TEST_USER_ID,
        Role::Venue,
        Uuid::new_v4(),
        3600,
        "some-other-secret",
    );
    let state = create_app_state(
        Env::Production,
        MockRepo {
            user_to_return: Some(test_user(Role::Venue)),
            ..MockRepo::default()
        },
    );
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    bearer(&mut parts, &token);

    let current = resolve_session(&mut parts, &state).await;
    assert!(!current.session.is_authenticated);
}

#[tokio::test]
async fn revoked_session_resolves_anonymous() {
    let jti = Uuid::new_v4();
    let token = create_token(TEST_USER_ID, Role::Venue, jti, 3600, TEST_JWT_SECRET);
    let state = create_app_state(
        Env::Production,
        MockRepo {
            user_to_return: Some(test_user(Role::Venue)),
            revoked: HashSet::from([jti]),
        },
    );
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    bearer(&mut parts, &token);

    let current = resolve_session(&mut parts, &state).await;
    assert!(!current.session.is_authenticated);
    assert_eq!(current.token_id, None);
}

#[tokio::test]
async fn token_for_deleted_user_resolves_anonymous() {
    // Valid token, but the directory no longer knows the subject.
    let token = create_token(
        TEST_USER_ID,
        Role::Advertiser,
        Uuid::new_v4(),
        3600,
        TEST_JWT_SECRET,
    );
    let state = create_app_state(Env::Production, MockRepo::default());
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    bearer(&mut parts, &token);

    let current = resolve_session(&mut parts, &state).await;
    assert!(!current.session.is_authenticated);
}

#[tokio::test]
async fn local_bypass_resolves_session() {
    let state = create_app_state(
        Env::Local,
        MockRepo {
            user_to_return: Some(test_user(Role::Admin)),
            ..MockRepo::default()
        },
    );
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&TEST_USER_ID.to_string()).unwrap(),
    );

    let current = resolve_session(&mut parts, &state).await;
    assert!(current.session.is_authenticated);
    assert_eq!(current.session.role, Some(Role::Admin));
    // Bypass sessions carry no token to revoke.
    assert_eq!(current.token_id, None);
}

#[tokio::test]
async fn local_bypass_disabled_in_prod() {
    let state = create_app_state(
        Env::Production,
        MockRepo {
            user_to_return: Some(test_user(Role::Admin)),
            ..MockRepo::default()
        },
    );
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(&TEST_USER_ID.to_string()).unwrap(),
    );

    let current = resolve_session(&mut parts, &state).await;
    assert!(!current.session.is_authenticated);
}
