use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::User;
use crate::session::Role;

/// Repository Trait
///
/// The abstract contract for identity operations: the user directory plus the
/// session revocation set. Handlers and the session extractor talk to this
/// trait only, so tests can substitute a mock without touching the HTTP
/// layer.
///
/// **Send + Sync + async_trait** keep the trait object (`Arc<dyn Repository>`)
/// shareable across Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- User directory ---
    async fn get_user(&self, id: Uuid) -> Option<User>;
    async fn get_user_by_email(&self, email: &str) -> Option<User>;
    /// Creates a user; `None` when the email is already registered.
    async fn create_user(&self, email: String, password: String, role: Role) -> Option<User>;
    /// Credential check for login; `None` on unknown email or wrong password,
    /// with no distinction between the two.
    async fn verify_credentials(&self, email: &str, password: &str) -> Option<User>;

    // --- Session revocation ---
    /// Marks a session id as revoked. Idempotent; returns whether the id was
    /// newly added.
    async fn revoke_session(&self, token_id: Uuid) -> bool;
    async fn is_session_revoked(&self, token_id: Uuid) -> bool;
}

/// RepositoryState
///
/// The concrete type used to share the identity layer across the application
/// state.
pub type RepositoryState = Arc<dyn Repository>;

struct StoredUser {
    user: User,
    password_hash: String,
}

struct DirectoryInner {
    users: HashMap<Uuid, StoredUser>,
    by_email: HashMap<String, Uuid>,
    revoked: HashSet<Uuid>,
}

/// UserDirectory
///
/// The in-memory implementation of `Repository`. The portal keeps no
/// persistent business data; the directory and the revocation set live for
/// the process lifetime only. Passwords are stored as argon2 hashes.
pub struct UserDirectory {
    inner: RwLock<DirectoryInner>,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(DirectoryInner {
                users: HashMap::new(),
                by_email: HashMap::new(),
                revoked: HashSet::new(),
            }),
        }
    }

    /// A directory pre-seeded with one account per role, for local
    /// development and demos. The seeded password for all three is
    /// `changeme`.
    pub fn with_demo_accounts() -> Self {
        let directory = Self::new();
        for (email, role) in [
            ("admin@advenue.local", Role::Admin),
            ("venue@advenue.local", Role::Venue),
            ("advertiser@advenue.local", Role::Advertiser),
        ] {
            directory.insert_user(email.to_string(), "changeme", role);
        }
        directory
    }

    fn insert_user(&self, email: String, password: &str, role: Role) -> Option<User> {
        let password_hash = match hash_password(password) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!("password hashing failed: {:?}", e);
                return None;
            }
        };

        let mut inner = self.inner.write().expect("directory lock poisoned");
        if inner.by_email.contains_key(&email) {
            return None;
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.clone(),
            role,
        };
        inner.by_email.insert(email, user.id);
        inner.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash,
            },
        );
        Some(user)
    }
}

fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

#[async_trait]
impl Repository for UserDirectory {
    async fn get_user(&self, id: Uuid) -> Option<User> {
        let inner = self.inner.read().expect("directory lock poisoned");
        inner.users.get(&id).map(|stored| stored.user.clone())
    }

    async fn get_user_by_email(&self, email: &str) -> Option<User> {
        let inner = self.inner.read().expect("directory lock poisoned");
        let id = inner.by_email.get(email)?;
        inner.users.get(id).map(|stored| stored.user.clone())
    }

    async fn create_user(&self, email: String, password: String, role: Role) -> Option<User> {
        self.insert_user(email, &password, role)
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> Option<User> {
        let inner = self.inner.read().expect("directory lock poisoned");
        let id = inner.by_email.get(email)?;
        let stored = inner.users.get(id)?;

        let parsed_hash = match PasswordHash::new(&stored.password_hash) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!("stored password hash unreadable: {:?}", e);
                return None;
            }
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .ok()?;

        Some(stored.user.clone())
    }

    async fn revoke_session(&self, token_id: Uuid) -> bool {
        let mut inner = self.inner.write().expect("directory lock poisoned");
        inner.revoked.insert(token_id)
    }

    async fn is_session_revoked(&self, token_id: Uuid) -> bool {
        let inner = self.inner.read().expect("directory lock poisoned");
        inner.revoked.contains(&token_id)
    }
}
