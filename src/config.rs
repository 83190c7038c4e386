use std::env;

/// AppConfig
///
/// Holds the application's entire configuration state. The struct is immutable
/// once loaded and is shared across all request handlers via the application
/// state (`FromRef`), so every component reads the same values for the whole
/// process lifetime.
#[derive(Clone)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and the dev session bypass.
    pub env: Env,
    // Secret key used to sign and validate session tokens (HS256).
    pub jwt_secret: String,
    // Lifetime of a minted session token, in minutes.
    pub session_ttl_minutes: i64,
}

/// Env
///
/// Defines the runtime context, used to switch between development utilities
/// (pretty logs, `x-user-id` session bypass, seeded demo accounts) and the
/// hardened production configuration (JSON logs, mandatory secret).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Provides a safe, non-panicking AppConfig instance primarily used for
    /// test setup, so tests can build application state without touching
    /// process environment variables.
    fn default() -> Self {
        Self {
            env: Env::Local,
            jwt_secret: "portal-local-test-secret".to_string(),
            session_ttl_minutes: 8 * 60,
        }
    }
}

impl AppConfig {
    /// The canonical function for initializing the application configuration
    /// at startup. Reads all parameters from environment variables and fails
    /// fast when a value required by the current environment is missing.
    ///
    /// # Panics
    /// Panics if `PORTAL_JWT_SECRET` is not set while running in Production.
    /// A session signed with a guessable default secret would be forgeable,
    /// so the process refuses to boot instead.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let jwt_secret = match env {
            Env::Production => env::var("PORTAL_JWT_SECRET")
                .expect("FATAL: PORTAL_JWT_SECRET must be set in production."),
            _ => env::var("PORTAL_JWT_SECRET")
                .unwrap_or_else(|_| "portal-local-test-secret".to_string()),
        };

        let session_ttl_minutes = env::var("SESSION_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8 * 60);

        Self {
            env,
            jwt_secret,
            session_ttl_minutes,
        }
    }
}
