use advenue_portal::{
    AppState, NotificationSurface, SurfaceOptions, UserDirectory,
    config::{AppConfig, Env},
    create_router,
    repository::RepositoryState,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// The asynchronous entry point, responsible for initializing configuration,
/// logging, the user directory, the notification surface, and the HTTP
/// server, in that order.
#[tokio::main]
async fn main() {
    // 1. Configuration & environment loading (fail-fast).
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging filter setup. RUST_LOG wins; otherwise sensible defaults
    // for local development.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "advenue_portal=debug,tower_http=info,axum=trace".into());

    // 3. Initialize logging based on environment.
    match config.env {
        Env::Local => {
            // LOCAL: pretty print for human readability.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // PROD: JSON output for centralized log aggregators.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. User directory initialization. The directory is in-memory for the
    // process lifetime; Local gets one seeded demo account per role.
    let repo: RepositoryState = match config.env {
        Env::Local => {
            tracing::info!(
                "Seeding demo accounts: admin@advenue.local / venue@advenue.local / advertiser@advenue.local"
            );
            Arc::new(UserDirectory::with_demo_accounts())
        }
        Env::Production => Arc::new(UserDirectory::new()),
    };

    // 5. Notification surface with the shipped display contract.
    let notifier = NotificationSurface::shared(SurfaceOptions::default());

    // 6. Unified state assembly.
    let app_state = AppState {
        repo,
        notifier,
        config,
    };

    // 7. Router and server startup.
    let app = create_router(app_state);

    let listener = TcpListener::bind("0.0.0.0:3000").await.unwrap();

    tracing::info!("HTTP server bound successfully.");
    tracing::info!("Listening on 0.0.0.0:3000");
    tracing::info!("API Documentation (Swagger UI) available at: http://localhost:3000/swagger-ui");

    axum::serve(listener, app).await.unwrap();
}
