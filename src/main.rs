use logistics_portal::{
    AppState,
    auth::{JwtSessionVerifier, VerifierState},
    config::{AppConfig, Env},
    create_router,
    repository::{
        BlogRepositoryState, FallbackBlogRepository, PostgresBlogRepository,
        StaticBlogRepository,
    },
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, sets up logging, wires the blog store and session verifier,
/// then serves the router.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail fast on missing production secrets)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise debug for this crate.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "logistics_portal=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // JSON lines for the log aggregator.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);
    tracing::info!(
        prefix = %config.access.protected_prefix,
        roles = ?config.access.allowed_roles,
        "admin access policy loaded"
    );

    // 3. Blog store: Postgres when configured, always backed by the built-in posts.
    let builtin = Arc::new(StaticBlogRepository::builtin()) as BlogRepositoryState;
    let blogs = match &config.db_url {
        Some(db_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(db_url)
                .await
                .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");
            let primary = Arc::new(PostgresBlogRepository::new(pool)) as BlogRepositoryState;
            Arc::new(FallbackBlogRepository::new(primary, builtin)) as BlogRepositoryState
        }
        None => {
            tracing::warn!("DATABASE_URL not set, serving built-in blog posts only");
            builtin
        }
    };

    // 4. Session verification
    let verifier = Arc::new(JwtSessionVerifier::new(
        &config.session_secret,
        &config.session_cookie,
    )) as VerifierState;

    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState {
        blogs,
        verifier,
        config,
    });

    // 5. Server
    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {:?}", e);
    }
}
