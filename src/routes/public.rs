use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints needing no session. Blog data only ever exposes published posts here.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for the load balancer.
        .route("/health", get(|| async { "ok" }))
        // GET /api/blogs and GET /api/blogs?id=N
        .route("/api/blogs", get(handlers::list_blogs))
        // GET /api/blogs/{id}
        .route("/api/blogs/{id}", get(handlers::get_blog))
        // Redirect targets used by the access guard.
        .route("/login", get(handlers::login_page))
        .route("/403", get(handlers::forbidden_page))
}
