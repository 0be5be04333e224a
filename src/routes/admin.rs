use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// Nested under the protected prefix. Nothing in here checks roles itself: requests
/// only arrive after `access_guard` returned Allow.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/dashboard
        .route("/dashboard", get(handlers::admin_dashboard))
        // GET /admin/blogs
        // All posts including drafts.
        .route("/blogs", get(handlers::admin_blogs))
}
