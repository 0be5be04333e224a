use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod content;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod repository;

pub mod routes;
use routes::{admin, public};

// --- Public Re-exports ---

pub use auth::{JwtSessionVerifier, SessionVerifier, VerifierState};
pub use config::{AccessPolicy, AppConfig};
pub use repository::{
    BlogRepositoryState, FallbackBlogRepository, PostgresBlogRepository, StaticBlogRepository,
};

/// ApiDoc
///
/// OpenAPI document for the site API, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_blogs, handlers::get_blog, handlers::login_page,
        handlers::forbidden_page, handlers::admin_dashboard, handlers::admin_blogs
    ),
    components(
        schemas(
            models::BlogPost, models::BlogSummary, models::AdminDashboard,
            models::LoginPrompt, models::Message, auth::Role,
        )
    ),
    tags(
        (name = "logistics-portal", description = "Logistics company site API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, immutable container for the services every request may need.
#[derive(Clone)]
pub struct AppState {
    /// Blog store (Postgres with built-in fallback, or built-in only).
    pub blogs: BlogRepositoryState,
    /// Session token verifier consulted by the access guard.
    pub verifier: VerifierState,
    /// The loaded environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for BlogRepositoryState {
    fn from_ref(app_state: &AppState) -> BlogRepositoryState {
        app_state.blogs.clone()
    }
}

impl FromRef<AppState> for VerifierState {
    fn from_ref(app_state: &AppState) -> VerifierState {
        app_state.verifier.clone()
    }
}

impl FromRef<AppState> for AccessPolicy {
    fn from_ref(app_state: &AppState) -> AccessPolicy {
        app_state.config.access.clone()
    }
}

/// create_router
///
/// Assembles the routes, puts the access guard in front of all of them and adds the
/// observability layers.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes());

    // axum cannot nest at the root, so a `/` prefix mounts the admin routes directly.
    let prefix = AccessPolicy::normalize_prefix(&state.config.access.protected_prefix);
    let router = if prefix == "/" {
        router.merge(admin::admin_routes())
    } else {
        router.nest(&prefix, admin::admin_routes())
    };

    let base_router = router
        .fallback(handlers::not_found)
        // Added after the fallback so unknown URLs under the prefix are guarded too.
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::access_guard,
        ))
        .with_state(state);

    // 3. Observability and Correlation Layers (outermost)
    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span per request carrying method, URI and the `x-request-id` set above.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
