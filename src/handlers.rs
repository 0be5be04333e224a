use crate::{
    auth::Claims,
    models::{AdminDashboard, BlogPost, BlogSummary, LoginPrompt, Message, PUBLISHED},
    repository::BlogRepositoryState,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

// --- Query Structs ---

/// BlogQuery
///
/// Query parameters for `GET /api/blogs`. The home page asks for
/// `?status=publish&limit=3`; the detail page fetches `?id=N`.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct BlogQuery {
    /// Optional post id. When present the response is a single `BlogPost`.
    pub id: Option<i64>,
    /// Only list posts with this status. Drafts are never public, so anything other
    /// than `publish` yields an empty list.
    pub status: Option<String>,
    /// Maximum number of posts, newest first.
    pub limit: Option<usize>,
}

/// LoginQuery
#[derive(Deserialize, utoipa::IntoParams)]
pub struct LoginQuery {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

// --- Public Handlers ---

/// list_blogs
///
/// [Public Route] Published posts as listing cards, newest first.
/// With `id` it answers like `/api/blogs/{id}` and returns one full `BlogPost`.
#[utoipa::path(
    get,
    path = "/api/blogs",
    params(BlogQuery),
    responses(
        (status = 200, description = "Published posts as listing cards. With `id`, a single `BlogPost` as returned by `/api/blogs/{id}`.", body = [BlogSummary]),
        (status = 404, description = "`id` given and no published post has it")
    )
)]
pub async fn list_blogs(
    State(repo): State<BlogRepositoryState>,
    Query(query): Query<BlogQuery>,
) -> Response {
    if let Some(id) = query.id {
        return get_blog(State(repo), Path(id)).await.into_response();
    }

    let mut posts: Vec<BlogPost> = repo
        .list_posts()
        .await
        .into_iter()
        .filter(BlogPost::is_published)
        .filter(|post| {
            query
                .status
                .as_deref()
                .is_none_or(|status| post.post_status.as_deref().unwrap_or(PUBLISHED) == status)
        })
        .collect();
    // Undated posts sort last.
    posts.sort_by(|a, b| b.post_date.cmp(&a.post_date));

    let summaries: Vec<BlogSummary> = posts
        .iter()
        .take(query.limit.unwrap_or(usize::MAX))
        .map(BlogSummary::from)
        .collect();
    Json(summaries).into_response()
}

/// get_blog
///
/// [Public Route] Full post body for the detail page.
#[utoipa::path(
    get,
    path = "/api/blogs/{id}",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post", body = BlogPost),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_blog(
    State(repo): State<BlogRepositoryState>,
    Path(id): Path<i64>,
) -> Result<Json<BlogPost>, StatusCode> {
    repo.get_post(id)
        .await
        .filter(BlogPost::is_published)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// login_page
///
/// [Public Route] Target of the guard's unauthenticated redirect. Echoes the return
/// path so the sign-in form can navigate back once the session is issued.
#[utoipa::path(
    get,
    path = "/login",
    params(LoginQuery),
    responses((status = 200, description = "Sign-in required", body = LoginPrompt))
)]
pub async fn login_page(Query(query): Query<LoginQuery>) -> Json<LoginPrompt> {
    Json(LoginPrompt {
        message: "Sign in to continue".to_string(),
        callback_url: query.callback_url,
    })
}

/// forbidden_page
///
/// [Public Route] Target of the guard's role-mismatch redirect.
#[utoipa::path(
    get,
    path = "/403",
    responses((status = 403, description = "Forbidden", body = Message))
)]
pub async fn forbidden_page() -> impl IntoResponse {
    (
        StatusCode::FORBIDDEN,
        Json(Message {
            message: "You do not have access to this page".to_string(),
        }),
    )
}

/// not_found
///
/// Fallback for unmatched paths.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(Message {
            message: "Page not found".to_string(),
        }),
    )
}

// --- Admin Handlers ---
// Only reachable after `access_guard` has allowed the request, which also places the
// verified `Claims` in the request extensions.

/// admin_dashboard
#[utoipa::path(
    get,
    path = "/admin/dashboard",
    responses((status = 200, description = "Dashboard", body = AdminDashboard))
)]
pub async fn admin_dashboard(
    Extension(claims): Extension<Claims>,
    State(repo): State<BlogRepositoryState>,
) -> Json<AdminDashboard> {
    let posts = repo.list_posts().await;
    Json(AdminDashboard {
        user_id: claims.sub,
        role: claims.role(),
        total_posts: posts.len(),
        published_posts: posts.iter().filter(|post| post.is_published()).count(),
    })
}

/// admin_blogs
///
/// [Admin Route] Every post, drafts included, for the editor's table.
#[utoipa::path(
    get,
    path = "/admin/blogs",
    responses((status = 200, description = "All posts", body = [BlogPost]))
)]
pub async fn admin_blogs(State(repo): State<BlogRepositoryState>) -> Json<Vec<BlogPost>> {
    Json(repo.list_posts().await)
}
