use crate::models::BlogPost;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use std::sync::Arc;

/// BlogRepository
///
/// Read contract for blog posts. Handlers only see this trait, so the Postgres table,
/// the built-in post list and test mocks are interchangeable.
///
/// Implementations swallow storage errors (after logging them) and report "nothing
/// found", which lets `FallbackBlogRepository` step in.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    // All posts, newest first, drafts included. Visibility is the caller's concern.
    async fn list_posts(&self) -> Vec<BlogPost>;
    async fn get_post(&self, id: i64) -> Option<BlogPost>;
}

/// BlogRepositoryState
///
/// The concrete type used to share the blog store across the application state.
pub type BlogRepositoryState = Arc<dyn BlogRepository>;

/// PostgresBlogRepository
///
/// Reads the `posts` table written by the admin editor.
pub struct PostgresBlogRepository {
    pool: PgPool,
}

impl PostgresBlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn list_posts(&self) -> Vec<BlogPost> {
        let query = sqlx::query_as::<_, BlogPost>(
            r#"SELECT id, post_title, post_content, category, tags, post_status, post_date
               FROM posts
               ORDER BY post_date DESC NULLS LAST, id DESC"#,
        );

        match query.fetch_all(&self.pool).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!("list_posts error: {:?}", e);
                vec![]
            }
        }
    }

    async fn get_post(&self, id: i64) -> Option<BlogPost> {
        sqlx::query_as::<_, BlogPost>(
            r#"SELECT id, post_title, post_content, category, tags, post_status, post_date
               FROM posts
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_post error: {:?}", e);
            None
        })
    }
}

/// StaticBlogRepository
///
/// In-memory post list. Ships with the site's launch articles and doubles as the
/// offline source when the database is unavailable.
pub struct StaticBlogRepository {
    posts: Vec<BlogPost>,
}

impl StaticBlogRepository {
    pub fn new(posts: Vec<BlogPost>) -> Self {
        Self { posts }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_posts())
    }
}

#[async_trait]
impl BlogRepository for StaticBlogRepository {
    async fn list_posts(&self) -> Vec<BlogPost> {
        self.posts.clone()
    }

    async fn get_post(&self, id: i64) -> Option<BlogPost> {
        self.posts.iter().find(|post| post.id == id).cloned()
    }
}

/// FallbackBlogRepository
///
/// Serves from `primary` and consults `fallback` whenever the primary has nothing
/// published to show. Primary drafts stay in the list so the admin editor still sees them.
pub struct FallbackBlogRepository {
    primary: BlogRepositoryState,
    fallback: BlogRepositoryState,
}

impl FallbackBlogRepository {
    pub fn new(primary: BlogRepositoryState, fallback: BlogRepositoryState) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl BlogRepository for FallbackBlogRepository {
    async fn list_posts(&self) -> Vec<BlogPost> {
        let mut posts = self.primary.list_posts().await;
        if !posts.iter().any(BlogPost::is_published) {
            tracing::debug!("primary blog store has no published posts, adding fallback posts");
            posts.extend(self.fallback.list_posts().await);
        }
        posts
    }

    // A published fallback post wins over a primary draft with the same id.
    async fn get_post(&self, id: i64) -> Option<BlogPost> {
        match self.primary.get_post(id).await {
            Some(post) if post.is_published() => Some(post),
            primary => self
                .fallback
                .get_post(id)
                .await
                .filter(BlogPost::is_published)
                .or(primary),
        }
    }
}

fn builtin_posts() -> Vec<BlogPost> {
    let post = |id: i64, title: &str, body: &str, category: &str, (y, m, d): (i32, u32, u32)| BlogPost {
        id,
        post_title: title.to_string(),
        post_content: body.to_string(),
        category: Some(category.to_string()),
        tags: None,
        post_status: Some(crate::models::PUBLISHED.to_string()),
        post_date: Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).single(),
    };

    vec![
        post(
            3,
            "How to Pack Fragile Items for a Long-Distance Move",
            r#"<img src="/image/blog/fragile-packing.jpg" alt="Packed boxes"/><p>Double-box anything made of glass, fill every gap with crumpled paper and label each side of the carton. Our crews load fragile cartons last so they come off the truck first.</p>"#,
            "Moving Tips",
            (2024, 9, 18),
        ),
        post(
            2,
            "Choosing Between Full-Service and Self-Pack Moves",
            r#"<p>Full-service moves cover packing, loading, transport and unpacking. Self-pack moves keep costs down while we handle the heavy lifting and the road.</p><h2>Which is right for you?</h2><p>Consider the size of your home, your timeline and how much of your week you can spare.</p>"#,
            "Planning",
            (2024, 6, 4),
        ),
        post(
            1,
            "Inside Our Freight Network: From Warehouse to Doorstep",
            r#"<img src="/image/blog/freight-network.jpg" alt="Warehouse"/><p>Every shipment is scanned at pickup, cross-docked at our regional hubs and tracked until it reaches the final address.</p>"#,
            "Logistics",
            (2024, 2, 12),
        ),
    ]
}
