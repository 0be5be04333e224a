use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{auth::Role, content};

/// Status value marking a post as visible on the public site.
pub const PUBLISHED: &str = "publish";

/// BlogPost
///
/// A blog article as stored in the `posts` table or in the built-in post list.
/// `post_content` is HTML authored in the admin editor.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[ts(export)]
pub struct BlogPost {
    pub id: i64,
    pub post_title: String,
    pub post_content: String,
    pub category: Option<String>,
    pub tags: Option<String>,
    // "publish" or "draft". Posts without a status are treated as published.
    pub post_status: Option<String>,
    #[ts(type = "string | null")]
    pub post_date: Option<DateTime<Utc>>,
}

impl BlogPost {
    pub fn is_published(&self) -> bool {
        self.post_status
            .as_deref()
            .is_none_or(|status| status == PUBLISHED)
    }
}

/// BlogSummary
///
/// Card data for the blog listing: everything the grid needs without the full body.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct BlogSummary {
    pub id: i64,
    pub post_title: String,
    pub preview: String,
    pub image_url: String,
    pub reading_minutes: u32,
    #[ts(type = "string | null")]
    pub post_date: Option<DateTime<Utc>>,
}

impl From<&BlogPost> for BlogSummary {
    fn from(post: &BlogPost) -> Self {
        let text = content::plain_text(&post.post_content);
        Self {
            id: post.id,
            post_title: post.post_title.clone(),
            preview: content::preview(&text),
            image_url: content::first_image(&post.post_content),
            reading_minutes: content::reading_minutes(&text),
            post_date: post.post_date,
        }
    }
}

/// AdminDashboard
///
/// Landing payload for `/admin/dashboard`: who is signed in and the post counts.
#[derive(Debug, Clone, Serialize, TS, ToSchema)]
#[ts(export)]
pub struct AdminDashboard {
    pub user_id: Uuid,
    pub role: Role,
    pub total_posts: usize,
    pub published_posts: usize,
}

/// LoginPrompt
///
/// Returned by `/login` so the sign-in form knows where to send the user afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginPrompt {
    pub message: String,
    pub callback_url: Option<String>,
}

/// Message
///
/// Plain message body used by the forbidden page.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Message {
    pub message: String,
}
