//! Helpers that turn stored post HTML into listing card fields.

use regex::Regex;
use std::sync::LazyLock;

pub const PLACEHOLDER_IMAGE: &str = "/image/blog-placeholder.jpg";

const PREVIEW_CHARS: usize = 150;
const WORDS_PER_MINUTE: usize = 200;

static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]+src=['"]([^'"]+)['"]"#).expect("image pattern compiles")
});
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern compiles"));

/// `src` of the first `<img>` in the post, or the placeholder image.
pub fn first_image(html: &str) -> String {
    IMG_SRC
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
}

/// Post body with markup removed and whitespace collapsed.
pub fn plain_text(html: &str) -> String {
    TAG.replace_all(html, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// First 150 characters of the text followed by `...`.
pub fn preview(text: &str) -> String {
    if text.is_empty() {
        return "No content available".to_string();
    }
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{head}...")
}

/// Minutes at 200 words per minute, rounded up.
pub fn reading_minutes(text: &str) -> u32 {
    let words = text.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE) as u32
}
