use logistics_portal::{
    content::{PLACEHOLDER_IMAGE, first_image, plain_text, preview, reading_minutes},
    models::{BlogPost, BlogSummary},
};

#[test]
fn test_first_image_picks_first_src() {
    let html = r#"<p>Intro</p><IMG class="hero" src='/a.jpg'><img src="/b.jpg">"#;
    assert_eq!(first_image(html), "/a.jpg");
}

#[test]
fn test_first_image_placeholder_when_absent() {
    assert_eq!(first_image("<p>No pictures here</p>"), PLACEHOLDER_IMAGE);
    assert_eq!(first_image(""), PLACEHOLDER_IMAGE);
}

#[test]
fn test_plain_text_strips_markup() {
    let html = "<h2>Packing</h2><p>Use <strong>double</strong> boxes.</p>";
    assert_eq!(plain_text(html), "Packing Use double boxes.");
}

#[test]
fn test_preview_truncates_at_150_chars() {
    let text = "a".repeat(400);
    let result = preview(&text);
    assert_eq!(result.len(), 153);
    assert!(result.ends_with("..."));

    assert_eq!(preview(""), "No content available");
}

#[test]
fn test_reading_minutes_rounds_up() {
    assert_eq!(reading_minutes(""), 0);
    assert_eq!(reading_minutes("one two three"), 1);
    assert_eq!(reading_minutes(&"word ".repeat(200)), 1);
    assert_eq!(reading_minutes(&"word ".repeat(201)), 2);
}

#[test]
fn test_summary_from_post() {
    let post = BlogPost {
        id: 5,
        post_title: "Warehouse tour".to_string(),
        post_content: r#"<img src="/tour.jpg"/><p>Racks and docks.</p>"#.to_string(),
        ..BlogPost::default()
    };

    let summary = BlogSummary::from(&post);

    assert_eq!(summary.id, 5);
    assert_eq!(summary.image_url, "/tour.jpg");
    assert_eq!(summary.preview, "Racks and docks....");
    assert_eq!(summary.reading_minutes, 1);
    assert!(post.is_published());
}
