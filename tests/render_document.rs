use std::{sync::Arc, time::Duration};

use atelier::{
    application::render::{PortableTextRenderer, RenderOptions, RenderService},
    config::SanitySettings,
    domain::portable_text::RichDocument,
    infra::sanity::{SanityFileUrlResolver, SanityImageUrlBuilder},
};
use serde_json::{Value, json};
use url::Url;

fn sanity_settings() -> SanitySettings {
    SanitySettings {
        project_id: "abc123".to_string(),
        dataset: "production".to_string(),
        api_version: "2024-01-01".to_string(),
        use_cdn: true,
        token: None,
        api_base: Url::parse("https://abc123.apicdn.sanity.io/").expect("api base"),
        cdn_base: Url::parse("https://cdn.sanity.io/").expect("cdn base"),
        request_timeout: Duration::from_secs(5),
    }
}

fn renderer() -> PortableTextRenderer {
    let settings = sanity_settings();
    PortableTextRenderer::new(
        Arc::new(SanityImageUrlBuilder::new(&settings)),
        Arc::new(SanityFileUrlResolver::new(&settings)),
        RenderOptions::new("portfolio.test"),
    )
}

fn load_document() -> RichDocument {
    let value: Value =
        serde_json::from_str(include_str!("fixtures/post_body.json")).expect("fixture is json");
    RichDocument::from_json(value)
}

#[test]
fn post_body_fixture_matches_expected_html() {
    let output = renderer().render_output(&load_document());

    let expected = include_str!("fixtures/post_body.html");
    assert_eq!(expected.trim_end(), output.html.trim_end());
}

#[test]
fn post_body_fixture_reports_content_metrics() {
    let metrics = renderer().render_output(&load_document()).metrics;

    assert_eq!(metrics.images_count, 3);
    assert_eq!(metrics.images_missing_alt, 1);
    assert_eq!(metrics.galleries_count, 1);
    assert_eq!(metrics.videos_count, 0);
    assert_eq!(metrics.external_links_count, 1);
    assert_eq!(metrics.internal_links_count, 1);
    assert_eq!(metrics.skipped_blocks, 1);
}

#[test]
fn short_document_snapshot() {
    let document = RichDocument::from_json(json!([
        {
            "_type": "block",
            "style": "h3",
            "children": [{"_type": "span", "text": "Tools <& tricks>", "marks": []}]
        },
        {
            "_type": "block",
            "style": "normal",
            "markDefs": [{"_key": "m", "_type": "link", "href": "mailto:hi@portfolio.test"}],
            "children": [
                {"_type": "span", "text": "Write ", "marks": []},
                {"_type": "span", "text": "me", "marks": ["m", "em"]}
            ]
        }
    ]));

    insta::assert_snapshot!(
        renderer().render(&document),
        @r#"<h3>Tools &lt;&amp; tricks&gt;</h3><p>Write <a href="mailto:hi@portfolio.test"><em>me</em></a></p>"#
    );
}

#[test]
fn carousel_video_and_null_body_render_without_panicking() {
    let document = RichDocument::from_json(json!([
        {
            "_type": "gallery",
            "layout": "carousel",
            "images": [
                {"asset": {"_ref": "image-a-100x100-png"}, "alt": "A", "caption": "First"},
                {"asset": {"_ref": "image-b-100x100-png"}, "alt": "B"}
            ]
        },
        {
            "_type": "videoEmbed",
            "video": {"asset": {"_id": "file-clip-mp4"}},
            "poster": {"asset": {"_ref": "image-poster-1920x1080-jpg"}},
            "caption": "Behind the scenes"
        }
    ]));

    let html = renderer().render(&document);

    assert!(html.starts_with("<div class=\"carousel\""));
    assert!(html.contains(
        "<img src=\"https://cdn.sanity.io/images/abc123/production/a-100x100.png?w=1200&amp;auto=format\""
    ));
    assert!(html.contains("<p class=\"carousel-caption\">First</p>"));
    assert!(html.contains("aria-label=\"Go to slide 2\""));
    assert!(html.contains("src=\"https://cdn.sanity.io/files/abc123/production/clip.mp4\""));
    assert!(html.contains(
        "poster=\"https://cdn.sanity.io/images/abc123/production/poster-1920x1080.jpg?w=1200&amp;auto=format\""
    ));
    assert!(html.ends_with("<figcaption>Behind the scenes</figcaption></figure>"));

    assert_eq!(renderer().render(&RichDocument::from_json(Value::Null)), "");
}
