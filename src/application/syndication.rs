//! RSS 2.0 feed generation.
//!
//! The feed is assembled from already-fetched posts, so generating it never
//! touches the network and the output only depends on its inputs.

use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc2822};

use crate::domain::entities::{Post, SiteSettings};

/// Channel-level metadata for the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedChannel {
    pub title: String,
    pub description: String,
    pub site_url: String,
    pub language: String,
}

impl FeedChannel {
    /// CMS site settings take precedence over configured defaults.
    pub fn with_settings(mut self, settings: Option<&SiteSettings>) -> Self {
        if let Some(settings) = settings {
            if !settings.title.trim().is_empty() {
                self.title = settings.title.clone();
            }
            if let Some(description) = settings.description.as_deref() {
                self.description = description.to_string();
            }
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct SyndicationService {
    channel: FeedChannel,
    base: String,
}

impl SyndicationService {
    pub fn new(channel: FeedChannel) -> Self {
        let base = normalize_site_url(&channel.site_url);
        Self { channel, base }
    }

    pub fn channel(&self) -> &FeedChannel {
        &self.channel
    }

    /// On-site URL of a post, also used as its permalink guid.
    pub fn post_url(&self, post: &Post) -> String {
        format!("{}{}", self.base, post.site_path())
    }

    /// Generate RSS 2.0 feed XML. Items keep the order of `posts`.
    pub fn rss_feed(&self, posts: &[Post], now: OffsetDateTime) -> String {
        let items = posts
            .iter()
            .map(|post| self.render_item(post))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\">\n  <channel>\n    <title>{}</title>\n    <description>{}</description>\n    <link>{}</link>\n    <atom:link href=\"{}/rss.xml\" rel=\"self\" type=\"application/rss+xml\" />\n    <language>{}</language>\n    <lastBuildDate>{}</lastBuildDate>\n{}\n  </channel>\n</rss>\n",
            xml_escape(&self.channel.title),
            xml_escape(&self.channel.description),
            xml_escape(&self.base),
            xml_escape(&self.base),
            xml_escape(&self.channel.language),
            rfc2822(now),
            items,
        )
    }

    fn render_item(&self, post: &Post) -> String {
        let permalink = self.post_url(post);
        let link = post
            .outbound_link()
            .map(str::to_string)
            .unwrap_or_else(|| permalink.clone());

        let mut item = format!(
            "    <item>\n      <title>{}</title>\n      <link>{}</link>\n      <guid isPermaLink=\"true\">{}</guid>\n      <pubDate>{}</pubDate>\n      <category>{}</category>",
            xml_escape(&post.title),
            xml_escape(&link),
            xml_escape(&permalink),
            rfc2822(post.published_at),
            xml_escape(post.category.as_str()),
        );
        if let Some(excerpt) = post.excerpt.as_deref() {
            item.push_str(&format!(
                "\n      <description>{}</description>",
                xml_escape(excerpt)
            ));
        }
        item.push_str("\n    </item>");
        item
    }
}

fn rfc2822(value: OffsetDateTime) -> String {
    let utc = value.to_offset(UtcOffset::UTC);
    utc.format(&Rfc2822).unwrap_or_else(|_| utc.to_string())
}

fn normalize_site_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::domain::{portable_text::RichDocument, slug::Slug, types::PostCategory};

    fn channel() -> FeedChannel {
        FeedChannel {
            title: "Portfolio".to_string(),
            description: "Work & thoughts".to_string(),
            site_url: "https://portfolio.test/".to_string(),
            language: "en".to_string(),
        }
    }

    fn post(slug: &str, category: PostCategory) -> Post {
        Post {
            id: format!("post-{slug}"),
            title: format!("Post <{slug}>"),
            slug: Slug::new(slug).expect("slug"),
            published_at: datetime!(2024-05-01 12:00 +02:00),
            category,
            excerpt: None,
            featured_image: None,
            featured_video: None,
            video_poster: None,
            card_layout: Default::default(),
            body: RichDocument::default(),
            external_link: Some("https://elsewhere.test/a?b=1&c=2".to_string()),
        }
    }

    #[test]
    fn channel_uses_normalized_site_url() {
        let service = SyndicationService::new(channel());
        let xml = service.rss_feed(&[], datetime!(2024-06-01 08:30 UTC));

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains("<link>https://portfolio.test</link>"));
        assert!(xml.contains(
            "<atom:link href=\"https://portfolio.test/rss.xml\" rel=\"self\" type=\"application/rss+xml\" />"
        ));
        assert!(xml.contains("<description>Work &amp; thoughts</description>"));
        assert!(xml.contains("<lastBuildDate>Sat, 01 Jun 2024 08:30:00 +0000</lastBuildDate>"));
        assert!(!xml.contains("<item>"));
    }

    #[test]
    fn item_links_to_post_page_with_utc_pub_date() {
        let service = SyndicationService::new(channel());
        let xml = service.rss_feed(
            &[post("hello", PostCategory::Work)],
            datetime!(2024-06-01 00:00 UTC),
        );

        assert!(xml.contains("<title>Post &lt;hello&gt;</title>"));
        assert!(xml.contains("<link>https://portfolio.test/feed/hello</link>"));
        assert!(xml.contains(
            "<guid isPermaLink=\"true\">https://portfolio.test/feed/hello</guid>"
        ));
        assert!(xml.contains("<pubDate>Wed, 01 May 2024 10:00:00 +0000</pubDate>"));
        assert!(xml.contains("<category>work</category>"));
        assert!(!xml.contains("<description></description>"));
    }

    #[test]
    fn link_posts_point_outbound_but_keep_on_site_guid() {
        let mut link_post = post("shared", PostCategory::Links);
        link_post.excerpt = Some("Worth a read".to_string());
        let service = SyndicationService::new(channel());
        let xml = service.rss_feed(&[link_post], datetime!(2024-06-01 00:00 UTC));

        assert!(xml.contains("<link>https://elsewhere.test/a?b=1&amp;c=2</link>"));
        assert!(xml.contains(
            "<guid isPermaLink=\"true\">https://portfolio.test/feed/shared</guid>"
        ));
        assert!(xml.contains("<description>Worth a read</description>"));
    }

    #[test]
    fn settings_override_channel_defaults() {
        let settings = SiteSettings {
            title: "Studio".to_string(),
            description: None,
            hero_text: None,
            og_image: None,
            keywords: Vec::new(),
        };
        let channel = channel().with_settings(Some(&settings));
        assert_eq!(channel.title, "Studio");
        assert_eq!(channel.description, "Work & thoughts");
    }

    #[test]
    fn xml_escape_covers_apostrophes() {
        assert_eq!(xml_escape("it's <&>\""), "it&apos;s &lt;&amp;&gt;&quot;");
    }
}
