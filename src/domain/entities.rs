//! Site content documents mirrored from the CMS schemas.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::{
    assets::{FileField, ImageField},
    portable_text::RichDocument,
    slug::Slug,
    types::{
        Availability, CardLayout, PostCategory, ToolCategory, non_empty_string, null_as_default,
    },
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub slug: Slug,
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
    pub category: PostCategory,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub featured_image: Option<ImageField>,
    #[serde(default)]
    pub featured_video: Option<FileField>,
    #[serde(default)]
    pub video_poster: Option<ImageField>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub card_layout: CardLayout,
    #[serde(default)]
    pub body: RichDocument,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub external_link: Option<String>,
}

impl Post {
    /// Path of the post's page on the site.
    pub fn site_path(&self) -> String {
        format!("/feed/{}", self.slug)
    }

    /// Link posts point readers at the linked resource instead of the post page.
    pub fn outbound_link(&self) -> Option<&str> {
        match self.category {
            PostCategory::Links => self.external_link.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub title: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub hero_text: Option<String>,
    #[serde(default)]
    pub og_image: Option<ImageField>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub social_links: Vec<SocialLink>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub availability: Availability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub handle: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub description: Option<String>,
    pub category: ToolCategory,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<ImageField>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvData {
    pub name: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub summary: RichDocument,
    #[serde(default)]
    pub photo: Option<ImageField>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<SkillGroup>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tools: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<Language>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub side_projects: Vec<SideProject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub company: String,
    pub role: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub location: Option<String>,
    pub start_date: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current: bool,
    #[serde(default)]
    pub description: RichDocument,
    #[serde(default, deserialize_with = "null_as_default")]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub field: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: RichDocument,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub language: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub proficiency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideProject {
    pub title: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub url: Option<String>,
    #[serde(default)]
    pub description: RichDocument,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub year: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use super::*;

    fn post_json(category: &str) -> serde_json::Value {
        json!({
            "_id": "post-1",
            "title": "Hello",
            "slug": {"_type": "slug", "current": "hello"},
            "publishedAt": "2024-05-01T10:00:00.000Z",
            "category": category,
            "excerpt": null,
            "featuredImage": null,
            "cardLayout": null,
            "externalLink": "https://elsewhere.example/article"
        })
    }

    #[test]
    fn post_decodes_groq_projection_with_nulls() {
        let post: Post = serde_json::from_value(post_json("work")).expect("post");
        assert_eq!(post.slug.as_str(), "hello");
        assert_eq!(post.published_at, datetime!(2024-05-01 10:00 UTC));
        assert_eq!(post.card_layout, CardLayout::Default);
        assert!(post.body.is_empty());
        assert_eq!(post.excerpt, None);
        assert_eq!(post.site_path(), "/feed/hello");
        assert_eq!(post.outbound_link(), None);
    }

    #[test]
    fn link_posts_point_outbound() {
        let post: Post = serde_json::from_value(post_json("links")).expect("post");
        assert_eq!(
            post.outbound_link(),
            Some("https://elsewhere.example/article")
        );
    }

    #[test]
    fn cv_decodes_nested_portable_text() {
        let cv: CvData = serde_json::from_value(json!({
            "name": "Ada",
            "summary": [{"_type": "block", "children": [{"_type": "span", "text": "Hi"}]}],
            "experience": [{
                "company": "Acme",
                "role": "Designer",
                "startDate": "2020-01",
                "current": null,
                "description": null,
                "highlights": null
            }],
            "education": null,
            "languages": [{"language": "Danish", "proficiency": ""}]
        }))
        .expect("cv");

        assert_eq!(cv.summary.len(), 1);
        assert_eq!(cv.experience.len(), 1);
        assert!(!cv.experience[0].current);
        assert!(cv.experience[0].description.is_empty());
        assert!(cv.education.is_empty());
        assert_eq!(cv.languages[0].proficiency, None);
    }

    #[test]
    fn contact_defaults_availability() {
        let contact: Contact = serde_json::from_value(json!({
            "email": "hi@example.com",
            "socialLinks": null,
            "availability": null
        }))
        .expect("contact");
        assert_eq!(contact.availability, Availability::Available);
        assert!(contact.social_links.is_empty());
    }
}
