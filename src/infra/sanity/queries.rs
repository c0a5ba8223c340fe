//! GROQ queries for the published site content.
//!
//! Asset pointers inside images and videos are dereferenced with `asset->` so
//! the documents carry their asset ids and URLs without a second round trip.

/// A named query; the name labels logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroqQuery {
    pub name: &'static str,
    pub text: &'static str,
}

pub const SITE_SETTINGS: GroqQuery = GroqQuery {
    name: "site_settings",
    text: r#"*[_type == "siteSettings"][0]{
  title,
  description,
  heroText,
  ogImage,
  keywords
}"#,
};

pub const CONTACT: GroqQuery = GroqQuery {
    name: "contact",
    text: r#"*[_type == "contact"][0]{
  email,
  socialLinks[]{
    platform,
    handle,
    url
  },
  availability
}"#,
};

pub const ALL_POSTS: GroqQuery = GroqQuery {
    name: "all_posts",
    text: r#"*[_type == "post"] | order(publishedAt desc){
  _id,
  title,
  slug,
  publishedAt,
  category,
  excerpt,
  featuredImage{ ..., asset-> },
  featuredVideo{ ..., asset-> },
  videoPoster{ ..., asset-> },
  cardLayout,
  body[]{
    ...,
    _type == "image" => { ..., asset-> },
    _type == "videoEmbed" => { ..., video{ asset-> }, poster{ asset-> } },
    _type == "gallery" => { ..., images[]{ ..., asset-> } }
  },
  externalLink
}"#,
};

/// Takes a `$slug` parameter.
pub const POST_BY_SLUG: GroqQuery = GroqQuery {
    name: "post_by_slug",
    text: r#"*[_type == "post" && slug.current == $slug][0]{
  _id,
  title,
  slug,
  publishedAt,
  category,
  excerpt,
  featuredImage{ ..., asset-> },
  featuredVideo{ ..., asset-> },
  videoPoster{ ..., asset-> },
  cardLayout,
  body[]{
    ...,
    _type == "image" => { ..., asset-> },
    _type == "videoEmbed" => { ..., video{ asset-> }, poster{ asset-> } },
    _type == "gallery" => { ..., images[]{ ..., asset-> } }
  },
  externalLink
}"#,
};

pub const CV: GroqQuery = GroqQuery {
    name: "cv",
    text: r#"*[_type == "cv"][0]{
  name,
  jobTitle,
  email,
  phone,
  location,
  website,
  linkedin,
  summary,
  photo{ ..., asset-> },
  experience[]{ company, role, location, startDate, endDate, current, description, highlights },
  education[]{ institution, degree, field, startDate, endDate, description },
  skills[]{ category, items },
  tools,
  languages[]{ language, proficiency },
  sideProjects[]{ title, url, description, year }
}"#,
};

pub const TOOLS: GroqQuery = GroqQuery {
    name: "tools",
    text: r#"*[_type == "tool"] | order(category asc, order asc){
  _id,
  name,
  description,
  category,
  url,
  icon{ ..., asset-> },
  order
}"#,
};
