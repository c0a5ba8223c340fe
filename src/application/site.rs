//! Static build orchestration: fetch site content, render it and write the
//! generated artifacts to an output directory.

use std::{
    collections::HashSet,
    future::Future,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::application::{
    render::{RenderOutput, RenderService},
    repos::{ContentRepo, RepoError},
    syndication::{FeedChannel, SyndicationService},
};
use crate::domain::{
    assets::ImageField,
    entities::{Contact, CvData, Post, SiteSettings, Tool},
    portable_text::RichDocument,
    types::{CardLayout, PostCategory},
};

const POSTS_DIR: &str = "posts";
const FEED_FILE: &str = "rss.xml";
const CONTENT_FILE: &str = "content.json";

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("failed to write `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode site content: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Outcome of a static build, logged once the build finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub posts_rendered: usize,
    /// Singleton documents (settings, contact, CV) that could not be loaded.
    pub documents_missing: usize,
    pub blocks_skipped: u32,
    pub feed_items: usize,
}

pub struct SiteBuilder {
    repo: Arc<dyn ContentRepo>,
    renderer: Arc<dyn RenderService>,
    channel: FeedChannel,
}

impl SiteBuilder {
    pub fn new(
        repo: Arc<dyn ContentRepo>,
        renderer: Arc<dyn RenderService>,
        channel: FeedChannel,
    ) -> Self {
        Self {
            repo,
            renderer,
            channel,
        }
    }

    /// Fetch, render and write every artifact under `output_dir`.
    ///
    /// Content that cannot be fetched is logged and left out; only failures to
    /// write output abort the build.
    pub async fn build(
        &self,
        output_dir: &Path,
        now: OffsetDateTime,
    ) -> Result<BuildReport, SiteError> {
        let (settings, contact, posts, cv, tools) = tokio::join!(
            fetch_or_default("site settings", self.repo.site_settings()),
            fetch_or_default("contact", self.repo.contact()),
            fetch_or_default("posts", self.repo.list_posts()),
            fetch_or_default("cv", self.repo.cv()),
            fetch_or_default("tools", self.repo.list_tools()),
        );

        let mut report = BuildReport {
            documents_missing: [settings.is_none(), contact.is_none(), cv.is_none()]
                .into_iter()
                .filter(|missing| *missing)
                .count(),
            ..BuildReport::default()
        };

        let posts_dir = output_dir.join(POSTS_DIR);
        create_dir(&posts_dir).await?;

        let mut stems = HashSet::new();
        let mut summaries = Vec::with_capacity(posts.len());
        for post in &posts {
            let stem = post.slug.file_stem();
            if !stems.insert(stem.clone()) {
                warn!(
                    target = "application::site",
                    slug = %post.slug,
                    stem = %stem,
                    "skipping post whose output path collides with a newer post"
                );
                continue;
            }

            let output = self.renderer.render_output(&post.body);
            report.blocks_skipped += output.metrics.skipped_blocks;

            let file = posts_dir.join(format!("{stem}.html"));
            write_file(&file, output.html.as_bytes()).await?;
            debug!(
                target = "application::site",
                slug = %post.slug,
                path = %file.display(),
                images = output.metrics.images_count,
                "rendered post"
            );

            report.posts_rendered += 1;
            summaries.push(PostSummary::new(post, format!("{POSTS_DIR}/{stem}.html")));
        }

        let syndication = self.syndication(settings.as_ref());
        let feed = syndication.rss_feed(&posts, now);
        write_file(&output_dir.join(FEED_FILE), feed.as_bytes()).await?;
        report.feed_items = posts.len();

        let cv = cv.as_ref().map(|cv| RenderedCv::new(cv, self.renderer.as_ref()));
        if let Some(cv) = &cv {
            report.blocks_skipped += cv.skipped_blocks;
        }

        let content = SiteContent {
            generated_at: now,
            settings: settings.as_ref(),
            contact: contact.as_ref(),
            tools: &tools,
            cv,
            posts: summaries,
        };
        let encoded = serde_json::to_vec_pretty(&content)?;
        write_file(&output_dir.join(CONTENT_FILE), &encoded).await?;

        info!(
            target = "application::site",
            output = %output_dir.display(),
            posts_rendered = report.posts_rendered,
            documents_missing = report.documents_missing,
            blocks_skipped = report.blocks_skipped,
            feed_items = report.feed_items,
            "site build finished"
        );

        Ok(report)
    }

    /// RSS feed for the current posts.
    pub async fn feed(&self, now: OffsetDateTime) -> String {
        let (settings, posts) = tokio::join!(
            fetch_or_default("site settings", self.repo.site_settings()),
            fetch_or_default("posts", self.repo.list_posts()),
        );
        self.syndication(settings.as_ref()).rss_feed(&posts, now)
    }

    /// Render a single post body. `None` when no post has the slug.
    pub async fn render_post(&self, slug: &str) -> Result<Option<RenderOutput>, RepoError> {
        let post = self.repo.post_by_slug(slug).await?;
        Ok(post.map(|post| self.renderer.render_output(&post.body)))
    }

    fn syndication(&self, settings: Option<&SiteSettings>) -> SyndicationService {
        SyndicationService::new(self.channel.clone().with_settings(settings))
    }
}

/// A content source that is down degrades to "nothing published" instead of
/// failing the build.
async fn fetch_or_default<T, F>(what: &'static str, fetch: F) -> T
where
    T: Default,
    F: Future<Output = Result<T, RepoError>>,
{
    match fetch.await {
        Ok(value) => value,
        Err(err) => {
            warn!(
                target = "application::site",
                content = what,
                error = %err,
                "content fetch failed; continuing without it"
            );
            T::default()
        }
    }
}

async fn create_dir(path: &Path) -> Result<(), SiteError> {
    fs::create_dir_all(path)
        .await
        .map_err(|source| SiteError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn write_file(path: &Path, contents: &[u8]) -> Result<(), SiteError> {
    fs::write(path, contents)
        .await
        .map_err(|source| SiteError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteContent<'a> {
    #[serde(with = "time::serde::rfc3339")]
    generated_at: OffsetDateTime,
    settings: Option<&'a SiteSettings>,
    contact: Option<&'a Contact>,
    tools: &'a [Tool],
    cv: Option<RenderedCv<'a>>,
    posts: Vec<PostSummary<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostSummary<'a> {
    id: &'a str,
    title: &'a str,
    slug: &'a str,
    path: String,
    /// Where cards should link: the outbound URL for link posts.
    href: String,
    html_file: String,
    category: PostCategory,
    #[serde(with = "time::serde::rfc3339")]
    published_at: OffsetDateTime,
    excerpt: Option<&'a str>,
    card_layout: CardLayout,
    featured_image: Option<&'a ImageField>,
}

impl<'a> PostSummary<'a> {
    fn new(post: &'a Post, html_file: String) -> Self {
        let path = post.site_path();
        let href = post
            .outbound_link()
            .map(str::to_string)
            .unwrap_or_else(|| path.clone());
        Self {
            id: &post.id,
            title: &post.title,
            slug: post.slug.as_str(),
            path,
            href,
            html_file,
            category: post.category,
            published_at: post.published_at,
            excerpt: post.excerpt.as_deref(),
            card_layout: post.card_layout,
            featured_image: post.featured_image.as_ref(),
        }
    }
}

/// CV with every portable-text field rendered to HTML alongside its source.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderedCv<'a> {
    #[serde(flatten)]
    data: &'a CvData,
    summary_html: String,
    experience_html: Vec<String>,
    education_html: Vec<String>,
    side_projects_html: Vec<String>,
    #[serde(skip)]
    skipped_blocks: u32,
}

impl<'a> RenderedCv<'a> {
    fn new(data: &'a CvData, renderer: &dyn RenderService) -> Self {
        let mut skipped_blocks = 0;
        let mut render = |document: &RichDocument| {
            let output = renderer.render_output(document);
            skipped_blocks += output.metrics.skipped_blocks;
            output.html
        };

        let summary_html = render(&data.summary);
        let experience_html = data
            .experience
            .iter()
            .map(|entry| render(&entry.description))
            .collect();
        let education_html = data
            .education
            .iter()
            .map(|entry| render(&entry.description))
            .collect();
        let side_projects_html = data
            .side_projects
            .iter()
            .map(|entry| render(&entry.description))
            .collect();

        Self {
            data,
            summary_html,
            experience_html,
            education_html,
            side_projects_html,
            skipped_blocks,
        }
    }
}
