//! Repository traits describing content sources.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{Contact, CvData, Post, SiteSettings, Tool};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("content source unavailable: {0}")]
    Unavailable(String),
    #[error("malformed content: {message}")]
    Malformed { message: String },
}

impl RepoError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }

    pub fn malformed(err: impl std::fmt::Display) -> Self {
        Self::Malformed {
            message: err.to_string(),
        }
    }
}

/// Read access to published site content.
///
/// Singleton documents (settings, contact, CV) are `None` when they have not
/// been created in the CMS yet.
#[async_trait]
pub trait ContentRepo: Send + Sync {
    async fn site_settings(&self) -> Result<Option<SiteSettings>, RepoError>;

    async fn contact(&self) -> Result<Option<Contact>, RepoError>;

    /// All posts, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>, RepoError>;

    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    async fn cv(&self) -> Result<Option<CvData>, RepoError>;

    /// Tools ordered by category, then by their manual order.
    async fn list_tools(&self) -> Result<Vec<Tool>, RepoError>;
}
