//! Post slugs as delivered by the CMS.
//!
//! The CMS stores slugs as `{ "current": "..." }` objects, while hand-written
//! fixtures tend to use plain strings; both decode into [`Slug`]. Slugs are
//! authored text, so anything that turns them into a path goes through
//! [`Slug::file_stem`] first.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use slug::slugify;

use crate::domain::error::DomainError;

const FALLBACK_STEM: &str = "untitled";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("slug must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem-safe stem for output paths. Separators, dots and other
    /// punctuation collapse into dashes, so `../x` can never escape a directory.
    pub fn file_stem(&self) -> String {
        let candidate = slugify(&self.0);
        if candidate.is_empty() {
            FALLBACK_STEM.to_string()
        } else {
            candidate
        }
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Slug {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawSlug {
            Plain(String),
            Object { current: String },
        }

        let value = match RawSlug::deserialize(deserializer)? {
            RawSlug::Plain(value) | RawSlug::Object { current: value } => value,
        };
        Slug::new(value).map_err(D::Error::custom)
    }
}
