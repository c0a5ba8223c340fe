//! Asset CDN URL construction. Pure string work, no network.

use url::Url;

use crate::application::render::{FileUrlResolver, ImageTransform, ImageUrlResolver};
use crate::config::SanitySettings;
use crate::domain::assets::AssetRef;

#[derive(Debug, Clone, PartialEq, Eq)]
struct AssetCdn {
    base: Url,
    project_id: String,
    dataset: String,
}

impl AssetCdn {
    fn from_settings(settings: &SanitySettings) -> Self {
        Self {
            base: settings.cdn_base.clone(),
            project_id: settings.project_id.clone(),
            dataset: settings.dataset.clone(),
        }
    }

    /// `<base>/<kind>/<project>/<dataset>/<file_name>`, with `file_name`
    /// percent-encoded as a single path segment.
    fn url(&self, kind: &str, file_name: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend([kind, self.project_id.as_str(), self.dataset.as_str(), file_name]);
        }
        url
    }
}

/// Resolves image references to width-constrained CDN URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanityImageUrlBuilder {
    cdn: AssetCdn,
}

impl SanityImageUrlBuilder {
    pub fn new(settings: &SanitySettings) -> Self {
        Self {
            cdn: AssetCdn::from_settings(settings),
        }
    }
}

impl ImageUrlResolver for SanityImageUrlBuilder {
    fn image_url(&self, asset: &AssetRef, transform: ImageTransform) -> String {
        let file_name = match asset.image_parts() {
            Some(parts) => format!("{}-{}.{}", parts.id, parts.dimensions, parts.extension),
            None => asset.as_str().to_string(),
        };

        let mut url = self.cdn.url("images", &file_name);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("w", &transform.width.to_string());
            if transform.auto_format {
                query.append_pair("auto", "format");
            }
        }
        url.to_string()
    }
}

/// Resolves file references (videos) to their CDN download URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanityFileUrlResolver {
    cdn: AssetCdn,
}

impl SanityFileUrlResolver {
    pub fn new(settings: &SanitySettings) -> Self {
        Self {
            cdn: AssetCdn::from_settings(settings),
        }
    }
}

impl FileUrlResolver for SanityFileUrlResolver {
    fn file_url(&self, asset: &AssetRef) -> String {
        let file_name = match asset.file_parts() {
            Some(parts) => format!("{}.{}", parts.id, parts.extension),
            None => asset.as_str().to_string(),
        };
        self.cdn.url("files", &file_name).to_string()
    }
}
