use serde::Serialize;

use crate::domain::{assets::AssetRef, portable_text::RichDocument};

/// Width and format request for a single image variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageTransform {
    pub width: u32,
    /// Let the CDN negotiate the output format (AVIF/WebP) with the client.
    pub auto_format: bool,
}

impl ImageTransform {
    pub fn width(width: u32) -> Self {
        Self {
            width,
            auto_format: true,
        }
    }
}

/// Turns image asset references into CDN URLs.
///
/// Implementations must be deterministic: the same asset and transform always
/// produce the same URL, because `src` and `srcset` resolve the same variant
/// independently.
pub trait ImageUrlResolver: Send + Sync {
    fn image_url(&self, asset: &AssetRef, transform: ImageTransform) -> String;
}

/// Turns non-image file references (videos) into retrievable URLs without
/// touching the network.
pub trait FileUrlResolver: Send + Sync {
    fn file_url(&self, asset: &AssetRef) -> String;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Substring identifying the site's own domain. Links containing it are
    /// treated as internal even when absolute.
    pub site_domain: String,
}

impl RenderOptions {
    pub fn new(site_domain: impl Into<String>) -> Self {
        Self {
            site_domain: site_domain.into(),
        }
    }
}

/// Content-level counters gathered while rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContentMetrics {
    pub images_count: u32,
    pub images_missing_alt: u32,
    pub videos_count: u32,
    pub galleries_count: u32,
    pub internal_links_count: u32,
    pub external_links_count: u32,
    pub skipped_blocks: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderOutput {
    pub html: String,
    pub metrics: ContentMetrics,
}

/// Rendering is total over any decoded document: there is no error path.
/// Given the same document, implementations return byte-identical output.
pub trait RenderService: Send + Sync {
    fn render_output(&self, document: &RichDocument) -> RenderOutput;

    fn render(&self, document: &RichDocument) -> String {
        self.render_output(document).html
    }
}
