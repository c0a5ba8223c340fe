//! Image and video blocks.
//!
//! Class names and `data-*` attributes emitted here are a contract with the
//! client-side lightbox and video player scripts that attach after page load.

use crate::domain::{
    assets::AssetRef,
    portable_text::{ImageBlock, VideoBlock},
};

use super::escape::push_escaped;
use super::types::{ContentMetrics, FileUrlResolver, ImageTransform, ImageUrlResolver};

/// Responsive widths for body images, ascending.
pub const IMAGE_WIDTHS: [u32; 3] = [400, 800, 1200];
pub(crate) const POSTER_WIDTH: u32 = 1200;
const IMAGE_SIZES: &str = "(max-width: 768px) 100vw, 800px";
const POST_LIGHTBOX_GROUP: &str = "post";

const PLAY_BUTTON: &str = concat!(
    "<button class=\"video-btn video-play-btn\" type=\"button\" aria-label=\"Play video\">",
    "<svg width=\"20\" height=\"20\" viewBox=\"0 0 20 20\" fill=\"none\">",
    "<path class=\"play-icon\" d=\"M6 4l10 6-10 6V4z\" fill=\"currentColor\"/>",
    "<g class=\"pause-icon\" style=\"display:none\">",
    "<rect x=\"5\" y=\"4\" width=\"3.5\" height=\"12\" fill=\"currentColor\"/>",
    "<rect x=\"11.5\" y=\"4\" width=\"3.5\" height=\"12\" fill=\"currentColor\"/>",
    "</g></svg></button>",
);
const PROGRESS_BAR: &str =
    "<div class=\"video-progress\"><div class=\"video-progress-bar\"></div></div>";
const MUTE_BUTTON: &str = concat!(
    "<button class=\"video-btn video-mute-btn\" type=\"button\" aria-label=\"Toggle mute\">",
    "<svg width=\"18\" height=\"18\" viewBox=\"0 0 18 18\" fill=\"none\">",
    "<path d=\"M2 6.5h3l4-3.5v12l-4-3.5H2v-5z\" fill=\"currentColor\"/>",
    "<path class=\"volume-waves\" d=\"M12 6.5a3.5 3.5 0 010 5M13.5 4a6.5 6.5 0 010 10\" ",
    "stroke=\"currentColor\" stroke-width=\"1.5\" stroke-linecap=\"round\" fill=\"none\"/>",
    "<line class=\"mute-line\" x1=\"2\" y1=\"16\" x2=\"16\" y2=\"2\" stroke=\"currentColor\" ",
    "stroke-width=\"1.5\" stroke-linecap=\"round\" style=\"display:none\"/>",
    "</svg></button>",
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageVariant {
    pub width: u32,
    pub url: String,
}

/// One URL per requested width, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsiveImage {
    variants: Vec<ImageVariant>,
}

impl ResponsiveImage {
    pub fn derive(resolver: &dyn ImageUrlResolver, asset: &AssetRef, widths: &[u32]) -> Self {
        let variants = widths
            .iter()
            .map(|&width| ImageVariant {
                width,
                url: resolve_image_url(resolver, asset, width),
            })
            .collect();
        Self { variants }
    }

    pub fn variants(&self) -> &[ImageVariant] {
        &self.variants
    }

    /// URL of the widest variant, used as the plain `src`.
    pub fn fallback(&self) -> &str {
        self.variants
            .iter()
            .max_by_key(|variant| variant.width)
            .map(|variant| variant.url.as_str())
            .unwrap_or_default()
    }

    /// `srcset` value with width descriptors. Empty when nothing resolved.
    pub fn srcset(&self) -> String {
        self.variants
            .iter()
            .filter(|variant| !variant.url.is_empty())
            .map(|variant| format!("{} {}w", variant.url, variant.width))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Missing assets resolve to an empty URL instead of asking the resolver.
pub(crate) fn resolve_image_url(
    resolver: &dyn ImageUrlResolver,
    asset: &AssetRef,
    width: u32,
) -> String {
    if asset.is_empty() {
        return String::new();
    }
    resolver.image_url(asset, ImageTransform::width(width))
}

/// Attributes of an `<img>` that opens in the lightbox.
pub(crate) struct LightboxImage<'a> {
    pub(crate) src: &'a str,
    pub(crate) responsive: Option<(&'a str, &'a str)>,
    pub(crate) alt: Option<&'a str>,
    pub(crate) group: &'a str,
    pub(crate) full_src: &'a str,
}

impl LightboxImage<'_> {
    pub(crate) fn push_html(&self, buffer: &mut String) {
        buffer.push_str("<img src=\"");
        push_escaped(buffer, self.src);
        buffer.push('"');
        if let Some((srcset, sizes)) = self.responsive {
            buffer.push_str(" srcset=\"");
            push_escaped(buffer, srcset);
            buffer.push_str("\" sizes=\"");
            push_escaped(buffer, sizes);
            buffer.push('"');
        }
        buffer.push_str(" alt=\"");
        push_escaped(buffer, self.alt.unwrap_or_default());
        buffer.push_str("\" loading=\"lazy\" decoding=\"async\" data-lightbox data-lightbox-group=\"");
        push_escaped(buffer, self.group);
        buffer.push_str("\" data-lightbox-src=\"");
        push_escaped(buffer, self.full_src);
        buffer.push_str("\" />");
    }
}

pub(crate) fn push_figcaption(buffer: &mut String, caption: &str) {
    buffer.push_str("<figcaption>");
    push_escaped(buffer, caption);
    buffer.push_str("</figcaption>");
}

pub(crate) fn count_image(image: &ImageBlock, metrics: &mut ContentMetrics) {
    metrics.images_count += 1;
    if image.alt.is_none() {
        metrics.images_missing_alt += 1;
    }
}

pub fn render_image(
    image: &ImageBlock,
    resolver: &dyn ImageUrlResolver,
    metrics: &mut ContentMetrics,
) -> String {
    count_image(image, metrics);

    let responsive = ResponsiveImage::derive(resolver, &image.asset, &IMAGE_WIDTHS);
    let srcset = responsive.srcset();
    let src = responsive.fallback();

    let mut html = String::new();
    let caption = image.caption.as_deref();
    if caption.is_some() {
        html.push_str("<figure>");
    }
    LightboxImage {
        src,
        responsive: Some((&srcset, IMAGE_SIZES)),
        alt: image.alt.as_deref(),
        group: POST_LIGHTBOX_GROUP,
        full_src: src,
    }
    .push_html(&mut html);
    if let Some(caption) = caption {
        push_figcaption(&mut html, caption);
        html.push_str("</figure>");
    }
    html
}

pub fn render_video(
    video: &VideoBlock,
    images: &dyn ImageUrlResolver,
    files: &dyn FileUrlResolver,
    metrics: &mut ContentMetrics,
) -> String {
    metrics.videos_count += 1;

    let video_url = video
        .external_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .map(str::to_string)
        .or_else(|| {
            video
                .asset
                .as_ref()
                .filter(|asset| !asset.is_empty())
                .map(|asset| files.file_url(asset))
        })
        .unwrap_or_default();

    let poster_url = video
        .poster
        .as_ref()
        .map(|poster| resolve_image_url(images, poster, POSTER_WIDTH))
        .filter(|url| !url.is_empty());

    let mut html = String::from("<figure class=\"video-player\"><div class=\"video-wrapper\">");
    html.push_str("<video src=\"");
    push_escaped(&mut html, &video_url);
    html.push('"');
    if let Some(poster) = poster_url.as_deref() {
        html.push_str(" poster=\"");
        push_escaped(&mut html, poster);
        html.push('"');
    }
    html.push_str(
        " playsinline preload=\"metadata\" class=\"video-element\"><track kind=\"captions\" /></video>",
    );
    html.push_str("<div class=\"video-controls\">");
    html.push_str(PLAY_BUTTON);
    html.push_str(PROGRESS_BAR);
    html.push_str(MUTE_BUTTON);
    html.push_str("</div></div>");
    if let Some(caption) = video.caption.as_deref() {
        push_figcaption(&mut html, caption);
    }
    html.push_str("</figure>");
    html
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Deterministic resolvers producing readable URLs for assertions.
    pub(crate) struct FakeResolver;

    impl ImageUrlResolver for FakeResolver {
        fn image_url(&self, asset: &AssetRef, transform: ImageTransform) -> String {
            let mut url = format!("https://img.test/{asset}?w={}", transform.width);
            if transform.auto_format {
                url.push_str("&auto=format");
            }
            url
        }
    }

    impl FileUrlResolver for FakeResolver {
        fn file_url(&self, asset: &AssetRef) -> String {
            format!("https://files.test/{asset}")
        }
    }
}
