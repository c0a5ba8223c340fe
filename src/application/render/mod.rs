//! Portable text rendering.
//!
//! The pipeline is pure: it takes a materialised [`RichDocument`] and produces
//! an HTML fragment with no enclosing page. Asset URLs come from injected
//! resolvers, so rendering needs no network or global client state.
//!
//! [`RichDocument`]: crate::domain::portable_text::RichDocument

mod escape;
mod gallery;
mod media;
mod service;
mod text;
mod types;

pub use escape::escape_html;
pub use gallery::render_gallery;
pub use media::{IMAGE_WIDTHS, ImageVariant, ResponsiveImage, render_image, render_video};
pub use service::PortableTextRenderer;
pub use text::{LinkTarget, classify_link, render_block_wrapper, render_spans};
pub use types::{
    ContentMetrics, FileUrlResolver, ImageTransform, ImageUrlResolver, RenderOptions,
    RenderOutput, RenderService,
};
