use std::sync::Arc;

use metrics::counter;
use tracing::debug;

use crate::domain::portable_text::{Block, RichDocument};

use super::gallery::render_gallery;
use super::media::{render_image, render_video};
use super::text::render_text_block;
use super::types::{
    ContentMetrics, FileUrlResolver, ImageUrlResolver, RenderOptions, RenderOutput, RenderService,
};

pub(crate) const METRIC_BLOCKS_SKIPPED: &str = "atelier_render_blocks_skipped_total";

/// Portable text to HTML. Blocks render independently and concatenate in
/// document order with no separator.
pub struct PortableTextRenderer {
    images: Arc<dyn ImageUrlResolver>,
    files: Arc<dyn FileUrlResolver>,
    options: RenderOptions,
}

impl PortableTextRenderer {
    pub fn new(
        images: Arc<dyn ImageUrlResolver>,
        files: Arc<dyn FileUrlResolver>,
        options: RenderOptions,
    ) -> Self {
        Self {
            images,
            files,
            options,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    fn render_block(&self, block: &Block, metrics: &mut ContentMetrics) -> Option<String> {
        let html = match block {
            Block::Text(text) => render_text_block(text, &self.options, metrics),
            Block::Image(image) => render_image(image, self.images.as_ref(), metrics),
            Block::Video(video) => {
                render_video(video, self.images.as_ref(), self.files.as_ref(), metrics)
            }
            Block::Gallery(gallery) => render_gallery(gallery, self.images.as_ref(), metrics),
            Block::Unsupported { type_name } => {
                debug!(
                    target = "application::render",
                    block_type = %type_name,
                    "skipping unsupported block"
                );
                counter!(METRIC_BLOCKS_SKIPPED).increment(1);
                metrics.skipped_blocks += 1;
                return None;
            }
        };
        Some(html)
    }
}

impl RenderService for PortableTextRenderer {
    fn render_output(&self, document: &RichDocument) -> RenderOutput {
        let mut metrics = ContentMetrics::default();
        let html = document
            .blocks()
            .iter()
            .filter_map(|block| self.render_block(block, &mut metrics))
            .collect::<String>();
        RenderOutput { html, metrics }
    }
}
