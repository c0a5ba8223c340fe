use crate::domain::portable_text::{GalleryBlock, GalleryLayout, ImageBlock};

use super::escape::push_escaped;
use super::media::{LightboxImage, count_image, push_figcaption, resolve_image_url};
use super::types::{ContentMetrics, ImageUrlResolver};

const GRID_THUMB_WIDTH: u32 = 800;
const GRID_FULL_WIDTH: u32 = 1600;
const CAROUSEL_WIDTH: u32 = 1200;
const GALLERY_LIGHTBOX_GROUP: &str = "gallery";

const PREV_BUTTON: &str = concat!(
    "<button class=\"carousel-btn carousel-prev\" type=\"button\" aria-label=\"Previous\">",
    "<svg width=\"20\" height=\"20\" viewBox=\"0 0 20 20\" fill=\"none\" stroke=\"currentColor\" ",
    "stroke-width=\"2\" stroke-linecap=\"round\" stroke-linejoin=\"round\">",
    "<polyline points=\"13 16 7 10 13 4\"/></svg></button>",
);
const NEXT_BUTTON: &str = concat!(
    "<button class=\"carousel-btn carousel-next\" type=\"button\" aria-label=\"Next\">",
    "<svg width=\"20\" height=\"20\" viewBox=\"0 0 20 20\" fill=\"none\" stroke=\"currentColor\" ",
    "stroke-width=\"2\" stroke-linecap=\"round\" stroke-linejoin=\"round\">",
    "<polyline points=\"7 4 13 10 7 16\"/></svg></button>",
);

pub fn render_gallery(
    gallery: &GalleryBlock,
    resolver: &dyn ImageUrlResolver,
    metrics: &mut ContentMetrics,
) -> String {
    metrics.galleries_count += 1;
    for image in &gallery.images {
        count_image(image, metrics);
    }

    match gallery.layout {
        GalleryLayout::Grid => render_grid(&gallery.images, resolver),
        GalleryLayout::Carousel => render_carousel(&gallery.images, resolver),
    }
}

fn render_grid(images: &[ImageBlock], resolver: &dyn ImageUrlResolver) -> String {
    let mut html = String::from("<div class=\"gallery-grid\">");
    for image in images {
        let thumb = resolve_image_url(resolver, &image.asset, GRID_THUMB_WIDTH);
        let full = resolve_image_url(resolver, &image.asset, GRID_FULL_WIDTH);

        html.push_str("<figure class=\"gallery-item\">");
        LightboxImage {
            src: &thumb,
            responsive: None,
            alt: image.alt.as_deref(),
            group: GALLERY_LIGHTBOX_GROUP,
            full_src: &full,
        }
        .push_html(&mut html);
        if let Some(caption) = image.caption.as_deref() {
            push_figcaption(&mut html, caption);
        }
        html.push_str("</figure>");
    }
    html.push_str("</div>");
    html
}

fn render_carousel(images: &[ImageBlock], resolver: &dyn ImageUrlResolver) -> String {
    let mut html = String::from(
        "<div class=\"carousel\" role=\"region\" aria-label=\"Image gallery\" tabindex=\"0\">",
    );
    html.push_str("<div class=\"carousel-track\">");
    for (index, image) in images.iter().enumerate() {
        let src = resolve_image_url(resolver, &image.asset, CAROUSEL_WIDTH);

        html.push_str(&format!(
            "<div class=\"carousel-slide\" data-index=\"{index}\">"
        ));
        LightboxImage {
            src: &src,
            responsive: None,
            alt: image.alt.as_deref(),
            group: GALLERY_LIGHTBOX_GROUP,
            full_src: &src,
        }
        .push_html(&mut html);
        if let Some(caption) = image.caption.as_deref() {
            html.push_str("<p class=\"carousel-caption\">");
            push_escaped(&mut html, caption);
            html.push_str("</p>");
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");

    // A single slide has nowhere to navigate to.
    if images.len() > 1 {
        html.push_str(PREV_BUTTON);
        html.push_str(NEXT_BUTTON);
        html.push_str("<div class=\"carousel-dots\">");
        for index in 0..images.len() {
            let active = if index == 0 { " is-active" } else { "" };
            html.push_str(&format!(
                "<button class=\"carousel-dot{active}\" type=\"button\" aria-label=\"Go to slide {}\" data-index=\"{index}\"></button>",
                index + 1
            ));
        }
        html.push_str("</div>");
    }

    html.push_str("</div>");
    html
}
