use crate::domain::portable_text::{BlockStyle, ListKind, Mark, Span, TextBlock};

use super::escape::push_escaped;
use super::types::{ContentMetrics, RenderOptions};

const EMPTY_HREF_FALLBACK: &str = "#";
const EXTERNAL_LINK_ATTRS: &str = " target=\"_blank\" rel=\"noopener noreferrer\"";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    Internal,
    External,
}

/// A link is external when it uses a network scheme and does not point at the
/// site's own domain. Relative paths, `mailto:` and anchors are internal.
pub fn classify_link(href: &str, site_domain: &str) -> LinkTarget {
    let network = href.starts_with("http");
    let own_domain = !site_domain.is_empty() && href.contains(site_domain);
    if network && !own_domain {
        LinkTarget::External
    } else {
        LinkTarget::Internal
    }
}

/// Wrap already-rendered inline HTML in the block element for `style`, or in a
/// list item when the block belongs to a list. Grouping list items into a list
/// element is left to styling.
pub fn render_block_wrapper(style: BlockStyle, list: Option<ListKind>, inner_html: &str) -> String {
    let tag = match list {
        Some(_) => "li",
        None => style_tag(style),
    };
    format!("<{tag}>{inner_html}</{tag}>")
}

pub fn render_spans(spans: &[Span], options: &RenderOptions) -> String {
    let mut metrics = ContentMetrics::default();
    let mut html = String::new();
    push_spans(&mut html, spans, options, &mut metrics);
    html
}

pub(crate) fn render_text_block(
    block: &TextBlock,
    options: &RenderOptions,
    metrics: &mut ContentMetrics,
) -> String {
    let mut inner = String::new();
    push_spans(&mut inner, &block.spans, options, metrics);
    render_block_wrapper(block.style, block.list, &inner)
}

fn push_spans(
    buffer: &mut String,
    spans: &[Span],
    options: &RenderOptions,
    metrics: &mut ContentMetrics,
) {
    for span in spans {
        push_span(buffer, span, options, metrics);
    }
}

fn push_span(
    buffer: &mut String,
    span: &Span,
    options: &RenderOptions,
    metrics: &mut ContentMetrics,
) {
    let mut inner = String::with_capacity(span.text.len());
    push_escaped(&mut inner, &span.text);

    // Innermost first, so the lowest-ordered mark ends up outermost.
    for mark in span.marks.iter().rev() {
        let tag = mark_tag(*mark);
        inner = format!("<{tag}>{inner}</{tag}>");
    }

    let Some(link) = span.link.as_ref() else {
        buffer.push_str(&inner);
        return;
    };

    let href = match link.href.as_str() {
        "" => EMPTY_HREF_FALLBACK,
        href => href,
    };

    buffer.push_str("<a href=\"");
    push_escaped(buffer, href);
    buffer.push('"');
    match classify_link(href, &options.site_domain) {
        LinkTarget::External => {
            metrics.external_links_count += 1;
            buffer.push_str(EXTERNAL_LINK_ATTRS);
        }
        LinkTarget::Internal => metrics.internal_links_count += 1,
    }
    buffer.push('>');
    buffer.push_str(&inner);
    buffer.push_str("</a>");
}

fn style_tag(style: BlockStyle) -> &'static str {
    match style {
        BlockStyle::Normal => "p",
        BlockStyle::H2 => "h2",
        BlockStyle::H3 => "h3",
        BlockStyle::Quote => "blockquote",
    }
}

fn mark_tag(mark: Mark) -> &'static str {
    match mark {
        Mark::Bold => "strong",
        Mark::Italic => "em",
        Mark::Code => "code",
    }
}
