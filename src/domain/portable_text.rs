//! Portable text: the block-based rich text model delivered by the CMS.
//!
//! Decoding is lenient. A block whose `_type` is unknown, or whose payload does
//! not match its declared type, becomes [`Block::Unsupported`] so a single bad
//! block never poisons the document.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::domain::assets::{AssetRef, FileField, Hotspot, ImageField};
use crate::domain::types::{non_empty_string, null_as_default};

const TEXT_TYPE: &str = "block";
const IMAGE_TYPE: &str = "image";
const VIDEO_TYPE: &str = "videoEmbed";
const GALLERY_TYPE: &str = "gallery";
const SPAN_TYPE: &str = "span";
const LINK_TYPE: &str = "link";

/// Ordered sequence of blocks; renders top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RichDocument {
    blocks: Vec<Block>,
}

impl RichDocument {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Decode a CMS JSON value. Anything but an array is an empty document.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Array(items) => items.into_iter().map(Block::from_json).collect(),
            _ => Self::default(),
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl FromIterator<Block> for RichDocument {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for RichDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.map(RichDocument::from_json).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Text,
    Image,
    Video,
    Gallery,
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Text(TextBlock),
    Image(ImageBlock),
    Video(VideoBlock),
    Gallery(GalleryBlock),
    /// A block the renderer does not understand. Kept so callers can count it.
    Unsupported { type_name: String },
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Text(_) => BlockKind::Text,
            Block::Image(_) => BlockKind::Image,
            Block::Video(_) => BlockKind::Video,
            Block::Gallery(_) => BlockKind::Gallery,
            Block::Unsupported { .. } => BlockKind::Unsupported,
        }
    }

    pub fn from_json(value: Value) -> Self {
        let type_name = value
            .get("_type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let block = match type_name.as_str() {
            TEXT_TYPE => decode::<RawTextBlock>(value).map(|raw| Block::Text(raw.into_block())),
            IMAGE_TYPE => decode::<ImageField>(value).map(|field| Block::Image(field.into())),
            VIDEO_TYPE => decode::<RawVideoBlock>(value).map(|raw| Block::Video(raw.into_block())),
            GALLERY_TYPE => {
                decode::<RawGalleryBlock>(value).map(|raw| Block::Gallery(raw.into_block()))
            }
            _ => None,
        };

        block.unwrap_or(Block::Unsupported { type_name })
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Option<T> {
    serde_json::from_value(value).ok()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockStyle {
    #[default]
    Normal,
    H2,
    H3,
    Quote,
}

impl BlockStyle {
    fn from_cms(value: Option<&str>) -> Self {
        match value {
            Some("h2") => BlockStyle::H2,
            Some("h3") => BlockStyle::H3,
            Some("blockquote" | "quote") => BlockStyle::Quote,
            _ => BlockStyle::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Bullet,
    Number,
}

impl ListKind {
    fn from_cms(value: &str) -> Self {
        match value {
            "number" => ListKind::Number,
            _ => ListKind::Bullet,
        }
    }
}

/// Inline decorators. Ordering fixes the nesting order on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    Bold,
    Italic,
    Code,
}

impl Mark {
    fn from_decorator(name: &str) -> Option<Self> {
        match name {
            "strong" => Some(Mark::Bold),
            "em" => Some(Mark::Italic),
            "code" => Some(Mark::Code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkAnnotation {
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub marks: BTreeSet<Mark>,
    pub link: Option<LinkAnnotation>,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: BTreeSet::new(),
            link: None,
        }
    }

    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.marks.insert(mark);
        self
    }

    pub fn with_link(mut self, href: impl Into<String>) -> Self {
        self.link = Some(LinkAnnotation { href: href.into() });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    pub style: BlockStyle,
    pub list: Option<ListKind>,
    pub spans: Vec<Span>,
}

impl TextBlock {
    pub fn new(style: BlockStyle, spans: Vec<Span>) -> Self {
        Self {
            style,
            list: None,
            spans,
        }
    }

    pub fn list_item(kind: ListKind, spans: Vec<Span>) -> Self {
        Self {
            style: BlockStyle::Normal,
            list: Some(kind),
            spans,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageBlock {
    /// Empty when the CMS payload had no usable asset; renders with an empty `src`.
    pub asset: AssetRef,
    pub alt: Option<String>,
    pub caption: Option<String>,
    pub hotspot: Option<Hotspot>,
}

impl ImageBlock {
    pub fn new(asset: AssetRef) -> Self {
        Self {
            asset,
            ..Self::default()
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

impl From<ImageField> for ImageBlock {
    fn from(field: ImageField) -> Self {
        Self {
            asset: field.asset_ref().unwrap_or_default(),
            alt: field.alt,
            caption: field.caption,
            hotspot: field.hotspot,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VideoBlock {
    pub asset: Option<AssetRef>,
    pub external_url: Option<String>,
    pub poster: Option<AssetRef>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GalleryLayout {
    #[default]
    Grid,
    Carousel,
}

impl GalleryLayout {
    fn from_cms(value: Option<&str>) -> Self {
        match value {
            Some("carousel") => GalleryLayout::Carousel,
            _ => GalleryLayout::Grid,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GalleryBlock {
    pub images: Vec<ImageBlock>,
    pub layout: GalleryLayout,
}

impl GalleryBlock {
    pub fn new(layout: GalleryLayout, images: Vec<ImageBlock>) -> Self {
        Self { images, layout }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTextBlock {
    #[serde(default)]
    style: Option<String>,
    #[serde(default)]
    list_item: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    children: Vec<RawSpan>,
    #[serde(default, deserialize_with = "null_as_default")]
    mark_defs: Vec<RawMarkDef>,
}

#[derive(Deserialize)]
struct RawSpan {
    #[serde(rename = "_type", default)]
    kind: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    marks: Vec<String>,
}

#[derive(Deserialize)]
struct RawMarkDef {
    #[serde(rename = "_key", default)]
    key: String,
    #[serde(rename = "_type", default)]
    kind: String,
    #[serde(default)]
    href: Option<String>,
}

impl RawTextBlock {
    fn into_block(self) -> TextBlock {
        let links: HashMap<String, LinkAnnotation> = self
            .mark_defs
            .into_iter()
            .filter(|def| def.kind == LINK_TYPE && !def.key.is_empty())
            .map(|def| {
                let href = def.href.unwrap_or_default();
                (def.key, LinkAnnotation { href })
            })
            .collect();

        let spans = self
            .children
            .into_iter()
            .filter(|child| child.kind.as_deref().is_none_or(|kind| kind == SPAN_TYPE))
            .map(|child| {
                let mut span = Span::plain(child.text);
                for mark in &child.marks {
                    if let Some(decorator) = Mark::from_decorator(mark) {
                        span.marks.insert(decorator);
                    } else if let Some(link) = links.get(mark) {
                        span.link = Some(link.clone());
                    }
                }
                span
            })
            .collect();

        TextBlock {
            style: BlockStyle::from_cms(self.style.as_deref()),
            list: self.list_item.as_deref().map(ListKind::from_cms),
            spans,
        }
    }
}

#[derive(Deserialize)]
struct RawVideoBlock {
    #[serde(default)]
    video: Option<FileField>,
    #[serde(default)]
    poster: Option<ImageField>,
    #[serde(default, deserialize_with = "non_empty_string")]
    caption: Option<String>,
}

impl RawVideoBlock {
    fn into_block(self) -> VideoBlock {
        let asset = self.video.as_ref().and_then(FileField::asset_ref);
        let external_url = self
            .video
            .as_ref()
            .and_then(FileField::url)
            .map(str::to_string);
        VideoBlock {
            asset,
            external_url,
            poster: self.poster.as_ref().and_then(ImageField::asset_ref),
            caption: self.caption,
        }
    }
}

#[derive(Deserialize)]
struct RawGalleryBlock {
    #[serde(default, deserialize_with = "null_as_default")]
    images: Vec<ImageField>,
    #[serde(default)]
    layout: Option<String>,
}

impl RawGalleryBlock {
    fn into_block(self) -> GalleryBlock {
        GalleryBlock {
            images: self.images.into_iter().map(ImageBlock::from).collect(),
            layout: GalleryLayout::from_cms(self.layout.as_deref()),
        }
    }
}
