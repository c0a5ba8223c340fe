//! Asset references issued by the content platform.
//!
//! An [`AssetRef`] is opaque everywhere except here: the URL resolvers in
//! `infra` ask for its parts to build CDN paths, and nothing else looks inside.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::types::non_empty_string;

const IMAGE_PREFIX: &str = "image-";
const FILE_PREFIX: &str = "file-";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

/// `file-<id>-<extension>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileParts<'a> {
    pub id: &'a str,
    pub extension: &'a str,
}

/// `image-<id>-<width>x<height>-<extension>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageParts<'a> {
    pub id: &'a str,
    pub dimensions: &'a str,
    pub extension: &'a str,
}

impl AssetRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn file_parts(&self) -> Option<FileParts<'_>> {
        let rest = self.0.strip_prefix(FILE_PREFIX)?;
        let (id, extension) = rest.rsplit_once('-')?;
        if id.is_empty() || extension.is_empty() {
            return None;
        }
        Some(FileParts { id, extension })
    }

    pub fn image_parts(&self) -> Option<ImageParts<'_>> {
        let rest = self.0.strip_prefix(IMAGE_PREFIX)?;
        let (rest, extension) = rest.rsplit_once('-')?;
        let (id, dimensions) = rest.rsplit_once('-')?;
        if id.is_empty() || extension.is_empty() || !is_dimension_pair(dimensions) {
            return None;
        }
        Some(ImageParts {
            id,
            dimensions,
            extension,
        })
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_dimension_pair(value: &str) -> bool {
    let Some((width, height)) = value.split_once('x') else {
        return false;
    };
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    digits(width) && digits(height)
}

/// Asset pointer as it appears in CMS payloads. Unexpanded pointers carry
/// `_ref`; pointers dereferenced with `asset->` carry `_id` and `url`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetPointer {
    #[serde(rename = "_ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl AssetPointer {
    pub fn asset_ref(&self) -> Option<AssetRef> {
        self.reference
            .as_deref()
            .or(self.id.as_deref())
            .map(AssetRef::new)
            .filter(|asset| !asset.is_empty())
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

/// Focal-point hint attached to images. Carried through untouched; missing
/// coordinates read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
    pub height: f64,
    pub width: f64,
}

/// A hotspot that does not decode is dropped instead of failing the image.
fn lenient_hotspot<'de, D>(deserializer: D) -> Result<Option<Hotspot>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

/// An image field (standalone or inside portable text).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageField {
    #[serde(default)]
    pub asset: Option<AssetPointer>,
    #[serde(
        default,
        deserialize_with = "non_empty_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub alt: Option<String>,
    #[serde(
        default,
        deserialize_with = "non_empty_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub caption: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_hotspot",
        skip_serializing_if = "Option::is_none"
    )]
    pub hotspot: Option<Hotspot>,
}

impl ImageField {
    pub fn asset_ref(&self) -> Option<AssetRef> {
        self.asset.as_ref().and_then(AssetPointer::asset_ref)
    }
}

/// A file field such as a featured video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileField {
    #[serde(default)]
    pub asset: Option<AssetPointer>,
}

impl FileField {
    pub fn asset_ref(&self) -> Option<AssetRef> {
        self.asset.as_ref().and_then(AssetPointer::asset_ref)
    }

    pub fn url(&self) -> Option<&str> {
        self.asset.as_ref().and_then(AssetPointer::url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_parts_split_id_and_extension() {
        let asset = AssetRef::new("file-9f86d081884c7d659a2feaa0-mp4");
        assert_eq!(
            asset.file_parts(),
            Some(FileParts {
                id: "9f86d081884c7d659a2feaa0",
                extension: "mp4",
            })
        );
    }

    #[test]
    fn image_parts_require_dimensions() {
        let asset = AssetRef::new("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg");
        assert_eq!(
            asset.image_parts(),
            Some(ImageParts {
                id: "Tb9Ew8CXIwaY6R1kjMvI0uRR",
                dimensions: "2000x3000",
                extension: "jpg",
            })
        );

        assert_eq!(AssetRef::new("image-abc-big-jpg").image_parts(), None);
        assert_eq!(AssetRef::new("file-abc-mp4").image_parts(), None);
    }

    #[test]
    fn malformed_references_do_not_parse() {
        for raw in ["", "file-", "file-mp4", "image-", "something-else"] {
            let asset = AssetRef::new(raw);
            assert_eq!(asset.file_parts(), None, "{raw}");
            assert_eq!(asset.image_parts(), None, "{raw}");
        }
    }

    #[test]
    fn pointer_prefers_reference_over_document_id() {
        let unexpanded: AssetPointer =
            serde_json::from_str(r#"{"_type":"reference","_ref":"image-a-1x1-png"}"#)
                .expect("pointer");
        assert_eq!(
            unexpanded.asset_ref(),
            Some(AssetRef::new("image-a-1x1-png"))
        );

        let expanded: AssetPointer = serde_json::from_str(
            r#"{"_id":"file-a-mp4","url":"https://cdn.example.com/a.mp4"}"#,
        )
        .expect("pointer");
        assert_eq!(expanded.asset_ref(), Some(AssetRef::new("file-a-mp4")));
        assert_eq!(expanded.url(), Some("https://cdn.example.com/a.mp4"));
    }

    #[test]
    fn partial_hotspot_fills_missing_coordinates() {
        let image: ImageField = serde_json::from_str(
            r#"{"asset":{"_ref":"image-a-1x1-png"},"hotspot":{"_type":"sanity.imageHotspot","x":0.25,"y":0.75}}"#,
        )
        .expect("image");
        assert_eq!(
            image.hotspot,
            Some(Hotspot {
                x: 0.25,
                y: 0.75,
                ..Hotspot::default()
            })
        );
    }

    #[test]
    fn malformed_hotspot_does_not_drop_the_image() {
        let image: ImageField = serde_json::from_str(
            r#"{"asset":{"_ref":"image-a-1x1-png"},"alt":"A","hotspot":{"x":"centre"}}"#,
        )
        .expect("image still decodes");
        assert_eq!(image.hotspot, None);
        assert_eq!(image.alt.as_deref(), Some("A"));
        assert_eq!(image.asset_ref(), Some(AssetRef::new("image-a-1x1-png")));
    }
}
