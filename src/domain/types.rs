//! Enumerations shared by the content schemas, plus the lenient field
//! decoders the CMS payloads need.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostCategory {
    Work,
    Playground,
    Thoughts,
    Links,
    Photography,
}

impl PostCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PostCategory::Work => "work",
            PostCategory::Playground => "playground",
            PostCategory::Thoughts => "thoughts",
            PostCategory::Links => "links",
            PostCategory::Photography => "photography",
        }
    }
}

impl FromStr for PostCategory {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "work" => Ok(PostCategory::Work),
            "playground" => Ok(PostCategory::Playground),
            "thoughts" => Ok(PostCategory::Thoughts),
            "links" => Ok(PostCategory::Links),
            "photography" => Ok(PostCategory::Photography),
            other => Err(DomainError::unknown_variant("post category", other)),
        }
    }
}

impl fmt::Display for PostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a post card is presented in the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardLayout {
    #[default]
    Default,
    Video,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Available,
    Open,
    Unavailable,
}

impl Availability {
    pub fn label(self) -> &'static str {
        match self {
            Availability::Available => "Available",
            Availability::Open => "Open to opportunities",
            Availability::Unavailable => "Unavailable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    Design,
    Development,
    Productivity,
    Communication,
    Other,
}

impl ToolCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolCategory::Design => "design",
            ToolCategory::Development => "development",
            ToolCategory::Productivity => "productivity",
            ToolCategory::Communication => "communication",
            ToolCategory::Other => "other",
        }
    }
}

impl FromStr for ToolCategory {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "design" => Ok(ToolCategory::Design),
            "development" => Ok(ToolCategory::Development),
            "productivity" => Ok(ToolCategory::Productivity),
            "communication" => Ok(ToolCategory::Communication),
            "other" => Ok(ToolCategory::Other),
            other => Err(DomainError::unknown_variant("tool category", other)),
        }
    }
}

/// GROQ projections emit `null` for absent fields; treat that like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Optional text where an empty or whitespace-only string means "not set".
pub(crate) fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_category_round_trips_through_str() {
        for category in [
            PostCategory::Work,
            PostCategory::Playground,
            PostCategory::Thoughts,
            PostCategory::Links,
            PostCategory::Photography,
        ] {
            assert_eq!(category.as_str().parse::<PostCategory>(), Ok(category));
        }
    }

    #[test]
    fn unknown_post_category_is_rejected() {
        let err = "essays".parse::<PostCategory>().unwrap_err();
        assert_eq!(err, DomainError::unknown_variant("post category", "essays"));
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "null_as_default")]
            availability: Availability,
            #[serde(default, deserialize_with = "non_empty_string")]
            handle: Option<String>,
        }

        let holder: Holder =
            serde_json::from_str(r#"{"availability": null, "handle": "  "}"#).expect("decode");
        assert_eq!(holder.availability, Availability::Available);
        assert_eq!(holder.handle, None);
    }
}
