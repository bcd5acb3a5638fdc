//! Image view models

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::images::split_image_ref;

/// Parsed image creation time
///
/// Unparseable timestamps become the invalid value, which orders before
/// every valid timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CreatedAt(Option<DateTime<Utc>>);

impl CreatedAt {
    pub const INVALID: CreatedAt = CreatedAt(None);

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }
}

impl From<DateTime<Utc>> for CreatedAt {
    fn from(dt: DateTime<Utc>) -> Self {
        CreatedAt(Some(dt))
    }
}

impl fmt::Display for CreatedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "Invalid date"),
        }
    }
}

impl Serialize for CreatedAt {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }
}

/// An image record with derived metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnhancedImage {
    /// Full image reference, `<imageName>:<version>`
    pub name: String,

    pub metadata: EnhancedImageMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnhancedImageMetadata {
    #[serde(rename = "git-commit")]
    pub git_commit: String,

    #[serde(rename = "git-tag")]
    pub git_tag: Vec<String>,

    #[serde(rename = "git-annotation")]
    pub git_annotation: Vec<String>,

    #[serde(rename = "git-origin")]
    pub git_origin: String,

    /// Browsable HTTPS URL of the source repository
    #[serde(rename = "git-hub-base")]
    pub git_hub_base: String,

    #[serde(rename = "created-at")]
    pub created_at: CreatedAt,
}

impl EnhancedImage {
    /// Stand-in for an image reference no history knows about
    pub fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            metadata: EnhancedImageMetadata::default(),
        }
    }

    pub fn image_name(&self) -> &str {
        split_image_ref(&self.name).0
    }

    pub fn version(&self) -> Option<&str> {
        split_image_ref(&self.name).1
    }

    pub fn created_at(&self) -> CreatedAt {
        self.metadata.created_at
    }
}

/// Image history entry annotated for the deployment detail page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedImage {
    #[serde(flatten)]
    pub image: EnhancedImage,

    /// Human-relative age, e.g. "3 days ago"
    pub age: String,

    /// `<imageName>:<version>` display name
    pub deployment_image_name: String,
}
