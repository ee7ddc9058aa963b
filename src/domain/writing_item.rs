//! Writing Item Entity
//!
//! A note/article unit. The cache stores the tag-enriched form,
//! [`WritingItemWithTags`]; the backend owns the item-tag association.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::entity::Entity;
use super::tag::Tag;

/// A writing item as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingItem {
    /// Unique identifier, immutable once assigned
    pub id: String,
    pub title: String,
    /// ContentType id
    pub type_id: String,
    /// Body content (Markdown)
    pub content: Option<String>,
    /// When the piece was authored, as entered by the user
    pub created_time: Option<String>,
    /// Whether `created_time` is exact or approximate
    #[serde(default)]
    pub is_precise_time: bool,
    /// Background/context of the piece
    pub background: Option<String>,
    pub notes: Option<String>,
    /// Folder ID (None = unfiled)
    pub folder_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WritingItem {
    /// Check if the item is not filed in any folder
    pub fn is_unfiled(&self) -> bool {
        self.folder_id.is_none()
    }
}

/// A writing item with its resolved tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingItemWithTags {
    #[serde(flatten)]
    pub item: WritingItem,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl WritingItemWithTags {
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|tag| tag.id == tag_id)
    }
}

impl std::ops::Deref for WritingItemWithTags {
    type Target = WritingItem;

    fn deref(&self) -> &Self::Target {
        &self.item
    }
}

impl Entity for WritingItemWithTags {
    fn id(&self) -> &str {
        &self.item.id
    }
}

/// Payload for creating or updating a writing item
///
/// Carries tag ids rather than resolved tags; an update replaces the whole
/// tag set with `tag_ids`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWritingItem {
    pub title: String,
    pub type_id: String,
    pub content: Option<String>,
    pub created_time: Option<String>,
    #[serde(default)]
    pub is_precise_time: bool,
    pub background: Option<String>,
    pub notes: Option<String>,
    pub folder_id: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<String>,
}

impl NewWritingItem {
    pub fn new(title: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            type_id: type_id.into(),
            ..Default::default()
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn in_folder(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tag_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag_ids = tag_ids.into_iter().map(Into::into).collect();
        self
    }
}
