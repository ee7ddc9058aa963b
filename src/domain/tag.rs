//! Tag Entity
//!
//! Tags can be attached to writing items for categorization and filtering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// A tag for categorizing writing items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Unique identifier
    pub id: String,
    /// Tag name
    pub name: String,
    /// Color (hex, e.g., "#FF5733")
    pub color: Option<String>,
    /// Number of items referencing this tag, maintained by the backend
    #[serde(default)]
    pub usage_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: None,
            usage_count: 0,
            created_at: Utc::now(),
        }
    }

    pub fn with_color(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::new(id, name)
        }
    }
}

impl Entity for Tag {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Payload for creating a tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTag {
    pub name: String,
    pub color: Option<String>,
}
