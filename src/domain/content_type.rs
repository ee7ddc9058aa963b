//! Content Type Entity
//!
//! Classification of a writing item (poem, article, ...). Built-in types are
//! provided by the system and cannot be deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::entity::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentType {
    pub id: String,
    /// Display name
    pub name: String,
    /// Icon key understood by the UI
    pub icon: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub is_built_in: bool,
    /// Stable display ordering
    #[serde(default)]
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl Entity for ContentType {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Payload for creating a user-defined content type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContentType {
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub is_built_in: bool,
    #[serde(default)]
    pub sort_order: i32,
}
