//! Content-Type Catalog
//!
//! The six built-in content types. Exposed through an async source trait so
//! a backend-sourced catalog can replace the static one without touching
//! consumers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ContentType, DomainResult};

/// A built-in content type definition (id, name, icon, color)
pub struct BuiltinType {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

/// Built-in types in display order; position is the sort order.
pub const BUILTIN_TYPES: [BuiltinType; 6] = [
    BuiltinType { id: "poem-type", name: "诗", icon: "poem", color: "#4CAF50" },
    BuiltinType { id: "article-type", name: "普通文章", icon: "article", color: "#2196F3" },
    BuiltinType { id: "tech-type", name: "技术文章", icon: "tech", color: "#FF9800" },
    BuiltinType { id: "comment-type", name: "时事评论", icon: "comment", color: "#F44336" },
    BuiltinType { id: "note-type", name: "散记", icon: "note", color: "#9C27B0" },
    BuiltinType { id: "reflection-type", name: "人生感悟", icon: "reflection", color: "#607D8B" },
];

/// Materialize the built-in catalog, stamped with `created_at`
pub fn builtin_content_types(created_at: DateTime<Utc>) -> Vec<ContentType> {
    BUILTIN_TYPES
        .iter()
        .enumerate()
        .map(|(position, builtin)| ContentType {
            id: builtin.id.to_string(),
            name: builtin.name.to_string(),
            icon: Some(builtin.icon.to_string()),
            color: Some(builtin.color.to_string()),
            is_built_in: true,
            sort_order: position as i32,
            created_at,
        })
        .collect()
}

/// Where the content-type cache loads its catalog from
#[async_trait]
pub trait ContentTypeSource: Send + Sync {
    async fn list_content_types(&self) -> DomainResult<Vec<ContentType>>;
}

/// Static source returning the built-in catalog, freshly stamped per call
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinContentTypes;

#[async_trait]
impl ContentTypeSource for BuiltinContentTypes {
    async fn list_content_types(&self) -> DomainResult<Vec<ContentType>> {
        Ok(builtin_content_types(Utc::now()))
    }
}
