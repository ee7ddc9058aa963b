//! Domain Layer
//!
//! Entity shapes shared by the caches and the gateways. No logic beyond
//! small accessors.

mod content_type;
mod entity;
mod folder;
mod tag;
mod writing_item;

pub use content_type::{ContentType, NewContentType};
pub use entity::{DomainError, DomainResult, Entity};
pub use folder::{Folder, NewFolder};
pub use tag::{NewTag, Tag};
pub use writing_item::{NewWritingItem, WritingItem, WritingItemWithTags};
