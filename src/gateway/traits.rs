//! Backend Gateway - Core Traits
//!
//! The boundary between the caches and the authoritative persistence
//! service. Implementations can use SQLite, in-memory, IPC, etc.

use async_trait::async_trait;
use crate::domain::{DomainResult, NewWritingItem, WritingItemWithTags};

/// Remote operations over writing items
///
/// All operations are async and may fail; a missing item on read is
/// `Ok(None)`, never an error.
#[async_trait]
pub trait WritingItemGateway: Send + Sync {
    /// List all writing items with their tags
    async fn list_writing_items(&self) -> DomainResult<Vec<WritingItemWithTags>>;

    /// Find a writing item by ID
    async fn get_writing_item(&self, id: &str) -> DomainResult<Option<WritingItemWithTags>>;

    /// Create a writing item, returning the newly assigned id
    async fn create_writing_item(&self, new_item: &NewWritingItem) -> DomainResult<String>;

    /// Overwrite an existing writing item and replace its tag set
    async fn update_writing_item(&self, id: &str, updates: &NewWritingItem) -> DomainResult<()>;

    /// Delete a writing item by ID
    async fn delete_writing_item(&self, id: &str) -> DomainResult<()>;
}
