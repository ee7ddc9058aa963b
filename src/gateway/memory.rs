//! In-Memory Gateway
//!
//! A [`WritingItemGateway`] that keeps records in process memory. Applies the
//! same validation and not-found rules as the SQLite gateway, and can be
//! switched into a failing mode to simulate an unreachable backend.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::catalog::BUILTIN_TYPES;
use crate::domain::{
    ContentType, DomainError, DomainResult, Folder, NewWritingItem, Tag, WritingItem,
    WritingItemWithTags,
};
use super::traits::WritingItemGateway;

struct StoredItem {
    item: WritingItem,
    tag_ids: Vec<String>,
}

struct MemoryState {
    next_id: u64,
    /// Insertion order; listed newest first
    items: Vec<StoredItem>,
    tags: Vec<Tag>,
    folder_ids: Vec<String>,
    /// Starts with the built-in catalog
    type_ids: Vec<String>,
    failure: Option<String>,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            next_id: 0,
            items: Vec::new(),
            tags: Vec::new(),
            folder_ids: Vec::new(),
            type_ids: BUILTIN_TYPES.iter().map(|builtin| builtin.id.to_string()).collect(),
            failure: None,
        }
    }
}

impl MemoryState {
    fn check_available(&self) -> DomainResult<()> {
        match &self.failure {
            Some(msg) => Err(DomainError::Transport(msg.clone())),
            None => Ok(()),
        }
    }

    fn validate(&self, payload: &NewWritingItem) -> DomainResult<()> {
        if payload.title.trim().is_empty() {
            return Err(DomainError::Validation("title must not be empty".to_string()));
        }
        if payload.type_id.trim().is_empty() {
            return Err(DomainError::Validation("type id must not be empty".to_string()));
        }
        if !self.type_ids.contains(&payload.type_id) {
            return Err(DomainError::Validation(format!("unknown content type {}", payload.type_id)));
        }
        if let Some(folder_id) = &payload.folder_id {
            if !self.folder_ids.contains(folder_id) {
                return Err(DomainError::Validation(format!("unknown folder {}", folder_id)));
            }
        }
        if let Some(unknown) = payload
            .tag_ids
            .iter()
            .find(|id| !self.tags.iter().any(|tag| &tag.id == *id))
        {
            return Err(DomainError::Validation(format!("unknown tag {}", unknown)));
        }
        Ok(())
    }

    fn usage_count(&self, tag_id: &str) -> i32 {
        self.items
            .iter()
            .filter(|stored| stored.tag_ids.iter().any(|id| id == tag_id))
            .count() as i32
    }

    fn materialize(&self, stored: &StoredItem) -> WritingItemWithTags {
        let tags = stored
            .tag_ids
            .iter()
            .filter_map(|id| self.tags.iter().find(|tag| &tag.id == id))
            .map(|tag| Tag {
                usage_count: self.usage_count(&tag.id),
                ..tag.clone()
            })
            .collect();
        WritingItemWithTags {
            item: stored.item.clone(),
            tags,
        }
    }
}

/// Dedup while keeping first-seen order
fn unique_tag_ids(tag_ids: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tag_ids.len());
    for id in tag_ids {
        if !unique.contains(id) {
            unique.push(id.clone());
        }
    }
    unique
}

/// In-memory implementation of the writing item gateway
#[derive(Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tag that payloads may reference
    pub async fn add_tag(&self, tag: Tag) {
        let mut state = self.state.lock().await;
        state.tags.retain(|existing| existing.id != tag.id);
        state.tags.push(tag);
    }

    /// Register a folder that payloads may file items under
    pub async fn add_folder(&self, folder: Folder) {
        let mut state = self.state.lock().await;
        if !state.folder_ids.contains(&folder.id) {
            state.folder_ids.push(folder.id);
        }
    }

    /// Register a user-defined content type next to the built-ins
    pub async fn add_content_type(&self, content_type: ContentType) {
        let mut state = self.state.lock().await;
        if !state.type_ids.contains(&content_type.id) {
            state.type_ids.push(content_type.id);
        }
    }

    /// Make every subsequent call fail with a transport error
    pub async fn fail_with(&self, message: impl Into<String>) {
        self.state.lock().await.failure = Some(message.into());
    }

    /// Leave failing mode
    pub async fn recover(&self) {
        self.state.lock().await.failure = None;
    }

    /// Number of stored items, for test assertions
    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.state.lock().await.items.len()
    }

    #[cfg(test)]
    pub(crate) async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl WritingItemGateway for MemoryGateway {
    async fn list_writing_items(&self) -> DomainResult<Vec<WritingItemWithTags>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state.items.iter().rev().map(|stored| state.materialize(stored)).collect())
    }

    async fn get_writing_item(&self, id: &str) -> DomainResult<Option<WritingItemWithTags>> {
        let state = self.state.lock().await;
        state.check_available()?;
        Ok(state
            .items
            .iter()
            .find(|stored| stored.item.id == id)
            .map(|stored| state.materialize(stored)))
    }

    async fn create_writing_item(&self, new_item: &NewWritingItem) -> DomainResult<String> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        state.validate(new_item)?;

        state.next_id += 1;
        let id = format!("w{}", state.next_id);
        let now = Utc::now();
        state.items.push(StoredItem {
            item: WritingItem {
                id: id.clone(),
                title: new_item.title.clone(),
                type_id: new_item.type_id.clone(),
                content: new_item.content.clone(),
                created_time: new_item.created_time.clone(),
                is_precise_time: new_item.is_precise_time,
                background: new_item.background.clone(),
                notes: new_item.notes.clone(),
                folder_id: new_item.folder_id.clone(),
                created_at: now,
                updated_at: now,
            },
            tag_ids: unique_tag_ids(&new_item.tag_ids),
        });
        Ok(id)
    }

    async fn update_writing_item(&self, id: &str, updates: &NewWritingItem) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        state.check_available()?;
        state.validate(updates)?;

        let stored = state
            .items
            .iter_mut()
            .find(|stored| stored.item.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("writing item {}", id)))?;

        let item = &mut stored.item;
        item.title = updates.title.clone();
        item.type_id = updates.type_id.clone();
        item.content = updates.content.clone();
        item.created_time = updates.created_time.clone();
        item.is_precise_time = updates.is_precise_time;
        item.background = updates.background.clone();
        item.notes = updates.notes.clone();
        item.folder_id = updates.folder_id.clone();
        item.updated_at = Utc::now().max(item.created_at);
        stored.tag_ids = unique_tag_ids(&updates.tag_ids);
        Ok(())
    }

    async fn delete_writing_item(&self, id: &str) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        state.check_available()?;

        let before = state.items.len();
        state.items.retain(|stored| stored.item.id != id);
        if state.items.len() == before {
            return Err(DomainError::NotFound(format!("writing item {}", id)));
        }
        Ok(())
    }
}
