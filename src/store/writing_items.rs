//! Writing Item Store
//!
//! In-memory mirror of the backend's writing items. Every action calls the
//! gateway first and only then reconciles the local collection; nothing is
//! patched optimistically. Mutations re-read the item so that backend-owned
//! fields (timestamps, tag usage counters) come from the source of truth.

use std::sync::Arc;
use tokio::sync::watch;

use crate::domain::{DomainResult, NewWritingItem, WritingItemWithTags};
use crate::gateway::WritingItemGateway;
use super::state::{remove_entity, upsert_entity, StoreHandle, StoreState};

/// Cache of writing items with their tags
///
/// Cloning yields another handle to the same cache.
#[derive(Clone)]
pub struct WritingItemStore {
    gateway: Arc<dyn WritingItemGateway>,
    state: StoreHandle<WritingItemWithTags>,
}

impl WritingItemStore {
    /// Empty cache, not loading, no error
    pub fn new(gateway: Arc<dyn WritingItemGateway>) -> Self {
        Self {
            gateway,
            state: StoreHandle::new(),
        }
    }

    // ========================
    // State
    // ========================

    /// Receive a notification for every state change
    pub fn subscribe(&self) -> watch::Receiver<StoreState<WritingItemWithTags>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> StoreState<WritingItemWithTags> {
        self.state.snapshot()
    }

    pub fn items(&self) -> Vec<WritingItemWithTags> {
        self.state.with_items(|items| items.to_vec())
    }

    pub fn len(&self) -> usize {
        self.state.with_items(|items| items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    // ========================
    // Derived Views
    // ========================

    pub fn get_item_by_id(&self, id: &str) -> Option<WritingItemWithTags> {
        self.state
            .with_items(|items| items.iter().find(|item| item.id == id).cloned())
    }

    pub fn get_items_by_type(&self, type_id: &str) -> Vec<WritingItemWithTags> {
        self.state.with_items(|items| {
            items
                .iter()
                .filter(|item| item.type_id == type_id)
                .cloned()
                .collect()
        })
    }

    /// Items in `folder_id`, or unfiled items when `None`
    pub fn get_items_by_folder(&self, folder_id: Option<&str>) -> Vec<WritingItemWithTags> {
        self.state.with_items(|items| {
            items
                .iter()
                .filter(|item| item.folder_id.as_deref() == folder_id)
                .cloned()
                .collect()
        })
    }

    // ========================
    // Actions
    // ========================

    /// Replace the whole cache with the backend's list
    ///
    /// On failure the previous contents stay in place.
    pub async fn fetch_all(&self) -> DomainResult<Vec<WritingItemWithTags>> {
        self.state
            .track(
                || "Failed to fetch writing items".to_string(),
                async {
                    let items = self.gateway.list_writing_items().await?;
                    tracing::debug!(count = items.len(), "writing items fetched");
                    let cached = items.clone();
                    self.state.modify_items(move |current| *current = cached);
                    Ok(items)
                },
            )
            .await
    }

    /// Read one item and reconcile it into the cache
    ///
    /// A present item replaces its cached copy in place or is appended. An
    /// item the backend does not know leaves the cache untouched.
    pub async fn fetch_one(&self, id: &str) -> DomainResult<Option<WritingItemWithTags>> {
        self.state
            .track(
                || format!("Failed to fetch writing item {}", id),
                async {
                    let item = self.gateway.get_writing_item(id).await?;
                    match &item {
                        Some(found) => {
                            let cached = found.clone();
                            self.state.modify_items(move |current| upsert_entity(current, cached));
                        }
                        None => tracing::debug!(%id, "writing item not found"),
                    }
                    Ok(item)
                },
            )
            .await
    }

    /// Create an item, then read it back through [`fetch_one`](Self::fetch_one)
    pub async fn create(&self, new_item: NewWritingItem) -> DomainResult<Option<WritingItemWithTags>> {
        self.state
            .track(
                || "Failed to create writing item".to_string(),
                async {
                    let id = self.gateway.create_writing_item(&new_item).await?;
                    tracing::debug!(%id, "writing item created");
                    self.fetch_one(&id).await
                },
            )
            .await
    }

    /// Update an item, then read it back through [`fetch_one`](Self::fetch_one)
    pub async fn update(&self, id: &str, updates: NewWritingItem) -> DomainResult<Option<WritingItemWithTags>> {
        self.state
            .track(
                || format!("Failed to update writing item {}", id),
                async {
                    self.gateway.update_writing_item(id, &updates).await?;
                    tracing::debug!(%id, "writing item updated");
                    self.fetch_one(id).await
                },
            )
            .await
    }

    /// Delete an item and drop it from the cache
    pub async fn remove(&self, id: &str) -> DomainResult<()> {
        self.state
            .track(
                || format!("Failed to delete writing item {}", id),
                async {
                    self.gateway.delete_writing_item(id).await?;
                    self.state.modify_items(|current| {
                        remove_entity(current, id);
                    });
                    tracing::debug!(%id, "writing item removed");
                    Ok(())
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::Utc;

    use crate::domain::{DomainError, Folder, Tag};
    use crate::gateway::MemoryGateway;

    fn setup() -> (Arc<MemoryGateway>, WritingItemStore) {
        let gateway = Arc::new(MemoryGateway::new());
        let store = WritingItemStore::new(gateway.clone());
        (gateway, store)
    }

    /// Gateway whose reads can be made to fail independently of writes
    struct FlakyReads {
        inner: MemoryGateway,
        fail_reads: AtomicBool,
    }

    #[async_trait]
    impl WritingItemGateway for FlakyReads {
        async fn list_writing_items(&self) -> DomainResult<Vec<WritingItemWithTags>> {
            self.inner.list_writing_items().await
        }

        async fn get_writing_item(&self, id: &str) -> DomainResult<Option<WritingItemWithTags>> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(DomainError::Transport(String::new()));
            }
            self.inner.get_writing_item(id).await
        }

        async fn create_writing_item(&self, new_item: &NewWritingItem) -> DomainResult<String> {
            self.inner.create_writing_item(new_item).await
        }

        async fn update_writing_item(&self, id: &str, updates: &NewWritingItem) -> DomainResult<()> {
            self.inner.update_writing_item(id, updates).await
        }

        async fn delete_writing_item(&self, id: &str) -> DomainResult<()> {
            self.inner.delete_writing_item(id).await
        }
    }

    #[tokio::test]
    async fn test_new_store_is_idle_and_empty() {
        let (_, store) = setup();
        assert!(store.is_empty());
        assert!(!store.is_loading());
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn test_create_update_remove_scenario() {
        let (_, store) = setup();

        let created = store
            .create(NewWritingItem::new("Draft", "article-type"))
            .await
            .unwrap()
            .expect("created item is read back");
        assert_eq!(created.id, "w1");
        assert_eq!(store.len(), 1);
        assert_eq!(store.items()[0].type_id, "article-type");

        let updated = store
            .update("w1", NewWritingItem::new("Final", "article-type"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, "w1");
        assert_eq!(store.len(), 1);
        assert_eq!(store.items()[0].title, "Final");

        store.remove("w1").await.unwrap();
        assert!(store.is_empty());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_fetch_one_replaces_in_place() {
        let (gateway, store) = setup();
        for title in ["A", "B", "C"] {
            gateway.create_writing_item(&NewWritingItem::new(title, "note-type")).await.unwrap();
        }
        store.fetch_all().await.unwrap();
        let before: Vec<String> = store.items().iter().map(|i| i.id.clone()).collect();

        gateway.update_writing_item("w2", &NewWritingItem::new("B2", "note-type")).await.unwrap();
        store.fetch_one("w2").await.unwrap();

        let after: Vec<String> = store.items().iter().map(|i| i.id.clone()).collect();
        assert_eq!(before, after);
        assert_eq!(store.get_item_by_id("w2").unwrap().title, "B2");
    }

    #[tokio::test]
    async fn test_fetch_one_appends_unknown_item() {
        let (gateway, store) = setup();
        gateway.create_writing_item(&NewWritingItem::new("A", "note-type")).await.unwrap();
        store.fetch_all().await.unwrap();
        let id = gateway.create_writing_item(&NewWritingItem::new("B", "note-type")).await.unwrap();

        store.fetch_one(&id).await.unwrap();
        assert_eq!(store.items().last().unwrap().id, id);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_one_missing_leaves_cache_alone() {
        let (gateway, store) = setup();
        gateway.create_writing_item(&NewWritingItem::new("A", "note-type")).await.unwrap();
        store.fetch_all().await.unwrap();

        let found = store.fetch_one("w99").await.unwrap();
        assert!(found.is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn test_fetch_all_failure_keeps_stale_data() {
        let (gateway, store) = setup();
        gateway.create_writing_item(&NewWritingItem::new("A", "note-type")).await.unwrap();
        store.fetch_all().await.unwrap();

        gateway.fail_with("backend offline").await;
        let err = store.fetch_all().await.unwrap_err();
        assert_eq!(err.to_string(), "backend offline");
        assert_eq!(store.error(), Some("backend offline".to_string()));
        assert_eq!(store.len(), 1);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_next_action_clears_previous_error() {
        let (gateway, store) = setup();
        gateway.fail_with("backend offline").await;
        assert!(store.fetch_all().await.is_err());

        gateway.recover().await;
        store.fetch_all().await.unwrap();
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn test_remove_failure_keeps_item() {
        let (gateway, store) = setup();
        store.create(NewWritingItem::new("Keep", "poem-type")).await.unwrap();

        gateway.fail_with("disk full").await;
        assert!(store.remove("w1").await.is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(store.error(), Some("disk full".to_string()));
    }

    #[tokio::test]
    async fn test_remove_unknown_id_reports_error() {
        let (_, store) = setup();
        let err = store.remove("w5").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(store.error(), Some("Not found: writing item w5".to_string()));
    }

    #[tokio::test]
    async fn test_validation_error_surfaces_message() {
        let (_, store) = setup();
        let err = store.create(NewWritingItem::new("", "poem-type")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.error(), Some("Invalid input: title must not be empty".to_string()));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_read_back_failure_uses_fallback_message() {
        let gateway = Arc::new(FlakyReads {
            inner: MemoryGateway::new(),
            fail_reads: AtomicBool::new(true),
        });
        let store = WritingItemStore::new(gateway.clone());

        let err = store.create(NewWritingItem::new("Draft", "poem-type")).await.unwrap_err();
        assert!(matches!(err, DomainError::Transport(_)));
        assert_eq!(store.error(), Some("Failed to create writing item".to_string()));
        assert!(store.is_empty());
        assert!(!store.is_loading());

        // The backend kept the item; a later refresh picks it up
        gateway.fail_reads.store(false, Ordering::SeqCst);
        store.fetch_all().await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_one_failure_names_the_id() {
        let gateway = Arc::new(FlakyReads {
            inner: MemoryGateway::new(),
            fail_reads: AtomicBool::new(true),
        });
        let store = WritingItemStore::new(gateway);
        assert!(store.fetch_one("w3").await.is_err());
        assert_eq!(store.error(), Some("Failed to fetch writing item w3".to_string()));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_update_failure_leaves_cache_unchanged() {
        let (gateway, store) = setup();
        store.create(NewWritingItem::new("Draft", "article-type")).await.unwrap();
        let before = store.items();

        let err = store.update("w9", NewWritingItem::new("Final", "article-type")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(store.error(), Some("Not found: writing item w9".to_string()));
        assert!(!store.is_loading());
        assert_eq!(store.items(), before);

        let err = store.update("w1", NewWritingItem::new("Final", "novel-type")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.error(), Some("Invalid input: unknown content type novel-type".to_string()));
        assert_eq!(store.items(), before);

        gateway.fail_with("backend offline").await;
        assert!(store.update("w1", NewWritingItem::new("Final", "article-type")).await.is_err());
        assert_eq!(store.error(), Some("backend offline".to_string()));
        assert!(!store.is_loading());
        assert_eq!(store.get_item_by_id("w1").unwrap().title, "Draft");
    }

    #[tokio::test]
    async fn test_remove_uncached_item_is_local_no_op() {
        let (gateway, store) = setup();
        store.create(NewWritingItem::new("Cached", "note-type")).await.unwrap();
        let elsewhere = gateway
            .create_writing_item(&NewWritingItem::new("Elsewhere", "note-type"))
            .await
            .unwrap();

        store.remove(&elsewhere).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.items()[0].title, "Cached");
        assert_eq!(store.error(), None);
        assert!(!store.is_loading());
        assert!(gateway.get_writing_item(&elsewhere).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_tags_come_from_backend() {
        let (gateway, store) = setup();
        gateway.add_tag(Tag::new("t1", "Travel")).await;

        let item = store
            .create(NewWritingItem::new("Trip", "note-type").with_tags(["t1"]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(item.tags.len(), 1);
        assert_eq!(item.tags[0].usage_count, 1);
        assert!(store.get_item_by_id(&item.id).unwrap().has_tag("t1"));
    }

    #[tokio::test]
    async fn test_derived_views() {
        let (gateway, store) = setup();
        for id in ["f1", "f2"] {
            gateway
                .add_folder(Folder {
                    id: id.to_string(),
                    name: id.to_uppercase(),
                    parent_id: None,
                    sort_order: 0,
                    created_at: Utc::now(),
                })
                .await;
        }
        store.create(NewWritingItem::new("Ode", "poem-type").in_folder("f1")).await.unwrap();
        store.create(NewWritingItem::new("Essay", "article-type").in_folder("f2")).await.unwrap();
        store.create(NewWritingItem::new("Haiku", "poem-type")).await.unwrap();

        let poems = store.get_items_by_type("poem-type");
        assert_eq!(poems.len(), 2);
        assert!(poems.iter().all(|i| i.type_id == "poem-type"));

        let unfiled = store.get_items_by_folder(None);
        assert_eq!(unfiled.len(), 1);
        assert_eq!(unfiled[0].title, "Haiku");

        let in_f1 = store.get_items_by_folder(Some("f1"));
        assert_eq!(in_f1.len(), 1);
        assert_eq!(in_f1[0].title, "Ode");

        assert!(store.get_items_by_type("tech-type").is_empty());
        assert!(store.get_item_by_id("missing").is_none());
    }

    #[tokio::test]
    async fn test_clear_error_only_touches_error() {
        let (gateway, store) = setup();
        store.create(NewWritingItem::new("A", "poem-type")).await.unwrap();
        gateway.fail_with("boom").await;
        let _ = store.fetch_all().await;

        store.clear_error();
        assert_eq!(store.error(), None);
        assert_eq!(store.len(), 1);
        assert!(!store.is_loading());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_actions_settle_idle() {
        let (gateway, store) = setup();
        for title in ["A", "B", "C"] {
            gateway.create_writing_item(&NewWritingItem::new(title, "note-type")).await.unwrap();
        }

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.fetch_all().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.len(), 3);
        assert!(!store.is_loading());
    }
}
