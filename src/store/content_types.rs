//! Content Type Store
//!
//! Cache of the content-type catalog. The default source is static, but the
//! store goes through the same busy/error protocol as a backend-backed one.

use std::sync::Arc;
use tokio::sync::watch;

use crate::catalog::{BuiltinContentTypes, ContentTypeSource};
use crate::domain::{ContentType, DomainResult};
use super::state::{StoreHandle, StoreState};

#[derive(Clone)]
pub struct ContentTypeStore {
    source: Arc<dyn ContentTypeSource>,
    state: StoreHandle<ContentType>,
}

impl Default for ContentTypeStore {
    fn default() -> Self {
        Self::new(Arc::new(BuiltinContentTypes))
    }
}

impl ContentTypeStore {
    pub fn new(source: Arc<dyn ContentTypeSource>) -> Self {
        Self {
            source,
            state: StoreHandle::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<ContentType>> {
        self.state.subscribe()
    }

    pub fn content_types(&self) -> Vec<ContentType> {
        self.state.with_items(|types| types.to_vec())
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

    pub fn get_content_type_by_id(&self, id: &str) -> Option<ContentType> {
        self.state
            .with_items(|types| types.iter().find(|content_type| content_type.id == id).cloned())
    }

    pub fn built_in(&self) -> Vec<ContentType> {
        self.filtered(|content_type| content_type.is_built_in)
    }

    pub fn user_defined(&self) -> Vec<ContentType> {
        self.filtered(|content_type| !content_type.is_built_in)
    }

    fn filtered(&self, keep: impl Fn(&ContentType) -> bool) -> Vec<ContentType> {
        self.state
            .with_items(|types| types.iter().filter(|t| keep(*t)).cloned().collect())
    }

    /// Load the catalog and replace the cached copy
    pub async fn fetch_content_types(&self) -> DomainResult<Vec<ContentType>> {
        self.state
            .track(
                || "Failed to fetch content types".to_string(),
                async {
                    let types = self.source.list_content_types().await?;
                    tracing::debug!(count = types.len(), "content types fetched");
                    let cached = types.clone();
                    self.state.modify_items(move |current| *current = cached);
                    Ok(types)
                },
            )
            .await
    }
}
