//! Application Context
//!
//! The composition root hands one `WritingDesk` to whatever UI layer needs
//! the caches. There is no global instance.

use std::sync::Arc;

use crate::catalog::{BuiltinContentTypes, ContentTypeSource};
use crate::config::Config;
use crate::domain::DomainResult;
use crate::gateway::{SqliteGateway, WritingItemGateway};
use crate::store::{ContentTypeStore, WritingItemStore};

/// All stores of a session, sharing one backend
#[derive(Clone)]
pub struct WritingDesk {
    pub writing_items: WritingItemStore,
    pub content_types: ContentTypeStore,
}

impl WritingDesk {
    /// Stores start empty, idle and error-free
    pub fn new(gateway: Arc<dyn WritingItemGateway>) -> Self {
        Self::with_content_types(gateway, Arc::new(BuiltinContentTypes))
    }

    pub fn with_content_types(
        gateway: Arc<dyn WritingItemGateway>,
        content_types: Arc<dyn ContentTypeSource>,
    ) -> Self {
        Self {
            writing_items: WritingItemStore::new(gateway),
            content_types: ContentTypeStore::new(content_types),
        }
    }

    /// Open the SQLite database named by `config`
    pub fn open(config: &Config) -> DomainResult<Self> {
        let gateway = SqliteGateway::open(&config.database_path)?;
        Ok(Self::new(Arc::new(gateway)))
    }

    /// Load content types, then writing items
    pub async fn load(&self) -> DomainResult<()> {
        self.content_types.fetch_content_types().await?;
        self.writing_items.fetch_all().await?;
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.writing_items.is_loading() || self.content_types.is_loading()
    }
}
