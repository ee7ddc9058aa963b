//! Writing Desk
//!
//! Client-side data access for a personal writing organizer.
//!
//! Layered architecture:
//! - domain: entity shapes and errors
//! - gateway: the backend boundary and its SQLite / in-memory implementations
//! - catalog: built-in content types
//! - store: observable caches reconciled against the gateway
//! - context: the per-session bundle of stores

pub mod catalog;
pub mod config;
pub mod context;
pub mod domain;
pub mod gateway;
pub mod logging;
pub mod store;

pub use catalog::{BuiltinContentTypes, ContentTypeSource};
pub use config::Config;
pub use context::WritingDesk;
pub use domain::{
    ContentType, DomainError, DomainResult, Entity, Folder, NewContentType, NewFolder, NewTag,
    NewWritingItem, Tag, WritingItem, WritingItemWithTags,
};
pub use gateway::{MemoryGateway, SqliteGateway, WritingItemGateway};
pub use logging::init_logging;
pub use store::{ContentTypeStore, StoreState, WritingItemStore};
