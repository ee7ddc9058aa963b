//! Application State Stores
//!
//! Caches mirroring backend collections, each with a busy flag and an error
//! field observable through `subscribe()`.

mod content_types;
mod state;
mod writing_items;

pub use content_types::ContentTypeStore;
pub use state::StoreState;
pub use writing_items::WritingItemStore;
