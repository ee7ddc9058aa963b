//! Backend Gateway
//!
//! Remote operation abstractions and their implementations.

mod memory;
mod sqlite;
mod traits;

pub use memory::MemoryGateway;
pub use sqlite::SqliteGateway;
pub use traits::WritingItemGateway;
