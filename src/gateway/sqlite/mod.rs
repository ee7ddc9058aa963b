//! SQLite Gateway
//!
//! rusqlite-backed implementation of [`WritingItemGateway`], split into:
//! - db: connection setup and migrations
//! - writing_items: writing item CRUD and tag links
//! - library: tags, folders and content types used to seed data

mod db;
mod library;
mod writing_items;

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::DomainResult;

pub(crate) use db::{format_timestamp, get_timestamp};

/// SQLite implementation of the backend gateway
#[derive(Clone)]
pub struct SqliteGateway {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteGateway {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Open a database file, creating and migrating it if needed
    pub fn open(db_path: impl AsRef<Path>) -> DomainResult<Self> {
        let db_path = db_path.as_ref();
        let conn = db::open_connection(db_path)?;
        tracing::info!(path = %db_path.display(), "database opened");
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }

    pub fn open_in_memory() -> DomainResult<Self> {
        let conn = db::open_memory_connection()?;
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }
}
