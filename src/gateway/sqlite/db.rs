//! Database Connection and Setup
//!
//! Opens the SQLite database, runs migrations and seeds the built-in
//! content types.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use rusqlite::{params, types::Type, Connection, Row};
use std::path::Path;

use crate::catalog::BUILTIN_TYPES;
use crate::domain::DomainResult;

/// Open (or create) a database file and bring its schema up to date
pub fn open_connection(db_path: &Path) -> DomainResult<Connection> {
    let conn = Connection::open(db_path)?;
    prepare(&conn)?;
    Ok(conn)
}

/// In-memory database, mainly for tests
pub fn open_memory_connection() -> DomainResult<Connection> {
    let conn = Connection::open_in_memory()?;
    prepare(&conn)?;
    Ok(conn)
}

fn prepare(conn: &Connection) -> DomainResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    run_migrations(conn)?;
    seed_builtin_content_types(conn)?;
    Ok(())
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS content_types (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            icon TEXT,
            color TEXT,
            is_built_in INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS folders (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            parent_id TEXT REFERENCES folders(id),
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS tags (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            color TEXT,
            usage_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS writing_items (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            type_id TEXT NOT NULL REFERENCES content_types(id),
            content TEXT,
            created_time TEXT,
            is_precise_time INTEGER NOT NULL DEFAULT 0,
            background TEXT,
            notes TEXT,
            folder_id TEXT REFERENCES folders(id),
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS writing_item_tags (
            writing_item_id TEXT NOT NULL REFERENCES writing_items(id) ON DELETE CASCADE,
            tag_id TEXT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (writing_item_id, tag_id)
        );

        CREATE INDEX IF NOT EXISTS idx_writing_items_folder ON writing_items(folder_id);
        CREATE INDEX IF NOT EXISTS idx_writing_items_type ON writing_items(type_id);",
    )?;
    Ok(())
}

fn seed_builtin_content_types(conn: &Connection) -> DomainResult<()> {
    let now = format_timestamp(Utc::now());
    for (position, builtin) in BUILTIN_TYPES.iter().enumerate() {
        conn.execute(
            "INSERT OR IGNORE INTO content_types (id, name, icon, color, is_built_in, sort_order, created_at)
             VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6)",
            params![builtin.id, builtin.name, builtin.icon, builtin.color, position as i32, now],
        )?;
    }
    Ok(())
}

/// Fixed-width RFC 3339 so text ordering matches time ordering
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Read a timestamp column written either by us (RFC 3339) or by a SQLite
/// `CURRENT_TIMESTAMP` default.
pub(crate) fn get_timestamp(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|at| at.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S").map(|naive| naive.and_utc()))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = open_memory_connection().unwrap();
        run_migrations(&conn).unwrap();
        seed_builtin_content_types(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM content_types WHERE is_built_in = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 6);
    }

    #[test]
    fn test_reads_sqlite_default_timestamps() {
        let conn = open_memory_connection().unwrap();
        let at = conn
            .query_row("SELECT '2024-05-06 07:08:09'", [], |row| get_timestamp(row, 0))
            .unwrap();
        assert_eq!(format_timestamp(at), "2024-05-06T07:08:09.000000Z");
    }
}
