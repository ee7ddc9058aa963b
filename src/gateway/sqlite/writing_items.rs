//! Writing Item Operations
//!
//! SQLite-backed [`WritingItemGateway`] implementation. Tag links are
//! replaced wholesale on update and usage counters are recomputed after
//! every link change.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, NewWritingItem, Tag, WritingItem, WritingItemWithTags};
use crate::gateway::traits::WritingItemGateway;
use super::library::row_to_tag;
use super::{format_timestamp, get_timestamp, SqliteGateway};

const ITEM_COLUMNS: &str = "id, title, type_id, content, created_time, is_precise_time, \
                            background, notes, folder_id, created_at, updated_at";

/// Convert a database row to WritingItem
fn row_to_item(row: &Row) -> rusqlite::Result<WritingItem> {
    Ok(WritingItem {
        id: row.get(0)?,
        title: row.get(1)?,
        type_id: row.get(2)?,
        content: row.get(3)?,
        created_time: row.get(4)?,
        is_precise_time: row.get(5)?,
        background: row.get(6)?,
        notes: row.get(7)?,
        folder_id: row.get(8)?,
        created_at: get_timestamp(row, 9)?,
        updated_at: get_timestamp(row, 10)?,
    })
}

fn tags_for_item(conn: &Connection, item_id: &str) -> DomainResult<Vec<Tag>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.name, t.color, t.usage_count, t.created_at FROM tags t
         JOIN writing_item_tags wit ON t.id = wit.tag_id
         WHERE wit.writing_item_id = ?1
         ORDER BY t.name",
    )?;
    let tags = stmt
        .query_map(params![item_id], row_to_tag)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}

fn with_tags(conn: &Connection, item: WritingItem) -> DomainResult<WritingItemWithTags> {
    let tags = tags_for_item(conn, &item.id)?;
    Ok(WritingItemWithTags { item, tags })
}

fn exists(conn: &Connection, sql: &str, id: &str) -> DomainResult<bool> {
    Ok(conn.query_row(sql, params![id], |row| row.get(0))?)
}

/// Reject payloads the schema would refuse, with a readable message
fn validate(conn: &Connection, payload: &NewWritingItem) -> DomainResult<()> {
    if payload.title.trim().is_empty() {
        return Err(DomainError::Validation("title must not be empty".to_string()));
    }
    if !exists(conn, "SELECT EXISTS(SELECT 1 FROM content_types WHERE id = ?1)", &payload.type_id)? {
        return Err(DomainError::Validation(format!("unknown content type {}", payload.type_id)));
    }
    if let Some(folder_id) = &payload.folder_id {
        if !exists(conn, "SELECT EXISTS(SELECT 1 FROM folders WHERE id = ?1)", folder_id)? {
            return Err(DomainError::Validation(format!("unknown folder {}", folder_id)));
        }
    }
    for tag_id in &payload.tag_ids {
        if !exists(conn, "SELECT EXISTS(SELECT 1 FROM tags WHERE id = ?1)", tag_id)? {
            return Err(DomainError::Validation(format!("unknown tag {}", tag_id)));
        }
    }
    Ok(())
}

fn insert_tag_links(conn: &Connection, item_id: &str, tag_ids: &[String]) -> DomainResult<()> {
    for tag_id in tag_ids {
        conn.execute(
            "INSERT OR IGNORE INTO writing_item_tags (writing_item_id, tag_id) VALUES (?1, ?2)",
            params![item_id, tag_id],
        )?;
    }
    Ok(())
}

pub(super) fn refresh_usage_counts(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "UPDATE tags SET usage_count =
            (SELECT COUNT(*) FROM writing_item_tags wit WHERE wit.tag_id = tags.id)",
        [],
    )?;
    Ok(())
}

#[async_trait]
impl WritingItemGateway for SqliteGateway {
    async fn list_writing_items(&self) -> DomainResult<Vec<WritingItemWithTags>> {
        let conn = self.conn.lock().await;

        let sql = format!(
            "SELECT {} FROM writing_items ORDER BY created_at DESC, rowid DESC",
            ITEM_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map([], row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;

        items.into_iter().map(|item| with_tags(&conn, item)).collect()
    }

    async fn get_writing_item(&self, id: &str) -> DomainResult<Option<WritingItemWithTags>> {
        let conn = self.conn.lock().await;

        let sql = format!("SELECT {} FROM writing_items WHERE id = ?1", ITEM_COLUMNS);
        let item = conn.query_row(&sql, params![id], row_to_item).optional()?;

        item.map(|item| with_tags(&conn, item)).transpose()
    }

    async fn create_writing_item(&self, new_item: &NewWritingItem) -> DomainResult<String> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        validate(&tx, new_item)?;

        let id = Uuid::new_v4().to_string();
        let now = format_timestamp(Utc::now());
        tx.execute(
            "INSERT INTO writing_items
             (id, title, type_id, content, created_time, is_precise_time, background, notes, folder_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
            params![
                id,
                new_item.title,
                new_item.type_id,
                new_item.content,
                new_item.created_time,
                new_item.is_precise_time,
                new_item.background,
                new_item.notes,
                new_item.folder_id,
                now,
            ],
        )?;
        insert_tag_links(&tx, &id, &new_item.tag_ids)?;
        refresh_usage_counts(&tx)?;
        tx.commit()?;

        tracing::debug!(%id, "writing item created");
        Ok(id)
    }

    async fn update_writing_item(&self, id: &str, updates: &NewWritingItem) -> DomainResult<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        validate(&tx, updates)?;

        let now = format_timestamp(Utc::now());
        let changed = tx.execute(
            "UPDATE writing_items
             SET title = ?1, type_id = ?2, content = ?3, created_time = ?4, is_precise_time = ?5,
                 background = ?6, notes = ?7, folder_id = ?8, updated_at = MAX(created_at, ?9)
             WHERE id = ?10",
            params![
                updates.title,
                updates.type_id,
                updates.content,
                updates.created_time,
                updates.is_precise_time,
                updates.background,
                updates.notes,
                updates.folder_id,
                now,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("writing item {}", id)));
        }

        tx.execute("DELETE FROM writing_item_tags WHERE writing_item_id = ?1", params![id])?;
        insert_tag_links(&tx, id, &updates.tag_ids)?;
        refresh_usage_counts(&tx)?;
        tx.commit()?;

        tracing::debug!(%id, "writing item updated");
        Ok(())
    }

    async fn delete_writing_item(&self, id: &str) -> DomainResult<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        let changed = tx.execute("DELETE FROM writing_items WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("writing item {}", id)));
        }
        refresh_usage_counts(&tx)?;
        tx.commit()?;

        tracing::debug!(%id, "writing item deleted");
        Ok(())
    }
}
