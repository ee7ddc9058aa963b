//! Tags, Folders and Content Types
//!
//! Reference data the writing items point at. Only creation and listing are
//! needed to seed a database; the caches never mutate these.

use chrono::Utc;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::domain::{
    ContentType, DomainError, DomainResult, Folder, NewContentType, NewFolder, NewTag, Tag,
};
use super::{format_timestamp, get_timestamp, SqliteGateway};

/// Convert a database row to Tag
pub(super) fn row_to_tag(row: &Row) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        usage_count: row.get(3)?,
        created_at: get_timestamp(row, 4)?,
    })
}

fn row_to_folder(row: &Row) -> rusqlite::Result<Folder> {
    Ok(Folder {
        id: row.get(0)?,
        name: row.get(1)?,
        parent_id: row.get(2)?,
        sort_order: row.get(3)?,
        created_at: get_timestamp(row, 4)?,
    })
}

fn row_to_content_type(row: &Row) -> rusqlite::Result<ContentType> {
    Ok(ContentType {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        color: row.get(3)?,
        is_built_in: row.get(4)?,
        sort_order: row.get(5)?,
        created_at: get_timestamp(row, 6)?,
    })
}

fn require_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation("name must not be empty".to_string()));
    }
    Ok(())
}

impl SqliteGateway {
    pub async fn create_tag(&self, new_tag: &NewTag) -> DomainResult<Tag> {
        require_name(&new_tag.name)?;
        let conn = self.conn.lock().await;

        let tag = Tag {
            id: Uuid::new_v4().to_string(),
            name: new_tag.name.clone(),
            color: new_tag.color.clone(),
            usage_count: 0,
            created_at: Utc::now(),
        };
        conn.execute(
            "INSERT INTO tags (id, name, color, usage_count, created_at) VALUES (?1, ?2, ?3, 0, ?4)",
            params![tag.id, tag.name, tag.color, format_timestamp(tag.created_at)],
        )?;
        Ok(tag)
    }

    pub async fn list_tags(&self) -> DomainResult<Vec<Tag>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, name, color, usage_count, created_at FROM tags ORDER BY name",
        )?;
        let tags = stmt.query_map([], row_to_tag)?.collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    pub async fn create_folder(&self, new_folder: &NewFolder) -> DomainResult<Folder> {
        require_name(&new_folder.name)?;
        let conn = self.conn.lock().await;

        if let Some(parent_id) = &new_folder.parent_id {
            let parent_exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM folders WHERE id = ?1)",
                params![parent_id],
                |row| row.get(0),
            )?;
            if !parent_exists {
                return Err(DomainError::Validation(format!("unknown folder {}", parent_id)));
            }
        }

        let folder = Folder {
            id: Uuid::new_v4().to_string(),
            name: new_folder.name.clone(),
            parent_id: new_folder.parent_id.clone(),
            sort_order: new_folder.sort_order,
            created_at: Utc::now(),
        };
        conn.execute(
            "INSERT INTO folders (id, name, parent_id, sort_order, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![folder.id, folder.name, folder.parent_id, folder.sort_order, format_timestamp(folder.created_at)],
        )?;
        Ok(folder)
    }

    pub async fn list_folders(&self) -> DomainResult<Vec<Folder>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, name, parent_id, sort_order, created_at FROM folders ORDER BY sort_order, name",
        )?;
        let folders = stmt.query_map([], row_to_folder)?.collect::<Result<Vec<_>, _>>()?;
        Ok(folders)
    }

    /// Register a user-defined content type
    pub async fn create_content_type(&self, new_type: &NewContentType) -> DomainResult<ContentType> {
        require_name(&new_type.name)?;
        let conn = self.conn.lock().await;

        let content_type = ContentType {
            id: Uuid::new_v4().to_string(),
            name: new_type.name.clone(),
            icon: new_type.icon.clone(),
            color: new_type.color.clone(),
            is_built_in: new_type.is_built_in,
            sort_order: new_type.sort_order,
            created_at: Utc::now(),
        };
        conn.execute(
            "INSERT INTO content_types (id, name, icon, color, is_built_in, sort_order, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                content_type.id,
                content_type.name,
                content_type.icon,
                content_type.color,
                content_type.is_built_in,
                content_type.sort_order,
                format_timestamp(content_type.created_at),
            ],
        )?;
        Ok(content_type)
    }

    pub async fn list_content_types(&self) -> DomainResult<Vec<ContentType>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, name, icon, color, is_built_in, sort_order, created_at
             FROM content_types ORDER BY sort_order, name",
        )?;
        let types = stmt
            .query_map([], row_to_content_type)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(types)
    }
}

#[async_trait::async_trait]
impl crate::catalog::ContentTypeSource for SqliteGateway {
    async fn list_content_types(&self) -> DomainResult<Vec<ContentType>> {
        SqliteGateway::list_content_types(self).await
    }
}
