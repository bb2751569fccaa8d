// ABOUTME: Tag storage layer using SQLite
// ABOUTME: Handles CRUD operations for tags with slug derivation and uniqueness mapping

use chrono::{DateTime, Utc};
use quill_core::constants::{TAG_NAME_MAX_LEN, TAG_SLUG_MAX_LEN};
use quill_storage::{unique_violation_column, StorageError, StorageResult};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::types::{Tag, TagCreateInput, TagUpdateInput};

pub struct TagStorage {
    pool: SqlitePool,
}

impl TagStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all tags ordered by name
    pub async fn list_tags(&self) -> StorageResult<Vec<Tag>> {
        debug!("Fetching tags");

        let rows = sqlx::query("SELECT * FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_tag).collect()
    }

    /// Get a single tag by ID
    pub async fn get_tag(&self, tag_id: &str) -> StorageResult<Tag> {
        debug!("Fetching tag: {}", tag_id);

        let row = sqlx::query("SELECT * FROM tags WHERE id = ?")
            .bind(tag_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        row_to_tag(&row)
    }

    /// Get a tag by slug
    pub async fn get_tag_by_slug(&self, slug: &str) -> StorageResult<Option<Tag>> {
        debug!("Fetching tag by slug: {}", slug);

        let row = sqlx::query("SELECT * FROM tags WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_tag).transpose()
    }

    /// Create a new tag, deriving its slug from the name when none is given
    pub async fn create_tag(&self, input: TagCreateInput, now: DateTime<Utc>) -> StorageResult<Tag> {
        quill_core::check_not_empty("name", &input.name)?;
        quill_core::check_length("name", &input.name, TAG_NAME_MAX_LEN)?;
        let slug = quill_core::resolve_slug(input.slug.as_deref(), &input.name, TAG_SLUG_MAX_LEN)?;

        self.ensure_name_free(&input.name, None).await?;

        let tag_id = quill_core::generate_id("tag");
        debug!("Creating tag: {} (name: {}, slug: {})", tag_id, input.name, slug);

        let result = sqlx::query("INSERT INTO tags (id, name, slug, created_at) VALUES (?, ?, ?, ?)")
            .bind(&tag_id)
            .bind(&input.name)
            .bind(&slug)
            .bind(now)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => self.get_tag(&tag_id).await,
            Err(e) => Err(map_write_error(e, &input.name, &slug)),
        }
    }

    /// Update a tag. The slug only changes when one is supplied.
    pub async fn update_tag(&self, tag_id: &str, input: TagUpdateInput) -> StorageResult<Tag> {
        debug!("Updating tag: {}", tag_id);

        let existing = self.get_tag(tag_id).await?;

        let name = input.name.unwrap_or(existing.name);
        quill_core::check_not_empty("name", &name)?;
        quill_core::check_length("name", &name, TAG_NAME_MAX_LEN)?;

        let slug = match input.slug.as_deref() {
            None => existing.slug,
            Some(explicit) => quill_core::resolve_slug(Some(explicit), &name, TAG_SLUG_MAX_LEN)?,
        };

        self.ensure_name_free(&name, Some(tag_id)).await?;

        let result = sqlx::query("UPDATE tags SET name = ?, slug = ? WHERE id = ?")
            .bind(&name)
            .bind(&slug)
            .bind(tag_id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => self.get_tag(tag_id).await,
            Err(e) => Err(map_write_error(e, &name, &slug)),
        }
    }

    /// A taken name wins over a taken slug, since the slug usually follows from it
    async fn ensure_name_free(&self, name: &str, except_id: Option<&str>) -> StorageResult<()> {
        let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE name = ? AND id IS NOT ?")
            .bind(name)
            .bind(except_id)
            .fetch_one(&self.pool)
            .await?;

        if taken > 0 {
            return Err(StorageError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    /// Delete a tag, detaching it from every post that carried it
    pub async fn delete_tag(&self, tag_id: &str) -> StorageResult<()> {
        debug!("Deleting tag: {}", tag_id);

        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(tag_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

/// Convert a database row to a Tag
pub fn row_to_tag(row: &sqlx::sqlite::SqliteRow) -> StorageResult<Tag> {
    Ok(Tag {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
        created_at: row.try_get("created_at")?,
    })
}

fn map_write_error(err: sqlx::Error, name: &str, slug: &str) -> StorageError {
    let duplicate = match unique_violation_column(&err) {
        Some("tags.name") => Some(StorageError::DuplicateName(name.to_string())),
        Some("tags.slug") => Some(StorageError::DuplicateSlug(slug.to_string())),
        _ => None,
    };
    duplicate.unwrap_or(StorageError::Sqlx(err))
}
