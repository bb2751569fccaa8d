// ABOUTME: Post image records
// ABOUTME: Date-partitioned asset references owned by a single post

use chrono::{DateTime, Utc};
use quill_storage::{StorageError, StorageResult};
use sqlx::Row;
use tracing::debug;

use super::storage::PostStorage;
use super::types::PostImage;

impl PostStorage {
    /// Attach an image to a post. Only the reference is recorded; the bytes
    /// live in the external asset store under the returned `image_path`.
    pub async fn add_image(
        &self,
        post_id: &str,
        filename: &str,
        now: DateTime<Utc>,
    ) -> StorageResult<PostImage> {
        let image_path = quill_core::image_upload_path(filename, now)?;

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE id = ?")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;
        if exists == 0 {
            return Err(StorageError::NotFound);
        }

        let image_id = quill_core::generate_id("img");
        debug!("Adding image {} to post {}: {}", image_id, post_id, image_path);

        sqlx::query(
            "INSERT INTO post_images (id, post_id, image_path, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&image_id)
        .bind(post_id)
        .bind(&image_path)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(PostImage {
            id: image_id,
            post_id: post_id.to_string(),
            image_path,
            created_at: now,
        })
    }

    /// Images of a post in the order they were added
    pub async fn list_images(&self, post_id: &str) -> StorageResult<Vec<PostImage>> {
        let rows = sqlx::query(
            "SELECT * FROM post_images WHERE post_id = ? ORDER BY created_at, rowid",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_image).collect()
    }

    pub async fn delete_image(&self, image_id: &str) -> StorageResult<()> {
        debug!("Deleting image: {}", image_id);

        let result = sqlx::query("DELETE FROM post_images WHERE id = ?")
            .bind(image_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

pub(crate) fn row_to_image(row: &sqlx::sqlite::SqliteRow) -> StorageResult<PostImage> {
    Ok(PostImage {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        image_path: row.try_get("image_path")?,
        created_at: row.try_get("created_at")?,
    })
}
