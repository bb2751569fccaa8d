// ABOUTME: Author records mirrored from the identity provider
// ABOUTME: Posts reference authors weakly; deleting an author unattributes their posts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::{unique_violation_column, StorageError, StorageResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorCreateInput {
    pub username: String,
    pub display_name: Option<String>,
}

pub struct AuthorStorage {
    pool: SqlitePool,
}

impl AuthorStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a single author by ID
    pub async fn get_author(&self, author_id: &str) -> StorageResult<Author> {
        debug!("Fetching author: {}", author_id);

        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        row_to_author(&row)
    }

    /// Register a new author
    pub async fn create_author(
        &self,
        input: AuthorCreateInput,
        now: DateTime<Utc>,
    ) -> StorageResult<Author> {
        quill_core::check_not_empty("username", &input.username)?;

        let author_id = quill_core::generate_id("user");
        debug!("Creating author: {} (username: {})", author_id, input.username);

        let result = sqlx::query(
            "INSERT INTO users (id, username, display_name, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&author_id)
        .bind(&input.username)
        .bind(&input.display_name)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => self.get_author(&author_id).await,
            Err(e) if unique_violation_column(&e).is_some() => {
                Err(StorageError::DuplicateName(input.username))
            }
            Err(e) => Err(StorageError::Sqlx(e)),
        }
    }

    /// Remove an author; their posts survive without attribution
    pub async fn delete_author(&self, author_id: &str) -> StorageResult<()> {
        debug!("Deleting author: {}", author_id);

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(author_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

fn row_to_author(row: &sqlx::sqlite::SqliteRow) -> StorageResult<Author> {
    Ok(Author {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        display_name: row.try_get("display_name")?,
        created_at: row.try_get("created_at")?,
    })
}
