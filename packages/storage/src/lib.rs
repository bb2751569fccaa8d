// ABOUTME: Data layer and persistence for Quill
// ABOUTME: Storage errors, SQLite pool setup, migrations, and author records

use thiserror::Error;

pub mod authors;
pub mod db;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use authors::{Author, AuthorCreateInput, AuthorStorage};
pub use db::{connect, run_migrations, MIGRATOR};

pub use quill_core::ValidationError;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Not found")]
    NotFound,
    #[error("Duplicate name: {0}")]
    DuplicateName(String),
    #[error("Duplicate slug: {0}")]
    DuplicateSlug(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Column named by a SQLite UNIQUE violation, e.g. `tags.slug`
pub fn unique_violation_column(err: &sqlx::Error) -> Option<&str> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };

    // SQLITE_CONSTRAINT_UNIQUE / SQLITE_CONSTRAINT_PRIMARYKEY
    let is_unique = db_err.is_unique_violation()
        || matches!(db_err.code().as_deref(), Some("2067") | Some("1555"));
    if !is_unique {
        return None;
    }

    // "UNIQUE constraint failed: tags.slug"
    db_err
        .message()
        .rsplit_once(": ")
        .map(|(_, column)| column.trim())
}
