// ABOUTME: Shared database state for API handlers
// ABOUTME: One storage handle per registry, all over the same SQLite pool

use std::sync::Arc;

use quill_posts::PostStorage;
use quill_storage::AuthorStorage;
use quill_tags::TagStorage;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub tag_storage: Arc<TagStorage>,
    pub post_storage: Arc<PostStorage>,
    pub author_storage: Arc<AuthorStorage>,
}

impl DbState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            tag_storage: Arc::new(TagStorage::new(pool.clone())),
            post_storage: Arc::new(PostStorage::new(pool.clone())),
            author_storage: Arc::new(AuthorStorage::new(pool.clone())),
            pool,
        }
    }
}
