// ABOUTME: Post storage layer using SQLite
// ABOUTME: Saves posts with derived fields and tag relations, and serves the published read views

use chrono::{DateTime, Utc};
use quill_core::constants::{
    POST_EXCERPT_MAX_LEN, POST_SLUG_MAX_LEN, POST_TITLE_MAX_LEN, YOUTUBE_URL_MAX_LEN,
};
use quill_core::ValidationError;
use quill_storage::{unique_violation_column, StorageError, StorageResult};
use quill_tags::storage::row_to_tag;
use quill_tags::Tag;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use super::types::{
    Post, PostCreateInput, PostDetail, PostFilter, PostListing, PostStatus, PostUpdateInput,
};

/// Maximum number of related posts returned with a detail view
pub const RELATED_POSTS_LIMIT: i64 = 4;

const POST_ORDER: &str = " ORDER BY p.pub_date DESC, p.created_at DESC, p.id DESC";

pub struct PostStorage {
    pub(crate) pool: SqlitePool,
}

impl PostStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a single post by ID, whatever its status
    pub async fn get_post(&self, post_id: &str) -> StorageResult<Post> {
        debug!("Fetching post: {}", post_id);

        let row = sqlx::query("SELECT * FROM posts WHERE id = ?")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        self.hydrate(&row).await
    }

    /// Get a post by slug, whatever its status
    pub async fn get_post_by_slug(&self, slug: &str) -> StorageResult<Option<Post>> {
        debug!("Fetching post by slug: {}", slug);

        let row = sqlx::query("SELECT * FROM posts WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some(self.hydrate(&r).await?)),
            None => Ok(None),
        }
    }

    /// List posts newest first, narrowed by the given filter
    pub async fn list_posts(&self, filter: &PostFilter) -> StorageResult<Vec<Post>> {
        debug!("Fetching posts ({:?})", filter);

        let mut query = QueryBuilder::<Sqlite>::new("SELECT p.* FROM posts p WHERE 1 = 1");

        if let Some(status) = filter.status {
            query.push(" AND p.status = ").push_bind(status);
        }
        if let Some(author_id) = &filter.author_id {
            query.push(" AND p.author_id = ").push_bind(author_id.clone());
        }
        if let Some(tag) = &filter.tag {
            query
                .push(
                    " AND EXISTS (SELECT 1 FROM post_tags pt JOIN tags t ON t.id = pt.tag_id \
                     WHERE pt.post_id = p.id AND t.slug = ",
                )
                .push_bind(tag.clone())
                .push(")");
        }
        if let Some(after) = filter.published_after {
            query.push(" AND p.pub_date >= ").push_bind(after);
        }
        if let Some(before) = filter.published_before {
            query.push(" AND p.pub_date < ").push_bind(before);
        }
        query.push(POST_ORDER);

        let rows = query.build().fetch_all(&self.pool).await?;
        self.hydrate_all(&rows).await
    }

    /// Create a post. `now` stamps the record and is the default publish date.
    pub async fn create_post(
        &self,
        input: PostCreateInput,
        now: DateTime<Utc>,
    ) -> StorageResult<Post> {
        validate_fields(&input.title, &input.excerpt, input.youtube_url.as_deref())?;
        let slug =
            quill_core::resolve_slug(input.slug.as_deref(), &input.title, POST_SLUG_MAX_LEN)?;
        let reading_time = quill_core::reading_time(&input.content);
        let author_id = input.author_id.filter(|a| !a.is_empty());
        let youtube_url = input.youtube_url.filter(|u| !u.is_empty());
        let pub_date = input.pub_date.unwrap_or(now);

        let post_id = quill_core::generate_id("post");
        debug!("Creating post: {} (slug: {})", post_id, slug);

        let mut tx = self.pool.begin().await?;

        if let Some(author_id) = &author_id {
            ensure_exists(&mut tx, "users", "author", author_id).await?;
        }
        for tag_id in &input.tag_ids {
            ensure_exists(&mut tx, "tags", "tag", tag_id).await?;
        }

        sqlx::query(
            r#"
            INSERT INTO posts (
                id, title, slug, author_id, lead, excerpt, content, closing,
                youtube_url, status, is_featured, reading_time, pub_date, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&post_id)
        .bind(&input.title)
        .bind(&slug)
        .bind(&author_id)
        .bind(&input.lead)
        .bind(&input.excerpt)
        .bind(&input.content)
        .bind(&input.closing)
        .bind(&youtube_url)
        .bind(input.status)
        .bind(input.is_featured)
        .bind(reading_time)
        .bind(pub_date)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, &slug))?;

        replace_tags(&mut tx, &post_id, &input.tag_ids).await?;

        tx.commit().await?;

        self.get_post(&post_id).await
    }

    /// Update a post. Reading time is recomputed on every save; the slug only
    /// changes when one is supplied.
    pub async fn update_post(
        &self,
        post_id: &str,
        input: PostUpdateInput,
        now: DateTime<Utc>,
    ) -> StorageResult<Post> {
        debug!("Updating post: {}", post_id);

        let existing = self.get_post(post_id).await?;

        let title = input.title.unwrap_or(existing.title);
        let excerpt = input.excerpt.unwrap_or(existing.excerpt);
        let youtube_url = match input.youtube_url {
            None => existing.youtube_url,
            Some(url) if url.is_empty() => None,
            Some(url) => Some(url),
        };
        validate_fields(&title, &excerpt, youtube_url.as_deref())?;

        let slug = match input.slug.as_deref() {
            None => existing.slug,
            Some(explicit) => {
                quill_core::resolve_slug(Some(explicit), &title, POST_SLUG_MAX_LEN)?
            }
        };
        let author_id = match input.author_id {
            None => existing.author_id,
            Some(id) if id.is_empty() => None,
            Some(id) => Some(id),
        };
        let lead = input.lead.unwrap_or(existing.lead);
        let content = input.content.unwrap_or(existing.content);
        let closing = input.closing.unwrap_or(existing.closing);
        let status = input.status.unwrap_or(existing.status);
        let is_featured = input.is_featured.unwrap_or(existing.is_featured);
        let pub_date = input.pub_date.unwrap_or(existing.pub_date);
        let reading_time = quill_core::reading_time(&content);

        let mut tx = self.pool.begin().await?;

        if let Some(author_id) = &author_id {
            ensure_exists(&mut tx, "users", "author", author_id).await?;
        }
        if let Some(tag_ids) = &input.tag_ids {
            for tag_id in tag_ids {
                ensure_exists(&mut tx, "tags", "tag", tag_id).await?;
            }
        }

        sqlx::query(
            r#"
            UPDATE posts SET
                title = ?, slug = ?, author_id = ?, lead = ?, excerpt = ?, content = ?,
                closing = ?, youtube_url = ?, status = ?, is_featured = ?, reading_time = ?,
                pub_date = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&title)
        .bind(&slug)
        .bind(&author_id)
        .bind(&lead)
        .bind(&excerpt)
        .bind(&content)
        .bind(&closing)
        .bind(&youtube_url)
        .bind(status)
        .bind(is_featured)
        .bind(reading_time)
        .bind(pub_date)
        .bind(now)
        .bind(post_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, &slug))?;

        if let Some(tag_ids) = &input.tag_ids {
            sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
                .bind(post_id)
                .execute(&mut *tx)
                .await?;
            replace_tags(&mut tx, post_id, tag_ids).await?;
        }

        tx.commit().await?;

        self.get_post(post_id).await
    }

    /// Delete a post together with its images and tag links
    pub async fn delete_post(&self, post_id: &str) -> StorageResult<()> {
        debug!("Deleting post: {}", post_id);

        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    /// Published posts, newest first
    pub async fn published_posts(&self) -> StorageResult<Vec<Post>> {
        self.list_posts(&PostFilter {
            status: Some(PostStatus::Published),
            ..Default::default()
        })
        .await
    }

    /// Public listing view. An empty blog is not an error.
    pub async fn listing(&self) -> StorageResult<PostListing> {
        let mut posts = self.published_posts().await?;
        let latest = if posts.is_empty() {
            None
        } else {
            Some(posts.remove(0))
        };

        Ok(PostListing { latest, posts })
    }

    /// Public detail view: the published post with `slug` and its related posts.
    /// Drafts are never resolvable here.
    pub async fn published_detail(&self, slug: &str) -> StorageResult<PostDetail> {
        debug!("Fetching published post: {}", slug);

        let row = sqlx::query("SELECT * FROM posts WHERE slug = ? AND status = ?")
            .bind(slug)
            .bind(PostStatus::Published)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        let post = self.hydrate(&row).await?;
        let related = self.related_posts(&post).await?;

        Ok(PostDetail { post, related })
    }

    /// Other published posts sharing at least one tag with `post`, newest
    /// first, at most [`RELATED_POSTS_LIMIT`]. `post` itself is always excluded.
    pub async fn related_posts(&self, post: &Post) -> StorageResult<Vec<Post>> {
        if post.tags.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Fetching posts related to: {}", post.id);

        let query = format!(
            r#"
            SELECT p.* FROM posts p
            WHERE p.status = ?
              AND p.id != ?
              AND EXISTS (
                  SELECT 1 FROM post_tags pt
                  WHERE pt.post_id = p.id
                    AND pt.tag_id IN (SELECT tag_id FROM post_tags WHERE post_id = ?)
              )
            {} LIMIT ?
            "#,
            POST_ORDER
        );

        let rows = sqlx::query(&query)
            .bind(PostStatus::Published)
            .bind(&post.id)
            .bind(&post.id)
            .bind(RELATED_POSTS_LIMIT)
            .fetch_all(&self.pool)
            .await?;

        self.hydrate_all(&rows).await
    }

    /// Published posts carrying the tag with `tag_slug`, newest first
    pub async fn published_by_tag(&self, tag_slug: &str) -> StorageResult<Vec<Post>> {
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE slug = ?")
            .bind(tag_slug)
            .fetch_one(&self.pool)
            .await?;
        if exists == 0 {
            return Err(StorageError::NotFound);
        }

        self.list_posts(&PostFilter {
            status: Some(PostStatus::Published),
            tag: Some(tag_slug.to_string()),
            ..Default::default()
        })
        .await
    }

    async fn hydrate_all(&self, rows: &[SqliteRow]) -> StorageResult<Vec<Post>> {
        let mut posts = Vec::with_capacity(rows.len());
        for row in rows {
            posts.push(self.hydrate(row).await?);
        }
        Ok(posts)
    }

    /// Convert a posts row into a Post with its tags and images loaded
    async fn hydrate(&self, row: &SqliteRow) -> StorageResult<Post> {
        let id: String = row.try_get("id")?;
        let tags = self.tags_for_post(&id).await?;
        let images = self.list_images(&id).await?;

        Ok(Post {
            title: row.try_get("title")?,
            slug: row.try_get("slug")?,
            author_id: row.try_get("author_id")?,
            lead: row.try_get("lead")?,
            excerpt: row.try_get("excerpt")?,
            content: row.try_get("content")?,
            closing: row.try_get("closing")?,
            tags,
            images,
            youtube_url: row.try_get("youtube_url")?,
            status: row.try_get("status")?,
            is_featured: row.try_get("is_featured")?,
            reading_time: row.try_get("reading_time")?,
            pub_date: row.try_get("pub_date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            id,
        })
    }

    async fn tags_for_post(&self, post_id: &str) -> StorageResult<Vec<Tag>> {
        let rows = sqlx::query(
            r#"
            SELECT t.* FROM tags t
            JOIN post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_tag).collect()
    }
}

fn validate_fields(
    title: &str,
    excerpt: &str,
    youtube_url: Option<&str>,
) -> Result<(), ValidationError> {
    quill_core::check_not_empty("title", title)?;
    quill_core::check_length("title", title, POST_TITLE_MAX_LEN)?;
    quill_core::check_length("excerpt", excerpt, POST_EXCERPT_MAX_LEN)?;
    if let Some(url) = youtube_url {
        quill_core::check_length("youtube_url", url, YOUTUBE_URL_MAX_LEN)?;
    }
    Ok(())
}

/// Fail with a validation error unless `id` exists in `table`
async fn ensure_exists(
    conn: &mut SqliteConnection,
    table: &'static str,
    field: &'static str,
    id: &str,
) -> StorageResult<()> {
    let query = format!("SELECT COUNT(*) FROM {} WHERE id = ?", table);
    let count: i64 = sqlx::query_scalar(&query)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    if count == 0 {
        return Err(ValidationError::UnknownReference {
            field,
            id: id.to_string(),
        }
        .into());
    }
    Ok(())
}

async fn replace_tags(
    conn: &mut SqliteConnection,
    post_id: &str,
    tag_ids: &[String],
) -> StorageResult<()> {
    for tag_id in tag_ids {
        sqlx::query("INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

fn map_write_error(err: sqlx::Error, slug: &str) -> StorageError {
    let duplicate = match unique_violation_column(&err) {
        Some("posts.slug") => Some(StorageError::DuplicateSlug(slug.to_string())),
        _ => None,
    };
    duplicate.unwrap_or(StorageError::Sqlx(err))
}
