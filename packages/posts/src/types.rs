// ABOUTME: Post type definitions
// ABOUTME: Posts, their images, write inputs, filters, and read-view shapes

use std::fmt;

use chrono::{DateTime, Utc};
use quill_tags::Tag;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub author_id: Option<String>,

    // Body sections
    pub lead: String,
    pub excerpt: String,
    pub content: String,
    pub closing: String,

    /// Sorted by name
    pub tags: Vec<Tag>,
    pub images: Vec<PostImage>,
    pub youtube_url: Option<String>,

    pub status: PostStatus,
    pub is_featured: bool,
    /// Minutes, recomputed from `content` on every save
    pub reading_time: i64,

    pub pub_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Public URL of the post detail view
    pub fn absolute_url(&self) -> String {
        format!("/posts/{}/", self.slug)
    }

    pub fn youtube_video_id(&self) -> Option<&str> {
        self.youtube_url.as_deref().and_then(quill_core::youtube_video_id)
    }

    /// Player markup, empty when the post has no recognisable video
    pub fn youtube_embed(&self) -> String {
        quill_core::youtube_embed(self.youtube_url.as_deref())
    }

    /// Tag names joined for list displays, e.g. `"Go, Rust"`
    pub fn tag_list(&self) -> String {
        self.tags
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostImage {
    pub id: String,
    pub post_id: String,
    /// `post_images/<YYYY>/<MM>/<DD>/<filename>` within the asset store
    pub image_path: String,
    pub created_at: DateTime<Utc>,
}

impl PostImage {
    pub fn label(&self, post_title: &str) -> String {
        format!("Image in {}", post_title)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostCreateInput {
    pub title: String,
    /// Derived from `title` when absent or empty
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub lead: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub closing: String,
    #[serde(default)]
    pub tag_ids: Vec<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub is_featured: bool,
    /// Defaults to the creation time
    #[serde(default)]
    pub pub_date: Option<DateTime<Utc>>,
}

/// Partial update. `None` leaves a field untouched.
///
/// For `author_id` and `youtube_url` an empty string clears the value; for
/// `slug` an empty string re-derives it from the title.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostUpdateInput {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub author_id: Option<String>,
    pub lead: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub closing: Option<String>,
    /// Replaces the whole tag set
    pub tag_ids: Option<Vec<String>>,
    pub youtube_url: Option<String>,
    pub status: Option<PostStatus>,
    pub is_featured: Option<bool>,
    pub pub_date: Option<DateTime<Utc>>,
}

/// Authoring list filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostFilter {
    pub status: Option<PostStatus>,
    pub author_id: Option<String>,
    /// Tag slug
    pub tag: Option<String>,
    /// Inclusive lower bound on `pub_date`
    pub published_after: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `pub_date`
    pub published_before: Option<DateTime<Utc>>,
}

/// Public listing: newest published post on its own, the rest after it
#[derive(Debug, Clone, Serialize)]
pub struct PostListing {
    pub latest: Option<Post>,
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub related: Vec<Post>,
}
