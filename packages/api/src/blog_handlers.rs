// ABOUTME: HTTP request handlers for the public blog views
// ABOUTME: Published post listing, post detail with related posts, and posts by tag

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use quill_posts::Post;
use serde::Serialize;
use tracing::info;

use crate::response::{ApiError, ApiResponse};
use crate::state::DbState;

/// Detail view payload
#[derive(Serialize)]
pub struct PostDetailResponse {
    pub post: Post,
    /// Player markup for the post's video, empty when it has none
    pub youtube_embed: String,
    pub related: Vec<Post>,
}

/// Published posts: the newest as `latest`, the rest in `posts`
pub async fn post_list(State(db): State<DbState>) -> impl IntoResponse {
    info!("Listing published posts");

    match db.post_storage.listing().await {
        Ok(listing) => (StatusCode::OK, ResponseJson(ApiResponse::success(listing))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// A published post by slug, with related posts. Drafts answer 404.
pub async fn post_detail(
    State(db): State<DbState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    info!("Getting published post: {}", slug);

    match db.post_storage.published_detail(&slug).await {
        Ok(detail) => {
            let body = PostDetailResponse {
                youtube_embed: detail.post.youtube_embed(),
                post: detail.post,
                related: detail.related,
            };
            (StatusCode::OK, ResponseJson(ApiResponse::success(body))).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Published posts carrying a tag
pub async fn tag_posts(
    State(db): State<DbState>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    info!("Listing published posts for tag: {}", slug);

    match db.post_storage.published_by_tag(&slug).await {
        Ok(posts) => (StatusCode::OK, ResponseJson(ApiResponse::success(posts))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
