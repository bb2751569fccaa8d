// ABOUTME: HTTP request handlers for post authoring
// ABOUTME: Post CRUD with list filters, plus image attachment

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use chrono::Utc;
use quill_posts::{PostCreateInput, PostFilter, PostUpdateInput};
use serde::Deserialize;
use tracing::info;

use crate::extract::{ApiJson, ApiQuery};
use crate::response::{ApiError, ApiResponse};
use crate::state::DbState;

/// List posts of any status, filterable by `status`, `author_id` and `tag`
pub async fn list_posts(
    State(db): State<DbState>,
    ApiQuery(filter): ApiQuery<PostFilter>,
) -> impl IntoResponse {
    info!("Listing posts ({:?})", filter);

    match db.post_storage.list_posts(&filter).await {
        Ok(posts) => (StatusCode::OK, ResponseJson(ApiResponse::success(posts))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn get_post(
    State(db): State<DbState>,
    Path(post_id): Path<String>,
) -> impl IntoResponse {
    info!("Getting post: {}", post_id);

    match db.post_storage.get_post(&post_id).await {
        Ok(post) => (StatusCode::OK, ResponseJson(ApiResponse::success(post))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn create_post(
    State(db): State<DbState>,
    ApiJson(input): ApiJson<PostCreateInput>,
) -> impl IntoResponse {
    info!("Creating post: {}", input.title);

    match db.post_storage.create_post(input, Utc::now()).await {
        Ok(post) => (StatusCode::CREATED, ResponseJson(ApiResponse::success(post))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn update_post(
    State(db): State<DbState>,
    Path(post_id): Path<String>,
    ApiJson(input): ApiJson<PostUpdateInput>,
) -> impl IntoResponse {
    info!("Updating post: {}", post_id);

    match db.post_storage.update_post(&post_id, input, Utc::now()).await {
        Ok(post) => (StatusCode::OK, ResponseJson(ApiResponse::success(post))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Delete a post along with its images
pub async fn delete_post(
    State(db): State<DbState>,
    Path(post_id): Path<String>,
) -> impl IntoResponse {
    info!("Deleting post: {}", post_id);

    match db.post_storage.delete_post(&post_id).await {
        Ok(_) => (
            StatusCode::OK,
            ResponseJson(ApiResponse::success("Post deleted successfully")),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn list_images(
    State(db): State<DbState>,
    Path(post_id): Path<String>,
) -> impl IntoResponse {
    match db.post_storage.list_images(&post_id).await {
        Ok(images) => (StatusCode::OK, ResponseJson(ApiResponse::success(images))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Request body for attaching an image; the upload itself happens elsewhere
#[derive(Deserialize)]
pub struct AddImageRequest {
    pub filename: String,
}

pub async fn add_image(
    State(db): State<DbState>,
    Path(post_id): Path<String>,
    ApiJson(request): ApiJson<AddImageRequest>,
) -> impl IntoResponse {
    info!("Adding image to post {}: {}", post_id, request.filename);

    match db
        .post_storage
        .add_image(&post_id, &request.filename, Utc::now())
        .await
    {
        Ok(image) => {
            (StatusCode::CREATED, ResponseJson(ApiResponse::success(image))).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn delete_image(
    State(db): State<DbState>,
    Path(image_id): Path<String>,
) -> impl IntoResponse {
    info!("Deleting image: {}", image_id);

    match db.post_storage.delete_image(&image_id).await {
        Ok(_) => (
            StatusCode::OK,
            ResponseJson(ApiResponse::success("Image deleted successfully")),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
