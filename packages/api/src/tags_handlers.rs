// ABOUTME: HTTP request handlers for tag operations
// ABOUTME: Handles CRUD operations for tags with database integration

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use chrono::Utc;
use quill_tags::{TagCreateInput, TagUpdateInput};
use serde::Deserialize;
use tracing::info;

use crate::extract::ApiJson;
use crate::response::{ApiError, ApiResponse};
use crate::state::DbState;

/// List all tags
pub async fn list_tags(State(db): State<DbState>) -> impl IntoResponse {
    info!("Listing tags");

    match db.tag_storage.list_tags().await {
        Ok(tags) => (StatusCode::OK, ResponseJson(ApiResponse::success(tags))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Get a single tag by ID
pub async fn get_tag(
    State(db): State<DbState>,
    Path(tag_id): Path<String>,
) -> impl IntoResponse {
    info!("Getting tag: {}", tag_id);

    match db.tag_storage.get_tag(&tag_id).await {
        Ok(tag) => (StatusCode::OK, ResponseJson(ApiResponse::success(tag))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Request body for creating a tag
#[derive(Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    pub slug: Option<String>,
}

/// Create a new tag
pub async fn create_tag(
    State(db): State<DbState>,
    ApiJson(request): ApiJson<CreateTagRequest>,
) -> impl IntoResponse {
    info!("Creating tag: {}", request.name);

    let input = TagCreateInput {
        name: request.name,
        slug: request.slug,
    };

    match db.tag_storage.create_tag(input, Utc::now()).await {
        Ok(tag) => (StatusCode::CREATED, ResponseJson(ApiResponse::success(tag))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Request body for updating a tag
#[derive(Deserialize)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
}

/// Update a tag
pub async fn update_tag(
    State(db): State<DbState>,
    Path(tag_id): Path<String>,
    ApiJson(request): ApiJson<UpdateTagRequest>,
) -> impl IntoResponse {
    info!("Updating tag: {}", tag_id);

    let input = TagUpdateInput {
        name: request.name,
        slug: request.slug,
    };

    match db.tag_storage.update_tag(&tag_id, input).await {
        Ok(tag) => (StatusCode::OK, ResponseJson(ApiResponse::success(tag))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Delete a tag, detaching it from its posts
pub async fn delete_tag(
    State(db): State<DbState>,
    Path(tag_id): Path<String>,
) -> impl IntoResponse {
    info!("Deleting tag: {}", tag_id);

    match db.tag_storage.delete_tag(&tag_id).await {
        Ok(_) => (
            StatusCode::OK,
            ResponseJson(ApiResponse::success("Tag deleted successfully")),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
