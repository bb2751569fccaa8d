// ABOUTME: HTTP request handlers for author records
// ABOUTME: Create, fetch, and remove the local mirror of identity-provider users

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use chrono::Utc;
use quill_storage::AuthorCreateInput;
use tracing::info;

use crate::extract::ApiJson;
use crate::response::{ApiError, ApiResponse};
use crate::state::DbState;

pub async fn create_author(
    State(db): State<DbState>,
    ApiJson(input): ApiJson<AuthorCreateInput>,
) -> impl IntoResponse {
    info!("Creating author: {}", input.username);

    match db.author_storage.create_author(input, Utc::now()).await {
        Ok(author) => {
            (StatusCode::CREATED, ResponseJson(ApiResponse::success(author))).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn get_author(
    State(db): State<DbState>,
    Path(author_id): Path<String>,
) -> impl IntoResponse {
    match db.author_storage.get_author(&author_id).await {
        Ok(author) => (StatusCode::OK, ResponseJson(ApiResponse::success(author))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Remove an author; their posts stay, unattributed
pub async fn delete_author(
    State(db): State<DbState>,
    Path(author_id): Path<String>,
) -> impl IntoResponse {
    info!("Deleting author: {}", author_id);

    match db.author_storage.delete_author(&author_id).await {
        Ok(_) => (
            StatusCode::OK,
            ResponseJson(ApiResponse::success("Author deleted successfully")),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
