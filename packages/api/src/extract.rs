// ABOUTME: Request extractors that answer malformed input inside the API envelope
// ABOUTME: Thin wrappers over axum's Json and Query with enveloped rejections

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use tracing::debug;

use crate::response::ApiResponse;

/// JSON request body
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiRejection))]
pub struct ApiJson<T>(pub T);

/// Query string parameters
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiRejection))]
pub struct ApiQuery<T>(pub T);

/// Malformed request input, keeping axum's status code
#[derive(Debug)]
pub struct ApiRejection {
    pub status: StatusCode,
    pub message: String,
}

impl From<JsonRejection> for ApiRejection {
    fn from(rejection: JsonRejection) -> Self {
        ApiRejection {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiRejection {
    fn from(rejection: QueryRejection) -> Self {
        ApiRejection {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        debug!("Rejected request input: {}", self.message);
        (
            self.status,
            ResponseJson(ApiResponse::<()>::error(self.message)),
        )
            .into_response()
    }
}
