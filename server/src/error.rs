use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Telemetry source unreachable, timed out, non-success status, or an
    /// unparseable body. Never swallowed, always reported to the caller.
    #[error("connection failed: {0}")]
    UpstreamFetch(#[from] reqwest::Error),

    #[error("Malformed payload")]
    MalformedPayload,

    /// Store failures on admin writes. Reads never raise this; they fall
    /// back to identity categories instead.
    #[error("category store error: {0}")]
    CategoryStore(#[from] redis::RedisError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::UpstreamFetch { .. } => StatusCode::BAD_GATEWAY,
            AppError::MalformedPayload { .. } => StatusCode::BAD_REQUEST,
            AppError::CategoryStore { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
