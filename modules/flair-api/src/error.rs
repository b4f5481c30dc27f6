use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Handler failure. Internal causes are logged, never sent to the client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(reason) => {
                tracing::warn!(%reason, "Rejected request");
                (StatusCode::BAD_REQUEST, format!("Bad Request: {reason}")).into_response()
            }
            ApiError::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
