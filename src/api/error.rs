use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::schema::ErrorResponse;

/// API Error
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// The pipeline failed on the given input
    #[error("inference failed: {0}")]
    Inference(#[from] anyhow::Error),

    /// The blocking inference task panicked or was cancelled
    #[error("inference task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::error!("{}", self);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
