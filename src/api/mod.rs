//! HTTP endpoints over a loaded pipeline

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};

use crate::pipelines::Predict;

/// Request and response bodies
pub mod schema;

/// API errors and their HTTP responses
pub mod error;

pub use error::ApiError;
pub use schema::{PredictResponse, TextInput, TokenizeResponse};

/// Build the API router around a loaded pipeline
pub fn router<P: Predict + 'static>(pipeline: Arc<P>) -> Router {
    Router::new()
        .route("/predict/", post(predict::<P>))
        .route("/tokenize/", post(tokenize::<P>))
        .with_state(pipeline)
}

/// POST /predict/
async fn predict<P: Predict + 'static>(
    State(pipeline): State<Arc<P>>,
    Json(input): Json<TextInput>,
) -> Result<Json<PredictResponse>, ApiError> {
    log::debug!("Predicting for {} characters", input.text.chars().count());

    let response = tokio::task::spawn_blocking(move || {
        let predictions = pipeline.predict(&input.text)?;

        Ok::<_, anyhow::Error>(PredictResponse {
            predictions,
            kind: pipeline.pipeline().to_string(),
            model: pipeline.model_name().to_string(),
        })
    })
    .await??;

    Ok(Json(response))
}

/// POST /tokenize/
async fn tokenize<P: Predict + 'static>(
    State(pipeline): State<Arc<P>>,
    Json(input): Json<TextInput>,
) -> Result<Json<TokenizeResponse>, ApiError> {
    let tokens = tokio::task::spawn_blocking(move || pipeline.tokenize(&input.text)).await??;

    Ok(Json(TokenizeResponse { tokens }))
}
