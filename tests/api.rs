use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use burn_pipelines_api::{
    api::{self, PredictResponse, TokenizeResponse},
    pipelines::{
        prediction::{EntityGroup, LabelScore},
        words::{continuation_prefix, full_words, Pieces},
        FinalPrediction, Pipeline, Predict,
    },
};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokenizers::Tokenizer;
use tower::ServiceExt;

/// A pipeline with canned predictions and real full-word tokenization
struct Stub {
    pipeline: Pipeline,
    tokenizer: Tokenizer,
}

impl Stub {
    fn new(pipeline: Pipeline) -> Self {
        let tokenizer = Tokenizer::from_file(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/tokenizer.json"
        ))
        .unwrap();

        Self {
            pipeline,
            tokenizer,
        }
    }
}

impl Predict for Stub {
    fn pipeline(&self) -> Pipeline {
        self.pipeline
    }

    fn model_name(&self) -> &str {
        "stub/bert"
    }

    fn predict(&self, text: &str) -> anyhow::Result<Vec<FinalPrediction>> {
        if text.is_empty() {
            return Err(anyhow::anyhow!("empty text"));
        }

        Ok(match self.pipeline {
            Pipeline::TokenClassification => vec![EntityGroup::new(
                "LOC".to_string(),
                0.5,
                "Lisbon".to_string(),
                0,
                6,
            )
            .into()],
            Pipeline::TextClassification => {
                vec![LabelScore::new("POSITIVE".to_string(), 0.25).into()]
            }
        })
    }

    fn tokenize(&self, text: &str) -> anyhow::Result<Vec<String>> {
        let encoding = self
            .tokenizer
            .encode_char_offsets(text, true)
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        Ok(full_words(
            text,
            &Pieces::from(&encoding),
            &continuation_prefix(&self.tokenizer),
        )
        .into_iter()
        .map(|word| word.text)
        .collect())
    }
}

fn app(pipeline: Pipeline) -> Router {
    api::router(Arc::new(Stub::new(pipeline)))
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_predict_token_classification() {
    let (status, body) = post(
        app(Pipeline::TokenClassification),
        "/predict/",
        json!({"text": "Lisbon is a pretty city."}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "predictions": [
                {"entity_group": "LOC", "score": 0.5, "word": "Lisbon", "start": 0, "end": 6}
            ],
            "type": "Token Classification Pipeline",
            "model": "stub/bert",
        })
    );

    let response: PredictResponse = serde_json::from_value(body).unwrap();
    assert_eq!(response.predictions[0].label(), "LOC");
}

#[tokio::test]
async fn test_predict_text_classification() {
    let (status, body) = post(
        app(Pipeline::TextClassification),
        "/predict/",
        json!({"text": "What a lovely day"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "predictions": [{"label": "POSITIVE", "score": 0.25}],
            "type": "Text Classification Pipeline",
            "model": "stub/bert",
        })
    );
}

#[tokio::test]
async fn test_tokenize() {
    let (status, body) = post(
        app(Pipeline::TokenClassification),
        "/tokenize/",
        json!({"text": "Test sentence and stuff."}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);

    let response: TokenizeResponse = serde_json::from_value(body).unwrap();
    assert_eq!(
        response.tokens,
        vec!["Test", "sentence", "and", "stuff", "."]
    );
}

#[tokio::test]
async fn test_inference_failure_is_a_server_error() {
    let (status, body) = post(
        app(Pipeline::TokenClassification),
        "/predict/",
        json!({"text": ""}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "inference failed: empty text"}));
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let (status, _) = post(
        app(Pipeline::TokenClassification),
        "/predict/",
        json!({"txt": "missing field"}),
    )
    .await;

    assert!(status.is_client_error());
}
