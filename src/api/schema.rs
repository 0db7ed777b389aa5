use serde::{Deserialize, Serialize};

use crate::pipelines::FinalPrediction;

/// The request body of both endpoints
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextInput {
    /// The text to run through the pipeline
    pub text: String,
}

/// The response body of `/predict/`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Entities or labels, depending on the pipeline
    pub predictions: Vec<FinalPrediction>,

    /// The human readable pipeline type (e.g., "Token Classification Pipeline")
    #[serde(rename = "type")]
    pub kind: String,

    /// The Hugging Face Hub model identifier
    pub model: String,
}

/// The response body of `/tokenize/`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizeResponse {
    /// Full words, with sub-word pieces re-joined
    pub tokens: Vec<String>,
}

/// The body of an error response
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A description of what went wrong
    pub error: String,
}
