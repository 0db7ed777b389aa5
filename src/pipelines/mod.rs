use std::fmt::Display;

use burn::tensor::backend::Backend;

use crate::{config::Config, models::bert};

/// Prediction types and numeric normalization
pub mod prediction;

/// Common model config for the classification pipelines
pub mod config;

/// Common batcher operations for Sequence Classification
pub mod batcher;

/// Loading and forward-pass plumbing shared by the pipelines
pub mod base;

/// Full word reconstruction from sub-word tokens
pub mod words;

/// Token Classification (such as named entity recognition)
pub mod token_classification;

/// Text Classification (such as sentiment analysis)
pub mod text_classification;

pub use batcher::Batcher;
pub use prediction::{FinalPrediction, Normalize};

/// The task names that select the Token Classification pipeline
pub static TOKEN_CLASSIFICATION_TASKS: &[&str; 2] = &["ner", "token-classification"];

/// The task names that select the Text Classification pipeline
pub static TEXT_CLASSIFICATION_TASKS: &[&str; 2] = &["sentiment-analysis", "text-classification"];

/// Available Pipelines
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Pipeline {
    /// Token Classification
    TokenClassification,

    /// Text Classification
    TextClassification,
}

impl Pipeline {
    /// Get the human readable pipeline type reported to API clients
    pub fn as_str(&self) -> &'static str {
        match self {
            Pipeline::TokenClassification => token_classification::PIPELINE_TYPE,
            Pipeline::TextClassification => text_classification::PIPELINE_TYPE,
        }
    }

    /// The model used when the config doesn't name one
    pub fn default_model(&self) -> &'static str {
        match self {
            Pipeline::TokenClassification => bert::DEFAULT_TOKEN_CLASSIFICATION_MODEL,
            Pipeline::TextClassification => bert::DEFAULT_TEXT_CLASSIFICATION_MODEL,
        }
    }

    /// Resolve a human readable pipeline type, as reported to API clients
    pub fn try_from_type(kind: &str) -> Option<Self> {
        [Pipeline::TokenClassification, Pipeline::TextClassification]
            .into_iter()
            .find(|pipeline| pipeline.as_str() == kind)
    }

    /// Whether clients need full-word tokens to render predictions for this pipeline
    pub fn needs_tokens(&self) -> bool {
        matches!(self, Pipeline::TokenClassification)
    }
}

impl TryFrom<&str> for Pipeline {
    type Error = PipelineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if TOKEN_CLASSIFICATION_TASKS.contains(&value) {
            Ok(Pipeline::TokenClassification)
        } else if TEXT_CLASSIFICATION_TASKS.contains(&value) {
            Ok(Pipeline::TextClassification)
        } else {
            Err(PipelineError::Unimplemented(value.to_string()))
        }
    }
}

impl Display for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pipeline Error
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// No pipeline is implemented for the given task
    #[error("no pipeline implemented for task {0}")]
    Unimplemented(String),
}

/// The operations every loaded pipeline exposes
pub trait Predict: Send + Sync {
    /// The pipeline variant
    fn pipeline(&self) -> Pipeline;

    /// The Hugging Face Hub model identifier in use
    fn model_name(&self) -> &str;

    /// Run the pipeline over a text and return serializable predictions
    fn predict(&self, text: &str) -> anyhow::Result<Vec<FinalPrediction>>;

    /// Split a text into full words, re-joining sub-word pieces
    fn tokenize(&self, text: &str) -> anyhow::Result<Vec<String>>;
}

/// A pipeline loaded with pretrained BERT weights
pub enum Loaded<B: Backend> {
    /// Token Classification
    TokenClassification(token_classification::Pipeline<B, bert::token_classification::Model<B>>),

    /// Text Classification
    TextClassification(text_classification::Pipeline<B, bert::text_classification::Model<B>>),
}

impl<B: Backend> Predict for Loaded<B> {
    fn pipeline(&self) -> Pipeline {
        match self {
            Loaded::TokenClassification(_) => Pipeline::TokenClassification,
            Loaded::TextClassification(_) => Pipeline::TextClassification,
        }
    }

    fn model_name(&self) -> &str {
        match self {
            Loaded::TokenClassification(pipeline) => pipeline.model_name(),
            Loaded::TextClassification(pipeline) => pipeline.model_name(),
        }
    }

    fn predict(&self, text: &str) -> anyhow::Result<Vec<FinalPrediction>> {
        match self {
            Loaded::TokenClassification(pipeline) => pipeline.predict(text),
            Loaded::TextClassification(pipeline) => pipeline.predict(text),
        }
    }

    fn tokenize(&self, text: &str) -> anyhow::Result<Vec<String>> {
        match self {
            Loaded::TokenClassification(pipeline) => pipeline.tokenize(text),
            Loaded::TextClassification(pipeline) => pipeline.tokenize(text),
        }
    }
}

/// Resolve the configured task and load the matching pipeline
///
/// An unsupported task fails here, before any model is downloaded.
pub async fn init_pipeline<B: Backend>(
    config: &Config,
    device: B::Device,
) -> anyhow::Result<Loaded<B>> {
    let pipeline = config.pipeline()?;
    let model_name = config.model_name(pipeline);

    log::info!("Using model {}", model_name);

    match pipeline {
        Pipeline::TokenClassification => {
            log::info!("Initializing Token Classification pipeline...");

            let loaded =
                token_classification::Pipeline::load(&model_name, config.max_seq_len, device)
                    .await?;

            Ok(Loaded::TokenClassification(loaded))
        }
        Pipeline::TextClassification => {
            log::info!("Initializing Text Classification pipeline...");

            let loaded =
                text_classification::Pipeline::load(&model_name, config.max_seq_len, device)
                    .await?;

            Ok(Loaded::TextClassification(loaded))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_task_names_resolve_to_pipelines() {
        assert_eq!(
            Pipeline::try_from("ner").unwrap(),
            Pipeline::TokenClassification
        );
        assert_eq!(
            Pipeline::try_from("token-classification").unwrap(),
            Pipeline::TokenClassification
        );
        assert_eq!(
            Pipeline::try_from("sentiment-analysis").unwrap(),
            Pipeline::TextClassification
        );
        assert_eq!(
            Pipeline::try_from("text-classification").unwrap(),
            Pipeline::TextClassification
        );
    }

    #[test]
    fn test_unknown_task_is_unimplemented() {
        let err = Pipeline::try_from("summarization").unwrap_err();

        assert_eq!(
            err.to_string(),
            "no pipeline implemented for task summarization"
        );
    }

    #[test]
    fn test_pipeline_types() {
        assert_eq!(
            Pipeline::TokenClassification.to_string(),
            "Token Classification Pipeline"
        );
        assert_eq!(
            Pipeline::TextClassification.to_string(),
            "Text Classification Pipeline"
        );
        assert_eq!(
            Pipeline::try_from_type("Text Classification Pipeline"),
            Some(Pipeline::TextClassification)
        );
        assert_eq!(Pipeline::try_from_type("ner"), None);
        assert!(Pipeline::TokenClassification.needs_tokens());
        assert!(!Pipeline::TextClassification.needs_tokens());
    }
}
