/// Hugging Face config adapter shared by the BERT classification models
pub mod config;

/// BERT for Text Classification (such as sentiment analysis)
pub mod text_classification;

/// BERT for Token Classification (such as named entity recognition)
pub mod token_classification;

/// Loading of pretrained weights shared by the classification models
pub mod loader;

pub use config::Config;

/// The default model for the Token Classification pipeline
pub static DEFAULT_TOKEN_CLASSIFICATION_MODEL: &str = "dslim/bert-base-NER";

/// The default model for the Text Classification pipeline
pub static DEFAULT_TEXT_CLASSIFICATION_MODEL: &str =
    "nlptown/bert-base-multilingual-uncased-sentiment";
