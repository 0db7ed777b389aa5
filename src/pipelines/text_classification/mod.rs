/// Common model traits for text classification
pub mod model;

/// Text Classification Pipeline
pub mod pipeline;

pub use model::Model;
pub use pipeline::{top_label, Pipeline};

/// The pipeline type reported to API clients
pub static PIPELINE_TYPE: &str = "Text Classification Pipeline";
