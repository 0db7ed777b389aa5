/// Common model traits for token classification
pub mod model;

/// Per-token decoding of class probabilities
pub mod decode;

/// Begin/continue tag handling
pub mod tags;

/// Entity grouping
pub mod grouping;

/// Token Classification Pipeline
pub mod pipeline;

pub use model::Model;
pub use pipeline::Pipeline;

/// The pipeline type reported to API clients
pub static PIPELINE_TYPE: &str = "Token Classification Pipeline";
