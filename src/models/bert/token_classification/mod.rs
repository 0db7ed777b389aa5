/// BERT for Token Classification
pub mod model;

pub use model::{Model, ModelRecord};
