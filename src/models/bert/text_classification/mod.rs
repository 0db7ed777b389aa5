/// BERT for Sequence Classification
pub mod model;

pub use model::{Model, ModelRecord};
