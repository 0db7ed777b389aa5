use std::path::PathBuf;

use burn::tensor::{backend::Backend, Tensor};

use crate::pipelines::{batcher, config::ModelConfig};

/// A trait for models that can be used for Token Classification
pub trait Model<B: Backend>: Sized + Send {
    /// The model configuration
    type Config: ModelConfig;

    /// Defines forward pass for inference, returning class probabilities as
    /// [batch_size, seq_length, n_classes]
    fn infer(&self, input: batcher::Infer<B>) -> Tensor<B, 3>;

    /// Load a pretrained model, including its classification head
    fn load_from_safetensors(
        device: &B::Device,
        model_file: PathBuf,
        config: Self::Config,
    ) -> anyhow::Result<Self>;
}
