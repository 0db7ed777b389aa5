use std::path::PathBuf;

use bert_burn::{
    data::BertInferenceBatch,
    model::{BertModel, BertModelOutput},
};
use burn::{
    module::Module,
    nn::Linear,
    tensor::{activation::softmax, backend::Backend, Tensor},
};
use derive_new::new;

use crate::{
    models::bert::{
        loader::{load_classifier, Classifier},
        Config,
    },
    pipelines::{batcher, token_classification},
};

/// BERT for Token Classification
#[derive(Module, Debug, new)]
pub struct Model<B: Backend> {
    /// The base BERT model
    pub model: BertModel<B>,

    /// Linear layer for token classification
    pub output: Linear<B>,

    /// Total number of classes
    pub n_classes: usize,
}

/// Define model behavior
impl<B: Backend> Model<B> {
    /// Defines forward pass for inference
    pub fn infer(&self, input: BertInferenceBatch<B>) -> Tensor<B, 3> {
        let [batch_size, seq_length] = input.tokens.dims();

        let BertModelOutput { hidden_states, .. } = self.model.forward(input);

        let output = self
            .output
            .forward(hidden_states)
            .slice([0..batch_size, 0..seq_length])
            .reshape([batch_size, seq_length, self.n_classes]);

        softmax(output, 2)
    }
}

impl<B: Backend> token_classification::Model<B> for Model<B> {
    /// The model configuration
    type Config = Config;

    /// Defines forward pass for inference
    fn infer(&self, input: batcher::Infer<B>) -> Tensor<B, 3> {
        self.infer(BertInferenceBatch {
            tokens: input.tokens,
            mask_pad: input.mask_pad,
        })
    }

    /// Load a model from a file
    fn load_from_safetensors(
        device: &B::Device,
        model_file: PathBuf,
        config: Self::Config,
    ) -> anyhow::Result<Self> {
        let Classifier {
            model,
            output,
            n_classes,
        } = load_classifier(device, model_file, &config)?;

        Ok(Model::new(model, output, n_classes))
    }
}
