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
    pipelines::{batcher, text_classification},
};

/// BERT for Text Classification
#[derive(Module, Debug, new)]
pub struct Model<B: Backend> {
    /// The base BERT model, with its pooling layer
    pub model: BertModel<B>,

    /// Linear layer for text classification
    pub output: Linear<B>,

    /// Total number of classes
    pub n_classes: usize,
}

/// Define model behavior
impl<B: Backend> Model<B> {
    /// Defines forward pass for inference
    pub fn infer(&self, input: BertInferenceBatch<B>) -> Tensor<B, 2> {
        let [batch_size, _seq_length] = input.tokens.dims();

        let BertModelOutput {
            pooled_output,
            hidden_states,
        } = self.model.forward(input);

        let output = self
            .output
            .forward(pooled_output.unwrap_or(hidden_states))
            .slice([0..batch_size, 0..1])
            .reshape([batch_size, self.n_classes]);

        softmax(output, 1)
    }
}

impl<B: Backend> text_classification::Model<B> for Model<B> {
    /// The model configuration
    type Config = Config;

    /// Defines forward pass for inference
    fn infer(&self, input: batcher::Infer<B>) -> Tensor<B, 2> {
        self.infer(BertInferenceBatch {
            tokens: input.tokens,
            mask_pad: input.mask_pad,
        })
    }

    /// Load a model from a file
    fn load_from_safetensors(
        device: &B::Device,
        model_file: PathBuf,
        mut config: Self::Config,
    ) -> anyhow::Result<Self> {
        // Sequence classifiers read the pooled [CLS] representation
        config.with_pooling_layer = Some(true);

        let Classifier {
            model,
            output,
            n_classes,
        } = load_classifier(device, model_file, &config)?;

        Ok(Model::new(model, output, n_classes))
    }
}
