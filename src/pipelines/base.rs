use std::{path::PathBuf, sync::Mutex};

use burn::{data::dataloader::batcher::Batcher as BatcherTrait, tensor::backend::Backend};
use tokenizers::{Encoding, Tokenizer};

use crate::{
    pipelines::{
        batcher::{Batcher, Infer},
        config::{Config, ModelConfig},
    },
    utils::hugging_face::download_hf_model,
};

/// The state every classification pipeline holds, fixed at construction
pub struct Base<B: Backend, M> {
    /// The loaded model. Forward passes are serialized through the lock.
    model: Mutex<M>,

    /// The pipeline config extracted from the model config
    pub config: Config,

    /// Batcher for tokenizing and batching inputs
    pub batcher: Batcher<B>,

    /// The Hugging Face Hub model identifier
    pub model_name: String,
}

impl<B: Backend, M> Base<B, M> {
    /// Create a pipeline base from an already-loaded model and tokenizer
    pub fn new(
        model: M,
        config: Config,
        tokenizer: Tokenizer,
        device: B::Device,
        model_name: String,
    ) -> Self {
        let batcher = Batcher::new(
            tokenizer,
            config.pad_token_id,
            config.max_seq_length(),
            device,
        );

        Self {
            model: Mutex::new(model),
            config,
            batcher,
            model_name,
        }
    }

    /// Download a model from the Hugging Face Hub and load it with the given loader
    pub async fn load<C, F>(
        model_name: &str,
        max_seq_len: Option<usize>,
        device: B::Device,
        load_model: F,
    ) -> anyhow::Result<Self>
    where
        C: ModelConfig,
        F: FnOnce(&B::Device, PathBuf, C) -> anyhow::Result<M>,
    {
        let files = download_hf_model(model_name).await?;

        let model_config = C::load_pretrained(files.config, max_seq_len)
            .map_err(|e| anyhow!("Unable to load pre-trained model config file: {}", e))?;

        // Load pre-trained model weights
        log::info!("Loading weights for {}...", model_name);

        let model = load_model(&device, files.weights, model_config.clone())?;

        // Initialize tokenizer
        let tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| anyhow!("Unable to load tokenizer: {}", e))?;

        Ok(Self::new(
            model,
            model_config.get_config(),
            tokenizer,
            device,
            model_name.to_string(),
        ))
    }

    /// Encode a text and run one forward pass over it, holding the model lock
    pub fn run<T>(
        &self,
        text: &str,
        forward: impl FnOnce(&M, Infer<B>) -> T,
    ) -> anyhow::Result<(Encoding, T)> {
        let encoding = self.batcher.encode(text)?;
        let input = self.batcher.batch(vec![encoding.clone()]);

        let model = self
            .model
            .lock()
            .map_err(|_| anyhow!("Model lock poisoned by an earlier failure"))?;

        let output = forward(&*model, input);

        Ok((encoding, output))
    }

    /// Split a text into full words, re-joining sub-word pieces
    pub fn tokenize(&self, text: &str) -> anyhow::Result<Vec<String>> {
        Ok(self
            .batcher
            .words(text)?
            .into_iter()
            .map(|word| word.text)
            .collect())
    }
}
