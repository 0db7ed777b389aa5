use std::{collections::BTreeMap, path::PathBuf};

/// The common model configuration properties needed for the pipelines
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// The padding token ID
    pub pad_token_id: usize,

    /// The max position embeddings
    pub max_position_embeddings: usize,

    /// An optional max sequence length, if different from max position embeddings
    pub max_seq_len: Option<usize>,

    /// A mapping from class ids to class name labels
    pub id2label: BTreeMap<usize, String>,
}

impl Config {
    /// The maximum number of tokens fed to the model
    pub fn max_seq_length(&self) -> usize {
        self.max_seq_len
            .unwrap_or(self.max_position_embeddings)
            .min(self.max_position_embeddings)
    }
}

/// A trait for configs of pretrained classification models
pub trait ModelConfig: Clone + Send + Sync + Sized {
    /// Load a pretrained model configuration, including its class labels
    fn load_pretrained(config_file: PathBuf, max_seq_len: Option<usize>) -> anyhow::Result<Self>;

    /// Return the Config needed for the pipelines
    fn get_config(&self) -> Config;
}
