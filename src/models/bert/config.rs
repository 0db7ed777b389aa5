//! Adapt a Hugging Face BERT config.json to the classification pipelines

use std::{collections::BTreeMap, path::PathBuf};

use bert_burn::model::{BertModel, BertModelConfig};
use burn::{config::Config as _, tensor::backend::Backend};

use crate::pipelines::{self, config::ModelConfig};

/// The Model Configuration
#[derive(burn::config::Config)]
pub struct Config {
    // -- Fields copied from BertModelConfig because #[serde(flatten)] is not supported yet
    /// Number of attention heads in the multi-head attention
    pub num_attention_heads: usize,
    /// Number of transformer encoder layers/blocks
    pub num_hidden_layers: usize,
    /// Layer normalization epsilon
    pub layer_norm_eps: f64,
    /// Size of bert embedding (e.g., 768 for roberta-base)
    pub hidden_size: usize,
    /// Size of the intermediate position wise feedforward layer
    pub intermediate_size: usize,
    /// Size of the vocabulary
    pub vocab_size: usize,
    /// Max position embeddings, in RoBERTa equal to max_seq_len + 2 (514), for BERT equal to max_seq_len(512)
    pub max_position_embeddings: usize,
    /// Identifier for sentence type in input (e.g., 0 for single sentence, 1 for pair)
    pub type_vocab_size: usize,
    /// Dropout value across layers, typically 0.1
    pub hidden_dropout_prob: f64,
    /// BERT model name (roberta)
    pub model_type: String,
    /// Index of the padding token
    pub pad_token_id: usize,
    /// Maximum sequence length for the tokenizer
    pub max_seq_len: Option<usize>,
    /// Whether to add a pooling layer to the model
    pub with_pooling_layer: Option<bool>,
    // -- End fields copied from BertModelConfig
    /// A map from class ids to class name labels, as published with the pretrained model
    pub id2label: BTreeMap<usize, String>,
}

impl Config {
    /// Get the Bert model configuration
    pub fn get_bert_config(&self) -> BertModelConfig {
        BertModelConfig::new(
            self.num_attention_heads,
            self.num_hidden_layers,
            self.layer_norm_eps,
            self.hidden_size,
            self.intermediate_size,
            self.vocab_size,
            self.max_position_embeddings,
            self.type_vocab_size,
            self.hidden_dropout_prob,
            self.model_type.clone(),
            self.pad_token_id,
        )
        .with_max_seq_len(self.max_seq_len)
        .with_with_pooling_layer(self.with_pooling_layer)
    }

    /// Initialize the base BERT model with default weights
    pub fn init_bert<B: Backend>(&self, device: &B::Device) -> BertModel<B> {
        self.get_bert_config().init(device)
    }

    /// Total number of classes
    pub fn n_classes(&self) -> usize {
        self.id2label.len()
    }
}

impl ModelConfig for Config {
    /// Load a pretrained model configuration
    fn load_pretrained(config_file: PathBuf, max_seq_len: Option<usize>) -> anyhow::Result<Self> {
        let mut config = Config::load(&config_file)
            .map_err(|e| anyhow!("Unable to load Hugging Face Config file: {}", e))?;

        if max_seq_len.is_some() {
            config.max_seq_len = max_seq_len;
        }

        if config.n_classes() == 0 {
            return Err(anyhow::anyhow!(
                "Classes are not defined in the model configuration"
            ));
        }

        Ok(config)
    }

    fn get_config(&self) -> pipelines::config::Config {
        pipelines::config::Config {
            pad_token_id: self.pad_token_id,
            max_position_embeddings: self.max_position_embeddings,
            max_seq_len: self.max_seq_len,
            id2label: self.id2label.clone(),
        }
    }
}
