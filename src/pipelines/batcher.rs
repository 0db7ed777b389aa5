use burn::{
    data::dataloader,
    nn::attention::generate_padding_mask,
    tensor::{backend::Backend, Bool, Int, Tensor},
};
use derive_new::new;
use tokenizers::{Encoding, Tokenizer};

use super::words;

/// An inference batch for sequence classification
#[derive(Debug, Clone, new)]
pub struct Infer<B: Backend> {
    /// Tokenized text as 2D tensor: [batch_size, max_seq_length]
    pub tokens: Tensor<B, 2, Int>,

    /// Padding mask for the tokenized text containing booleans for padding locations
    pub mask_pad: Tensor<B, 2, Bool>,
}

/// Struct for batching sequence classification inputs
#[derive(Clone)]
pub struct Batcher<B: Backend> {
    /// Tokenizer for converting text to token IDs
    pub tokenizer: Tokenizer,

    /// The prefix the tokenizer puts on sub-word continuation pieces (e.g., "##")
    pub continuation_prefix: String,

    /// Maximum sequence length for tokenized text
    pub max_seq_length: usize,

    /// ID of the padding token
    pub pad_token_id: usize,

    /// Device on which to perform computation (e.g., CPU or CUDA device)
    pub device: B::Device,
}

impl<B: Backend> Batcher<B> {
    /// Creates a new batcher
    pub fn new(
        tokenizer: Tokenizer,
        pad_token_id: usize,
        max_seq_length: usize,
        device: B::Device,
    ) -> Self {
        let continuation_prefix = words::continuation_prefix(&tokenizer);

        Self {
            tokenizer,
            continuation_prefix,
            max_seq_length,
            pad_token_id,
            device,
        }
    }

    /// Tokenize a text, with special tokens and character offsets
    pub fn encode(&self, text: &str) -> anyhow::Result<Encoding> {
        self.tokenizer
            .encode_char_offsets(text, true)
            .map_err(|e| anyhow!("Unable to encode text: {}", e))
    }

    /// Split a text into full words, re-joining sub-word pieces
    pub fn words(&self, text: &str) -> anyhow::Result<Vec<words::Word>> {
        let encoding = self.encode(text)?;

        Ok(words::full_words(
            text,
            &words::Pieces::from(&encoding),
            &self.continuation_prefix,
        ))
    }
}

/// Implement Batcher trait for Batcher struct for inference
impl<B: Backend> dataloader::batcher::Batcher<Encoding, Infer<B>> for Batcher<B> {
    /// Collects a vector of encoded texts into an inference batch
    fn batch(&self, items: Vec<Encoding>) -> Infer<B> {
        let token_ids_list = items
            .iter()
            .map(|encoding| encoding.get_ids().iter().map(|t| *t as usize).collect())
            .collect();

        let padding = generate_padding_mask(
            self.pad_token_id,
            token_ids_list,
            Some(self.max_seq_length),
            &self.device,
        );

        // Create and return inference batch
        Infer {
            tokens: padding.tensor,
            mask_pad: padding.mask,
        }
    }
}
