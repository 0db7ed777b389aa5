use burn::tensor::backend::Backend;

use crate::pipelines::{
    base::Base,
    prediction::{FinalPrediction, Normalize},
    words::Pieces,
    Pipeline as PipelineKind, Predict,
};

use super::{decode::decode_tokens, grouping::group_entities, tags::correct_subword_tags, Model};

/// Token Classification Pipeline
///
/// Runs the model over a text, corrects begin tags on sub-word continuation pieces, then groups
/// consecutive tokens into entities.
pub struct Pipeline<B: Backend, M: Model<B>> {
    /// Model, config, batcher and model name
    base: Base<B, M>,
}

impl<B: Backend, M: Model<B>> Pipeline<B, M> {
    /// Download the configured model from the Hugging Face Hub and load it
    pub async fn load(
        model_name: &str,
        max_seq_len: Option<usize>,
        device: B::Device,
    ) -> anyhow::Result<Self> {
        let base = Base::load(model_name, max_seq_len, device, M::load_from_safetensors).await?;

        Ok(Self { base })
    }

    /// The sub-word continuation prefix of the loaded tokenizer
    pub fn continuation_prefix(&self) -> &str {
        &self.base.batcher.continuation_prefix
    }
}

impl<B: Backend, M: Model<B>> Predict for Pipeline<B, M> {
    fn pipeline(&self) -> PipelineKind {
        PipelineKind::TokenClassification
    }

    fn model_name(&self) -> &str {
        &self.base.model_name
    }

    fn predict(&self, text: &str) -> anyhow::Result<Vec<FinalPrediction>> {
        let (encoding, scores) = self.base.run(text, |model, input| model.infer(input))?;

        let [_, seq_length, n_classes] = scores.dims();
        let data = scores.into_data();
        let scores = &data.value[..(seq_length * n_classes).min(data.value.len())];

        let prefix = self.continuation_prefix();

        let mut raw = decode_tokens(
            scores,
            n_classes,
            &Pieces::from(&encoding),
            &self.base.config.id2label,
        );

        // Sub-word pieces must carry continue tags before grouping
        correct_subword_tags(&mut raw, prefix);

        let entities = group_entities(&raw, prefix);

        log::debug!("{} entities from {} tokens", entities.len(), raw.len());

        Ok(entities
            .normalize()
            .into_iter()
            .map(FinalPrediction::from)
            .collect())
    }

    fn tokenize(&self, text: &str) -> anyhow::Result<Vec<String>> {
        self.base.tokenize(text)
    }
}
