use std::collections::BTreeMap;

use burn::tensor::{backend::Backend, Element};

use crate::{
    pipelines::{
        base::Base,
        prediction::{FinalPrediction, LabelScore, Normalize},
        Pipeline as PipelineKind, Predict,
    },
    utils::classes::{argmax, label_for},
};

use super::Model;

/// Text Classification Pipeline
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
}

impl<B: Backend, M: Model<B>> Predict for Pipeline<B, M> {
    fn pipeline(&self) -> PipelineKind {
        PipelineKind::TextClassification
    }

    fn model_name(&self) -> &str {
        &self.base.model_name
    }

    fn predict(&self, text: &str) -> anyhow::Result<Vec<FinalPrediction>> {
        let (_, probabilities) = self.base.run(text, |model, input| model.infer(input))?;

        let data = probabilities.into_data();

        Ok(top_label(&data.value, &self.base.config.id2label)
            .map(|label| FinalPrediction::from(label.normalize()))
            .into_iter()
            .collect())
    }

    fn tokenize(&self, text: &str) -> anyhow::Result<Vec<String>> {
        self.base.tokenize(text)
    }
}

/// Pick the most probable class label for a single text
pub fn top_label<E: Element>(
    probabilities: &[E],
    id2label: &BTreeMap<usize, String>,
) -> Option<LabelScore<E>> {
    let (class_id, score) = argmax(probabilities)?;

    Some(LabelScore {
        label: label_for(id2label, class_id),
        score,
    })
}
