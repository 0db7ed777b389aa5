use std::path::PathBuf;

use bert_burn::model::BertModel;
use burn::{
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::backend::Backend,
};

use crate::{models::bert::Config, utils::tensors::load_linear};

/// The name of the classification head in Hugging Face BERT checkpoints
pub static CLASSIFIER: &str = "classifier";

/// Pretrained pieces shared by the BERT classification models
#[derive(Debug)]
pub struct Classifier<B: Backend> {
    /// The base BERT model, with pretrained weights
    pub model: BertModel<B>,

    /// The pretrained classification head
    pub output: Linear<B>,

    /// Total number of classes
    pub n_classes: usize,
}

/// Load the BERT backbone and its classification head from a safetensors file
pub fn load_classifier<B: Backend>(
    device: &B::Device,
    model_file: PathBuf,
    config: &Config,
) -> anyhow::Result<Classifier<B>> {
    let n_classes = config.n_classes();
    if n_classes == 0 {
        return Err(anyhow!("Classes are not defined in the model configuration"));
    }

    let head = load_linear::<B>(&model_file, CLASSIFIER, device)?;

    let [_, head_classes] = head.weight.val().dims();
    if head_classes != n_classes {
        return Err(anyhow!(
            "Classification head has {} outputs but the config defines {} classes",
            head_classes,
            n_classes
        ));
    }

    let model = config
        .init_bert(device)
        .load_record(BertModel::from_safetensors(
            model_file,
            device,
            config.get_bert_config(),
        ));

    let output = LinearConfig::new(config.hidden_size, n_classes)
        .init(device)
        .load_record(head);

    Ok(Classifier {
        model,
        output,
        n_classes,
    })
}
