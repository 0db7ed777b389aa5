use std::path::PathBuf;

use hf_hub::api::tokio;

/// The model config file name on the Hugging Face Hub
pub static CONFIG_FILE: &str = "config.json";

/// The model weights file name on the Hugging Face Hub
pub static WEIGHTS_FILE: &str = "model.safetensors";

/// The tokenizer file name on the Hugging Face Hub
pub static TOKENIZER_FILE: &str = "tokenizer.json";

/// Local paths to the downloaded files of a pretrained model
#[derive(Debug, Clone)]
pub struct HfFiles {
    /// The model config (config.json)
    pub config: PathBuf,

    /// The model weights (model.safetensors)
    pub weights: PathBuf,

    /// The tokenizer definition (tokenizer.json)
    pub tokenizer: PathBuf,
}

/// Download model config, weights and tokenizer from Hugging Face Hub
/// If file exists in cache, it will not be downloaded again
// NOTE: Modified from the built-in function to work within an already-async context
pub async fn download_hf_model(model_name: &str) -> anyhow::Result<HfFiles> {
    let api = tokio::Api::new().map_err(|e| anyhow!("Unable to reach Hugging Face Hub: {}", e))?;
    let repo = api.model(model_name.to_string());

    let mut paths = Vec::with_capacity(3);

    for file_name in [CONFIG_FILE, WEIGHTS_FILE, TOKENIZER_FILE] {
        log::debug!("Fetching {} for {}", file_name, model_name);

        let path = repo.get(file_name).await.map_err(|e| {
            anyhow!(
                "Failed to download: {} file with name: {} from HuggingFace Hub: {}",
                model_name,
                file_name,
                e
            )
        })?;

        paths.push(path);
    }

    let [config, weights, tokenizer]: [PathBuf; 3] = paths
        .try_into()
        .map_err(|_| anyhow!("Unexpected number of files downloaded for {}", model_name))?;

    Ok(HfFiles {
        config,
        weights,
        tokenizer,
    })
}
