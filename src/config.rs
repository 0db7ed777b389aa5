use std::{fmt::Display, fs, path::Path};

use burn::backend::libtorch::LibTorchDevice;
use serde::{Deserialize, Serialize};

use crate::pipelines::{Pipeline, PipelineError};

/// The default location of the API configuration file
pub static DEFAULT_CONFIG_PATH: &str = "config/api_config.yaml";

/// Application configuration, loaded from a YAML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// The task to run (e.g., "ner" or "sentiment-analysis")
    pub task: String,

    /// The Hugging Face Hub model identifier (e.g., "dslim/bert-base-NER"), defaulting to the
    /// pipeline's default model
    #[serde(default)]
    pub model: Option<String>,

    /// The device to run inference on
    #[serde(default)]
    pub device: Device,

    /// An optional max sequence length, if different from the model's max position embeddings
    #[serde(default)]
    pub max_seq_len: Option<usize>,

    /// HTTP server settings
    #[serde(default)]
    pub server: Server,
}

impl Config {
    /// Load the configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Read {
            path: path.as_ref().display().to_string(),
            source,
        })?;

        Self::from_yaml(&contents)
    }

    /// Parse the configuration from a YAML string
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Resolve the configured task into a supported pipeline
    pub fn pipeline(&self) -> Result<Pipeline, PipelineError> {
        Pipeline::try_from(self.task.as_str())
    }

    /// The configured model, or the default model for the pipeline
    pub fn model_name(&self, pipeline: Pipeline) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| pipeline.default_model().to_string())
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    /// The address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// The port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    80
}

/// The device to run inference on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Device {
    /// CPU inference
    #[default]
    Cpu,

    /// CUDA inference on the given GPU index
    Cuda(usize),
}

impl TryFrom<String> for Device {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_lowercase();

        match normalized.as_str() {
            "cpu" => Ok(Device::Cpu),
            "cuda" | "gpu" => Ok(Device::Cuda(0)),
            other => other
                .strip_prefix("cuda:")
                .and_then(|index| index.parse().ok())
                .map(Device::Cuda)
                .ok_or(ConfigError::Device(value)),
        }
    }
}

impl Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Cuda(index) => write!(f, "cuda:{}", index),
        }
    }
}

impl From<Device> for String {
    fn from(device: Device) -> Self {
        device.to_string()
    }
}

impl From<Device> for LibTorchDevice {
    fn from(device: Device) -> Self {
        match device {
            Device::Cpu => LibTorchDevice::Cpu,
            Device::Cuda(index) => LibTorchDevice::Cuda(index),
        }
    }
}

/// Config Error
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("unable to read config file {path}: {source}")]
    Read {
        /// The path that was requested
        path: String,

        /// The underlying IO error
        source: std::io::Error,
    },

    /// The config file is not valid YAML for this schema
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The device string is not recognized
    #[error("unknown device {0}, expected cpu, cuda or cuda:N")]
    Device(String),
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::from_yaml("task: ner\nmodel: dslim/bert-base-NER\n").unwrap();

        assert_eq!(config.task, "ner");
        assert_eq!(config.model.as_deref(), Some("dslim/bert-base-NER"));
        assert_eq!(config.device, Device::Cpu);
        assert_eq!(config.max_seq_len, None);
        assert_eq!(config.server, Server::default());
        assert_eq!(config.pipeline().unwrap(), Pipeline::TokenClassification);
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_yaml(
            "task: sentiment-analysis
model: nlptown/bert-base-multilingual-uncased-sentiment
device: cuda:1
max_seq_len: 128
server:
  host: 127.0.0.1
  port: 8080
",
        )
        .unwrap();

        assert_eq!(config.device, Device::Cuda(1));
        assert_eq!(config.max_seq_len, Some(128));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.pipeline().unwrap(), Pipeline::TextClassification);
    }

    #[test]
    fn test_model_defaults_per_pipeline() {
        let config = Config::from_yaml("task: ner\n").unwrap();
        let pipeline = config.pipeline().unwrap();

        assert_eq!(config.model, None);
        assert_eq!(config.model_name(pipeline), "dslim/bert-base-NER");
    }

    #[test]
    fn test_unknown_device_is_rejected() {
        let result = Config::from_yaml("task: ner\nmodel: x\ndevice: tpu\n");

        assert!(matches!(result, Err(ConfigError::Yaml(_))));
        assert!(matches!(
            Device::try_from("cuda:abc".to_string()),
            Err(ConfigError::Device(_))
        ));
    }

    #[test]
    fn test_unknown_task_is_unimplemented() {
        let config = Config::from_yaml("task: x\nmodel: y\n").unwrap();

        assert!(matches!(
            config.pipeline(),
            Err(PipelineError::Unimplemented(task)) if task == "x"
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = Config::load("does/not/exist.yaml");

        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
