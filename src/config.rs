//! Configuration for training, artifact locations, storage and logging.

use crate::classifier::DEFAULT_ALPHA;
use crate::training::TrainingOptions;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/name2gender.toml";

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub artifacts: ArtifactsConfig,
    pub training: TrainingConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

/// Where the serialized vectorizer/classifier pairs live
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Directory holding all artifact files
    pub dir: String,
    pub primary_vectorizer: String,
    pub primary_classifier: String,
    pub fallback_vectorizer: String,
    pub fallback_classifier: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: "models".to_string(),
            primary_vectorizer: "vectorizer_clean.msgpack".to_string(),
            primary_classifier: "gender_model_clean.msgpack".to_string(),
            fallback_vectorizer: "vectorizer.msgpack".to_string(),
            fallback_classifier: "gender_model.msgpack".to_string(),
        }
    }
}

/// Offline training parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Labeled CSV with `Name` and `Gender` columns
    pub dataset: String,
    /// Share of each class held out for evaluation
    pub test_ratio: f64,
    /// Seed for the stratified shuffle
    pub seed: u64,
    /// Additive smoothing constant
    pub alpha: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            dataset: "data/names_dataset.csv".to_string(),
            test_ratio: 0.2,
            seed: 42,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl TrainingConfig {
    pub fn options(&self) -> TrainingOptions {
        TrainingOptions {
            test_ratio: self.test_ratio,
            seed: self.seed,
            alpha: self.alpha,
        }
    }
}

/// Prediction record storage
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON-lines file, created if absent
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "data/predictions.jsonl".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path, if present
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a TOML file layered under `NAME2GENDER__*`
    /// environment variables. A missing file yields the defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(Environment::with_prefix("NAME2GENDER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
