//! Error types, one enum per stage.

use std::path::PathBuf;
use thiserror::Error;

/// Failures on the inference path.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictError {
    #[error("name must contain at least {min} characters after trimming")]
    InputTooShort { min: usize },

    #[error("classification failed: {0}")]
    Classification(String),
}

/// Failures reading, writing or validating serialized artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to access artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode artifact {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rmp_serde::decode::Error,
    },

    #[error("failed to encode artifact {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: rmp_serde::encode::Error,
    },

    #[error("classifier expects {classifier} features but vectorizer has {vectorizer}")]
    ShapeMismatch { vectorizer: usize, classifier: usize },

    #[error("no usable artifact pair (primary: {primary}; fallback: {fallback})")]
    NoUsablePair {
        primary: Box<ArtifactError>,
        fallback: Box<ArtifactError>,
    },
}

/// Failures loading the training CSV.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to open dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset is missing required column {0:?}")]
    MissingColumn(&'static str),
}

/// Failures fitting the vectorizer and classifier.
#[derive(Debug, Error)]
pub enum TrainingError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("training partition has no {0} samples")]
    MissingClass(crate::Gender),

    #[error("training partition produced an empty n-gram vocabulary")]
    EmptyVocabulary,

    #[error("classifier fit failed: {0}")]
    Fit(String),

    #[error("test ratio must be in [0, 1), got {0}")]
    InvalidTestRatio(f64),

    #[error("smoothing alpha must be positive and finite, got {0}")]
    InvalidAlpha(f64),

    #[error("failed to classify held-out name {name:?}: {source}")]
    Evaluation {
        name: String,
        #[source]
        source: PredictError,
    },
}

/// Failures persisting prediction records.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field {field} exceeds {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("store lock poisoned")]
    Poisoned,
}
