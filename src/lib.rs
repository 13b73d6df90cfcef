//! # name2gender 🧠🚻
//!
//! Predict the likely gender of a name with a character n-gram
//! Multinomial Naive Bayes classifier.
//!
//! Names are lowercased and trimmed, checked against a small override table
//! of very common names, and otherwise turned into counts of
//! word-boundary-padded 2- to 4-character n-grams. A
//! [`linfa-bayes`](https://crates.io/crates/linfa-bayes) classifier trained
//! offline scores those counts, and the confidence is the winning class
//! probability as a percentage.
//!
//! ## Features
//! - `char_wb` style n-gram extraction over a fixed vocabulary
//! - Multinomial Naive Bayes with additive smoothing
//! - Stratified, seeded train/test split with a per-class report
//! - Artifact persistence with `rmp-serde` (MessagePack), with a fallback pair
//! - Prediction records through a pluggable store
//! - Benchmarkable with [Criterion](https://crates.io/crates/criterion)
//!
//! ## Example
//! ```rust
//! use name2gender::{Gender, NameRecord, training};
//!
//! let records = vec![
//!     NameRecord::new("anna", Gender::Female),
//!     NameRecord::new("emma", Gender::Female),
//!     NameRecord::new("otto", Gender::Male),
//!     NameRecord::new("bob", Gender::Male),
//! ];
//! let predictor = training::fit(&records, 1.0).unwrap();
//!
//! let result = predictor.predict("John").unwrap();
//! assert_eq!(result.gender, Gender::Male);
//! assert_eq!(result.confidence, 95.0);
//!
//! let result = predictor.predict("Hanna").unwrap();
//! println!("{}: {} ({:.2}%)", result.name, result.gender, result.confidence);
//! ```

pub mod artifacts;
pub mod classifier;
pub mod confidence;
pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
mod gender;
pub mod normalize;
pub mod overrides;
pub mod pipeline;
pub mod service;
pub mod store;
pub mod training;

pub use artifacts::{ArtifactKind, ArtifactPair, ArtifactSet};
pub use classifier::{Distribution, GenderClassifier};
pub use config::AppConfig;
pub use dataset::{LoadedDataset, NameRecord};
pub use error::{ArtifactError, DatasetError, PredictError, StoreError, TrainingError};
pub use features::NgramVectorizer;
pub use gender::Gender;
pub use pipeline::{PredictionResult, PredictionSource, Predictor};
pub use service::{GenderService, PredictResponse};
pub use store::{JsonLinesStore, MemoryStore, PredictionRecord, PredictionStore};
pub use training::{EvaluationReport, TrainedModel, TrainingOptions};
