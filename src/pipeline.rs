//! Inference: normalize, consult the override table, otherwise vectorize,
//! classify and score.

use crate::Gender;
use crate::classifier::{Distribution, GenderClassifier};
use crate::confidence::confidence;
use crate::error::{ArtifactError, PredictError};
use crate::features::NgramVectorizer;
use crate::normalize::normalize_name;
use crate::overrides::{self, OVERRIDE_CONFIDENCE};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which path produced a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionSource {
    Override,
    Model,
}

/// Outcome of one successful `predict` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// The normalized name.
    pub name: String,
    pub gender: Gender,
    /// Percentage in `[50.0, 100.0]`.
    pub confidence: f64,
    pub source: PredictionSource,
}

/// Loaded vectorizer and classifier, shared read-only by every call.
///
/// Build one at startup (see [`crate::artifacts::ArtifactSet::load`]) and
/// hand out `&Predictor` or `Arc<Predictor>`; nothing in here mutates.
pub struct Predictor {
    vectorizer: NgramVectorizer,
    classifier: GenderClassifier,
}

impl Predictor {
    /// Pairs a vectorizer with a classifier fitted on its vocabulary.
    pub fn new(vectorizer: NgramVectorizer, classifier: GenderClassifier) -> Result<Self, ArtifactError> {
        if vectorizer.vocabulary_size() != classifier.n_features() {
            return Err(ArtifactError::ShapeMismatch {
                vectorizer: vectorizer.vocabulary_size(),
                classifier: classifier.n_features(),
            });
        }
        Ok(Predictor {
            vectorizer,
            classifier,
        })
    }

    pub fn vectorizer(&self) -> &NgramVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &GenderClassifier {
        &self.classifier
    }

    /// Predicts the gender for a raw name.
    pub fn predict(&self, raw: &str) -> Result<PredictionResult, PredictError> {
        let name = normalize_name(raw).inspect_err(|_| debug!(input = raw, "rejected: too short"))?;

        if let Some(gender) = overrides::lookup(&name) {
            debug!(name = %name, gender = %gender, "override hit");
            return Ok(PredictionResult {
                name,
                gender,
                confidence: OVERRIDE_CONFIDENCE,
                source: PredictionSource::Override,
            });
        }

        self.classify(&name)
    }

    /// Runs the statistical model on an already normalized name, bypassing
    /// normalization and the override table.
    pub fn classify(&self, name: &str) -> Result<PredictionResult, PredictError> {
        let distribution = self.distribution(name)?;
        let gender = distribution.label();
        let confidence = confidence(&distribution);
        debug!(name = %name, gender = %gender, confidence, "classified");

        Ok(PredictionResult {
            name: name.to_string(),
            gender,
            confidence,
            source: PredictionSource::Model,
        })
    }

    /// Full posterior for an already normalized name.
    pub fn distribution(&self, name: &str) -> Result<Distribution, PredictError> {
        let features = self.vectorizer.transform(name);
        self.classifier.predict_proba(&features)
    }
}
