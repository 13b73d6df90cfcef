//! The single response shape handed back to callers.

use crate::error::PredictError;
use crate::pipeline::{PredictionResult, Predictor};
use crate::store::PredictionStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

pub const TOO_SHORT_MESSAGE: &str = "Name too short!";

/// Either a prediction or an error message, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PredictResponse {
    Predicted(PredictionResult),
    Failed { message: String },
}

impl PredictResponse {
    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            PredictResponse::Predicted(r) => Some(r),
            PredictResponse::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PredictResponse::Predicted(_) => None,
            PredictResponse::Failed { message } => Some(message),
        }
    }
}

/// Runs predictions and records the successful ones.
pub struct GenderService<S> {
    predictor: Arc<Predictor>,
    store: S,
}

impl<S: PredictionStore> GenderService<S> {
    pub fn new(predictor: Arc<Predictor>, store: S) -> Self {
        GenderService { predictor, store }
    }

    pub fn predictor(&self) -> &Predictor {
        &self.predictor
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Predicts and persists. Nothing is stored when prediction fails.
    pub fn handle(&self, raw: &str) -> PredictResponse {
        let result = match self.predictor.predict(raw) {
            Ok(result) => result,
            Err(PredictError::InputTooShort { .. }) => {
                return PredictResponse::Failed {
                    message: TOO_SHORT_MESSAGE.to_string(),
                };
            }
            Err(e) => {
                warn!(error = %e, "prediction failed");
                return PredictResponse::Failed {
                    message: format!("Error: {e}"),
                };
            }
        };

        match self.store.save(&result) {
            Ok(record) => {
                info!(id = record.id, name = %record.name, gender = %record.predicted_gender, "prediction stored");
                PredictResponse::Predicted(result)
            }
            Err(e) => {
                warn!(error = %e, "failed to store prediction");
                PredictResponse::Failed {
                    message: format!("Error: {e}"),
                }
            }
        }
    }
}
