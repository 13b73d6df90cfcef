//! Multinomial Naive Bayes over n-gram counts.

use crate::Gender;
use crate::error::{PredictError, TrainingError};
use crate::features::NgramVectorizer;
use linfa::prelude::*;
use linfa_bayes::{MultinomialNb, NaiveBayes};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Additive smoothing applied to every feature count.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Posterior over the two genders. Components sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub male: f64,
    pub female: f64,
}

impl Distribution {
    pub fn get(&self, gender: Gender) -> f64 {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
        }
    }

    /// Arg-max label. Ties go to male.
    pub fn label(&self) -> Gender {
        if self.male >= self.female {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    pub fn max(&self) -> f64 {
        self.male.max(self.female)
    }
}

/// One row of the informative n-gram ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct InformativeNgram {
    pub ngram: String,
    pub male: f64,
    pub female: f64,
    /// Smoothed female/male count ratio.
    pub ratio: f64,
}

/// Trained classifier, immutable once fitted.
#[derive(Serialize, Deserialize)]
pub struct GenderClassifier {
    model: MultinomialNb<f64, usize>,
    alpha: f64,
    n_features: usize,
    class_counts: [usize; 2],
    /// Per-class n-gram totals, shape `(2, n_features)`.
    feature_counts: Array2<f64>,
}

impl GenderClassifier {
    /// Fits the classifier on count rows `x` with gender labels `y`.
    pub fn fit(x: Array2<f64>, y: &[Gender], alpha: f64) -> Result<Self, TrainingError> {
        let n_features = x.ncols();
        if n_features == 0 {
            return Err(TrainingError::EmptyVocabulary);
        }

        let mut class_counts = [0usize; 2];
        let mut feature_counts = Array2::zeros((2, n_features));
        for (row, gender) in x.rows().into_iter().zip(y) {
            let class = gender.class_index();
            class_counts[class] += 1;
            let mut totals = feature_counts.row_mut(class);
            totals += &row;
        }

        for gender in Gender::ALL {
            if class_counts[gender.class_index()] == 0 {
                return Err(TrainingError::MissingClass(gender));
            }
        }

        let targets = Array1::from_iter(y.iter().map(|g| g.class_index()));
        let dataset = Dataset::new(x, targets);
        let model = MultinomialNb::params()
            .alpha(alpha)
            .fit(&dataset)
            .map_err(|e| TrainingError::Fit(e.to_string()))?;

        Ok(GenderClassifier {
            model,
            alpha,
            n_features,
            class_counts,
            feature_counts,
        })
    }

    /// Number of features the classifier was fitted against.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn class_count(&self, gender: Gender) -> usize {
        self.class_counts[gender.class_index()]
    }

    /// Class priors from training label frequencies.
    pub fn priors(&self) -> Distribution {
        let total = (self.class_counts[0] + self.class_counts[1]) as f64;
        Distribution {
            male: self.class_counts[0] as f64 / total,
            female: self.class_counts[1] as f64 / total,
        }
    }

    /// Posterior for one count row.
    ///
    /// Class scores are linfa's joint log-likelihoods; they are shifted by
    /// their maximum before exponentiating, so rows with many n-grams never
    /// underflow to an all-zero posterior.
    pub fn predict_proba(&self, row: &Array1<f64>) -> Result<Distribution, PredictError> {
        if row.len() != self.n_features {
            return Err(PredictError::Classification(format!(
                "expected {} features, got {}",
                self.n_features,
                row.len()
            )));
        }

        let input = row.view().insert_axis(Axis(0));
        let jll = self.model.joint_log_likelihood(input);

        let score = |gender: Gender| {
            jll.get(&gender.class_index())
                .and_then(|scores| scores.first().copied())
                .ok_or_else(|| PredictError::Classification(format!("model has no {gender} class")))
        };

        normalize_log_scores(score(Gender::Male)?, score(Gender::Female)?)
    }

    /// Ranks vocabulary n-grams by how strongly they lean female, using
    /// add-one smoothed per-class counts.
    pub fn informative_ngrams(&self, vectorizer: &NgramVectorizer, n: usize) -> Vec<InformativeNgram> {
        let mut ranked: Vec<InformativeNgram> = vectorizer
            .vocabulary()
            .iter()
            .filter(|&(_, &idx)| idx < self.n_features)
            .map(|(ngram, &idx)| {
                let male = self.feature_counts[[0, idx]];
                let female = self.feature_counts[[1, idx]];
                InformativeNgram {
                    ngram: ngram.clone(),
                    male,
                    female,
                    ratio: (female + 1.0) / (male + 1.0),
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.ratio.total_cmp(&a.ratio).then_with(|| a.ngram.cmp(&b.ngram)));
        ranked.truncate(n);
        ranked
    }
}

/// Turns two unnormalized log scores into probabilities via log-sum-exp.
pub(crate) fn normalize_log_scores(male: f64, female: f64) -> Result<Distribution, PredictError> {
    let max = male.max(female);
    if !max.is_finite() || male.is_nan() || female.is_nan() {
        return Err(PredictError::Classification(format!(
            "degenerate log scores (male={male}, female={female})"
        )));
    }

    let male = (male - max).exp();
    let female = (female - max).exp();
    let total = male + female;

    Ok(Distribution {
        male: male / total,
        female: female / total,
    })
}
