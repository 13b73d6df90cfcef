//! Offline training: stratified split, fit, evaluate.

use crate::Gender;
use crate::classifier::{DEFAULT_ALPHA, GenderClassifier};
use crate::dataset::NameRecord;
use crate::error::TrainingError;
use crate::features::NgramVectorizer;
use crate::pipeline::Predictor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingOptions {
    /// Share of each class held out for evaluation.
    pub test_ratio: f64,
    pub seed: u64,
    pub alpha: f64,
}

impl TrainingOptions {
    /// Rejects a test ratio outside `[0, 1)` and a non-positive alpha.
    pub fn validate(&self) -> Result<(), TrainingError> {
        if !(0.0..1.0).contains(&self.test_ratio) {
            return Err(TrainingError::InvalidTestRatio(self.test_ratio));
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(TrainingError::InvalidAlpha(self.alpha));
        }
        Ok(())
    }
}

impl Default for TrainingOptions {
    fn default() -> Self {
        TrainingOptions {
            test_ratio: 0.2,
            seed: 42,
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// A helper type for holding train/test splits.
#[derive(Debug, Clone)]
pub struct DatasetSplit {
    pub train: Vec<NameRecord>,
    pub test: Vec<NameRecord>,
}

/// Splits each class separately so both partitions keep the class balance.
///
/// Records of a class keep their input order, are shuffled with a
/// generator seeded from `seed`, and the first `round(len * test_ratio)`
/// go to the test partition.
pub fn stratified_split(records: &[NameRecord], test_ratio: f64, seed: u64) -> DatasetSplit {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut split = DatasetSplit {
        train: Vec::new(),
        test: Vec::new(),
    };

    for gender in Gender::ALL {
        let mut class: Vec<NameRecord> = records.iter().filter(|r| r.gender == gender).cloned().collect();
        class.shuffle(&mut rng);

        let test_size = ((class.len() as f64) * test_ratio).round() as usize;
        let train = class.split_off(test_size.min(class.len()));
        split.test.extend(class);
        split.train.extend(train);
    }

    split
}

/// Fits a vectorizer and classifier on `records`.
pub fn fit(records: &[NameRecord], alpha: f64) -> Result<Predictor, TrainingError> {
    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    let labels: Vec<Gender> = records.iter().map(|r| r.gender).collect();

    let vectorizer = NgramVectorizer::fit(names.iter().copied());
    if vectorizer.vocabulary_size() == 0 {
        return Err(TrainingError::EmptyVocabulary);
    }
    let x = vectorizer.transform_batch(names.iter().copied());
    let classifier = GenderClassifier::fit(x, &labels, alpha)?;

    Predictor::new(vectorizer, classifier).map_err(|e| TrainingError::Fit(e.to_string()))
}

/// A fitted predictor together with its held-out evaluation.
pub struct TrainedModel {
    pub predictor: Predictor,
    pub report: EvaluationReport,
    pub train_size: usize,
    pub test_size: usize,
}

/// Splits, fits on the train partition only, and evaluates on the rest.
pub fn train(records: &[NameRecord], options: &TrainingOptions) -> Result<TrainedModel, TrainingError> {
    options.validate()?;
    let split = stratified_split(records, options.test_ratio, options.seed);
    info!(
        train = split.train.len(),
        test = split.test.len(),
        seed = options.seed,
        "stratified split"
    );

    let predictor = fit(&split.train, options.alpha)?;
    info!(
        vocabulary = predictor.vectorizer().vocabulary_size(),
        "model fitted"
    );

    let report = evaluate(&predictor, &split.test)?;
    info!(accuracy = report.accuracy, "evaluation finished");

    Ok(TrainedModel {
        predictor,
        report,
        train_size: split.train.len(),
        test_size: split.test.len(),
    })
}

/// Model output for one held-out record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestPrediction {
    pub name: String,
    pub expected: Gender,
    pub predicted: Gender,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Accuracy and per-class metrics on the test partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub male: ClassMetrics,
    pub female: ClassMetrics,
    pub predictions: Vec<TestPrediction>,
}

impl EvaluationReport {
    pub fn metrics(&self, gender: Gender) -> &ClassMetrics {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }
}

/// Scores the statistical model (no override table) on labeled records.
/// Every record is classified; the first failure aborts the evaluation.
pub fn evaluate(predictor: &Predictor, records: &[NameRecord]) -> Result<EvaluationReport, TrainingError> {
    let mut predictions = Vec::with_capacity(records.len());
    for r in records {
        let p = predictor
            .classify(&r.name)
            .map_err(|source| TrainingError::Evaluation {
                name: r.name.clone(),
                source,
            })?;
        predictions.push(TestPrediction {
            name: r.name.clone(),
            expected: r.gender,
            predicted: p.gender,
            confidence: p.confidence,
        });
    }

    let correct = predictions.iter().filter(|p| p.expected == p.predicted).count();
    let accuracy = ratio(correct, predictions.len());

    Ok(EvaluationReport {
        accuracy,
        male: class_metrics(&predictions, Gender::Male),
        female: class_metrics(&predictions, Gender::Female),
        predictions,
    })
}

fn class_metrics(predictions: &[TestPrediction], gender: Gender) -> ClassMetrics {
    let tp = predictions
        .iter()
        .filter(|p| p.predicted == gender && p.expected == gender)
        .count();
    let predicted = predictions.iter().filter(|p| p.predicted == gender).count();
    let support = predictions.iter().filter(|p| p.expected == gender).count();

    let precision = ratio(tp, predicted);
    let recall = ratio(tp, support);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    ClassMetrics {
        precision,
        recall,
        f1,
        support,
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>10} {:>10} {:>10} {:>10} {:>10}", "", "precision", "recall", "f1-score", "support")?;
        for gender in Gender::ALL {
            let m = self.metrics(gender);
            writeln!(
                f,
                "{:>10} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                gender.as_str(),
                m.precision,
                m.recall,
                m.f1,
                m.support
            )?;
        }
        write!(f, "{:>10} {:>10} {:>10} {:>10.3} {:>10}", "accuracy", "", "", self.accuracy, self.predictions.len())
    }
}
