//! MessagePack persistence of the vectorizer and classifier.
//!
//! Artifacts come in pairs: a "clean" primary pair and an "original"
//! fallback pair. Each pair must be internally consistent (classifier width
//! equal to the vectorizer's vocabulary size), but the two pairs are
//! independent models and may disagree.

use crate::classifier::GenderClassifier;
use crate::config::ArtifactsConfig;
use crate::error::ArtifactError;
use crate::features::NgramVectorizer;
use crate::pipeline::Predictor;
use rmp_serde::{decode::from_read, encode::write_named};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Which pair a predictor was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Primary,
    Fallback,
}

/// Locations of one vectorizer/classifier pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPair {
    pub vectorizer: PathBuf,
    pub classifier: PathBuf,
}

impl ArtifactPair {
    pub fn new(vectorizer: impl Into<PathBuf>, classifier: impl Into<PathBuf>) -> Self {
        ArtifactPair {
            vectorizer: vectorizer.into(),
            classifier: classifier.into(),
        }
    }

    /// Writes both artifacts, creating parent directories as needed.
    pub fn save(&self, predictor: &Predictor) -> Result<(), ArtifactError> {
        write_artifact(&self.vectorizer, predictor.vectorizer())?;
        write_artifact(&self.classifier, predictor.classifier())?;
        info!(
            vectorizer = %self.vectorizer.display(),
            classifier = %self.classifier.display(),
            "artifacts saved"
        );
        Ok(())
    }

    /// Reads both artifacts and checks that they belong together.
    pub fn load(&self) -> Result<Predictor, ArtifactError> {
        let vectorizer: NgramVectorizer = read_artifact(&self.vectorizer)?;
        let classifier: GenderClassifier = read_artifact(&self.classifier)?;
        Predictor::new(vectorizer, classifier)
    }
}

/// Primary pair plus the pair used when the primary cannot be loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactSet {
    pub primary: ArtifactPair,
    pub fallback: ArtifactPair,
}

impl ArtifactSet {
    pub fn from_config(config: &ArtifactsConfig) -> Self {
        let dir = Path::new(&config.dir);
        ArtifactSet {
            primary: ArtifactPair::new(
                dir.join(&config.primary_vectorizer),
                dir.join(&config.primary_classifier),
            ),
            fallback: ArtifactPair::new(
                dir.join(&config.fallback_vectorizer),
                dir.join(&config.fallback_classifier),
            ),
        }
    }

    /// Loads the primary pair, falling back to the secondary one. Fails
    /// only when neither pair is usable.
    pub fn load(&self) -> Result<(Predictor, ArtifactKind), ArtifactError> {
        let primary_err = match self.primary.load() {
            Ok(predictor) => {
                info!(vectorizer = %self.primary.vectorizer.display(), "clean model loaded");
                return Ok((predictor, ArtifactKind::Primary));
            }
            Err(e) => e,
        };
        warn!(error = %primary_err, "primary artifacts unavailable, trying fallback");

        match self.fallback.load() {
            Ok(predictor) => {
                warn!(vectorizer = %self.fallback.vectorizer.display(), "fallback model loaded");
                Ok((predictor, ArtifactKind::Fallback))
            }
            Err(fallback_err) => Err(ArtifactError::NoUsablePair {
                primary: Box::new(primary_err),
                fallback: Box::new(fallback_err),
            }),
        }
    }
}

fn write_artifact<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let io_err = |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    write_named(&mut writer, value).map_err(|source| ArtifactError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_err)
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_read(BufReader::new(file)).map_err(|source| ArtifactError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
