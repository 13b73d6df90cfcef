//! Persistence of prediction records.

use crate::error::StoreError;
use crate::pipeline::PredictionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_GENDER_LEN: usize = 10;

/// A stored prediction. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: u64,
    pub name: String,
    pub predicted_gender: String,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    fn build(id: u64, result: &PredictionResult) -> Result<Self, StoreError> {
        let predicted_gender = result.gender.as_str().to_string();
        check_len("name", &result.name, MAX_NAME_LEN)?;
        check_len("predicted_gender", &predicted_gender, MAX_GENDER_LEN)?;
        Ok(PredictionRecord {
            id,
            name: result.name.clone(),
            predicted_gender,
            confidence: result.confidence,
            created_at: Utc::now(),
        })
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), StoreError> {
    if value.chars().count() > max {
        return Err(StoreError::FieldTooLong { field, max });
    }
    Ok(())
}

/// Somewhere to write successful predictions.
pub trait PredictionStore: Send + Sync {
    fn save(&self, result: &PredictionResult) -> Result<PredictionRecord, StoreError>;
}

/// Keeps records in memory, for tests and in-process callers that read
/// them back through [`MemoryStore::records`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<PredictionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Result<Vec<PredictionRecord>, StoreError> {
        Ok(self.records.lock().map_err(|_| StoreError::Poisoned)?.clone())
    }
}

impl PredictionStore for MemoryStore {
    fn save(&self, result: &PredictionResult) -> Result<PredictionRecord, StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let record = PredictionRecord::build(records.len() as u64 + 1, result)?;
        records.push(record.clone());
        Ok(record)
    }
}

/// Appends one JSON object per line to a file.
#[derive(Debug)]
pub struct JsonLinesStore {
    path: PathBuf,
    last_id: Mutex<u64>,
}

impl JsonLinesStore {
    /// Opens the store, creating the file and its directory if absent.
    /// Ids continue after the records already in the file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(&path)?;

        let last_id = BufReader::new(File::open(&path)?)
            .lines()
            .filter(|line| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
            .count() as u64;

        Ok(JsonLinesStore {
            path,
            last_id: Mutex::new(last_id),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_all(&self) -> Result<Vec<PredictionRecord>, StoreError> {
        let file = File::open(&self.path)?;
        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if !line.trim().is_empty() {
                records.push(serde_json::from_str(&line)?);
            }
        }
        Ok(records)
    }
}

impl PredictionStore for JsonLinesStore {
    fn save(&self, result: &PredictionResult) -> Result<PredictionRecord, StoreError> {
        let mut last_id = self.last_id.lock().map_err(|_| StoreError::Poisoned)?;
        let record = PredictionRecord::build(*last_id + 1, result)?;

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');
        file.write_all(&line)?;

        *last_id = record.id;
        Ok(record)
    }
}
