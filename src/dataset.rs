//! Labeled name data for training.

use crate::Gender;
use crate::error::DatasetError;
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

const NAME_COLUMN: &str = "name";
const GENDER_COLUMN: &str = "gender";

/// A single name with its normalized gender label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub name: String,
    pub gender: Gender,
}

impl NameRecord {
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        NameRecord {
            name: name.into(),
            gender,
        }
    }
}

/// Cleaned rows plus how many raw rows were discarded.
#[derive(Debug, Clone, Default)]
pub struct LoadedDataset {
    pub records: Vec<NameRecord>,
    pub dropped: usize,
}

impl LoadedDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count(&self, gender: Gender) -> usize {
        self.records.iter().filter(|r| r.gender == gender).count()
    }
}

/// Loads and cleans a CSV file. See [`read_records`].
pub fn load_csv(path: &Path) -> Result<LoadedDataset, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_records(file)?;
    info!(
        path = %path.display(),
        kept = dataset.len(),
        dropped = dataset.dropped,
        male = dataset.count(Gender::Male),
        female = dataset.count(Gender::Female),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Reads `Name`/`Gender` rows from CSV.
///
/// Headers are matched case-insensitively after trimming; missing columns
/// fail before any row is read. Names are trimmed and lowercased. Rows with
/// an empty name or a gender outside the known label set are dropped.
pub fn read_records<R: Read>(reader: R) -> Result<LoadedDataset, DatasetError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let name_idx = column_index(&headers, NAME_COLUMN)?;
    let gender_idx = column_index(&headers, GENDER_COLUMN)?;

    let mut dataset = LoadedDataset::default();
    for result in rdr.records() {
        let row = result?;
        let name = row.get(name_idx).unwrap_or("").trim().to_lowercase();
        let raw_gender = row.get(gender_idx).unwrap_or("");

        match Gender::from_label(raw_gender) {
            Some(gender) if !name.is_empty() => dataset.records.push(NameRecord { name, gender }),
            _ => {
                debug!(name = %name, gender = raw_gender, "dropping row");
                dataset.dropped += 1;
            }
        }
    }

    Ok(dataset)
}

fn column_index(headers: &StringRecord, column: &'static str) -> Result<usize, DatasetError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(column))
        .ok_or(DatasetError::MissingColumn(column))
}
