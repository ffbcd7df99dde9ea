//! Batch input files: the case array and the optional ground-truth table.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use trial_domain::{GroundTruth, parse_truth_table};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} must contain a JSON array of records")]
    NotAnArray(PathBuf),
}

/// Reads raw records; per-record validation happens in the batch use case
/// so that malformed records are skipped rather than failing the load.
pub struct DatasetLoader;

impl DatasetLoader {
    pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Value>, DatasetError> {
        let path = path.as_ref();
        let records = Self::read_array(path)?;
        info!(path = %path.display(), records = records.len(), "loaded case records");
        Ok(records)
    }

    /// `CaseId` → normalized truth.
    pub fn load_truth(
        path: impl AsRef<Path>,
    ) -> Result<BTreeMap<String, GroundTruth>, DatasetError> {
        let path = path.as_ref();
        let table = parse_truth_table(&Self::read_array(path)?);
        info!(path = %path.display(), entries = table.len(), "loaded ground truth");
        Ok(table)
    }

    fn read_array(path: &Path) -> Result<Vec<Value>, DatasetError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        // Tolerate a UTF-8 BOM left by spreadsheet exports.
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
        match serde_json::from_str(raw).map_err(|source| DatasetError::Parse {
            path: path.to_path_buf(),
            source,
        })? {
            Value::Array(items) => Ok(items),
            _ => Err(DatasetError::NotAnArray(path.to_path_buf())),
        }
    }
}
