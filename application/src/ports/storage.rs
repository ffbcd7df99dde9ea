//! Persistence ports for batch runs.
//!
//! All writes are synchronous and small; adapters decide file layout.

use thiserror::Error;
use trial_domain::{BatchProgress, MetricsReport, Transcript};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Resumable batch state.
pub trait CheckpointStore: Send + Sync {
    /// Last saved progress. Missing or unreadable state yields `None`.
    fn load(&self) -> Option<BatchProgress>;

    /// Replace the saved progress.
    fn save(&self, progress: &BatchProgress) -> Result<(), StoreError>;
}

/// Per-case transcript files.
pub trait TranscriptStore: Send + Sync {
    /// Write (or overwrite) the transcript of case `index`; returns its location.
    fn save(&self, index: i64, transcript: &Transcript) -> Result<String, StoreError>;
}

/// End-of-batch metrics document.
pub trait ReportWriter: Send + Sync {
    /// Write the report; returns its location.
    fn write(&self, report: &MetricsReport) -> Result<String, StoreError>;
}
