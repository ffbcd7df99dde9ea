//! Output configuration from TOML (`[output]` and `[batch]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use trial_domain::ReportFormat;

/// Raw output configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Directory for transcripts, checkpoint, metrics and logs
    pub dir: PathBuf,
    /// Summary format printed at the end of a batch
    pub format: ReportFormat,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            format: ReportFormat::default(),
            color: true,
        }
    }
}

/// Batch inputs; usually given on the command line instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBatchConfig {
    /// JSON array of case records
    pub cases: Option<PathBuf>,
    /// Optional ground-truth table keyed by `CaseId`
    pub truth: Option<PathBuf>,
}
