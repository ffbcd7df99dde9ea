//! End-of-batch metrics, `<out>/metrics.json`.

use super::write_atomic;
use std::path::{Path, PathBuf};
use tracing::info;
use trial_application::{ReportWriter, StoreError};
use trial_domain::MetricsReport;

pub const METRICS_FILE: &str = "metrics.json";

pub struct JsonReportWriter {
    path: PathBuf,
}

impl JsonReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(out_dir: impl AsRef<Path>) -> Self {
        Self::new(out_dir.as_ref().join(METRICS_FILE))
    }
}

impl ReportWriter for JsonReportWriter {
    fn write(&self, report: &MetricsReport) -> Result<String, StoreError> {
        let bytes = serde_json::to_vec_pretty(report)?;
        write_atomic(&self.path, &bytes)?;
        info!(path = %self.path.display(), cases = report.per_case.len(), "metrics written");
        Ok(self.path.display().to_string())
    }
}
