//! File-backed stores under the batch output directory.
//!
//! ```text
//! <out>/
//! ├── checkpoint.json            JsonCheckpointStore
//! ├── metrics.json               JsonReportWriter
//! └── <index>_conversation.json  JsonTranscriptStore
//! ```

mod checkpoint;
mod dataset;
mod report;
mod transcript;

pub use checkpoint::{CHECKPOINT_FILE, JsonCheckpointStore};
pub use dataset::{DatasetError, DatasetLoader};
pub use report::{JsonReportWriter, METRICS_FILE};
pub use transcript::JsonTranscriptStore;

use std::io::Write;
use std::path::Path;
use trial_application::StoreError;

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let mut file = std::fs::File::create(&tmp).map_err(|e| io_error(&tmp, e))?;
    file.write_all(bytes).map_err(|e| io_error(&tmp, e))?;
    file.sync_all().map_err(|e| io_error(&tmp, e))?;
    drop(file);

    std::fs::rename(&tmp, path).map_err(|e| io_error(path, e))
}
