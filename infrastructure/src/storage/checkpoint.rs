//! Resumable batch progress in `checkpoint.json`.

use super::{io_error, write_atomic};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use trial_application::{CheckpointStore, StoreError};
use trial_domain::BatchProgress;

pub const CHECKPOINT_FILE: &str = "checkpoint.json";

#[derive(Serialize, Deserialize)]
struct CheckpointFile {
    saved_at: DateTime<Utc>,
    progress: BatchProgress,
}

/// Checkpoint overwritten atomically after every case.
pub struct JsonCheckpointStore {
    path: PathBuf,
}

impl JsonCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<out_dir>/checkpoint.json`
    pub fn in_dir(out_dir: impl AsRef<Path>) -> Self {
        Self::new(out_dir.as_ref().join(CHECKPOINT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CheckpointStore for JsonCheckpointStore {
    fn load(&self) -> Option<BatchProgress> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no checkpoint, starting fresh");
                return None;
            }
            Err(e) => {
                warn!(error = %io_error(&self.path, e), "checkpoint unreadable, starting fresh");
                return None;
            }
        };

        match serde_json::from_str::<CheckpointFile>(&raw) {
            Ok(file) => {
                info!(
                    path = %self.path.display(),
                    saved_at = %file.saved_at,
                    completed = file.progress.completed_count(),
                    "resuming from checkpoint"
                );
                Some(file.progress)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "checkpoint corrupt, starting fresh");
                None
            }
        }
    }

    fn save(&self, progress: &BatchProgress) -> Result<(), StoreError> {
        let file = CheckpointFile {
            saved_at: Utc::now(),
            progress: progress.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&file)?;
        write_atomic(&self.path, &bytes)?;
        debug!(path = %self.path.display(), completed = progress.completed_count(), "checkpoint saved");
        Ok(())
    }
}
