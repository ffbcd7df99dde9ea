//! Per-case transcripts, `<out>/<index>_conversation.json`.

use super::{io_error, write_atomic};
use std::path::{Path, PathBuf};
use tracing::debug;
use trial_application::{StoreError, TranscriptStore};
use trial_domain::Transcript;

pub struct JsonTranscriptStore {
    dir: PathBuf,
}

impl JsonTranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, index: i64) -> PathBuf {
        self.dir.join(format!("{}_conversation.json", index))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TranscriptStore for JsonTranscriptStore {
    /// Pretty-printed UTF-8 JSON; reruns overwrite the previous file.
    fn save(&self, index: i64, transcript: &Transcript) -> Result<String, StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        let path = self.path_for(index);
        let bytes = serde_json::to_vec_pretty(transcript)?;
        write_atomic(&path, &bytes)?;
        debug!(path = %path.display(), utterances = transcript.len(), "transcript saved");
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trial_domain::{Role, TurnKind, Utterance};

    fn transcript() -> Transcript {
        let mut t = Transcript::new();
        t.push(Utterance::new(Role::Judge, TurnKind::Opening, "现在开庭。"));
        t.push(
            Utterance::new(Role::PlaintiffDelegate, TurnKind::Argument, "公诉意见").with_inner_transcript(
                vec![Utterance::new(Role::PlaintiffLeadCounsel, TurnKind::Deliberation, "总结")],
            ),
        );
        t
    }

    #[test]
    fn test_save_writes_readable_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTranscriptStore::new(dir.path());

        let path = store.save(42, &transcript()).unwrap();
        assert!(path.ends_with("42_conversation.json"));

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("现在开庭。"));
        assert!(raw.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["name"], "PresidingJudge");
        assert_eq!(value[1]["interconversation"][0]["content"], "总结");
    }

    #[test]
    fn test_rerun_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTranscriptStore::new(dir.path());
        store.save(1, &transcript()).unwrap();
        store.save(1, &Transcript::new()).unwrap();

        let raw = std::fs::read_to_string(store.path_for(1)).unwrap();
        let loaded: Transcript = serde_json::from_str(&raw).unwrap();
        assert!(loaded.is_empty());
    }
}
