//! JSONL file writer for hearing events.
//!
//! Each [`ConversationEvent`] is serialized as a single JSON line with
//! `type`, `timestamp` and `run` fields. The file is opened in append mode so
//! a resumed batch continues the log of the interrupted run; `run` tells the
//! invocations apart.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;
use trial_application::{ConversationEvent, ConversationLogger};

/// Default log file name under the output directory
pub const CONVERSATION_LOG_FILE: &str = "run.conversation.jsonl";

/// JSONL conversation logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every event and
/// on `Drop`.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    run: String,
}

impl JsonlConversationLogger {
    /// Open (or create) the log at `path`, creating parent directories.
    ///
    /// Returns `None` if the file cannot be opened; the batch then runs
    /// without a conversation log.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create conversation log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not open conversation log file {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            run: Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string(),
        })
    }

    /// `<out_dir>/run.conversation.jsonl`
    pub fn in_dir(out_dir: impl AsRef<Path>) -> Option<Self> {
        Self::new(out_dir.as_ref().join(CONVERSATION_LOG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn run_id(&self) -> &str {
        &self.run
    }

    fn record(&self, event: ConversationEvent) -> Value {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut map = match event.payload {
            Value::Object(map) => map,
            other => {
                let mut map = serde_json::Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        map.insert("type".to_string(), Value::from(event.event_type));
        map.insert("timestamp".to_string(), Value::from(timestamp));
        map.insert("run".to_string(), Value::from(self.run.as_str()));
        Value::Object(map)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(line) = serde_json::to_string(&self.record(event)) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trial_domain::{Role, SkippedCase, TurnKind, Utterance};

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_jsonl_logger_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let logger = JsonlConversationLogger::in_dir(dir.path()).unwrap();
        let path = logger.path().to_path_buf();

        let opening = Utterance::new(Role::Judge, TurnKind::Opening, "现在开庭。");
        logger.log(ConversationEvent::utterance(3, &opening));
        logger.log(ConversationEvent::case_skipped(&SkippedCase {
            index: Some(4),
            case_id: None,
            reason: "missing index or case_description".to_string(),
        }));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        for line in &lines {
            assert!(line.get("timestamp").is_some());
            assert!(line.get("run").is_some());
        }
        assert_eq!(lines[0]["type"], "utterance");
        assert_eq!(lines[0]["speaker"], "PresidingJudge");
        assert_eq!(lines[0]["content"], "现在开庭。");
        assert_eq!(lines[1]["type"], "case_skipped");
    }

    #[test]
    fn test_jsonl_logger_handles_non_object_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new("simple_event", Value::from("just a string")));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "simple_event");
        assert_eq!(lines[0]["data"], "just a string");
    }

    #[test]
    fn test_reopening_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.conversation.jsonl");

        let first = JsonlConversationLogger::new(&path).unwrap();
        first.log(ConversationEvent::batch_aborted(1, "backend down"));
        drop(first);

        let second = JsonlConversationLogger::new(&path).unwrap();
        second.log(ConversationEvent::batch_aborted(1, "backend down"));
        drop(second);

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_jsonl_logger_returns_none_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        assert!(JsonlConversationLogger::new(blocker.join("log.jsonl")).is_none());
    }
}
