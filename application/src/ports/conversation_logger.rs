//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording hearing events
//! (case start/end, every utterance, skips, aborts) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! conversation in a machine-readable format (JSONL).

use serde_json::{Value, json};
use trial_domain::{Case, CaseResult, SkippedCase, Utterance};

/// A structured conversation event for logging.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. Adapters add the timestamp.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "case_start", "utterance", "case_skipped").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn case_start(case: &Case) -> Self {
        Self::new(
            "case_start",
            json!({
                "index": case.index,
                "case_id": case.case_id,
            }),
        )
    }

    /// An outer utterance. Inner transcripts are logged as their own events.
    pub fn utterance(case_index: i64, utterance: &Utterance) -> Self {
        Self::new(
            "utterance",
            json!({
                "index": case_index,
                "speaker": utterance.role.as_str(),
                "kind": utterance.kind,
                "content": utterance.content,
            }),
        )
    }

    pub fn deliberation(case_index: i64, utterance: &Utterance) -> Self {
        Self::new(
            "deliberation",
            json!({
                "index": case_index,
                "speaker": utterance.role.as_str(),
                "content": utterance.content,
            }),
        )
    }

    pub fn case_end(result: &CaseResult) -> Self {
        Self::new(
            "case_end",
            json!({
                "index": result.index,
                "case_id": result.case_id,
                "termination": result.termination,
                "turns": result.turns,
                "law_articles_f1": result.law_articles.score.f1,
                "crime_types_f1": result.crime_types.score.f1,
            }),
        )
    }

    pub fn case_skipped(skipped: &SkippedCase) -> Self {
        Self::new(
            "case_skipped",
            json!({
                "index": skipped.index,
                "case_id": skipped.case_id,
                "reason": skipped.reason,
            }),
        )
    }

    pub fn batch_aborted(case_index: i64, error: &str) -> Self {
        Self::new(
            "batch_aborted",
            json!({
                "index": case_index,
                "error": error,
            }),
        )
    }
}

/// Port for logging conversation events to a structured log.
///
/// The `log` method is synchronous and non-fallible; logging failures are
/// silently ignored by adapters.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
