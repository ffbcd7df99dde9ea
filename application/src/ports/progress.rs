//! Progress notification port
//!
//! Defines the interface for reporting progress during a batch of hearings.

use trial_domain::{BatchProgress, Case, CaseResult, SkippedCase, Utterance};

/// Callback for progress updates during a batch run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bar, plain lines, etc.)
pub trait HearingProgress: Send + Sync {
    /// Called once before the first case, with the number of input records
    /// and the number already completed in a resumed run
    fn on_batch_start(&self, total: usize, already_completed: usize);

    /// Called when a hearing starts
    fn on_case_start(&self, case: &Case);

    /// Called after every outer utterance
    fn on_utterance(&self, _case_index: i64, _utterance: &Utterance) {}

    /// Called after every specialist turn inside a team deliberation
    fn on_deliberation_turn(&self, _case_index: i64, _utterance: &Utterance) {}

    /// Called when a case has been scored
    fn on_case_complete(&self, result: &CaseResult);

    /// Called when a record is skipped (malformed, duplicate)
    fn on_case_skipped(&self, _skipped: &SkippedCase) {}

    /// Called when the batch stops, normally or not
    fn on_batch_complete(&self, _progress: &BatchProgress) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl HearingProgress for NoProgress {
    fn on_batch_start(&self, _total: usize, _already_completed: usize) {}
    fn on_case_start(&self, _case: &Case) {}
    fn on_case_complete(&self, _result: &CaseResult) {}
}
