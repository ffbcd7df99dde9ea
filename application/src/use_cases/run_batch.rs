//! Run Batch use case
//!
//! Drives a list of case records through [`RunHearingUseCase`] one at a
//! time, scoring each hearing and checkpointing after every completed or
//! skipped case so that an interrupted run can be resumed.

use super::run_hearing::{HearingOutcome, RunHearingError, RunHearingUseCase};
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::progress::HearingProgress;
use crate::ports::storage::{CheckpointStore, ReportWriter, StoreError, TranscriptStore};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use trial_domain::{
    BatchProgress, Case, CaseResult, CategoryScore, GroundTruth, MetricsReport, SkippedCase,
    parse_case, retrieval_overlap,
};

/// Errors that stop a batch
#[derive(Error, Debug)]
pub enum RunBatchError {
    #[error("Case {index} failed: {source}")]
    CaseFailed {
        index: i64,
        #[source]
        source: RunHearingError,
    },

    #[error("Could not write transcript of case {index}: {source}")]
    TranscriptWrite {
        index: i64,
        #[source]
        source: StoreError,
    },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Input for the RunBatch use case
#[derive(Debug, Clone, Default)]
pub struct RunBatchInput {
    /// Raw records of the batch input file
    pub records: Vec<Value>,
    /// `CaseId → truth` table that overrides inline annotations
    pub truth: Option<BTreeMap<String, GroundTruth>>,
}

impl RunBatchInput {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records,
            truth: None,
        }
    }

    pub fn with_truth(mut self, truth: BTreeMap<String, GroundTruth>) -> Self {
        self.truth = Some(truth);
        self
    }
}

/// Result of a batch run that was not aborted by an error
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub progress: BatchProgress,
    /// Cases completed by this run (not counting resumed ones)
    pub newly_completed: usize,
    /// A cancellation request stopped the run early
    pub interrupted: bool,
    /// Location of the metrics report, if one was written
    pub report_path: Option<String>,
}

/// Use case for running a batch of hearings
pub struct RunBatchUseCase {
    hearing: RunHearingUseCase,
    checkpoints: Arc<dyn CheckpointStore>,
    transcripts: Arc<dyn TranscriptStore>,
    reports: Arc<dyn ReportWriter>,
}

impl RunBatchUseCase {
    pub fn new(
        hearing: RunHearingUseCase,
        checkpoints: Arc<dyn CheckpointStore>,
        transcripts: Arc<dyn TranscriptStore>,
        reports: Arc<dyn ReportWriter>,
    ) -> Self {
        Self {
            hearing,
            checkpoints,
            transcripts,
            reports,
        }
    }

    pub async fn execute(
        &self,
        input: RunBatchInput,
        progress: &dyn HearingProgress,
        logger: &dyn ConversationLogger,
        cancellation: &CancellationToken,
    ) -> Result<BatchOutcome, RunBatchError> {
        let mut state = match self.checkpoints.load() {
            Some(state) => {
                info!(
                    completed = state.completed_count(),
                    skipped = state.skipped_cases.len(),
                    "Resuming from checkpoint"
                );
                state
            }
            None => {
                info!("Starting a new batch");
                BatchProgress::new()
            }
        };

        progress.on_batch_start(input.records.len(), state.completed_count());

        let mut seen = HashSet::new();
        let mut newly_completed = 0;
        let mut interrupted = false;
        let mut failure = None;

        for record in &input.records {
            if cancellation.is_cancelled() {
                interrupted = true;
                break;
            }

            let case = match parse_case(record) {
                Ok(case) => case,
                Err(rejection) => {
                    warn!(
                        index = ?rejection.index,
                        case_id = ?rejection.case_id,
                        reason = %rejection.reason,
                        "Skipping malformed record"
                    );
                    self.skip(
                        &mut state,
                        SkippedCase {
                            index: rejection.index,
                            case_id: rejection.case_id,
                            reason: rejection.reason,
                        },
                        progress,
                        logger,
                    )?;
                    continue;
                }
            };

            // The first occurrence owns the index; later ones are recorded
            // without it so an index is never both completed and skipped.
            if !seen.insert(case.index) {
                warn!(index = case.index, "Skipping duplicate index");
                self.skip(
                    &mut state,
                    SkippedCase {
                        index: None,
                        case_id: Some(case.case_id.clone()),
                        reason: format!("duplicate index {}", case.index),
                    },
                    progress,
                    logger,
                )?;
                continue;
            }

            if state.is_completed(case.index) {
                info!(index = case.index, "Case already completed, skipping");
                continue;
            }

            let case = match input.truth.as_ref().and_then(|t| t.get(&case.case_id)) {
                Some(truth) => case.with_truth(truth.clone()),
                None => case,
            };

            match self
                .run_case(&case, &mut state, progress, logger, cancellation)
                .await
            {
                Ok(()) => newly_completed += 1,
                Err(CaseStop::Cancelled) => {
                    warn!(index = case.index, "Batch interrupted; case left incomplete");
                    interrupted = true;
                    break;
                }
                Err(CaseStop::Failed(e)) => {
                    warn!(index = case.index, error = %e, "Stopping batch; rerun resumes from checkpoint");
                    logger.log(ConversationEvent::batch_aborted(case.index, &e.to_string()));
                    failure = Some(e);
                    break;
                }
            }
        }

        self.checkpoints.save(&state)?;

        let report_path = match MetricsReport::from_progress(&state) {
            Some(report) => Some(self.reports.write(&report)?),
            None => None,
        };
        progress.on_batch_complete(&state);

        if let Some(e) = failure {
            return Err(e);
        }

        Ok(BatchOutcome {
            progress: state,
            newly_completed,
            interrupted,
            report_path,
        })
    }

    fn skip(
        &self,
        state: &mut BatchProgress,
        skipped: SkippedCase,
        progress: &dyn HearingProgress,
        logger: &dyn ConversationLogger,
    ) -> Result<(), StoreError> {
        if state.record_skipped(skipped.clone()) {
            progress.on_case_skipped(&skipped);
            logger.log(ConversationEvent::case_skipped(&skipped));
            self.checkpoints.save(state)?;
        }
        Ok(())
    }

    async fn run_case(
        &self,
        case: &Case,
        state: &mut BatchProgress,
        progress: &dyn HearingProgress,
        logger: &dyn ConversationLogger,
        cancellation: &CancellationToken,
    ) -> Result<(), CaseStop> {
        progress.on_case_start(case);
        logger.log(ConversationEvent::case_start(case));
        let started = Instant::now();

        let outcome = match self
            .hearing
            .execute(case, progress, logger, cancellation)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => return Err(CaseStop::Cancelled),
            Err(e) => {
                if let Err(write_err) = self.transcripts.save(case.index, e.transcript()) {
                    warn!(index = case.index, error = %write_err, "Could not save partial transcript");
                }
                return Err(CaseStop::Failed(RunBatchError::CaseFailed {
                    index: case.index,
                    source: e,
                }));
            }
        };

        let transcript_path = self
            .transcripts
            .save(case.index, &outcome.transcript)
            .map_err(|source| {
                CaseStop::Failed(RunBatchError::TranscriptWrite {
                    index: case.index,
                    source,
                })
            })?;

        let result = score_case(case, outcome, started.elapsed().as_secs_f64(), transcript_path);
        info!(
            index = result.index,
            f1 = result.law_articles.score.f1,
            crime_f1 = result.crime_types.score.f1,
            elapsed_secs = result.elapsed_secs,
            "Case completed"
        );
        logger.log(ConversationEvent::case_end(&result));
        progress.on_case_complete(&result);
        state.record_completed(result);
        self.checkpoints
            .save(state)
            .map_err(|e| CaseStop::Failed(e.into()))?;
        Ok(())
    }
}

enum CaseStop {
    Cancelled,
    Failed(RunBatchError),
}

fn score_case(
    case: &Case,
    outcome: HearingOutcome,
    elapsed_secs: f64,
    transcript_path: String,
) -> CaseResult {
    let HearingOutcome {
        transcript,
        termination,
        judgment,
        retrieved,
        ..
    } = outcome;

    CaseResult {
        index: case.index,
        case_id: case.case_id.clone(),
        retrieval_overlap: retrieval_overlap(&retrieved, &case.truth.articles),
        law_articles: CategoryScore::score(judgment.articles, case.truth.articles.clone()),
        crime_types: CategoryScore::score(judgment.crime_types, case.truth.crime_types.clone()),
        sentence: judgment.sentence,
        fine: judgment.fine,
        retrieved_articles: retrieved,
        termination,
        turns: transcript.len(),
        elapsed_secs,
        transcript_path,
    }
}
