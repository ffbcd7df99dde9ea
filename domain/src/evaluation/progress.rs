//! Batch bookkeeping: per-case results, skips and running sums.
//!
//! [`BatchProgress`] is what the checkpoint persists. Its serialized shape is
//!
//! ```text
//! { results, case_cnt, law_articles{sum_p,sum_r,sum_f1},
//!   crime_type{sum_p,sum_r,sum_f1}, sum_retrieval_overlap,
//!   completed_indices, skipped_cases }
//! ```

use super::metrics::{CategoryScore, Prf1};
use crate::case::ArticleId;
use crate::court::TerminationReason;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Outcome of one completed hearing. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    pub index: i64,
    #[serde(rename = "CaseId")]
    pub case_id: String,
    pub law_articles: CategoryScore<ArticleId>,
    pub crime_types: CategoryScore<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fine: Option<Value>,
    pub retrieved_articles: BTreeSet<ArticleId>,
    pub retrieval_overlap: f64,
    pub termination: TerminationReason,
    /// Utterances in the outer transcript
    pub turns: usize,
    pub elapsed_secs: f64,
    pub transcript_path: String,
}

/// A record that was not heard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedCase {
    pub index: Option<i64>,
    #[serde(rename = "CaseId")]
    pub case_id: Option<String>,
    pub reason: String,
}

/// Float accumulators for one scored category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSums {
    pub sum_p: f64,
    pub sum_r: f64,
    pub sum_f1: f64,
}

impl MetricSums {
    fn add(&mut self, score: &Prf1) {
        self.sum_p += score.precision;
        self.sum_r += score.recall;
        self.sum_f1 += score.f1;
    }

    fn average(&self, cases: usize) -> Prf1 {
        let n = cases as f64;
        Prf1 {
            precision: self.sum_p / n,
            recall: self.sum_r / n,
            f1: self.sum_f1 / n,
        }
    }
}

/// Running sums over completed cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningSums {
    #[serde(rename = "case_cnt")]
    pub cases: usize,
    pub law_articles: MetricSums,
    #[serde(rename = "crime_type")]
    pub crime_types: MetricSums,
    #[serde(rename = "sum_retrieval_overlap")]
    pub retrieval_overlap: f64,
}

/// Batch-wide averages over completed cases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchAverages {
    #[serde(flatten)]
    pub law_articles: Prf1,
    #[serde(rename = "crime_type")]
    pub crime_types: Prf1,
    pub retrieval_overlap: f64,
    pub cases: usize,
}

/// Resumable state of a batch run.
///
/// An index is either completed or skipped, never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchProgress {
    #[serde(default)]
    pub results: Vec<CaseResult>,
    #[serde(flatten)]
    pub sums: RunningSums,
    #[serde(default)]
    pub completed_indices: BTreeSet<i64>,
    #[serde(default)]
    pub skipped_cases: Vec<SkippedCase>,
}

impl BatchProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self, index: i64) -> bool {
        self.completed_indices.contains(&index)
    }

    pub fn completed_count(&self) -> usize {
        self.sums.cases
    }

    /// Fold a finished case into the sums.
    ///
    /// Returns `false` (and changes nothing) if the index was already
    /// completed. A previous skip of the same index is cleared.
    pub fn record_completed(&mut self, result: CaseResult) -> bool {
        if !self.completed_indices.insert(result.index) {
            return false;
        }
        self.skipped_cases.retain(|s| s.index != Some(result.index));

        self.sums.cases += 1;
        self.sums.law_articles.add(&result.law_articles.score);
        self.sums.crime_types.add(&result.crime_types.score);
        self.sums.retrieval_overlap += result.retrieval_overlap;
        self.results.push(result);
        true
    }

    /// Record a skip.
    ///
    /// Ignored when the index already completed, or when the same skip is
    /// already on record (reruns see the same malformed records again).
    pub fn record_skipped(&mut self, skipped: SkippedCase) -> bool {
        if let Some(index) = skipped.index
            && self.is_completed(index)
        {
            return false;
        }
        if self.skipped_cases.contains(&skipped) {
            return false;
        }
        self.skipped_cases.push(skipped);
        true
    }

    /// Averages over completed cases; `None` before the first completion.
    pub fn averages(&self) -> Option<BatchAverages> {
        let cases = self.sums.cases;
        if cases == 0 {
            return None;
        }
        Some(BatchAverages {
            law_articles: self.sums.law_articles.average(cases),
            crime_types: self.sums.crime_types.average(cases),
            retrieval_overlap: self.sums.retrieval_overlap / cases as f64,
            cases,
        })
    }
}

/// Final metrics document written at the end of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub per_case: Vec<CaseResult>,
    pub average: BatchAverages,
}

impl MetricsReport {
    pub fn from_progress(progress: &BatchProgress) -> Option<Self> {
        Some(Self {
            per_case: progress.results.clone(),
            average: progress.averages()?,
        })
    }
}
