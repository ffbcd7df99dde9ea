//! Scoring of predicted judgments and batch-level aggregation.

pub mod metrics;
pub mod progress;

pub use metrics::{CategoryScore, Prf1, compute_prf1, retrieval_overlap};
pub use progress::{
    BatchAverages, BatchProgress, CaseResult, MetricSums, MetricsReport, RunningSums, SkippedCase,
};
