//! Domain layer for mock-trial
//!
//! This crate contains the courtroom protocol, judgment extraction and
//! scoring. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Hearing
//!
//! A hearing is a two-level conversation:
//!
//! - **Outer courtroom loop**: the judge and one delegate per side
//! - **Inner team loop**: inside each delegate turn, the side's evidence
//!   specialist, legal researcher and lead counsel deliberate in round robin
//!
//! [`CourtTerminator`] decides when the hearing ends and when a side gets its
//! one supplemental-evidence turn. [`SpeakerSelector`] picks who speaks next.
//!
//! ## Evaluation
//!
//! The judge's final structured block is parsed into a [`Judgment`] and
//! scored against the case's [`GroundTruth`] with [`compute_prf1`].

pub mod case;
pub mod config;
pub mod core;
pub mod court;
pub mod evaluation;
pub mod judgment;
pub mod prompt;

// Re-export commonly used types
pub use case::{ArticleId, Case, GroundTruth, RecordRejection, parse_case, parse_truth_table};
pub use config::{ConfigIssue, ConfigIssueCode, ReportFormat, Severity};
pub use core::{error::DomainError, model::Model};
pub use court::{
    ClosingKeywords, CourtTerminator, HearingPhase, HearingRules, Role, Selection, SelectionContext,
    SelectionPolicy, Side, SpeakerSelector, SupplementAccounting, TeamSeat, TerminationReason,
    TerminationSignal, TerminationState, Transcript, TurnKind, Utterance,
};
pub use evaluation::{
    BatchAverages, BatchProgress, CaseResult, CategoryScore, MetricsReport, Prf1, SkippedCase,
    compute_prf1, retrieval_overlap,
};
pub use judgment::{Judgment, extract_from_transcript, extract_judgment};
pub use prompt::{PromptCatalog, PromptTemplate};
