//! Courtroom protocol domain.
//!
//! # Structure
//!
//! ```text
//! Outer courtroom loop          Inner team loop (per delegate turn)
//! ────────────────────          ───────────────────────────────────
//! Judge (opening)               Seed (delegate restates the court)
//!   ↓                             ↓
//! SpeakerSelector ──────────▶  EvidenceSpecialist
//!   ↓                          LegalResearcher
//! CourtTerminator              LeadCounsel ──▶ delegate's Argument
//!   ↓
//! Judge (final judgment)
//! ```
//!
//! - [`role`]: typed roles and sides
//! - [`utterance`] / [`transcript`]: messages and their ordered log
//! - [`termination`]: closing keywords, supplement bookkeeping
//! - [`selection`]: configurable speaker selection strategies
//! - [`rules`]: turn budgets and policies of a hearing

pub mod phase;
pub mod role;
pub mod rules;
pub mod selection;
pub mod termination;
pub mod transcript;
pub mod utterance;

pub use phase::HearingPhase;
pub use role::{Role, Side, TeamSeat};
pub use rules::{
    DEFAULT_FINAL_PHASE_AT, DEFAULT_INNER_ROUNDS, DEFAULT_OUTER_ROUNDS, HearingRules,
};
pub use selection::{
    AlternatingSelector, PhaseGatedSelector, RoundRobinSelector, Selection, SelectionContext,
    SelectionPolicy, SpeakerSelector,
};
pub use termination::{
    ClosingKeywords, CourtTerminator, DEFAULT_CLOSING_KEYWORDS, SupplementAccounting,
    TerminationReason, TerminationSignal, TerminationState,
};
pub use transcript::Transcript;
pub use utterance::{TurnKind, Utterance};
