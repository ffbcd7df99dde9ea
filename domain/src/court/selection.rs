//! Speaker selection strategies for the outer courtroom loop.
//!
//! The hearing loop handles the opening statement, forced supplement turns
//! and the round-budget cap itself. A [`SpeakerSelector`] only decides who
//! takes the floor next during the debate, or that the judge should deliver
//! the final judgment early.

use super::role::Role;
use super::utterance::Utterance;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// What the selector wants to happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// `Role` takes a normal debate turn
    Speak(Role),
    /// Move on to the judge's final judgment
    FinalJudgment,
}

/// Inputs available to a selector.
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext<'a> {
    /// Outer transcript so far (opening included)
    pub history: &'a [Utterance],
    /// Turns booked against the outer round budget so far
    pub turns_used: usize,
}

impl SelectionContext<'_> {
    /// Speaker of the most recent turn that took the floor.
    pub fn last_floor_speaker(&self) -> Option<Role> {
        self.history
            .iter()
            .rev()
            .find(|u| u.kind.takes_floor())
            .map(|u| u.role)
    }
}

/// Strategy interface: `history -> next speaker`.
pub trait SpeakerSelector: Send + Sync {
    fn name(&self) -> &'static str;

    fn select(&self, ctx: &SelectionContext<'_>) -> Selection;
}

/// Debate rotation used by round robin and the middle phase of
/// [`PhaseGatedSelector`].
const ROTATION: [Role; 3] = [Role::PlaintiffDelegate, Role::DefendantDelegate, Role::Judge];

fn next_in_rotation(last: Option<Role>) -> Role {
    match last {
        // The judge opened; plaintiff always argues first.
        None => ROTATION[0],
        Some(role) => {
            let pos = ROTATION.iter().position(|r| *r == role).unwrap_or(ROTATION.len() - 1);
            ROTATION[(pos + 1) % ROTATION.len()]
        }
    }
}

/// Strict round robin over plaintiff, defendant, judge commentary.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinSelector;

impl SpeakerSelector for RoundRobinSelector {
    fn name(&self) -> &'static str {
        "round-robin"
    }

    fn select(&self, ctx: &SelectionContext<'_>) -> Selection {
        Selection::Speak(next_in_rotation(ctx.last_floor_speaker()))
    }
}

/// Plaintiff and defendant alternate; the judge only opens and closes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlternatingSelector;

impl SpeakerSelector for AlternatingSelector {
    fn name(&self) -> &'static str {
        "alternating"
    }

    fn select(&self, ctx: &SelectionContext<'_>) -> Selection {
        match ctx.last_floor_speaker() {
            Some(Role::PlaintiffDelegate) => Selection::Speak(Role::DefendantDelegate),
            _ => Selection::Speak(Role::PlaintiffDelegate),
        }
    }
}

/// Message-count-gated phases: opening, open debate, final judgment.
///
/// During the debate every candidate (plaintiff, defendant, judge) gets the
/// floor in turn and nobody speaks twice in a row. Once `final_phase_at`
/// budgeted turns have been used, the judge is asked for the final judgment.
#[derive(Debug, Clone, Copy)]
pub struct PhaseGatedSelector {
    pub final_phase_at: usize,
}

impl SpeakerSelector for PhaseGatedSelector {
    fn name(&self) -> &'static str {
        "phase-gated"
    }

    fn select(&self, ctx: &SelectionContext<'_>) -> Selection {
        if ctx.turns_used >= self.final_phase_at {
            return Selection::FinalJudgment;
        }
        Selection::Speak(next_in_rotation(ctx.last_floor_speaker()))
    }
}

/// Configurable choice of selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    RoundRobin,
    Alternating,
    #[default]
    PhaseGated,
}

impl SelectionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionPolicy::RoundRobin => "round-robin",
            SelectionPolicy::Alternating => "alternating",
            SelectionPolicy::PhaseGated => "phase-gated",
        }
    }

    /// Build the selector. `final_phase_at` only affects
    /// [`SelectionPolicy::PhaseGated`].
    pub fn build(&self, final_phase_at: usize) -> Box<dyn SpeakerSelector> {
        match self {
            SelectionPolicy::RoundRobin => Box::new(RoundRobinSelector),
            SelectionPolicy::Alternating => Box::new(AlternatingSelector),
            SelectionPolicy::PhaseGated => Box::new(PhaseGatedSelector { final_phase_at }),
        }
    }
}

impl std::fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SelectionPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "round-robin" | "roundrobin" => Ok(SelectionPolicy::RoundRobin),
            "alternating" => Ok(SelectionPolicy::Alternating),
            "phase-gated" | "phased" => Ok(SelectionPolicy::PhaseGated),
            other => Err(DomainError::InvalidHearing(format!(
                "unknown selection policy '{}'",
                other
            ))),
        }
    }
}
