//! Hearing transcript.

use super::role::Role;
use super::utterance::{TurnKind, Utterance};
use serde::{Deserialize, Serialize};

/// Ordered, append-only list of utterances for one case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    utterances: Vec<Utterance>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, utterance: Utterance) {
        self.utterances.push(utterance);
    }

    pub fn utterances(&self) -> &[Utterance] {
        &self.utterances
    }

    pub fn len(&self) -> usize {
        self.utterances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    pub fn last(&self) -> Option<&Utterance> {
        self.utterances.last()
    }

    /// Most recent utterance by `role`.
    pub fn last_from(&self, role: Role) -> Option<&Utterance> {
        self.utterances.iter().rev().find(|u| u.is_from(role))
    }

    /// Judge utterances, newest first.
    pub fn judge_utterances_rev(&self) -> impl Iterator<Item = &Utterance> {
        self.utterances.iter().rev().filter(|u| u.is_from(Role::Judge))
    }

    /// Number of utterances of a given kind.
    pub fn count_kind(&self, kind: TurnKind) -> usize {
        self.utterances.iter().filter(|u| u.kind == kind).count()
    }

    pub fn into_utterances(self) -> Vec<Utterance> {
        self.utterances
    }
}
