//! Utterances exchanged in the courtroom and inside team deliberations.

use super::role::Role;
use serde::{Deserialize, Serialize};

/// What kind of turn produced an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    /// Judge's templated opening statement (always message 1)
    Opening,
    /// A delegate's position, synthesized by its team
    Argument,
    /// Judge speaking during the debate
    Commentary,
    /// Forced one-off delegate turn carrying supplemental evidence
    Supplement,
    /// Judge's closing judgment carrying the structured block
    FinalJudgment,
    /// Opening message of an inner deliberation
    Seed,
    /// A specialist's turn inside an inner deliberation
    Deliberation,
}

impl TurnKind {
    /// Whether this turn hands the floor to the next speaker.
    ///
    /// Supplements and the final judgment are forced turns and never drive
    /// speaker rotation.
    pub fn takes_floor(&self) -> bool {
        matches!(
            self,
            TurnKind::Opening | TurnKind::Argument | TurnKind::Commentary
        )
    }
}

/// A single message in a transcript (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    #[serde(rename = "name")]
    pub role: Role,
    pub kind: TurnKind,
    pub content: String,
    /// Inner deliberation that produced this utterance, kept for audit
    #[serde(
        rename = "interconversation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub inner_transcript: Option<Vec<Utterance>>,
}

impl Utterance {
    pub fn new(role: Role, kind: TurnKind, content: impl Into<String>) -> Self {
        Self {
            role,
            kind,
            content: content.into(),
            inner_transcript: None,
        }
    }

    pub fn with_inner_transcript(mut self, inner: Vec<Utterance>) -> Self {
        self.inner_transcript = Some(inner);
        self
    }

    pub fn is_from(&self, role: Role) -> bool {
        self.role == role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let inner = vec![Utterance::new(
            Role::PlaintiffLeadCounsel,
            TurnKind::Deliberation,
            "总结",
        )];
        let utterance = Utterance::new(Role::PlaintiffDelegate, TurnKind::Argument, "总结")
            .with_inner_transcript(inner);

        let value = serde_json::to_value(&utterance).unwrap();
        assert_eq!(value["name"], "PlaintiffTeamDelegate");
        assert_eq!(value["kind"], "argument");
        assert_eq!(value["interconversation"][0]["name"], "PlaintiffLeadCounsel");
    }

    #[test]
    fn test_inner_transcript_omitted_when_absent() {
        let utterance = Utterance::new(Role::Judge, TurnKind::Opening, "法庭辩论现在开始。");
        let value = serde_json::to_value(&utterance).unwrap();
        assert!(value.get("interconversation").is_none());
    }

    #[test]
    fn test_forced_turns_do_not_take_floor() {
        assert!(TurnKind::Argument.takes_floor());
        assert!(!TurnKind::Supplement.takes_floor());
        assert!(!TurnKind::FinalJudgment.takes_floor());
    }
}
