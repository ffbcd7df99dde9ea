//! Termination state machine for the outer courtroom loop.
//!
//! The hearing loop owns a [`CourtTerminator`] and feeds it every new
//! utterance. The terminator never dispatches turns itself; it answers with a
//! [`TerminationSignal`] and the loop acts on it.
//!
//! Evaluation order for each observed utterance:
//!
//! 1. absorbing terminal state
//! 2. "has spoken" bookkeeping (subject to [`SupplementAccounting`])
//! 3. closing keyword from the judge
//! 4. pending plaintiff supplement, then pending defendant supplement

use super::role::{Role, Side};
use super::utterance::{TurnKind, Utterance};
use serde::{Deserialize, Serialize};

/// Phrases that let the judge close the hearing.
pub const DEFAULT_CLOSING_KEYWORDS: [&str; 3] = ["庭审结束", "本次审理到此结束", "宣判完毕"];

/// How supplemental-evidence turns are booked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SupplementAccounting {
    /// Supplement turns neither mark the side as having spoken nor consume
    /// outer round budget.
    #[default]
    Excluded,
    /// Supplement turns count like any other delegate turn.
    Included,
}

impl SupplementAccounting {
    /// Whether an utterance of `kind` is booked against speakers and budget.
    pub fn counts(&self, kind: TurnKind) -> bool {
        kind != TurnKind::Supplement || *self == SupplementAccounting::Included
    }
}

impl std::str::FromStr for SupplementAccounting {
    type Err = crate::core::error::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "excluded" | "exclude" => Ok(SupplementAccounting::Excluded),
            "included" | "include" => Ok(SupplementAccounting::Included),
            other => Err(crate::core::error::DomainError::InvalidHearing(format!(
                "unknown supplement accounting '{}'",
                other
            ))),
        }
    }
}

/// Per-case flags; each only moves from `false` to `true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationState {
    pub plaintiff_has_spoken: bool,
    pub defendant_has_spoken: bool,
    pub plaintiff_supplement_delivered: bool,
    pub defendant_supplement_delivered: bool,
}

impl TerminationState {
    pub fn has_spoken(&self, side: Side) -> bool {
        match side {
            Side::Plaintiff => self.plaintiff_has_spoken,
            Side::Defendant => self.defendant_has_spoken,
        }
    }

    pub fn supplement_delivered(&self, side: Side) -> bool {
        match side {
            Side::Plaintiff => self.plaintiff_supplement_delivered,
            Side::Defendant => self.defendant_supplement_delivered,
        }
    }

    fn mark_spoken(&mut self, side: Side) {
        match side {
            Side::Plaintiff => self.plaintiff_has_spoken = true,
            Side::Defendant => self.defendant_has_spoken = true,
        }
    }

    fn mark_supplement_delivered(&mut self, side: Side) {
        match side {
            Side::Plaintiff => self.plaintiff_supplement_delivered = true,
            Side::Defendant => self.defendant_supplement_delivered = true,
        }
    }
}

/// Answer to a newly observed utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    /// Keep going with normal speaker selection
    Continue,
    /// Give `Side` its one forced supplemental-evidence turn next
    Supplement(Side),
    /// The judge closed the hearing
    Terminate,
}

/// Why a hearing stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Judge uttered a closing keyword
    ClosingKeyword,
    /// Judge delivered the final judgment without a closing keyword
    FinalJudgment,
    /// Outer round budget ran out
    RoundBudget,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::ClosingKeyword => write!(f, "closing keyword"),
            TerminationReason::FinalJudgment => write!(f, "final judgment"),
            TerminationReason::RoundBudget => write!(f, "round budget"),
        }
    }
}

/// Closing-keyword set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClosingKeywords(Vec<String>);

impl ClosingKeywords {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            keywords
                .into_iter()
                .map(Into::into)
                .filter(|k: &String| !k.is_empty())
                .collect(),
        )
    }

    pub fn matches(&self, content: &str) -> bool {
        self.0.iter().any(|k| content.contains(k.as_str()))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for ClosingKeywords {
    fn default() -> Self {
        Self::new(DEFAULT_CLOSING_KEYWORDS)
    }
}

/// Termination predicate owned by the hearing loop.
#[derive(Debug, Clone)]
pub struct CourtTerminator {
    state: TerminationState,
    plaintiff_has_evidence: bool,
    defendant_has_evidence: bool,
    keywords: ClosingKeywords,
    accounting: SupplementAccounting,
    terminated: bool,
}

impl CourtTerminator {
    pub fn new(
        plaintiff_has_evidence: bool,
        defendant_has_evidence: bool,
        keywords: ClosingKeywords,
        accounting: SupplementAccounting,
    ) -> Self {
        Self {
            state: TerminationState::default(),
            plaintiff_has_evidence,
            defendant_has_evidence,
            keywords,
            accounting,
            terminated: false,
        }
    }

    pub fn state(&self) -> TerminationState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn accounting(&self) -> SupplementAccounting {
        self.accounting
    }

    fn has_evidence(&self, side: Side) -> bool {
        match side {
            Side::Plaintiff => self.plaintiff_has_evidence,
            Side::Defendant => self.defendant_has_evidence,
        }
    }

    /// Observe a newly appended utterance.
    pub fn observe(&mut self, utterance: &Utterance) -> TerminationSignal {
        if self.terminated {
            return TerminationSignal::Terminate;
        }

        if utterance.role.is_delegate()
            && self.accounting.counts(utterance.kind)
            && let Some(side) = utterance.role.side()
        {
            self.state.mark_spoken(side);
        }

        if utterance.role == Role::Judge && self.keywords.matches(&utterance.content) {
            self.terminated = true;
            return TerminationSignal::Terminate;
        }

        for side in Side::ALL {
            if self.state.has_spoken(side)
                && !self.state.supplement_delivered(side)
                && self.has_evidence(side)
            {
                self.state.mark_supplement_delivered(side);
                return TerminationSignal::Supplement(side);
            }
        }

        TerminationSignal::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminator(plaintiff: bool, defendant: bool) -> CourtTerminator {
        CourtTerminator::new(
            plaintiff,
            defendant,
            ClosingKeywords::default(),
            SupplementAccounting::Excluded,
        )
    }

    fn argument(role: Role) -> Utterance {
        Utterance::new(role, TurnKind::Argument, "陈述")
    }

    #[test]
    fn test_judge_closing_keyword_terminates() {
        let mut t = terminator(false, false);
        let closing = Utterance::new(Role::Judge, TurnKind::FinalJudgment, "宣判完毕。");
        assert_eq!(t.observe(&closing), TerminationSignal::Terminate);
        assert!(t.is_terminated());
    }

    #[test]
    fn test_non_judge_keyword_is_ignored() {
        let mut t = terminator(false, false);
        let u = Utterance::new(Role::PlaintiffDelegate, TurnKind::Argument, "我方认为庭审结束为时尚早");
        assert_eq!(t.observe(&u), TerminationSignal::Continue);
    }

    #[test]
    fn test_terminal_state_is_absorbing() {
        let mut t = terminator(true, true);
        t.observe(&Utterance::new(Role::Judge, TurnKind::Commentary, "庭审结束"));
        assert_eq!(
            t.observe(&argument(Role::PlaintiffDelegate)),
            TerminationSignal::Terminate
        );
        assert!(!t.state().plaintiff_supplement_delivered);
    }

    #[test]
    fn test_supplement_offered_once_per_side() {
        let mut t = terminator(true, false);
        assert_eq!(
            t.observe(&argument(Role::PlaintiffDelegate)),
            TerminationSignal::Supplement(Side::Plaintiff)
        );
        let supplement = Utterance::new(Role::PlaintiffDelegate, TurnKind::Supplement, "补充");
        assert_eq!(t.observe(&supplement), TerminationSignal::Continue);
        assert_eq!(
            t.observe(&argument(Role::PlaintiffDelegate)),
            TerminationSignal::Continue
        );
        assert!(t.state().plaintiff_supplement_delivered);
    }

    #[test]
    fn test_no_supplement_without_evidence() {
        let mut t = terminator(false, false);
        assert_eq!(
            t.observe(&argument(Role::PlaintiffDelegate)),
            TerminationSignal::Continue
        );
        assert!(t.state().plaintiff_has_spoken);
        assert!(!t.state().plaintiff_supplement_delivered);
    }

    #[test]
    fn test_plaintiff_resolved_before_defendant() {
        let mut t = terminator(true, true);
        // Defendant speaks first, plaintiff has not spoken: only defendant pending.
        assert_eq!(
            t.observe(&argument(Role::DefendantDelegate)),
            TerminationSignal::Supplement(Side::Defendant)
        );

        let mut t = terminator(true, true);
        t.state.mark_spoken(Side::Plaintiff);
        t.state.mark_spoken(Side::Defendant);
        assert_eq!(
            t.observe(&Utterance::new(Role::Judge, TurnKind::Commentary, "继续")),
            TerminationSignal::Supplement(Side::Plaintiff)
        );
        assert_eq!(
            t.observe(&Utterance::new(Role::PlaintiffDelegate, TurnKind::Supplement, "补充")),
            TerminationSignal::Supplement(Side::Defendant)
        );
    }

    #[test]
    fn test_excluded_supplement_does_not_mark_spoken() {
        let mut t = terminator(false, false);
        t.observe(&Utterance::new(Role::DefendantDelegate, TurnKind::Supplement, "补充"));
        assert!(!t.state().defendant_has_spoken);

        let mut t = CourtTerminator::new(
            false,
            false,
            ClosingKeywords::default(),
            SupplementAccounting::Included,
        );
        t.observe(&Utterance::new(Role::DefendantDelegate, TurnKind::Supplement, "补充"));
        assert!(t.state().defendant_has_spoken);
    }

    #[test]
    fn test_accounting_parse() {
        assert_eq!(
            "included".parse::<SupplementAccounting>().unwrap(),
            SupplementAccounting::Included
        );
        assert!("maybe".parse::<SupplementAccounting>().is_err());
    }

    #[test]
    fn test_custom_keywords_skip_empty() {
        let keywords = ClosingKeywords::new(["", "休庭"]);
        assert_eq!(keywords.as_slice().len(), 1);
        assert!(keywords.matches("现在休庭"));
        assert!(!keywords.matches("宣判完毕"));
    }
}
