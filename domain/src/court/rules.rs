//! Protocol parameters of a hearing.

use super::selection::{SelectionPolicy, SpeakerSelector};
use super::termination::{ClosingKeywords, SupplementAccounting};
use crate::config::validation::{ConfigIssue, ConfigIssueCode};

pub const DEFAULT_OUTER_ROUNDS: usize = 10;
pub const DEFAULT_INNER_ROUNDS: usize = 3;
pub const DEFAULT_FINAL_PHASE_AT: usize = 8;

/// Turn budgets and policies for one hearing (Value Object).
#[derive(Debug, Clone, PartialEq)]
pub struct HearingRules {
    /// Budgeted outer turns, opening and final judgment included
    pub outer_rounds: usize,
    /// Specialist turns per team deliberation (seed not counted)
    pub inner_rounds: usize,
    pub selection: SelectionPolicy,
    /// Budgeted turns after which the phase-gated selector asks for judgment
    pub final_phase_at: usize,
    pub supplement_accounting: SupplementAccounting,
    pub closing_keywords: ClosingKeywords,
}

impl Default for HearingRules {
    fn default() -> Self {
        Self {
            outer_rounds: DEFAULT_OUTER_ROUNDS,
            inner_rounds: DEFAULT_INNER_ROUNDS,
            selection: SelectionPolicy::default(),
            final_phase_at: DEFAULT_FINAL_PHASE_AT,
            supplement_accounting: SupplementAccounting::default(),
            closing_keywords: ClosingKeywords::default(),
        }
    }
}

impl HearingRules {
    pub fn with_outer_rounds(mut self, rounds: usize) -> Self {
        self.outer_rounds = rounds;
        self
    }

    pub fn with_inner_rounds(mut self, rounds: usize) -> Self {
        self.inner_rounds = rounds;
        self
    }

    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_final_phase_at(mut self, turns: usize) -> Self {
        self.final_phase_at = turns;
        self
    }

    pub fn with_supplement_accounting(mut self, accounting: SupplementAccounting) -> Self {
        self.supplement_accounting = accounting;
        self
    }

    pub fn with_closing_keywords(mut self, keywords: ClosingKeywords) -> Self {
        self.closing_keywords = keywords;
        self
    }

    pub fn selector(&self) -> Box<dyn SpeakerSelector> {
        self.selection.build(self.final_phase_at)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.outer_rounds < 2 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OuterRoundsTooSmall,
                format!(
                    "outer_rounds = {} leaves no turn for the final judgment (minimum 2)",
                    self.outer_rounds
                ),
            ));
        }
        if self.inner_rounds == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InnerRoundsZero,
                "inner_rounds = 0: delegates will repeat the court's message verbatim",
            ));
        }
        if self.selection == SelectionPolicy::PhaseGated && self.final_phase_at >= self.outer_rounds
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::FinalPhaseUnreachable,
                format!(
                    "final_phase_at = {} is not below outer_rounds = {}; the final judgment only comes from the round budget",
                    self.final_phase_at, self.outer_rounds
                ),
            ));
        }
        if self.closing_keywords.as_slice().is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoClosingKeywords,
                "no closing keywords configured",
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::{Severity, has_errors};

    #[test]
    fn test_defaults_are_valid() {
        assert!(HearingRules::default().validate().is_empty());
    }

    #[test]
    fn test_tiny_budget_is_an_error() {
        let issues = HearingRules::default().with_outer_rounds(1).validate();
        assert!(has_errors(&issues));
        assert!(
            issues
                .iter()
                .any(|i| i.code == ConfigIssueCode::OuterRoundsTooSmall)
        );
    }

    #[test]
    fn test_unreachable_final_phase_warns() {
        let issues = HearingRules::default().with_final_phase_at(10).validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].code, ConfigIssueCode::FinalPhaseUnreachable);
    }

    #[test]
    fn test_final_phase_ignored_for_other_policies() {
        let issues = HearingRules::default()
            .with_selection(SelectionPolicy::RoundRobin)
            .with_final_phase_at(50)
            .validate();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_empty_keywords_warn() {
        let issues = HearingRules::default()
            .with_closing_keywords(ClosingKeywords::new(Vec::<String>::new()))
            .validate();
        assert_eq!(issues[0].code, ConfigIssueCode::NoClosingKeywords);
    }
}
