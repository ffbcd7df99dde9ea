//! Team deliberation: the inner loop behind every delegate turn.
//!
//! The delegate restates the court's latest message as a seed, then the
//! side's specialists speak in strict round robin for a fixed number of
//! turns. The lead counsel's last message becomes the side's position.

use super::bench::TeamRoster;
use crate::ports::agent::TurnRequest;
use crate::ports::llm_gateway::GatewayError;
use crate::ports::progress::HearingProgress;
use thiserror::Error;
use tracing::debug;
use trial_domain::{PromptTemplate, Role, TurnKind, Utterance};

/// Errors that can occur inside a team deliberation
#[derive(Error, Debug)]
pub enum DeliberationError {
    #[error("{role} failed during team deliberation: {source}")]
    Agent {
        role: Role,
        #[source]
        source: GatewayError,
    },
}

/// A failed deliberation with everything said before the failure.
#[derive(Debug)]
pub struct DeliberationFailure {
    pub partial: Vec<Utterance>,
    pub error: DeliberationError,
}

/// Result of a completed deliberation.
#[derive(Debug, Clone)]
pub struct Deliberation {
    /// Seed followed by every specialist turn
    pub inner: Vec<Utterance>,
    /// The side's position for the courtroom
    pub synthesis: String,
}

impl Deliberation {
    /// Last lead-counsel message, else the chronologically last message.
    fn synthesize(inner: &[Utterance]) -> String {
        inner
            .iter()
            .rev()
            .find(|u| u.role.is_lead_counsel())
            .or_else(|| inner.last())
            .map(|u| u.content.clone())
            .unwrap_or_default()
    }
}

/// Inner round-robin loop for one side.
pub struct TeamDeliberation<'a> {
    roster: &'a TeamRoster,
    rounds: usize,
}

impl<'a> TeamDeliberation<'a> {
    pub fn new(roster: &'a TeamRoster, rounds: usize) -> Self {
        Self { roster, rounds }
    }

    /// Run exactly `rounds` specialist turns. There is no early exit.
    pub async fn run(
        &self,
        case_index: i64,
        description: &str,
        court_message: &str,
        progress: &dyn HearingProgress,
    ) -> Result<Deliberation, DeliberationFailure> {
        let side = self.roster.side();
        let members = self.roster.members();

        let mut inner = vec![Utterance::new(
            Role::delegate(side),
            TurnKind::Seed,
            PromptTemplate::team_seed(description, court_message),
        )];

        for turn in 0..self.rounds {
            let agent = &members[turn % members.len()];
            let role = agent.role();
            debug!(case = case_index, %side, turn, %role, "Team deliberation turn");

            match agent.reply(TurnRequest::new(&inner)).await {
                Ok(content) => {
                    let utterance = Utterance::new(role, TurnKind::Deliberation, content);
                    progress.on_deliberation_turn(case_index, &utterance);
                    inner.push(utterance);
                }
                Err(source) => {
                    return Err(DeliberationFailure {
                        partial: inner,
                        error: DeliberationError::Agent { role, source },
                    });
                }
            }
        }

        let synthesis = Deliberation::synthesize(&inner);
        Ok(Deliberation { inner, synthesis })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use crate::use_cases::test_support::TestBench;
    use trial_domain::Side;

    #[tokio::test]
    async fn test_round_robin_order_and_synthesis() {
        let bench = TestBench::new();
        let roster = bench.bench.team(Side::Plaintiff);

        let result = TeamDeliberation::new(roster, 3)
            .run(1, "案情", "请原告陈述", &NoProgress)
            .await
            .unwrap();

        let speakers: Vec<Role> = result.inner.iter().map(|u| u.role).collect();
        assert_eq!(
            speakers,
            vec![
                Role::PlaintiffDelegate,
                Role::PlaintiffEvidenceSpecialist,
                Role::PlaintiffLegalResearcher,
                Role::PlaintiffLeadCounsel,
            ]
        );
        assert_eq!(result.inner[0].kind, TurnKind::Seed);
        assert!(result.inner[0].content.contains("法庭传来消息：请原告陈述"));
        assert_eq!(result.synthesis, "PlaintiffLeadCounsel 发言 #1");
    }

    #[tokio::test]
    async fn test_no_consecutive_repeats_over_many_rounds() {
        let bench = TestBench::new();
        let result = TeamDeliberation::new(bench.bench.team(Side::Defendant), 7)
            .run(1, "案情", "msg", &NoProgress)
            .await
            .unwrap();

        assert_eq!(result.inner.len(), 8);
        for pair in result.inner.windows(2) {
            assert_ne!(pair[0].role, pair[1].role);
        }
        // turn 7 is the evidence specialist; lead counsel spoke last at turn 6
        assert_eq!(result.synthesis, "DefendantLeadCounsel 发言 #2");
    }

    #[tokio::test]
    async fn test_without_lead_counsel_falls_back_to_last_message() {
        let bench = TestBench::new();
        let result = TeamDeliberation::new(bench.bench.team(Side::Plaintiff), 2)
            .run(1, "案情", "msg", &NoProgress)
            .await
            .unwrap();
        assert_eq!(result.synthesis, "PlaintiffLegalResearcher 发言 #1");
    }

    #[tokio::test]
    async fn test_zero_rounds_returns_seed() {
        let bench = TestBench::new();
        let result = TeamDeliberation::new(bench.bench.team(Side::Plaintiff), 0)
            .run(1, "案情", "msg", &NoProgress)
            .await
            .unwrap();
        assert_eq!(result.inner.len(), 1);
        assert_eq!(result.synthesis, result.inner[0].content);
        assert_eq!(bench.plaintiff[0].calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_keeps_partial_transcript() {
        let bench = TestBench::new();
        bench.plaintiff[1].fail_on_call(1);

        let failure = TeamDeliberation::new(bench.bench.team(Side::Plaintiff), 3)
            .run(1, "案情", "msg", &NoProgress)
            .await
            .unwrap_err();

        assert_eq!(failure.partial.len(), 2);
        assert_eq!(failure.partial[1].role, Role::PlaintiffEvidenceSpecialist);
        let DeliberationError::Agent { role, .. } = failure.error;
        assert_eq!(role, Role::PlaintiffLegalResearcher);
        assert_eq!(bench.plaintiff[2].calls(), 0);
    }
}
