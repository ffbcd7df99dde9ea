//! Run Hearing use case
//!
//! Orchestrates one case through the outer courtroom loop:
//!
//! 1. retrieve candidate articles (best-effort)
//! 2. templated judge opening
//! 3. debate turns chosen by the [`SpeakerSelector`](trial_domain::SpeakerSelector),
//!    delegate turns backed by a [`TeamDeliberation`]
//! 4. forced supplement turns signalled by the [`CourtTerminator`]
//! 5. the judge's final judgment, unless a closing keyword ends the hearing first

use super::bench::Bench;
use super::deliberate::{DeliberationError, DeliberationFailure, TeamDeliberation};
use crate::config::HearingParams;
use crate::ports::agent::TurnRequest;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::llm_gateway::GatewayError;
use crate::ports::progress::HearingProgress;
use crate::ports::retriever::CaseRetriever;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use trial_domain::{
    ArticleId, Case, CourtTerminator, HearingPhase, Judgment, PromptTemplate, Role, Selection,
    SelectionContext, Side, TerminationReason, TerminationSignal, Transcript, TurnKind, Utterance,
    extract_from_transcript,
};

/// Errors that can occur during a hearing.
///
/// Every variant carries the transcript as far as it got.
#[derive(Error, Debug)]
pub enum RunHearingError {
    #[error("{role} failed: {source}")]
    Agent {
        role: Role,
        #[source]
        source: GatewayError,
        transcript: Transcript,
    },

    #[error("{side} team deliberation failed: {source}")]
    Deliberation {
        side: Side,
        #[source]
        source: DeliberationError,
        transcript: Transcript,
    },

    #[error("Hearing cancelled")]
    Cancelled { transcript: Transcript },
}

impl RunHearingError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunHearingError::Cancelled { .. })
    }

    pub fn transcript(&self) -> &Transcript {
        match self {
            RunHearingError::Agent { transcript, .. }
            | RunHearingError::Deliberation { transcript, .. }
            | RunHearingError::Cancelled { transcript } => transcript,
        }
    }
}

/// Result of a hearing that ran to termination.
#[derive(Debug, Clone)]
pub struct HearingOutcome {
    pub transcript: Transcript,
    pub termination: TerminationReason,
    pub judgment: Judgment,
    pub retrieved: BTreeSet<ArticleId>,
    /// Turns booked against the outer round budget
    pub budget_turns: usize,
}

/// Use case for hearing a single case
pub struct RunHearingUseCase {
    bench: Bench,
    retriever: Arc<dyn CaseRetriever>,
    params: HearingParams,
}

/// Mutable state of one hearing.
struct Hearing<'a> {
    case: &'a Case,
    transcript: Transcript,
    terminator: CourtTerminator,
    phase: HearingPhase,
    turns_used: usize,
    progress: &'a dyn HearingProgress,
    logger: &'a dyn ConversationLogger,
}

impl Hearing<'_> {
    /// Append an utterance, book it and feed it to the terminator.
    fn record(&mut self, utterance: Utterance) -> TerminationSignal {
        if self.terminator.accounting().counts(utterance.kind) {
            self.turns_used += 1;
        }
        self.progress.on_utterance(self.case.index, &utterance);
        self.logger
            .log(ConversationEvent::utterance(self.case.index, &utterance));
        if let Some(inner) = &utterance.inner_transcript {
            for turn in inner.iter().filter(|u| u.kind == TurnKind::Deliberation) {
                self.logger
                    .log(ConversationEvent::deliberation(self.case.index, turn));
            }
        }

        let signal = self.terminator.observe(&utterance);
        self.transcript.push(utterance);
        signal
    }

    fn enter(&mut self, phase: HearingPhase) {
        if self.phase != phase {
            debug!(case = self.case.index, from = %self.phase, to = %phase, "Hearing phase");
            self.phase = phase;
        }
    }
}

impl RunHearingUseCase {
    pub fn new(bench: Bench, retriever: Arc<dyn CaseRetriever>, params: HearingParams) -> Self {
        Self {
            bench,
            retriever,
            params,
        }
    }

    pub fn params(&self) -> &HearingParams {
        &self.params
    }

    /// Retrieve candidate articles; failures degrade to an empty set.
    async fn retrieve(&self, case: &Case) -> BTreeSet<ArticleId> {
        match self.retriever.similar_articles(&case.description).await {
            Ok(articles) => {
                debug!(case = case.index, count = articles.len(), "Retrieved candidate articles");
                articles
            }
            Err(e) => {
                warn!(case = case.index, error = %e, "Similar-case retrieval failed");
                BTreeSet::new()
            }
        }
    }

    pub async fn execute(
        &self,
        case: &Case,
        progress: &dyn HearingProgress,
        logger: &dyn ConversationLogger,
        cancellation: &CancellationToken,
    ) -> Result<HearingOutcome, RunHearingError> {
        let rules = &self.params.rules;
        let selector = rules.selector();
        let retrieved = self.retrieve(case).await;

        let mut hearing = Hearing {
            case,
            transcript: Transcript::new(),
            terminator: CourtTerminator::new(
                case.has_evidence(Side::Plaintiff),
                case.has_evidence(Side::Defendant),
                rules.closing_keywords.clone(),
                rules.supplement_accounting,
            ),
            phase: HearingPhase::Start,
            turns_used: 0,
            progress,
            logger,
        };

        info!(
            case = case.index,
            case_id = %case.case_id,
            selector = selector.name(),
            outer_rounds = rules.outer_rounds,
            "Hearing started"
        );

        if !self.params.opening_pause.is_zero() {
            tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    return Err(RunHearingError::Cancelled { transcript: hearing.transcript });
                }
                _ = tokio::time::sleep(self.params.opening_pause) => {}
            }
        }

        hearing.enter(HearingPhase::AwaitingJudgeOpening);
        let opening = Utterance::new(
            Role::Judge,
            TurnKind::Opening,
            PromptTemplate::opening(case, &retrieved),
        );
        let mut signal = hearing.record(opening);
        let mut final_delivered = false;

        let termination = loop {
            match signal {
                TerminationSignal::Terminate => break TerminationReason::ClosingKeyword,
                TerminationSignal::Supplement(side) => {
                    if hearing.terminator.accounting().counts(TurnKind::Supplement)
                        && hearing.turns_used >= rules.outer_rounds
                    {
                        break TerminationReason::RoundBudget;
                    }
                    hearing.enter(HearingPhase::SupplementPending(side));
                    info!(case = case.index, %side, "Supplemental evidence turn");
                    let supplement = Utterance::new(
                        Role::delegate(side),
                        TurnKind::Supplement,
                        PromptTemplate::supplement(side, case.evidence(side)),
                    );
                    signal = hearing.record(supplement);
                    continue;
                }
                TerminationSignal::Continue => {}
            }

            if final_delivered {
                break TerminationReason::FinalJudgment;
            }
            if hearing.turns_used >= rules.outer_rounds {
                break TerminationReason::RoundBudget;
            }
            if cancellation.is_cancelled() {
                return Err(RunHearingError::Cancelled {
                    transcript: hearing.transcript,
                });
            }

            let selection = if hearing.turns_used + 1 >= rules.outer_rounds {
                Selection::FinalJudgment
            } else {
                selector.select(&SelectionContext {
                    history: hearing.transcript.utterances(),
                    turns_used: hearing.turns_used,
                })
            };

            let utterance = match selection {
                Selection::FinalJudgment => {
                    hearing.enter(HearingPhase::AwaitingFinalJudgment);
                    final_delivered = true;
                    let content = self
                        .judge_turn(&hearing, PromptTemplate::final_judgment_directive(), cancellation)
                        .await;
                    Utterance::new(Role::Judge, TurnKind::FinalJudgment, take(content, &mut hearing)?)
                }
                Selection::Speak(role) => match role.side() {
                    None => {
                        hearing.enter(HearingPhase::Deliberating);
                        let content = self
                            .judge_turn(&hearing, PromptTemplate::commentary_directive(), cancellation)
                            .await;
                        Utterance::new(Role::Judge, TurnKind::Commentary, take(content, &mut hearing)?)
                    }
                    Some(side) => {
                        hearing.enter(HearingPhase::Deliberating);
                        self.delegate_turn(&mut hearing, side, cancellation).await?
                    }
                },
            };
            signal = hearing.record(utterance);
        };

        hearing.enter(HearingPhase::Terminated);
        let judgment = extract_from_transcript(&hearing.transcript);
        info!(
            case = case.index,
            %termination,
            utterances = hearing.transcript.len(),
            predicted_articles = judgment.articles.len(),
            "Hearing finished"
        );

        Ok(HearingOutcome {
            transcript: hearing.transcript,
            termination,
            judgment,
            retrieved,
            budget_turns: hearing.turns_used,
        })
    }

    async fn judge_turn(
        &self,
        hearing: &Hearing<'_>,
        instruction: &str,
        cancellation: &CancellationToken,
    ) -> Result<String, TurnError> {
        let request = TurnRequest::new(hearing.transcript.utterances()).with_instruction(instruction);
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(TurnError::Cancelled),
            reply = self.bench.judge().reply(request) => {
                reply.map_err(|source| TurnError::Agent { role: Role::Judge, source })
            }
        }
    }

    /// A delegate turn: run the team, then speak its synthesis.
    async fn delegate_turn(
        &self,
        hearing: &mut Hearing<'_>,
        side: Side,
        cancellation: &CancellationToken,
    ) -> Result<Utterance, RunHearingError> {
        let delegate = Role::delegate(side);
        let case = hearing.case;
        let progress = hearing.progress;
        let court_message = hearing
            .transcript
            .last()
            .map(|u| u.content.clone())
            .unwrap_or_default();
        let deliberation = TeamDeliberation::new(self.bench.team(side), self.params.rules.inner_rounds);

        let result = tokio::select! {
            biased;
            _ = cancellation.cancelled() => None,
            result = deliberation.run(case.index, &case.description, &court_message, progress) => {
                Some(result)
            }
        };

        match result {
            None => Err(RunHearingError::Cancelled {
                transcript: std::mem::take(&mut hearing.transcript),
            }),
            Some(Ok(deliberation)) => Ok(Utterance::new(
                delegate,
                TurnKind::Argument,
                deliberation.synthesis,
            )
            .with_inner_transcript(deliberation.inner)),
            Some(Err(DeliberationFailure { partial, error })) => {
                warn!(case = case.index, %side, error = %error, "Team deliberation failed");
                hearing.transcript.push(
                    Utterance::new(delegate, TurnKind::Argument, String::new())
                        .with_inner_transcript(partial),
                );
                Err(RunHearingError::Deliberation {
                    side,
                    source: error,
                    transcript: std::mem::take(&mut hearing.transcript),
                })
            }
        }
    }
}

/// Failure of a single judge request.
enum TurnError {
    Agent { role: Role, source: GatewayError },
    Cancelled,
}

/// Unwrap a judge reply or turn the failure into a hearing error that owns
/// the transcript.
fn take(
    result: Result<String, TurnError>,
    hearing: &mut Hearing<'_>,
) -> Result<String, RunHearingError> {
    match result {
        Ok(content) => Ok(content),
        Err(TurnError::Cancelled) => Err(RunHearingError::Cancelled {
            transcript: std::mem::take(&mut hearing.transcript),
        }),
        Err(TurnError::Agent { role, source }) => Err(RunHearingError::Agent {
            role,
            source,
            transcript: std::mem::take(&mut hearing.transcript),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::conversation_logger::NoConversationLogger;
    use crate::ports::progress::NoProgress;
    use crate::use_cases::test_support::{FixedRetriever, TestBench};
    use trial_domain::{GroundTruth, SelectionPolicy, SupplementAccounting};

    const FINAL_WITH_KEYWORD: &str = r#"本庭认为被告人构成危险驾驶罪。
{"Law Articles": ["133", "234"], "Crime Type": ["危险驾驶罪"]}
宣判完毕。"#;

    fn case(plaintiff_evidence: &[&str], defendant_evidence: &[&str]) -> Case {
        Case {
            index: 1,
            case_id: "C-1".to_string(),
            description: "被告人醉酒驾驶机动车".to_string(),
            truth: GroundTruth::default(),
            plaintiff_evidence: plaintiff_evidence.iter().map(|s| s.to_string()).collect(),
            defendant_evidence: defendant_evidence.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn use_case(bench: &TestBench, params: HearingParams) -> RunHearingUseCase {
        RunHearingUseCase::new(
            bench.bench.clone(),
            Arc::new(FixedRetriever(Ok(vec![133]))),
            params,
        )
    }

    async fn hear(
        bench: &TestBench,
        params: HearingParams,
        case: &Case,
    ) -> Result<HearingOutcome, RunHearingError> {
        use_case(bench, params)
            .execute(case, &NoProgress, &NoConversationLogger, &CancellationToken::new())
            .await
    }

    fn kinds(transcript: &Transcript) -> Vec<(Role, TurnKind)> {
        transcript
            .utterances()
            .iter()
            .map(|u| (u.role, u.kind))
            .collect()
    }

    #[tokio::test]
    async fn test_phase_gated_flow_ends_with_judgment() {
        let bench = TestBench::new();
        bench.judge.push_reply("请双方就量刑发表意见。");
        bench.judge.push_reply("请被告说明血液检测结果。");
        bench.judge.push_reply(FINAL_WITH_KEYWORD);

        let outcome = hear(&bench, HearingParams::default(), &case(&[], &[]))
            .await
            .unwrap();

        assert_eq!(outcome.termination, TerminationReason::ClosingKeyword);
        assert_eq!(
            outcome.judgment.articles,
            BTreeSet::from([ArticleId(133), ArticleId(234)])
        );
        assert!(outcome.judgment.crime_types.contains("危险驾驶罪"));
        assert_eq!(outcome.budget_turns, 9);
        assert_eq!(bench.judge.calls(), 3);

        let flow = kinds(&outcome.transcript);
        assert_eq!(flow[0], (Role::Judge, TurnKind::Opening));
        assert_eq!(flow[1], (Role::PlaintiffDelegate, TurnKind::Argument));
        assert_eq!(flow[2], (Role::DefendantDelegate, TurnKind::Argument));
        assert_eq!(flow[3], (Role::Judge, TurnKind::Commentary));
        assert_eq!(flow[8], (Role::Judge, TurnKind::FinalJudgment));

        let instructions = bench.judge.instructions();
        assert_eq!(
            instructions.last().unwrap().as_deref(),
            Some(PromptTemplate::final_judgment_directive())
        );
    }

    #[tokio::test]
    async fn test_opening_is_templated_with_retrieved_articles() {
        let bench = TestBench::new();
        bench.judge.push_reply("本次审理到此结束");
        let outcome = hear(&bench, HearingParams::default(), &case(&[], &[]))
            .await
            .unwrap();

        let opening = &outcome.transcript.utterances()[0];
        assert!(opening.content.starts_with("法庭辩论现在开始。"));
        assert!(opening.content.contains("[133]"));
        assert_eq!(outcome.retrieved, BTreeSet::from([ArticleId(133)]));
    }

    #[tokio::test]
    async fn test_final_judgment_without_keyword() {
        let bench = TestBench::new();
        let params = HearingParams::default().with_outer_rounds(4);
        bench.judge.push_reply(r#"{"Law Articles": [133]}"#);

        let outcome = hear(&bench, params, &case(&[], &[])).await.unwrap();
        assert_eq!(outcome.termination, TerminationReason::FinalJudgment);
        assert_eq!(outcome.transcript.len(), 4);
        assert_eq!(outcome.judgment.articles, BTreeSet::from([ArticleId(133)]));
    }

    #[tokio::test]
    async fn test_keyword_in_commentary_ends_hearing() {
        let bench = TestBench::new();
        bench.judge.push_reply("庭审结束");

        let outcome = hear(&bench, HearingParams::default(), &case(&[], &[]))
            .await
            .unwrap();
        assert_eq!(outcome.termination, TerminationReason::ClosingKeyword);
        assert_eq!(outcome.transcript.len(), 4);
        assert!(outcome.judgment.is_empty());
    }

    #[tokio::test]
    async fn test_keyword_wins_when_budget_fills() {
        let bench = TestBench::new();
        bench.judge.push_reply("宣判完毕");
        let params = HearingParams::default().with_outer_rounds(2);

        let outcome = hear(&bench, params, &case(&[], &[])).await.unwrap();
        assert_eq!(outcome.budget_turns, 2);
        assert_eq!(outcome.termination, TerminationReason::ClosingKeyword);
    }

    #[tokio::test]
    async fn test_budget_cap_never_dispatches() {
        let bench = TestBench::new();
        let params = HearingParams::default().with_outer_rounds(1);

        let outcome = hear(&bench, params, &case(&["x"], &[])).await.unwrap();
        assert_eq!(outcome.termination, TerminationReason::RoundBudget);
        assert_eq!(outcome.transcript.len(), 1);
        assert_eq!(bench.judge.calls(), 0);
    }

    #[tokio::test]
    async fn test_supplements_once_each_plaintiff_first() {
        let bench = TestBench::new();
        let params = HearingParams::default().with_selection(SelectionPolicy::RoundRobin);

        let outcome = hear(&bench, params, &case(&["行车记录仪"], &["体检报告"]))
            .await
            .unwrap();

        let flow = kinds(&outcome.transcript);
        assert_eq!(flow[1], (Role::PlaintiffDelegate, TurnKind::Argument));
        assert_eq!(flow[2], (Role::PlaintiffDelegate, TurnKind::Supplement));
        assert_eq!(flow[3], (Role::DefendantDelegate, TurnKind::Argument));
        assert_eq!(flow[4], (Role::DefendantDelegate, TurnKind::Supplement));
        assert_eq!(outcome.transcript.count_kind(TurnKind::Supplement), 2);
        assert_eq!(
            outcome.transcript.utterances()[2].content,
            "原告补充证据集合：行车记录仪"
        );
        // excluded from the budget by default
        assert_eq!(outcome.budget_turns, 10);
        assert_eq!(outcome.transcript.len(), 12);
        assert!(outcome.transcript.utterances()[2].inner_transcript.is_none());
    }

    #[tokio::test]
    async fn test_included_supplements_consume_budget() {
        let bench = TestBench::new();
        let params = HearingParams::default()
            .with_selection(SelectionPolicy::RoundRobin)
            .with_supplement_accounting(SupplementAccounting::Included);

        let outcome = hear(&bench, params, &case(&["a"], &["b"])).await.unwrap();
        assert_eq!(outcome.transcript.count_kind(TurnKind::Supplement), 2);
        assert_eq!(outcome.budget_turns, 10);
        assert_eq!(outcome.transcript.len(), 10);
    }

    #[tokio::test]
    async fn test_alternating_keeps_judge_out_of_debate() {
        let bench = TestBench::new();
        let params = HearingParams::default()
            .with_selection(SelectionPolicy::Alternating)
            .with_outer_rounds(6);

        let outcome = hear(&bench, params, &case(&[], &[])).await.unwrap();
        assert_eq!(bench.judge.calls(), 1);
        assert_eq!(outcome.transcript.count_kind(TurnKind::Commentary), 0);
        assert_eq!(outcome.termination, TerminationReason::FinalJudgment);
    }

    #[tokio::test]
    async fn test_delegate_speaks_team_synthesis() {
        let bench = TestBench::new();
        bench.lead_counsel(Side::Plaintiff).push_reply("原告团队统一意见");
        bench.judge.push_reply("庭审结束");

        let outcome = hear(&bench, HearingParams::default(), &case(&[], &[]))
            .await
            .unwrap();
        let argument = &outcome.transcript.utterances()[1];
        assert_eq!(argument.content, "原告团队统一意见");
        let inner = argument.inner_transcript.as_ref().unwrap();
        assert_eq!(inner.len(), 4);
        assert_eq!(inner[0].kind, TurnKind::Seed);
        assert!(inner[0].content.contains("法庭辩论现在开始。"));
    }

    #[tokio::test]
    async fn test_retrieval_failure_is_not_fatal() {
        let bench = TestBench::new();
        bench.judge.push_reply("庭审结束");
        let use_case = RunHearingUseCase::new(
            bench.bench.clone(),
            Arc::new(FixedRetriever(Err("index missing".to_string()))),
            HearingParams::default(),
        );

        let outcome = use_case
            .execute(
                &case(&[], &[]),
                &NoProgress,
                &NoConversationLogger,
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert!(outcome.retrieved.is_empty());
        assert!(outcome.transcript.utterances()[0].content.contains("[]"));
    }

    #[tokio::test]
    async fn test_deliberation_failure_attaches_partial_transcript() {
        let bench = TestBench::new();
        bench.plaintiff[1].fail_on_call(1);

        let err = hear(&bench, HearingParams::default(), &case(&[], &[]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RunHearingError::Deliberation {
                side: Side::Plaintiff,
                ..
            }
        ));
        let transcript = err.transcript();
        assert_eq!(transcript.len(), 2);
        let partial = transcript.utterances()[1].inner_transcript.as_ref().unwrap();
        assert_eq!(partial.len(), 2);
    }

    #[tokio::test]
    async fn test_judge_failure_propagates() {
        let bench = TestBench::new();
        bench.judge.fail_on_call(1);

        let err = hear(&bench, HearingParams::default(), &case(&[], &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, RunHearingError::Agent { role: Role::Judge, .. }));
        assert_eq!(err.transcript().len(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_hearing() {
        let bench = TestBench::new();
        let token = CancellationToken::new();
        token.cancel();

        let err = use_case(&bench, HearingParams::default())
            .execute(&case(&[], &[]), &NoProgress, &NoConversationLogger, &token)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(err.transcript().len(), 1);
    }
}
