//! Scripted agents and in-memory stores shared by use case tests.

use super::bench::{Bench, TeamRoster};
use crate::ports::agent::{CourtAgent, TurnRequest};
use crate::ports::llm_gateway::GatewayError;
use crate::ports::retriever::{CaseRetriever, RetrievalError};
use crate::ports::storage::{CheckpointStore, ReportWriter, StoreError, TranscriptStore};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use trial_domain::{
    ArticleId, BatchProgress, MetricsReport, Role, Side, TeamSeat, Transcript,
};

/// Agent answering from a queue of scripted replies.
///
/// Once the queue is empty it answers `"<Role> 发言 #<n>"`, where `n`
/// counts this agent's calls.
pub struct ScriptedAgent {
    role: Role,
    script: Mutex<VecDeque<String>>,
    fail_on: Mutex<Option<usize>>,
    calls: AtomicUsize,
    instructions: Mutex<Vec<Option<String>>>,
}

impl ScriptedAgent {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            script: Mutex::new(VecDeque::new()),
            fail_on: Mutex::new(None),
            calls: AtomicUsize::new(0),
            instructions: Mutex::new(Vec::new()),
        }
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.script.lock().unwrap().push_back(reply.into());
    }

    /// Make the `call`-th request (1-based) fail.
    pub fn fail_on_call(&self, call: usize) {
        *self.fail_on.lock().unwrap() = Some(call);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn instructions(&self) -> Vec<Option<String>> {
        self.instructions.lock().unwrap().clone()
    }
}

#[async_trait]
impl CourtAgent for ScriptedAgent {
    fn role(&self) -> Role {
        self.role
    }

    async fn reply(&self, request: TurnRequest<'_>) -> Result<String, GatewayError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if *self.fail_on.lock().unwrap() == Some(call) {
            return Err(GatewayError::ConnectionError("backend down".to_string()));
        }
        self.instructions
            .lock()
            .unwrap()
            .push(request.instruction.map(str::to_string));
        let scripted = self.script.lock().unwrap().pop_front();
        Ok(scripted.unwrap_or_else(|| format!("{} 发言 #{}", self.role.as_str(), call)))
    }
}

/// A bench of scripted agents with handles for inspection.
pub struct TestBench {
    pub bench: Bench,
    pub judge: Arc<ScriptedAgent>,
    pub plaintiff: Vec<Arc<ScriptedAgent>>,
    pub defendant: Vec<Arc<ScriptedAgent>>,
}

impl TestBench {
    pub fn new() -> Self {
        let judge = Arc::new(ScriptedAgent::new(Role::Judge));
        let team = |side: Side| -> Vec<Arc<ScriptedAgent>> {
            TeamSeat::ROTATION
                .iter()
                .map(|seat| Arc::new(ScriptedAgent::new(Role::specialist(side, *seat))))
                .collect()
        };
        let plaintiff = team(Side::Plaintiff);
        let defendant = team(Side::Defendant);

        let roster = |side: Side, agents: &[Arc<ScriptedAgent>]| {
            let members = agents
                .iter()
                .map(|a| Arc::clone(a) as Arc<dyn CourtAgent>)
                .collect();
            TeamRoster::new(side, members).unwrap()
        };
        let bench = Bench::new(
            Arc::clone(&judge) as Arc<dyn CourtAgent>,
            roster(Side::Plaintiff, &plaintiff),
            roster(Side::Defendant, &defendant),
        )
        .unwrap();

        Self {
            bench,
            judge,
            plaintiff,
            defendant,
        }
    }

    pub fn lead_counsel(&self, side: Side) -> &Arc<ScriptedAgent> {
        match side {
            Side::Plaintiff => &self.plaintiff[2],
            Side::Defendant => &self.defendant[2],
        }
    }
}

pub struct FixedRetriever(pub Result<Vec<u32>, String>);

#[async_trait]
impl CaseRetriever for FixedRetriever {
    async fn similar_articles(
        &self,
        _description: &str,
    ) -> Result<BTreeSet<ArticleId>, RetrievalError> {
        match &self.0 {
            Ok(ids) => Ok(ids.iter().copied().map(ArticleId).collect()),
            Err(e) => Err(RetrievalError::IndexUnavailable(e.clone())),
        }
    }
}

#[derive(Default)]
pub struct MemoryCheckpointStore {
    pub saved: Mutex<Option<BatchProgress>>,
    pub saves: AtomicUsize,
}

impl MemoryCheckpointStore {
    pub fn with(progress: BatchProgress) -> Self {
        Self {
            saved: Mutex::new(Some(progress)),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn snapshot(&self) -> Option<BatchProgress> {
        self.saved.lock().unwrap().clone()
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn load(&self) -> Option<BatchProgress> {
        self.snapshot()
    }

    fn save(&self, progress: &BatchProgress) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.saved.lock().unwrap() = Some(progress.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTranscriptStore {
    pub saved: Mutex<BTreeMap<i64, Transcript>>,
}

impl TranscriptStore for MemoryTranscriptStore {
    fn save(&self, index: i64, transcript: &Transcript) -> Result<String, StoreError> {
        self.saved.lock().unwrap().insert(index, transcript.clone());
        Ok(format!("mem/{}_conversation.json", index))
    }
}

#[derive(Default)]
pub struct MemoryReportWriter {
    pub report: Mutex<Option<MetricsReport>>,
}

impl ReportWriter for MemoryReportWriter {
    fn write(&self, report: &MetricsReport) -> Result<String, StoreError> {
        *self.report.lock().unwrap() = Some(report.clone());
        Ok("mem/metrics.json".to_string())
    }
}
