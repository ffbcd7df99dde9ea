//! The bench: every agent taking part in a hearing.
//!
//! [`LlmCourtAgent`] is the production [`CourtAgent`]: it renders the visible
//! conversation into a chat-completion request for its role's model. Agents
//! are grouped into a [`Bench`] of one judge and one [`TeamRoster`] per side.

use crate::config::RoleModels;
use crate::ports::agent::{CourtAgent, TurnRequest};
use crate::ports::llm_gateway::{ChatMessage, GatewayError, LlmGateway};
use crate::ports::retriever::KnowledgeMemory;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};
use trial_domain::{DomainError, Model, PromptCatalog, PromptTemplate, Role, Side, TeamSeat};

/// An agent backed by a chat-completion model.
pub struct LlmCourtAgent<G: LlmGateway> {
    gateway: Arc<G>,
    role: Role,
    model: Model,
    system_prompt: String,
    memory: Option<Arc<dyn KnowledgeMemory>>,
}

impl<G: LlmGateway> LlmCourtAgent<G> {
    pub fn new(gateway: Arc<G>, role: Role, model: Model, system_prompt: impl Into<String>) -> Self {
        Self {
            gateway,
            role,
            model,
            system_prompt: system_prompt.into(),
            memory: None,
        }
    }

    pub fn with_memory(mut self, memory: Arc<dyn KnowledgeMemory>) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Render the request from this agent's point of view: its own turns
    /// are assistant messages, everyone else's are named user messages.
    fn build_messages(&self, request: &TurnRequest<'_>, recalled: &[String]) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(request.history.len() + 3);
        messages.push(ChatMessage::system(&self.system_prompt));
        if !recalled.is_empty() {
            messages.push(ChatMessage::system(PromptTemplate::memory_context(recalled)));
        }
        for utterance in request.history {
            if utterance.is_from(self.role) {
                messages.push(ChatMessage::assistant(&utterance.content));
            } else {
                messages.push(
                    ChatMessage::user(&utterance.content).with_name(utterance.role.as_str()),
                );
            }
        }
        if let Some(instruction) = request.instruction {
            messages.push(ChatMessage::user(instruction));
        }
        messages
    }

    async fn recall(&self, request: &TurnRequest<'_>) -> Vec<String> {
        let Some(memory) = &self.memory else {
            return Vec::new();
        };
        let query = request
            .history
            .last()
            .map(|u| u.content.as_str())
            .or(request.instruction)
            .unwrap_or_default();
        if query.is_empty() {
            return Vec::new();
        }
        match memory.recall(query).await {
            Ok(snippets) => {
                debug!(role = %self.role, hits = snippets.len(), "Knowledge memory recall");
                snippets
            }
            Err(e) => {
                warn!(role = %self.role, error = %e, "Knowledge memory recall failed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl<G: LlmGateway + 'static> CourtAgent for LlmCourtAgent<G> {
    fn role(&self) -> Role {
        self.role
    }

    async fn reply(&self, request: TurnRequest<'_>) -> Result<String, GatewayError> {
        let recalled = self.recall(&request).await;
        let messages = self.build_messages(&request, &recalled);
        debug!(
            role = %self.role,
            model = %self.model,
            messages = messages.len(),
            "Requesting agent reply"
        );
        self.gateway.chat(&self.model, &messages).await
    }
}

/// A side's specialists in deliberation order.
#[derive(Clone)]
pub struct TeamRoster {
    side: Side,
    members: Vec<Arc<dyn CourtAgent>>,
}

impl TeamRoster {
    /// Members must be the side's specialists in [`TeamSeat::ROTATION`] order.
    pub fn new(side: Side, members: Vec<Arc<dyn CourtAgent>>) -> Result<Self, DomainError> {
        let expected: Vec<Role> = TeamSeat::ROTATION
            .iter()
            .map(|seat| Role::specialist(side, *seat))
            .collect();
        let actual: Vec<Role> = members.iter().map(|m| m.role()).collect();
        if actual != expected {
            return Err(DomainError::InvalidHearing(format!(
                "{} team roster must be {:?}, got {:?}",
                side, expected, actual
            )));
        }
        Ok(Self { side, members })
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn members(&self) -> &[Arc<dyn CourtAgent>] {
        &self.members
    }
}

/// Knowledge memory shared by a subset of roles.
#[derive(Clone)]
pub struct MemoryAttachment {
    pub memory: Arc<dyn KnowledgeMemory>,
    pub roles: HashSet<Role>,
}

/// Judge plus both teams.
#[derive(Clone)]
pub struct Bench {
    judge: Arc<dyn CourtAgent>,
    plaintiff: TeamRoster,
    defendant: TeamRoster,
}

impl Bench {
    pub fn new(
        judge: Arc<dyn CourtAgent>,
        plaintiff: TeamRoster,
        defendant: TeamRoster,
    ) -> Result<Self, DomainError> {
        if judge.role() != Role::Judge {
            return Err(DomainError::InvalidHearing(format!(
                "bench judge has role {}",
                judge.role()
            )));
        }
        if plaintiff.side() != Side::Plaintiff || defendant.side() != Side::Defendant {
            return Err(DomainError::InvalidHearing(
                "team rosters are assigned to the wrong sides".to_string(),
            ));
        }
        Ok(Self {
            judge,
            plaintiff,
            defendant,
        })
    }

    /// Build every agent on top of one gateway.
    pub fn from_gateway<G: LlmGateway + 'static>(
        gateway: Arc<G>,
        models: &RoleModels,
        prompts: &PromptCatalog,
        memory: Option<&MemoryAttachment>,
    ) -> Self {
        let agent = |role: Role| -> Arc<dyn CourtAgent> {
            let mut agent = LlmCourtAgent::new(
                Arc::clone(&gateway),
                role,
                models.for_role(role).clone(),
                prompts.system_prompt(role),
            );
            if let Some(attachment) = memory
                && attachment.roles.contains(&role)
            {
                agent = agent.with_memory(Arc::clone(&attachment.memory));
            }
            Arc::new(agent)
        };
        let team = |side: Side| TeamRoster {
            side,
            members: TeamSeat::ROTATION
                .iter()
                .map(|seat| agent(Role::specialist(side, *seat)))
                .collect(),
        };

        Self {
            judge: agent(Role::Judge),
            plaintiff: team(Side::Plaintiff),
            defendant: team(Side::Defendant),
        }
    }

    pub fn judge(&self) -> &Arc<dyn CourtAgent> {
        &self.judge
    }

    pub fn team(&self, side: Side) -> &TeamRoster {
        match side {
            Side::Plaintiff => &self.plaintiff,
            Side::Defendant => &self.defendant,
        }
    }
}
