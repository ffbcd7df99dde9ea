//! Court agent port
//!
//! A [`CourtAgent`] is one LLM-backed participant (judge or team specialist).
//! Given the visible conversation it produces the next message text.

use super::llm_gateway::GatewayError;
use async_trait::async_trait;
use trial_domain::{Role, Utterance};

/// Everything an agent sees when asked to speak.
#[derive(Debug, Clone, Copy)]
pub struct TurnRequest<'a> {
    /// Conversation visible to the agent, oldest first
    pub history: &'a [Utterance],
    /// Extra directive for this turn (e.g. "deliver the judgment now")
    pub instruction: Option<&'a str>,
}

impl<'a> TurnRequest<'a> {
    pub fn new(history: &'a [Utterance]) -> Self {
        Self {
            history,
            instruction: None,
        }
    }

    pub fn with_instruction(mut self, instruction: &'a str) -> Self {
        self.instruction = Some(instruction);
        self
    }
}

#[async_trait]
pub trait CourtAgent: Send + Sync {
    fn role(&self) -> Role;

    async fn reply(&self, request: TurnRequest<'_>) -> Result<String, GatewayError>;
}
