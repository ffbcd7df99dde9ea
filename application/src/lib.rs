//! Application layer for mock-trial
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{HearingParams, RoleModels};
pub use ports::{
    agent::{CourtAgent, TurnRequest},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{ChatMessage, ChatRole, GatewayError, LlmGateway},
    progress::{HearingProgress, NoProgress},
    retriever::{CaseRetriever, KnowledgeMemory, NoRetriever, RetrievalError},
    storage::{CheckpointStore, ReportWriter, StoreError, TranscriptStore},
};
pub use use_cases::bench::{Bench, LlmCourtAgent, MemoryAttachment, TeamRoster};
pub use use_cases::deliberate::{
    Deliberation, DeliberationError, DeliberationFailure, TeamDeliberation,
};
pub use use_cases::run_batch::{BatchOutcome, RunBatchError, RunBatchInput, RunBatchUseCase};
pub use use_cases::run_hearing::{HearingOutcome, RunHearingError, RunHearingUseCase};
