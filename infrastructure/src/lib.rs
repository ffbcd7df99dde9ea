//! Infrastructure layer for mock-trial
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the OpenAI-compatible chat backend, the vector
//! index used for retrieval and knowledge memory, the JSON file stores and
//! configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod retrieval;
pub mod storage;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, FileConfig};
pub use logging::JsonlConversationLogger;
pub use providers::openai::OpenAiGateway;
pub use retrieval::{EmbeddingClient, EmbeddingIndexRetriever, VectorIndex};
pub use storage::{
    DatasetError, DatasetLoader, JsonCheckpointStore, JsonReportWriter, JsonTranscriptStore,
};
