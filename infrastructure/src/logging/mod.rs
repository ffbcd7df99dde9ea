//! Logging infrastructure: structured conversation logging.
//!
//! Provides [`JsonlConversationLogger`], a JSONL file writer that implements
//! the [`ConversationLogger`](trial_application::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::{CONVERSATION_LOG_FILE, JsonlConversationLogger};
