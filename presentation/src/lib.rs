//! Presentation layer for mock-trial
//!
//! This crate contains CLI definitions, the end-of-batch formatter and the
//! progress reporters implementing the
//! [`HearingProgress`](trial_application::HearingProgress) port.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat, SelectionArg};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
