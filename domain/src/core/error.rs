//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Invalid hearing configuration: {0}")]
    InvalidHearing(String),
}
