//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: opaque chat-backend model identifier
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: log-preview helpers

pub mod error;
pub mod model;
pub mod string;
