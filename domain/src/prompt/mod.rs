//! Prompt domain
//!
//! System prompts per role and the templated messages of a hearing.

mod catalog;
mod template;

pub use catalog::PromptCatalog;
pub use template::PromptTemplate;
