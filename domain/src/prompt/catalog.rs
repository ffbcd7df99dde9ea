//! Role → system prompt lookup with configurable overrides.

use super::template::PromptTemplate;
use crate::core::error::DomainError;
use crate::court::Role;
use std::collections::HashMap;

/// System prompts for every role.
///
/// Overrides replace the built-in prompt of a single role; roles without an
/// override fall back to [`PromptTemplate::default_system`].
#[derive(Debug, Clone)]
pub struct PromptCatalog {
    prompts: HashMap<Role, String>,
}

impl PromptCatalog {
    pub fn new() -> Self {
        let prompts = Role::ALL
            .into_iter()
            .map(|role| (role, PromptTemplate::default_system(role)))
            .collect();
        Self { prompts }
    }

    pub fn with_override(mut self, role: Role, prompt: impl Into<String>) -> Self {
        self.prompts.insert(role, prompt.into());
        self
    }

    /// Apply overrides keyed by role name or config key.
    pub fn with_overrides<'a, I>(mut self, overrides: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (key, prompt) in overrides {
            let role: Role = key.parse()?;
            self.prompts.insert(role, prompt.clone());
        }
        Ok(self)
    }

    pub fn system_prompt(&self, role: Role) -> &str {
        self.prompts.get(&role).map(String::as_str).unwrap_or_default()
    }
}

impl Default for PromptCatalog {
    fn default() -> Self {
        Self::new()
    }
}
