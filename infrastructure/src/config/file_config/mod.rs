//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod hearing;
mod models;
mod output;
mod providers;
mod retrieval;

pub use hearing::FileHearingConfig;
pub use models::FileModelsConfig;
pub use output::{FileBatchConfig, FileOutputConfig};
pub use providers::FileProviderConfig;
pub use retrieval::{FileMemoryConfig, FileRetrievalConfig};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use trial_domain::{ConfigIssue, ConfigIssueCode, DomainError, PromptCatalog, Role};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Role-based model selection
    pub models: FileModelsConfig,
    /// OpenAI-compatible chat backend
    pub provider: FileProviderConfig,
    /// Courtroom protocol settings
    pub hearing: FileHearingConfig,
    /// Similar-case retrieval
    pub retrieval: FileRetrievalConfig,
    /// Knowledge memory for selected roles
    pub memory: FileMemoryConfig,
    /// Role key -> system prompt override
    pub prompts: BTreeMap<String, String>,
    /// Output settings
    pub output: FileOutputConfig,
    /// Batch input files
    pub batch: FileBatchConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Hearing rules (round budgets, selector phase, closing keywords)
    /// 2. Empty model names
    /// 3. Role keys in `[prompts]` and `[memory].roles`
    /// 4. Index paths of enabled vector indexes
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.hearing.to_rules().validate();

        issues.extend(self.models.to_role_models().1);

        for key in self.prompts.keys() {
            if key.parse::<Role>().is_err() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnknownRole,
                    format!("prompts.{}: not a courtroom role", key),
                ));
            }
        }

        if self.memory.enabled {
            for key in &self.memory.roles {
                if key.parse::<Role>().is_err() {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::UnknownRole,
                        format!("memory.roles: '{}' is not a courtroom role", key),
                    ));
                }
            }
        }

        if self.retrieval.enabled && self.retrieval.index_path.is_none() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingIndexPath,
                "retrieval.enabled is set but retrieval.index_path is missing",
            ));
        }
        if self.memory.enabled && self.memory.index_path.is_none() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingIndexPath,
                "memory.enabled is set but memory.index_path is missing",
            ));
        }

        issues
    }

    /// Built-in system prompts with `[prompts]` overrides applied.
    pub fn prompt_catalog(&self) -> Result<PromptCatalog, DomainError> {
        PromptCatalog::new().with_overrides(&self.prompts)
    }

    /// Roles that receive knowledge memory; unknown keys are ignored here
    /// and reported by [`FileConfig::validate`].
    pub fn memory_roles(&self) -> HashSet<Role> {
        self.memory
            .roles
            .iter()
            .filter_map(|key| key.parse().ok())
            .collect()
    }
}
