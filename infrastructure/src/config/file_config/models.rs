//! Role-based model configuration from TOML (`[models]` section)

use serde::{Deserialize, Serialize};
use trial_application::RoleModels;
use trial_domain::{ConfigIssue, ConfigIssueCode, Model};

/// Role-based model configuration from TOML
///
/// # Example
///
/// ```toml
/// [models]
/// default = "qwen3:8b"            # Every role without an override
/// judge = "qwen3:32b"             # Presiding judge
/// plaintiff_team = "qwen3:8b"     # Plaintiff delegate and specialists
/// defendant_team = "qwen3:8b"     # Defendant delegate and specialists
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    pub default: String,
    pub judge: Option<String>,
    pub plaintiff_team: Option<String>,
    pub defendant_team: Option<String>,
}

impl Default for FileModelsConfig {
    fn default() -> Self {
        Self {
            default: Model::default().to_string(),
            judge: None,
            plaintiff_team: None,
            defendant_team: None,
        }
    }
}

impl FileModelsConfig {
    fn parse_optional(field: &str, value: Option<&String>) -> (Option<Model>, Vec<ConfigIssue>) {
        match value {
            None => (None, Vec::new()),
            Some(s) => match s.parse::<Model>() {
                Ok(model) => (Some(model), Vec::new()),
                Err(_) => (
                    None,
                    vec![ConfigIssue::error(
                        ConfigIssueCode::InvalidModel,
                        format!("models.{}: model name cannot be empty", field),
                    )],
                ),
            },
        }
    }

    /// Resolve the per-role models, collecting issues for empty names.
    ///
    /// An empty `default` falls back to the built-in model so that callers
    /// always get a usable [`RoleModels`]; the issue is still reported.
    pub fn to_role_models(&self) -> (RoleModels, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let (default, default_issues) = Self::parse_optional("default", Some(&self.default));
        issues.extend(default_issues);
        let (judge, judge_issues) = Self::parse_optional("judge", self.judge.as_ref());
        issues.extend(judge_issues);
        let (plaintiff, plaintiff_issues) =
            Self::parse_optional("plaintiff_team", self.plaintiff_team.as_ref());
        issues.extend(plaintiff_issues);
        let (defendant, defendant_issues) =
            Self::parse_optional("defendant_team", self.defendant_team.as_ref());
        issues.extend(defendant_issues);

        let mut models = RoleModels::new(default.unwrap_or_default());
        models.judge = judge;
        models.plaintiff_team = plaintiff;
        models.defendant_team = defendant;
        (models, issues)
    }
}
