//! Structured configuration issues.
//!
//! Validators return a list of [`ConfigIssue`]s rather than failing on the
//! first problem so that every issue can be reported at start-up.
//!
//! # Examples
//!
//! ```
//! use trial_domain::court::HearingRules;
//! use trial_domain::config::validation::has_errors;
//!
//! let issues = HearingRules::default().validate();
//! assert!(!has_errors(&issues));
//! ```

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// Fewer than two outer turns leave no room for opening and judgment.
    OuterRoundsTooSmall,
    /// Teams never deliberate; delegates repeat the seed message.
    InnerRoundsZero,
    /// The phase-gated selector would never reach its final phase.
    FinalPhaseUnreachable,
    /// No closing keyword: only the budget or final judgment ends a hearing.
    NoClosingKeywords,
    /// A `[prompts]` or `[memory].roles` key does not name a role.
    UnknownRole,
    /// Retrieval or memory is enabled without an index file.
    MissingIndexPath,
    /// A model name is empty.
    InvalidModel,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }
}

/// Whether any issue is fatal.
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}
