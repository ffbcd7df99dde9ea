//! Report format value object

use serde::{Deserialize, Serialize};

/// How the end-of-batch summary is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable averages table (default)
    #[default]
    Summary,
    /// Metrics report as JSON
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_summary() {
        assert_eq!(ReportFormat::default(), ReportFormat::Summary);
    }

    #[test]
    fn test_deserialize_lowercase() {
        let format: ReportFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, ReportFormat::Json);
    }
}
