//! Console output formatter for batch results

use colored::Colorize;
use trial_application::BatchOutcome;
use trial_domain::{BatchAverages, MetricsReport, Prf1, ReportFormat};

/// Formats batch results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colors off (`[output].color = false`); otherwise `colored`
    /// decides from the terminal and `NO_COLOR`.
    pub fn set_color(enabled: bool) {
        if !enabled {
            colored::control::set_override(false);
        }
    }

    pub fn format(outcome: &BatchOutcome, format: ReportFormat) -> String {
        match format {
            ReportFormat::Summary => Self::format_summary(outcome),
            ReportFormat::Json => Self::format_json(outcome),
        }
    }

    /// Averages table followed by the skipped records
    pub fn format_summary(outcome: &BatchOutcome) -> String {
        let progress = &outcome.progress;
        let mut output = String::new();

        output.push_str(&Self::header("Mock Trial Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {} ({} this run)\n",
            "Completed:".cyan().bold(),
            progress.completed_count(),
            outcome.newly_completed
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Skipped:".cyan().bold(),
            progress.skipped_cases.len()
        ));
        if outcome.interrupted {
            output.push_str(&format!(
                "{}\n",
                "Interrupted: rerun with the same output directory to resume".yellow()
            ));
        }

        output.push_str(&Self::section_header("Averages"));
        match progress.averages() {
            Some(averages) => output.push_str(&Self::averages_table(&averages)),
            None => output.push_str(&format!("{}\n", "No completed cases".dimmed())),
        }

        if !progress.skipped_cases.is_empty() {
            output.push_str(&Self::section_header("Skipped records"));
            for skipped in &progress.skipped_cases {
                let label = match (skipped.index, skipped.case_id.as_deref()) {
                    (Some(index), _) => format!("index {}", index),
                    (None, Some(id)) => format!("CaseId {}", id),
                    (None, None) => "record".to_string(),
                };
                output.push_str(&format!("  * {}: {}\n", label, skipped.reason));
            }
        }

        if let Some(path) = &outcome.report_path {
            output.push_str(&format!("\n{} {}\n", "Metrics:".dimmed(), path));
        }

        output.push_str(&Self::footer());
        output
    }

    /// The metrics report as JSON, or the raw progress when nothing completed
    pub fn format_json(outcome: &BatchOutcome) -> String {
        let rendered = match MetricsReport::from_progress(&outcome.progress) {
            Some(report) => serde_json::to_string_pretty(&report),
            None => serde_json::to_string_pretty(&outcome.progress),
        };
        rendered.unwrap_or_else(|_| "{}".to_string())
    }

    fn averages_table(averages: &BatchAverages) -> String {
        let mut table = format!(
            "  {:<18} {:>9} {:>9} {:>9}\n",
            "", "precision", "recall", "f1"
        );
        table.push_str(&Self::prf1_row("Law articles", &averages.law_articles));
        table.push_str(&Self::prf1_row("Crime types", &averages.crime_types));
        table.push_str(&format!(
            "  {:<18} {:>9.4}\n",
            "Retrieval overlap", averages.retrieval_overlap
        ));
        table.push_str(&format!("  {:<18} {:>9}\n", "Cases", averages.cases));
        table
    }

    fn prf1_row(label: &str, score: &Prf1) -> String {
        format!(
            "  {:<18} {:>9.4} {:>9.4} {:>9.4}\n",
            label, score.precision, score.recall, score.f1
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use trial_domain::{
        ArticleId, BatchProgress, CaseResult, CategoryScore, SkippedCase, TerminationReason,
    };

    fn outcome() -> BatchOutcome {
        let mut progress = BatchProgress::new();
        progress.record_completed(CaseResult {
            index: 1,
            case_id: "A1".to_string(),
            law_articles: CategoryScore::score(
                BTreeSet::from([ArticleId(264)]),
                BTreeSet::from([ArticleId(264)]),
            ),
            crime_types: CategoryScore::score(BTreeSet::new(), BTreeSet::new()),
            sentence: None,
            fine: None,
            retrieved_articles: BTreeSet::new(),
            retrieval_overlap: 0.0,
            termination: TerminationReason::ClosingKeyword,
            turns: 5,
            elapsed_secs: 3.0,
            transcript_path: "out/1_conversation.json".to_string(),
        });
        progress.record_skipped(SkippedCase {
            index: Some(2),
            case_id: None,
            reason: "missing index or case_description".to_string(),
        });
        BatchOutcome {
            progress,
            newly_completed: 1,
            interrupted: true,
            report_path: Some("out/metrics.json".to_string()),
        }
    }

    #[test]
    fn test_summary_lists_averages_and_skips() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format(&outcome(), ReportFormat::Summary);
        assert!(text.contains("Law articles"));
        assert!(text.contains("1.0000"));
        assert!(text.contains("index 2: missing index or case_description"));
        assert!(text.contains("Interrupted"));
        assert!(text.contains("out/metrics.json"));
    }

    #[test]
    fn test_json_is_metrics_report() {
        let text = ConsoleFormatter::format(&outcome(), ReportFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["average"]["cases"], 1);
        assert_eq!(value["per_case"][0]["CaseId"], "A1");
    }

    #[test]
    fn test_json_without_completed_cases_falls_back_to_progress() {
        let empty = BatchOutcome {
            progress: BatchProgress::new(),
            newly_completed: 0,
            interrupted: false,
            report_path: None,
        };
        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&empty)).unwrap();
        assert!(value.get("average").is_none());
        assert!(value["results"].as_array().unwrap().is_empty());
    }
}
