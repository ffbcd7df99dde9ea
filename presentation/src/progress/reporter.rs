//! Progress reporting for batch runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use trial_application::HearingProgress;
use trial_domain::core::string::{one_line, truncate};
use trial_domain::{BatchProgress, Case, CaseResult, SkippedCase, Utterance};

/// Bytes of utterance content shown in progress lines
const PREVIEW_BYTES: usize = 120;

fn preview(text: &str, max_bytes: usize) -> String {
    truncate(&one_line(text), max_bytes)
}

fn score_line(result: &CaseResult) -> String {
    format!(
        "articles F1 {:.2}  crime F1 {:.2}  {} turns  {:.1}s",
        result.law_articles.score.f1,
        result.crime_types.score.f1,
        result.turns,
        result.elapsed_secs
    )
}

/// Reports progress during a batch with an indicatif bar
///
/// The bar counts input records; its message follows the current speaker.
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn batch_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl HearingProgress for ProgressReporter {
    fn on_batch_start(&self, total: usize, already_completed: usize) {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::batch_style());
        pb.set_prefix("Hearings");
        pb.set_position(already_completed as u64);
        if already_completed > 0 {
            pb.set_message(format!("resuming, {} already done", already_completed));
        } else {
            pb.set_message("Starting...");
        }
        pb.enable_steady_tick(std::time::Duration::from_millis(120));

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_case_start(&self, case: &Case) {
        self.with_bar(|pb| pb.set_message(format!("case {} ({})", case.index, case.case_id)));
    }

    fn on_utterance(&self, case_index: i64, utterance: &Utterance) {
        self.with_bar(|pb| {
            pb.set_message(format!(
                "case {}: {} {}",
                case_index,
                utterance.role,
                preview(&utterance.content, PREVIEW_BYTES).dimmed()
            ))
        });
    }

    fn on_deliberation_turn(&self, case_index: i64, utterance: &Utterance) {
        self.with_bar(|pb| {
            pb.set_message(format!("case {}: {} deliberating", case_index, utterance.role))
        });
    }

    fn on_case_complete(&self, result: &CaseResult) {
        self.with_bar(|pb| {
            pb.println(format!(
                "{} case {} ({})  {}",
                "v".green(),
                result.index,
                result.case_id,
                score_line(result)
            ));
            pb.inc(1);
        });
    }

    fn on_case_skipped(&self, skipped: &SkippedCase) {
        self.with_bar(|pb| {
            pb.println(format!(
                "{} skipped {}: {}",
                "-".yellow(),
                skipped_label(skipped),
                skipped.reason
            ));
            pb.inc(1);
        });
    }

    fn on_batch_complete(&self, progress: &BatchProgress) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_with_message(format!(
                "{} {} completed",
                "done".green(),
                progress.completed_count()
            ));
        }
    }
}

fn skipped_label(skipped: &SkippedCase) -> String {
    match (skipped.index, skipped.case_id.as_deref()) {
        (Some(index), Some(id)) => format!("{} ({})", index, id),
        (Some(index), None) => index.to_string(),
        (None, Some(id)) => id.to_string(),
        (None, None) => "record".to_string(),
    }
}

/// Simple text-based progress (no fancy UI)
///
/// Prints one line per outer utterance, suited to logs and pipes.
pub struct SimpleProgress;

impl HearingProgress for SimpleProgress {
    fn on_batch_start(&self, total: usize, already_completed: usize) {
        println!(
            "{} {} ({} records, {} already completed)",
            "->".cyan(),
            "Batch".bold(),
            total,
            already_completed
        );
    }

    fn on_case_start(&self, case: &Case) {
        println!(
            "{} case {} ({})",
            "->".cyan(),
            case.index.to_string().bold(),
            case.case_id
        );
    }

    fn on_utterance(&self, _case_index: i64, utterance: &Utterance) {
        println!(
            "  {} {}",
            format!("{}:", utterance.role).yellow(),
            preview(&utterance.content, PREVIEW_BYTES * 2)
        );
    }

    fn on_case_complete(&self, result: &CaseResult) {
        println!("  {} {}", "v".green(), score_line(result));
        println!();
    }

    fn on_case_skipped(&self, skipped: &SkippedCase) {
        println!(
            "{} skipped {}: {}",
            "-".yellow(),
            skipped_label(skipped),
            skipped.reason
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_is_one_line_and_truncated() {
        assert_eq!(preview("本院认为被告人构成盗窃罪", 15), "本院认为...");
        assert_eq!(preview("短", 15), "短");
        assert_eq!(preview("a\n  b", 10), "a b");
    }

    #[test]
    fn test_skipped_label() {
        let skipped = SkippedCase {
            index: None,
            case_id: Some("A7".to_string()),
            reason: "duplicate index 7".to_string(),
        };
        assert_eq!(skipped_label(&skipped), "A7");
    }

    #[test]
    fn test_reporter_without_batch_is_noop() {
        let reporter = ProgressReporter::new();
        reporter.on_deliberation_turn(
            1,
            &Utterance::new(
                trial_domain::Role::PlaintiffLeadCounsel,
                trial_domain::TurnKind::Deliberation,
                "x",
            ),
        );
        reporter.on_batch_complete(&BatchProgress::new());
    }
}
