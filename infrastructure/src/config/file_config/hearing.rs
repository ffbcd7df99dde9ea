//! Hearing protocol configuration from TOML (`[hearing]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use trial_application::HearingParams;
use trial_domain::court::{
    DEFAULT_CLOSING_KEYWORDS, DEFAULT_FINAL_PHASE_AT, DEFAULT_INNER_ROUNDS, DEFAULT_OUTER_ROUNDS,
};
use trial_domain::{ClosingKeywords, HearingRules, SelectionPolicy, SupplementAccounting};

/// Hearing configuration from TOML
///
/// # Example
///
/// ```toml
/// [hearing]
/// outer_rounds = 10
/// inner_rounds = 3
/// selection = "phase-gated"          # or "round-robin", "alternating"
/// final_phase_at = 8
/// supplement_accounting = "excluded" # or "included"
/// closing_keywords = ["庭审结束", "宣判完毕"]
/// opening_pause_ms = 0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHearingConfig {
    pub outer_rounds: usize,
    pub inner_rounds: usize,
    pub selection: SelectionPolicy,
    pub final_phase_at: usize,
    pub supplement_accounting: SupplementAccounting,
    pub closing_keywords: Vec<String>,
    pub opening_pause_ms: u64,
}

impl Default for FileHearingConfig {
    fn default() -> Self {
        Self {
            outer_rounds: DEFAULT_OUTER_ROUNDS,
            inner_rounds: DEFAULT_INNER_ROUNDS,
            selection: SelectionPolicy::default(),
            final_phase_at: DEFAULT_FINAL_PHASE_AT,
            supplement_accounting: SupplementAccounting::default(),
            closing_keywords: DEFAULT_CLOSING_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            opening_pause_ms: 0,
        }
    }
}

impl FileHearingConfig {
    pub fn to_rules(&self) -> HearingRules {
        HearingRules::default()
            .with_outer_rounds(self.outer_rounds)
            .with_inner_rounds(self.inner_rounds)
            .with_selection(self.selection)
            .with_final_phase_at(self.final_phase_at)
            .with_supplement_accounting(self.supplement_accounting)
            .with_closing_keywords(ClosingKeywords::new(self.closing_keywords.iter().cloned()))
    }

    pub fn to_params(&self) -> HearingParams {
        HearingParams::default()
            .with_rules(self.to_rules())
            .with_opening_pause(Duration::from_millis(self.opening_pause_ms))
    }
}
