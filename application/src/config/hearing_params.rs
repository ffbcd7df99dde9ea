//! Hearing parameters: protocol rules plus run-time pacing.
//!
//! [`HearingParams`] groups what [`RunHearingUseCase`](crate::use_cases::run_hearing::RunHearingUseCase)
//! needs besides its agents. Protocol policy lives in the domain
//! ([`HearingRules`]); pacing is an application concern.

use std::time::Duration;
use trial_domain::{HearingRules, SelectionPolicy, SupplementAccounting};

#[derive(Debug, Clone, Default)]
pub struct HearingParams {
    pub rules: HearingRules,
    /// Pause before the opening statement of each case
    pub opening_pause: Duration,
}

impl HearingParams {
    // ==================== Builder Methods ====================

    pub fn with_rules(mut self, rules: HearingRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_outer_rounds(mut self, rounds: usize) -> Self {
        self.rules = self.rules.with_outer_rounds(rounds);
        self
    }

    pub fn with_inner_rounds(mut self, rounds: usize) -> Self {
        self.rules = self.rules.with_inner_rounds(rounds);
        self
    }

    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.rules = self.rules.with_selection(selection);
        self
    }

    pub fn with_supplement_accounting(mut self, accounting: SupplementAccounting) -> Self {
        self.rules = self.rules.with_supplement_accounting(accounting);
        self
    }

    pub fn with_opening_pause(mut self, pause: Duration) -> Self {
        self.opening_pause = pause;
        self
    }
}
