//! Phases of the outer courtroom loop.

use super::role::Side;

/// Where a hearing currently stands.
///
/// ```text
/// Start → AwaitingJudgeOpening → Deliberating ⇄ SupplementPending(side)
///                                     ↓
///                            AwaitingFinalJudgment → Terminated
/// ```
///
/// A closing keyword moves any phase straight to `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HearingPhase {
    Start,
    AwaitingJudgeOpening,
    Deliberating,
    SupplementPending(Side),
    AwaitingFinalJudgment,
    Terminated,
}

impl HearingPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, HearingPhase::Terminated)
    }
}

impl std::fmt::Display for HearingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HearingPhase::Start => write!(f, "start"),
            HearingPhase::AwaitingJudgeOpening => write!(f, "awaiting-opening"),
            HearingPhase::Deliberating => write!(f, "deliberating"),
            HearingPhase::SupplementPending(side) => write!(f, "supplement-pending({})", side),
            HearingPhase::AwaitingFinalJudgment => write!(f, "awaiting-final-judgment"),
            HearingPhase::Terminated => write!(f, "terminated"),
        }
    }
}
