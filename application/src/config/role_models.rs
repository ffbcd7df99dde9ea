//! Role-based model selection.

use trial_domain::{Model, Role, Side};

/// Which model backs which role.
///
/// `judge` and the per-team models fall back to `default` when unset.
#[derive(Debug, Clone, Default)]
pub struct RoleModels {
    pub default: Model,
    pub judge: Option<Model>,
    pub plaintiff_team: Option<Model>,
    pub defendant_team: Option<Model>,
}

impl RoleModels {
    pub fn new(default: Model) -> Self {
        Self {
            default,
            ..Self::default()
        }
    }

    pub fn for_role(&self, role: Role) -> &Model {
        let specific = match role.side() {
            None => self.judge.as_ref(),
            Some(Side::Plaintiff) => self.plaintiff_team.as_ref(),
            Some(Side::Defendant) => self.defendant_team.as_ref(),
        };
        specific.unwrap_or(&self.default)
    }
}
