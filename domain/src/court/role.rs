//! Courtroom roles.
//!
//! Roles are a closed set: one judge, one delegate per side and three
//! specialists per side. Speaker lookups are typed filters over [`Role`]
//! rather than name matching.

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One of the two parties in the hearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Plaintiff,
    Defendant,
}

impl Side {
    /// Fixed evaluation order: plaintiff first.
    pub const ALL: [Side; 2] = [Side::Plaintiff, Side::Defendant];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Plaintiff => "plaintiff",
            Side::Defendant => "defendant",
        }
    }

    /// Display label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Side::Plaintiff => "原告",
            Side::Defendant => "被告",
        }
    }

    pub fn opponent(&self) -> Side {
        match self {
            Side::Plaintiff => Side::Defendant,
            Side::Defendant => Side::Plaintiff,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Seat inside a side's internal team.
///
/// [`TeamSeat::ROTATION`] is the round-robin order of the inner deliberation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamSeat {
    EvidenceSpecialist,
    LegalResearcher,
    LeadCounsel,
}

impl TeamSeat {
    pub const ROTATION: [TeamSeat; 3] = [
        TeamSeat::EvidenceSpecialist,
        TeamSeat::LegalResearcher,
        TeamSeat::LeadCounsel,
    ];
}

/// A participant in the hearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Judge,
    PlaintiffDelegate,
    DefendantDelegate,
    PlaintiffEvidenceSpecialist,
    PlaintiffLegalResearcher,
    PlaintiffLeadCounsel,
    DefendantEvidenceSpecialist,
    DefendantLegalResearcher,
    DefendantLeadCounsel,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Judge,
        Role::PlaintiffDelegate,
        Role::DefendantDelegate,
        Role::PlaintiffEvidenceSpecialist,
        Role::PlaintiffLegalResearcher,
        Role::PlaintiffLeadCounsel,
        Role::DefendantEvidenceSpecialist,
        Role::DefendantLegalResearcher,
        Role::DefendantLeadCounsel,
    ];

    /// Speaker name as it appears in transcripts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Judge => "PresidingJudge",
            Role::PlaintiffDelegate => "PlaintiffTeamDelegate",
            Role::DefendantDelegate => "DefendantTeamDelegate",
            Role::PlaintiffEvidenceSpecialist => "PlaintiffEvidenceSpecialist",
            Role::PlaintiffLegalResearcher => "PlaintiffLegalResearcher",
            Role::PlaintiffLeadCounsel => "PlaintiffLeadCounsel",
            Role::DefendantEvidenceSpecialist => "DefendantEvidenceSpecialist",
            Role::DefendantLegalResearcher => "DefendantLegalResearcher",
            Role::DefendantLeadCounsel => "DefendantLeadCounsel",
        }
    }

    /// Configuration key (`[prompts]`, `[memory].roles`).
    pub fn key(&self) -> &'static str {
        match self {
            Role::Judge => "judge",
            Role::PlaintiffDelegate => "plaintiff_delegate",
            Role::DefendantDelegate => "defendant_delegate",
            Role::PlaintiffEvidenceSpecialist => "plaintiff_evidence_specialist",
            Role::PlaintiffLegalResearcher => "plaintiff_legal_researcher",
            Role::PlaintiffLeadCounsel => "plaintiff_lead_counsel",
            Role::DefendantEvidenceSpecialist => "defendant_evidence_specialist",
            Role::DefendantLegalResearcher => "defendant_legal_researcher",
            Role::DefendantLeadCounsel => "defendant_lead_counsel",
        }
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            Role::Judge => None,
            Role::PlaintiffDelegate
            | Role::PlaintiffEvidenceSpecialist
            | Role::PlaintiffLegalResearcher
            | Role::PlaintiffLeadCounsel => Some(Side::Plaintiff),
            Role::DefendantDelegate
            | Role::DefendantEvidenceSpecialist
            | Role::DefendantLegalResearcher
            | Role::DefendantLeadCounsel => Some(Side::Defendant),
        }
    }

    pub fn delegate(side: Side) -> Role {
        match side {
            Side::Plaintiff => Role::PlaintiffDelegate,
            Side::Defendant => Role::DefendantDelegate,
        }
    }

    pub fn specialist(side: Side, seat: TeamSeat) -> Role {
        match (side, seat) {
            (Side::Plaintiff, TeamSeat::EvidenceSpecialist) => Role::PlaintiffEvidenceSpecialist,
            (Side::Plaintiff, TeamSeat::LegalResearcher) => Role::PlaintiffLegalResearcher,
            (Side::Plaintiff, TeamSeat::LeadCounsel) => Role::PlaintiffLeadCounsel,
            (Side::Defendant, TeamSeat::EvidenceSpecialist) => Role::DefendantEvidenceSpecialist,
            (Side::Defendant, TeamSeat::LegalResearcher) => Role::DefendantLegalResearcher,
            (Side::Defendant, TeamSeat::LeadCounsel) => Role::DefendantLeadCounsel,
        }
    }

    pub fn is_delegate(&self) -> bool {
        matches!(self, Role::PlaintiffDelegate | Role::DefendantDelegate)
    }

    pub fn is_lead_counsel(&self) -> bool {
        matches!(self, Role::PlaintiffLeadCounsel | Role::DefendantLeadCounsel)
    }

    /// Roles backed by an LLM agent (delegates speak through their team).
    pub fn is_agent(&self) -> bool {
        !self.is_delegate()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = DomainError;

    /// Accepts both the transcript name and the configuration key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s || role.key() == s)
            .ok_or_else(|| DomainError::UnknownRole(s.to_string()))
    }
}

impl Serialize for Role {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
