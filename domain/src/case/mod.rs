//! Cases under trial and their ground-truth annotations.

pub mod article;
pub mod record;

pub use article::ArticleId;
pub use record::{RecordRejection, parse_case, parse_truth_table};

use crate::court::Side;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Annotated outcome of a case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruth {
    pub articles: BTreeSet<ArticleId>,
    pub crime_types: BTreeSet<String>,
}

impl GroundTruth {
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty() && self.crime_types.is_empty()
    }
}

/// A case to be heard (Entity). Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    /// Unique within a batch; the resume key
    pub index: i64,
    pub case_id: String,
    pub description: String,
    pub truth: GroundTruth,
    pub plaintiff_evidence: Vec<String>,
    pub defendant_evidence: Vec<String>,
}

impl Case {
    pub fn evidence(&self, side: Side) -> &[String] {
        match side {
            Side::Plaintiff => &self.plaintiff_evidence,
            Side::Defendant => &self.defendant_evidence,
        }
    }

    pub fn has_evidence(&self, side: Side) -> bool {
        !self.evidence(side).is_empty()
    }

    /// Replace the inline annotation with one from a ground-truth table.
    pub fn with_truth(mut self, truth: GroundTruth) -> Self {
        self.truth = truth;
        self
    }
}
