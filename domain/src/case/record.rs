//! Parsing of batch-input and ground-truth records.
//!
//! Records arrive as loosely typed JSON. Parsing never fails the batch: a
//! malformed record yields a [`RecordRejection`] that the driver turns into a
//! skipped case.

use super::article::ArticleId;
use super::{Case, GroundTruth};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

pub const FIELD_INDEX: &str = "index";
pub const FIELD_CASE_ID: &str = "CaseId";
pub const FIELD_DESCRIPTION: &str = "case_description";
pub const FIELD_PLAINTIFF_EVIDENCE: &str = "plaintiff_evidence";
pub const FIELD_DEFENDANT_EVIDENCE: &str = "defendant_evidence";
pub const FIELD_LAW_ARTICLES: &str = "Law Articles";
pub const FIELD_CRIME_TYPE: &str = "Crime Type";

/// A record that could not become a [`Case`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRejection {
    pub index: Option<i64>,
    pub case_id: Option<String>,
    pub reason: String,
}

/// Parse one batch-input record.
pub fn parse_case(record: &Value) -> Result<Case, RecordRejection> {
    let Some(obj) = record.as_object() else {
        return Err(RecordRejection {
            index: None,
            case_id: None,
            reason: "record is not a JSON object".to_string(),
        });
    };

    let index = obj.get(FIELD_INDEX).and_then(Value::as_i64);
    let case_id = obj.get(FIELD_CASE_ID).and_then(text_of);
    let description = obj
        .get(FIELD_DESCRIPTION)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let (Some(index), Some(description)) = (index, description) else {
        return Err(RecordRejection {
            index,
            case_id,
            reason: format!("missing {} or {}", FIELD_INDEX, FIELD_DESCRIPTION),
        });
    };

    let truth = GroundTruth {
        articles: articles_of(obj.get(FIELD_LAW_ARTICLES)),
        crime_types: crime_types_of(obj.get(FIELD_CRIME_TYPE)),
    };

    Ok(Case {
        index,
        case_id: case_id.unwrap_or_else(|| index.to_string()),
        description: description.to_string(),
        truth,
        plaintiff_evidence: evidence_of(obj.get(FIELD_PLAINTIFF_EVIDENCE)),
        defendant_evidence: evidence_of(obj.get(FIELD_DEFENDANT_EVIDENCE)),
    })
}

/// Build the `CaseId → truth` lookup from a ground-truth file.
///
/// Records without a `CaseId` are ignored. A later record for the same id
/// replaces an earlier one.
pub fn parse_truth_table(records: &[Value]) -> BTreeMap<String, GroundTruth> {
    records
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|obj| {
            let case_id = obj.get(FIELD_CASE_ID).and_then(text_of)?;
            Some((
                case_id,
                GroundTruth {
                    articles: articles_of(obj.get(FIELD_LAW_ARTICLES)),
                    crime_types: crime_types_of(obj.get(FIELD_CRIME_TYPE)),
                },
            ))
        })
        .collect()
}

/// Normalize a `Law Articles` field: a list of tokens or a single token.
pub fn articles_of(value: Option<&Value>) -> BTreeSet<ArticleId> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(ArticleId::from_token).collect(),
        Some(Value::Null) | None => BTreeSet::new(),
        Some(single) => ArticleId::from_token(single).into_iter().collect(),
    }
}

/// Normalize a `Crime Type` field: a list of names or a single name.
pub fn crime_types_of(value: Option<&Value>) -> BTreeSet<String> {
    string_list(value).into_iter().collect()
}

fn evidence_of(value: Option<&Value>) -> Vec<String> {
    string_list(value)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(text_of).collect(),
        Some(other) => text_of(other).into_iter().collect(),
        None => Vec::new(),
    }
}

/// Non-empty text form of a scalar (`"x"`, `12`).
fn text_of(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
