//! Extraction of the structured verdict from the judge's utterances.
//!
//! The judge is instructed to end the hearing with a JSON block such as
//!
//! ```text
//! {"Law Articles": [264, 67], "Crime Type": ["盗窃罪"], "Sentence": "...", "Fine": "..."}
//! ```
//!
//! Extraction is best-effort: anything that does not parse yields no
//! judgment, never an error.

use crate::case::ArticleId;
use crate::case::record::{FIELD_CRIME_TYPE, FIELD_LAW_ARTICLES, articles_of, crime_types_of};
use crate::court::Transcript;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// First `{` up to the first following `}`.
static BRACE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*?\}").expect("brace block pattern is valid"));

/// Verdict parsed from a judge utterance (Value Object).
///
/// `sentence` and `fine` are carried through to reports but not scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub articles: BTreeSet<ArticleId>,
    pub crime_types: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fine: Option<Value>,
}

impl Judgment {
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty() && self.crime_types.is_empty()
    }
}

/// Parse the first brace-delimited block of `text`.
///
/// Returns `None` when there is no block, it is not valid JSON, or it is not
/// a JSON object. A valid object without the expected keys yields an empty
/// judgment.
pub fn extract_judgment(text: &str) -> Option<Judgment> {
    let block = BRACE_BLOCK.find(text)?;
    let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(block.as_str()) else {
        return None;
    };

    Some(Judgment {
        articles: articles_of(obj.get(FIELD_LAW_ARTICLES)),
        crime_types: crime_types_of(obj.get(FIELD_CRIME_TYPE)),
        sentence: obj.get("Sentence").cloned(),
        fine: obj.get("Fine").cloned(),
    })
}

/// Judgment from the most recent judge utterance that carries a parseable
/// block; empty if there is none.
pub fn extract_from_transcript(transcript: &Transcript) -> Judgment {
    transcript
        .judge_utterances_rev()
        .find_map(|u| extract_judgment(&u.content))
        .unwrap_or_default()
}
