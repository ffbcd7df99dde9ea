//! Law-article identifiers.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit run pattern is valid"));

static DIGIT_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d$").expect("digit char pattern is valid"));

/// Numeric identifier of a criminal-law article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub u32);

impl ArticleId {
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Normalize a raw token from model output or a dataset.
    ///
    /// Numbers are truncated toward zero; negative or out-of-range numbers
    /// are dropped since an article id is unsigned. Anything else goes
    /// through [`ArticleId::from_text`].
    pub fn from_token(token: &Value) -> Option<Self> {
        match token {
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    return u32::try_from(v).ok().map(ArticleId);
                }
                let v = n.as_f64()?.trunc();
                (v.is_finite() && v >= 0.0 && v <= f64::from(u32::MAX))
                    .then(|| ArticleId(v as u32))
            }
            Value::String(s) => Self::from_text(s),
            Value::Null => None,
            other => Self::from_text(&other.to_string()),
        }
    }

    /// Normalize a token given as text (`"123"`, `"第123条"`, `"第１２３条"`).
    ///
    /// Uses the first run of decimal digits that fits an id. Any Unicode
    /// decimal digit counts, so full-width model output is kept.
    pub fn from_text(text: &str) -> Option<Self> {
        if let Ok(id) = text.trim().parse::<u32>() {
            return Some(ArticleId(id));
        }
        DIGIT_RUN
            .find_iter(text)
            .find_map(|m| parse_digit_run(m.as_str()))
            .map(ArticleId)
    }
}

fn parse_digit_run(run: &str) -> Option<u32> {
    run.chars().try_fold(0u32, |acc, c| {
        acc.checked_mul(10)?.checked_add(decimal_value(c)?)
    })
}

fn is_decimal(c: char) -> bool {
    let mut buf = [0u8; 4];
    DIGIT_CHAR.is_match(c.encode_utf8(&mut buf))
}

/// Value of a Unicode decimal digit.
///
/// Decimal digits are assigned in contiguous runs starting at zero, so the
/// value is the distance from the start of the run, modulo ten.
fn decimal_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    if !is_decimal(c) {
        return None;
    }
    let mut zero = c as u32;
    while let Some(prev) = zero.checked_sub(1).and_then(char::from_u32)
        && is_decimal(prev)
    {
        zero -= 1;
    }
    Some((c as u32 - zero) % 10)
}

impl std::fmt::Display for ArticleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ArticleId {
    fn from(value: u32) -> Self {
        ArticleId(value)
    }
}
