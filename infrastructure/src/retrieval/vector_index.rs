//! In-memory vector index loaded from a JSON file.
//!
//! File format: a JSON array of entries
//!
//! ```json
//! [{"document": "...", "embedding": [0.1, 0.2], "laws": "[264, 67]"}]
//! ```
//!
//! `laws` may be an array or the stringified array the index builder writes.
//! All embeddings must share one dimension.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;
use trial_application::RetrievalError;
use trial_domain::ArticleId;
use trial_domain::case::record::articles_of;

#[derive(Deserialize)]
struct RawEntry {
    #[serde(default)]
    document: String,
    embedding: Vec<f32>,
    #[serde(default)]
    laws: Value,
}

#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub document: String,
    pub embedding: Vec<f32>,
    pub laws: BTreeSet<ArticleId>,
}

impl IndexEntry {
    pub fn new(document: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            document: document.into(),
            embedding,
            laws: BTreeSet::new(),
        }
    }

    pub fn with_laws(mut self, laws: impl IntoIterator<Item = u32>) -> Self {
        self.laws = laws.into_iter().map(ArticleId).collect();
        self
    }
}

/// A hit returned by [`VectorIndex::nearest`].
#[derive(Debug, Clone, Copy)]
pub struct ScoredEntry<'a> {
    pub entry: &'a IndexEntry,
    pub score: f32,
}

#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RetrievalError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RetrievalError::IndexUnavailable(format!("{}: {}", path.display(), e))
        })?;
        let entries: Vec<RawEntry> = serde_json::from_str(&raw).map_err(|e| {
            RetrievalError::IndexUnavailable(format!("{}: {}", path.display(), e))
        })?;

        let index = Self::from_entries(
            entries
                .into_iter()
                .map(|raw| IndexEntry {
                    laws: laws_of(&raw.laws),
                    document: raw.document,
                    embedding: raw.embedding,
                })
                .collect(),
        )?;
        info!(path = %path.display(), entries = index.len(), "loaded vector index");
        Ok(index)
    }

    pub fn from_entries(entries: Vec<IndexEntry>) -> Result<Self, RetrievalError> {
        if let Some(first) = entries.first() {
            let dimension = first.embedding.len();
            if let Some(pos) = entries.iter().position(|e| e.embedding.len() != dimension) {
                return Err(RetrievalError::MalformedEntry(format!(
                    "entry {} has dimension {}, expected {}",
                    pos,
                    entries[pos].embedding.len(),
                    dimension
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.entries.first().map(|e| e.embedding.len())
    }

    /// Top-`k` entries by cosine similarity, best first.
    pub fn nearest(
        &self,
        query: &[f32],
        top_k: usize,
        threshold: Option<f32>,
    ) -> Result<Vec<ScoredEntry<'_>>, RetrievalError> {
        if let Some(dimension) = self.dimension()
            && dimension != query.len()
        {
            return Err(RetrievalError::MalformedEntry(format!(
                "query has dimension {}, index has {}",
                query.len(),
                dimension
            )));
        }

        let mut scored: Vec<ScoredEntry<'_>> = self
            .entries
            .iter()
            .map(|entry| ScoredEntry {
                entry,
                score: cosine(query, &entry.embedding),
            })
            .filter(|hit| threshold.is_none_or(|t| hit.score >= t))
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        Ok(scored)
    }
}

fn laws_of(value: &Value) -> BTreeSet<ArticleId> {
    if let Value::String(text) = value
        && let Ok(parsed @ Value::Array(_)) = serde_json::from_str::<Value>(text)
    {
        return articles_of(Some(&parsed));
    }
    articles_of(Some(value))
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> VectorIndex {
        VectorIndex::from_entries(vec![
            IndexEntry::new("盗窃", vec![1.0, 0.0]).with_laws([264]),
            IndexEntry::new("抢劫", vec![0.0, 1.0]).with_laws([263]),
            IndexEntry::new("入户盗窃", vec![0.8, 0.6]).with_laws([264, 67]),
        ])
        .unwrap()
    }

    #[test]
    fn test_nearest_orders_by_similarity() {
        let idx = index();
        let hits = idx.nearest(&[1.0, 0.0], 2, None).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entry.document, "盗窃");
        assert_eq!(hits[1].entry.document, "入户盗窃");
        assert!((hits[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_threshold_filters_hits() {
        let idx = index();
        let hits = idx.nearest(&[1.0, 0.0], 5, Some(0.5)).unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = VectorIndex::from_entries(vec![
            IndexEntry::new("a", vec![1.0]),
            IndexEntry::new("b", vec![1.0, 2.0]),
        ])
        .unwrap_err();
        assert!(matches!(err, RetrievalError::MalformedEntry(_)));
        assert!(index().nearest(&[1.0], 1, None).is_err());
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_load_stringified_laws() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(
            &path,
            r#"[
                {"document": "甲", "embedding": [1.0, 0.0], "laws": "[64, 67, 52]"},
                {"document": "乙", "embedding": [0.0, 1.0], "laws": [264, "第67条"]},
                {"document": "丙", "embedding": [0.5, 0.5]}
            ]"#,
        )
        .unwrap();

        let idx = VectorIndex::load(&path).unwrap();
        assert_eq!(idx.len(), 3);
        let hits = idx.nearest(&[1.0, 0.0], 1, None).unwrap();
        let laws: Vec<u32> = hits[0].entry.laws.iter().map(|a| a.get()).collect();
        assert_eq!(laws, vec![52, 64, 67]);
        let hits = idx.nearest(&[0.0, 1.0], 1, None).unwrap();
        let laws: Vec<u32> = hits[0].entry.laws.iter().map(|a| a.get()).collect();
        assert_eq!(laws, vec![67, 264]);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = VectorIndex::load("/nonexistent/index.json").unwrap_err();
        assert!(matches!(err, RetrievalError::IndexUnavailable(_)));
    }
}
