//! Vector index configuration (`[retrieval]` and `[memory]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use trial_domain::Role;

/// Similar-case retrieval feeding the judge's opening.
///
/// # Example
///
/// ```toml
/// [retrieval]
/// enabled = true
/// index_path = "data/train_law_index.json"
/// embedding_model = "bge-m3"
/// top_k = 5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetrievalConfig {
    pub enabled: bool,
    /// JSON index file with pre-computed embeddings.
    pub index_path: Option<PathBuf>,
    /// Embedding model served by the provider's `/embeddings` endpoint.
    pub embedding_model: String,
    /// Separate embedding endpoint; defaults to `[provider].base_url`.
    pub embedding_base_url: Option<String>,
    pub top_k: usize,
    /// Minimum cosine similarity; unset keeps every top-k hit.
    pub score_threshold: Option<f32>,
}

impl Default for FileRetrievalConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            index_path: None,
            embedding_model: "bge-m3".to_string(),
            embedding_base_url: None,
            top_k: 5,
            score_threshold: None,
        }
    }
}

/// Knowledge memory attached to selected roles.
///
/// Uses the embedding settings of `[retrieval]`.
///
/// # Example
///
/// ```toml
/// [memory]
/// enabled = true
/// index_path = "data/law_articles_index.json"
/// roles = ["judge", "plaintiff_legal_researcher", "defendant_legal_researcher"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMemoryConfig {
    pub enabled: bool,
    pub index_path: Option<PathBuf>,
    pub top_k: usize,
    pub score_threshold: f32,
    /// Role keys that receive recalled snippets.
    pub roles: Vec<String>,
}

impl Default for FileMemoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            index_path: None,
            top_k: 3,
            score_threshold: 0.4,
            roles: [
                Role::Judge,
                Role::PlaintiffLegalResearcher,
                Role::DefendantLegalResearcher,
            ]
            .iter()
            .map(|r| r.key().to_string())
            .collect(),
        }
    }
}
