//! Vector-index adapters for the retrieval ports.

use super::embedding::EmbeddingClient;
use super::vector_index::VectorIndex;
use async_trait::async_trait;
use std::collections::BTreeSet;
use tracing::debug;
use trial_application::{CaseRetriever, KnowledgeMemory, RetrievalError};
use trial_domain::ArticleId;

/// Embeds a query and searches a [`VectorIndex`].
///
/// As a [`CaseRetriever`] it returns the sorted, deduplicated article IDs
/// attached to the nearest cases; as a [`KnowledgeMemory`] it returns the
/// nearest documents.
pub struct EmbeddingIndexRetriever {
    index: VectorIndex,
    embedder: EmbeddingClient,
    top_k: usize,
    score_threshold: Option<f32>,
}

impl EmbeddingIndexRetriever {
    pub fn new(index: VectorIndex, embedder: EmbeddingClient, top_k: usize) -> Self {
        Self {
            index,
            embedder,
            top_k,
            score_threshold: None,
        }
    }

    pub fn with_score_threshold(mut self, threshold: Option<f32>) -> Self {
        self.score_threshold = threshold;
        self
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}

#[async_trait]
impl CaseRetriever for EmbeddingIndexRetriever {
    async fn similar_articles(
        &self,
        description: &str,
    ) -> Result<BTreeSet<ArticleId>, RetrievalError> {
        let query = self.embedder.embed(description).await?;
        let hits = self.index.nearest(&query, self.top_k, self.score_threshold)?;
        let articles: BTreeSet<ArticleId> = hits
            .iter()
            .flat_map(|hit| hit.entry.laws.iter().copied())
            .collect();
        debug!(hits = hits.len(), articles = articles.len(), "retrieved similar cases");
        Ok(articles)
    }
}

#[async_trait]
impl KnowledgeMemory for EmbeddingIndexRetriever {
    async fn recall(&self, query: &str) -> Result<Vec<String>, RetrievalError> {
        let embedding = self.embedder.embed(query).await?;
        Ok(self
            .index
            .nearest(&embedding, self.top_k, self.score_threshold)?
            .into_iter()
            .map(|hit| hit.entry.document.clone())
            .filter(|doc| !doc.is_empty())
            .collect())
    }
}
