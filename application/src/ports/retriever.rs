//! Retrieval ports
//!
//! - [`CaseRetriever`]: candidate law articles from similar past cases
//! - [`KnowledgeMemory`]: reference snippets injected into an agent's context
//!
//! Both are best-effort. Callers log failures and continue with nothing.

use async_trait::async_trait;
use std::collections::BTreeSet;
use thiserror::Error;
use trial_domain::ArticleId;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Embedding request failed: {0}")]
    Embedding(String),

    #[error("Malformed index entry: {0}")]
    MalformedEntry(String),
}

/// Similar-case lookup: description → sorted, deduplicated article IDs.
#[async_trait]
pub trait CaseRetriever: Send + Sync {
    async fn similar_articles(&self, description: &str)
    -> Result<BTreeSet<ArticleId>, RetrievalError>;
}

/// Role-attached knowledge memory.
#[async_trait]
pub trait KnowledgeMemory: Send + Sync {
    /// Snippets relevant to `query`, best first.
    async fn recall(&self, query: &str) -> Result<Vec<String>, RetrievalError>;
}

/// Retriever used when retrieval is disabled.
pub struct NoRetriever;

#[async_trait]
impl CaseRetriever for NoRetriever {
    async fn similar_articles(
        &self,
        _description: &str,
    ) -> Result<BTreeSet<ArticleId>, RetrievalError> {
        Ok(BTreeSet::new())
    }
}
