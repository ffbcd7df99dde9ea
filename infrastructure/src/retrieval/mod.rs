//! Retrieval adapters: embedding endpoint client and JSON vector index.

mod embedding;
mod embedding_index;
mod vector_index;

pub use embedding::EmbeddingClient;
pub use embedding_index::EmbeddingIndexRetriever;
pub use vector_index::{IndexEntry, ScoredEntry, VectorIndex};
