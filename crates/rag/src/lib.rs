//! Knowledge-base retrieval
//!
//! Wraps the vector-search backend behind a small surface: a query string
//! goes in, the best-matching stored passage (or an explicit no-match) comes
//! out. Embedding happens against an HTTP embeddings endpoint; similarity
//! search runs against Qdrant.

pub mod embeddings;
pub mod retriever;
pub mod vector_store;

pub use embeddings::{EmbeddingClient, EmbeddingConfig};
pub use retriever::{KnowledgeLookup, KnowledgeRetriever, RetrievalOutcome, RetrieverConfig};
pub use vector_store::{VectorSearchResult, VectorStore, VectorStoreConfig};

use thiserror::Error;

/// Retrieval errors
#[derive(Error, Debug)]
pub enum RagError {
    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("vector store error: {0}")]
    VectorStore(String),

    #[error("search error: {0}")]
    Search(String),

    #[error("connection error: {0}")]
    Connection(String),
}
