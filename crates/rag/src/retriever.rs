//! Knowledge retriever
//!
//! Query string in, best-matching stored passage out. A query that matches
//! nothing yields an explicit `NoMatch` rather than an empty string.

use async_trait::async_trait;

use support_agent_config::RetrievalSettings;

use crate::embeddings::EmbeddingClient;
use crate::vector_store::{VectorSearchResult, VectorStore};
use crate::RagError;

/// Retriever configuration
#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    /// Number of candidates to fetch per query
    pub top_k: usize,
    /// Minimum similarity score for a passage to count as a match
    pub min_score: f32,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_score: 0.0,
        }
    }
}

impl From<&RetrievalSettings> for RetrieverConfig {
    fn from(settings: &RetrievalSettings) -> Self {
        Self {
            top_k: settings.top_k,
            min_score: settings.min_score,
        }
    }
}

/// Outcome of a knowledge lookup
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalOutcome {
    /// Best-matching stored passage
    Passage(String),
    /// Nothing relevant in the knowledge base
    NoMatch,
}

/// Lookup interface consumed by the chat pipeline
#[async_trait]
pub trait KnowledgeLookup: Send + Sync {
    /// Find the best-matching passage for a query
    async fn lookup(&self, query: &str) -> Result<RetrievalOutcome, RagError>;

    /// Retriever name for logging
    fn name(&self) -> &str;
}

/// Retriever backed by an embedding endpoint and a vector store
pub struct KnowledgeRetriever {
    embedder: EmbeddingClient,
    store: VectorStore,
    config: RetrieverConfig,
}

impl KnowledgeRetriever {
    /// Create a new retriever
    pub fn new(embedder: EmbeddingClient, store: VectorStore, config: RetrieverConfig) -> Self {
        Self {
            embedder,
            store,
            config,
        }
    }
}

#[async_trait]
impl KnowledgeLookup for KnowledgeRetriever {
    async fn lookup(&self, query: &str) -> Result<RetrievalOutcome, RagError> {
        let embedding = self.embedder.embed_query(query).await?;
        let results = self.store.search(&embedding, self.config.top_k).await?;

        let outcome = select_best(results, self.config.min_score);
        if outcome == RetrievalOutcome::NoMatch {
            tracing::debug!(query, "no knowledge-base match");
        }

        Ok(outcome)
    }

    fn name(&self) -> &str {
        "knowledge_retriever"
    }
}

/// Pick the best usable passage from ranked search results
///
/// Results arrive ordered by descending score; the first one at or above the
/// threshold with non-empty content wins.
fn select_best(results: Vec<VectorSearchResult>, min_score: f32) -> RetrievalOutcome {
    results
        .into_iter()
        .find(|r| r.score >= min_score && !r.content.trim().is_empty())
        .map(|r| RetrievalOutcome::Passage(r.content))
        .unwrap_or(RetrievalOutcome::NoMatch)
}
