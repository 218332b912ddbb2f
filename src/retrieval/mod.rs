//! Retrieval gateway.
//!
//! The engine consumes retrieval through the [`Retriever`] trait: "give me
//! the `k` passages most similar to this query". How passages are embedded
//! or indexed is the collaborator's business. [`InMemoryRetriever`] is a
//! BM25 reference collaborator used by the CLI and tests.

pub mod corpus;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

pub use memory::InMemoryRetriever;

/// Provenance of a pre-chunked text unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Path of the source document.
    #[serde(default)]
    pub source: String,
    /// Position of the unit within its source document (0-based).
    #[serde(default)]
    pub chunk_index: usize,
    /// File name of the source document.
    #[serde(default)]
    pub file_name: String,
    /// File type of the source document (e.g. `pdf`, `docx`, `txt`).
    #[serde(default)]
    pub file_type: String,
}

/// A pre-chunked text unit accepted by a retriever.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUnit {
    /// Passage text.
    pub content: String,
    /// Provenance.
    #[serde(default)]
    pub metadata: ChunkMetadata,
}

impl DocumentUnit {
    /// Creates a unit with the given content and provenance.
    #[must_use]
    pub fn new(content: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }
}

/// One retrieved passage.
///
/// `score` is an opaque ranking key in the collaborator's own convention.
/// It is only meaningful relative to other results of the same call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Passage text.
    pub content: String,
    /// Provenance.
    pub metadata: ChunkMetadata,
    /// Ranking key assigned by the retriever.
    pub score: f64,
}

/// Collection statistics reported by a retriever.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalStats {
    /// Distinct source documents.
    pub document_count: usize,
    /// Indexed units.
    pub unit_count: usize,
}

/// Retrieval collaborator consumed by the engine.
///
/// Implementations must tolerate concurrent `search` calls. Writes through
/// [`Retriever::add_documents`] are serialized by the implementation.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Returns up to `k` passages ranked by relevance to `query`, best first.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Retrieval`] when the backend fails.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>, AgentError>;

    /// Adds pre-chunked units to the collection, returning how many were kept.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Retrieval`] when the backend fails.
    async fn add_documents(&self, units: Vec<DocumentUnit>) -> Result<usize, AgentError>;

    /// Reports collection statistics.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Retrieval`] when the backend fails.
    fn stats(&self) -> Result<RetrievalStats, AgentError>;
}
