//! In-memory BM25 retriever.
//!
//! Backed by a RAM-resident `tantivy` index: unit content is indexed with
//! the default tokenizer and ranked by tantivy's BM25 scorer, higher is
//! better. Metadata rides along as a stored JSON field. Searches go through
//! a shared reader; additions take the writer lock, commit, and reload the
//! reader, so writes are serialized at this boundary.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::{Field, STORED, STRING, Schema, TEXT, Value};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, doc};
use tracing::{debug, warn};

use super::{ChunkMetadata, DocumentUnit, RetrievalStats, Retriever, SearchResult};
use crate::error::AgentError;

/// Writer heap for the single indexing thread.
const WRITER_HEAP_BYTES: usize = 20_000_000;

/// Index fields.
#[derive(Clone, Copy)]
struct Fields {
    content: Field,
    source: Field,
    metadata: Field,
}

impl Fields {
    fn schema() -> (Schema, Self) {
        let mut builder = Schema::builder();
        let content = builder.add_text_field("content", TEXT | STORED);
        let source = builder.add_text_field("source", STRING | STORED);
        let metadata = builder.add_text_field("metadata", STORED);
        (
            builder.build(),
            Self {
                content,
                source,
                metadata,
            },
        )
    }
}

/// Writer-side state, guarded by one lock.
struct WriteState {
    writer: IndexWriter,
    sources: HashSet<String>,
    units: usize,
}

/// In-memory retrieval collaborator.
pub struct InMemoryRetriever {
    index: Index,
    reader: IndexReader,
    fields: Fields,
    state: Mutex<WriteState>,
}

impl InMemoryRetriever {
    /// Creates an empty retriever.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Retrieval`] if the index writer or reader
    /// cannot be created.
    pub fn new() -> Result<Self, AgentError> {
        let (schema, fields) = Fields::schema();
        let index = Index::create_in_ram(schema);
        let writer: IndexWriter = index
            .writer_with_num_threads(1, WRITER_HEAP_BYTES)
            .map_err(index_error)?;
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(index_error)?;

        Ok(Self {
            index,
            reader,
            fields,
            state: Mutex::new(WriteState {
                writer,
                sources: HashSet::new(),
                units: 0,
            }),
        })
    }

    fn to_result(&self, doc: &TantivyDocument, score: f32) -> SearchResult {
        let text = |field: Field| {
            doc.get_first(field)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        let raw_metadata = text(self.fields.metadata);
        let metadata = serde_json::from_str(&raw_metadata).unwrap_or_else(|e| {
            warn!(error = %e, "stored metadata unreadable");
            ChunkMetadata {
                source: text(self.fields.source),
                ..ChunkMetadata::default()
            }
        });

        SearchResult {
            content: text(self.fields.content),
            metadata,
            score: f64::from(score),
        }
    }
}

fn index_error(e: impl std::fmt::Display) -> AgentError {
    AgentError::Retrieval {
        message: e.to_string(),
    }
}

fn poisoned() -> AgentError {
    AgentError::Retrieval {
        message: "index lock poisoned".to_string(),
    }
}

impl std::fmt::Debug for InMemoryRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRetriever")
            .field("units", &self.reader.searcher().num_docs())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Retriever for InMemoryRetriever {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>, AgentError> {
        if query.trim().is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        // Model-written queries are free text; syntax errors only drop the offending clause.
        let parser = QueryParser::for_index(&self.index, vec![self.fields.content]);
        let (parsed, errors) = parser.parse_query_lenient(query);
        if !errors.is_empty() {
            debug!(query, errors = errors.len(), "query parsed leniently");
        }

        let searcher = self.reader.searcher();
        let top_docs = searcher
            .search(&parsed, &TopDocs::with_limit(k))
            .map_err(index_error)?;

        let mut results = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address).map_err(index_error)?;
            results.push(self.to_result(&doc, score));
        }

        debug!(query, k, hits = results.len(), "memory search");
        Ok(results)
    }

    async fn add_documents(&self, units: Vec<DocumentUnit>) -> Result<usize, AgentError> {
        let mut state = self.state.lock().map_err(|_| poisoned())?;
        let mut added = Vec::new();

        for unit in units {
            if unit.content.trim().is_empty() {
                continue;
            }
            let metadata = serde_json::to_string(&unit.metadata).map_err(index_error)?;
            state
                .writer
                .add_document(doc!(
                    self.fields.content => unit.content.as_str(),
                    self.fields.source => unit.metadata.source.as_str(),
                    self.fields.metadata => metadata,
                ))
                .map_err(index_error)?;
            added.push(unit.metadata.source);
        }

        if added.is_empty() {
            return Ok(0);
        }

        state.writer.commit().map_err(index_error)?;
        self.reader.reload().map_err(index_error)?;

        let count = added.len();
        state.units += count;
        state.sources.extend(added);
        debug!(added = count, total = state.units, "indexed units");
        Ok(count)
    }

    fn stats(&self) -> Result<RetrievalStats, AgentError> {
        let state = self.state.lock().map_err(|_| poisoned())?;
        Ok(RetrievalStats {
            document_count: state.sources.len(),
            unit_count: state.units,
        })
    }
}
