//! Document question-answering service.
//!
//! Owns the [`EngineContext`] lifecycle and gates queries behind an
//! explicit readiness state machine:
//!
//! ```text
//! Uninitialized ──initialize──► Initializing ──ok──► Ready
//!        ▲                           │
//!        └──────────── error ────────┘
//! ```
//!
//! Queries on a service that is not `Ready` are answered with an error
//! result; they never trigger initialization.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{info, warn};

use crate::agent::client::create_provider;
use crate::agent::{
    AgentConfig, AgentTrace, EngineContext, ExecutionResult, LlmProvider, Orchestrator, QueryPlan,
};
use crate::error::AgentError;
use crate::retrieval::{DocumentUnit, InMemoryRetriever, Retriever, corpus};

/// Service lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Readiness {
    /// Not yet initialized, or a previous initialization failed.
    Uninitialized,
    /// Initialization in progress.
    Initializing,
    /// Accepting queries.
    Ready,
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
        };
        f.write_str(s)
    }
}

/// Service statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceStats {
    /// Current readiness state.
    pub state: Readiness,
    /// Distinct source documents indexed.
    pub document_count: usize,
    /// Units indexed.
    pub unit_count: usize,
}

/// The top-level entry point for asking questions of a document collection.
#[derive(Debug)]
pub struct DocumentQaService {
    orchestrator: Orchestrator,
    state: Mutex<Readiness>,
}

impl DocumentQaService {
    /// Creates an uninitialized service over the given context.
    #[must_use]
    pub const fn new(ctx: EngineContext) -> Self {
        Self {
            orchestrator: Orchestrator::new(ctx),
            state: Mutex::new(Readiness::Uninitialized),
        }
    }

    /// Creates a service with the configured provider and an in-memory retriever.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] if the provider or the index cannot be created.
    pub fn from_config(config: AgentConfig) -> Result<Self, AgentError> {
        let provider: Arc<dyn LlmProvider> = Arc::from(create_provider(&config)?);
        let retriever: Arc<dyn Retriever> = Arc::new(InMemoryRetriever::new()?);
        Ok(Self::new(EngineContext::new(provider, retriever, config)))
    }

    /// Returns the engine context.
    #[must_use]
    pub const fn context(&self) -> &EngineContext {
        self.orchestrator.context()
    }

    /// Returns the current readiness state.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Orchestration`] if the state lock is poisoned.
    pub fn readiness(&self) -> Result<Readiness, AgentError> {
        Ok(*self.lock_state()?)
    }

    /// Loads every configured corpus path into the retriever and becomes `Ready`.
    ///
    /// Returns the number of units indexed. Calling this on a `Ready`
    /// service does nothing and returns 0.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NotReady`] if another initialization is in
    /// progress, or the load error, in which case the state returns to
    /// `Uninitialized` so initialization can be retried.
    pub async fn initialize(&self) -> Result<usize, AgentError> {
        {
            let mut state = self.lock_state()?;
            match *state {
                Readiness::Ready => return Ok(0),
                Readiness::Initializing => {
                    return Err(AgentError::NotReady {
                        state: state.to_string(),
                    });
                }
                Readiness::Uninitialized => *state = Readiness::Initializing,
            }
        }
        info!(to = %Readiness::Initializing, "service state transition");

        // Reverts to Uninitialized unless committed, including when this future is dropped.
        let guard = InitGuard {
            state: &self.state,
            committed: false,
        };

        let indexed = self.load_corpus().await.inspect_err(|e| {
            warn!(error = %e, "initialization failed");
        })?;

        guard.commit()?;
        info!(indexed, to = %Readiness::Ready, "service state transition");
        Ok(indexed)
    }

    /// Answers a question.
    ///
    /// Never fails: a service that is not `Ready` yields an error result.
    pub async fn query(&self, question: &str) -> ExecutionResult {
        match self.ensure_ready() {
            Ok(()) => self.orchestrator.execute(question).await,
            Err(e) => {
                warn!(error = %e, "query rejected");
                ExecutionResult::error(question, e)
            }
        }
    }

    /// Answers a question and returns the agent traces produced.
    pub async fn query_traced(&self, question: &str) -> (ExecutionResult, Vec<AgentTrace>) {
        match self.ensure_ready() {
            Ok(()) => self.orchestrator.execute_traced(question).await,
            Err(e) => (ExecutionResult::error(question, e), Vec::new()),
        }
    }

    /// Produces the plan for a question without executing it.
    pub async fn plan(&self, question: &str) -> QueryPlan {
        self.orchestrator.plan(question).await
    }

    /// Adds pre-chunked units to the retriever.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Retrieval`] if the retriever rejects the write.
    pub async fn add_document(&self, units: Vec<DocumentUnit>) -> Result<usize, AgentError> {
        self.context().retriever.add_documents(units).await
    }

    /// Reports readiness and collection statistics.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] if the retriever cannot report statistics.
    pub fn stats(&self) -> Result<ServiceStats, AgentError> {
        let state = self.readiness()?;
        let retrieval = self.context().retriever.stats()?;
        Ok(ServiceStats {
            state,
            document_count: retrieval.document_count,
            unit_count: retrieval.unit_count,
        })
    }

    async fn load_corpus(&self) -> Result<usize, AgentError> {
        let ctx = self.context();
        let mut indexed = 0;
        for path in &ctx.config.corpus_paths {
            let units = corpus::load_path(path)?;
            let added = ctx.retriever.add_documents(units).await?;
            info!(path = %path.display(), added, "corpus loaded");
            indexed += added;
        }
        Ok(indexed)
    }

    fn ensure_ready(&self) -> Result<(), AgentError> {
        let state = *self.lock_state()?;
        if state == Readiness::Ready {
            Ok(())
        } else {
            Err(AgentError::NotReady {
                state: state.to_string(),
            })
        }
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, Readiness>, AgentError> {
        self.state.lock().map_err(|_| AgentError::Orchestration {
            message: "service state lock poisoned".to_string(),
        })
    }
}

struct InitGuard<'a> {
    state: &'a Mutex<Readiness>,
    committed: bool,
}

impl InitGuard<'_> {
    /// Marks the service ready. Only a successful write disarms the guard.
    fn commit(mut self) -> Result<(), AgentError> {
        let mut state = self.state.lock().map_err(|_| AgentError::Orchestration {
            message: "service state lock poisoned".to_string(),
        })?;
        *state = Readiness::Ready;
        self.committed = true;
        Ok(())
    }
}

impl Drop for InitGuard<'_> {
    fn drop(&mut self) {
        if !self.committed
            && let Ok(mut state) = self.state.lock()
        {
            *state = Readiness::Uninitialized;
        }
    }
}
