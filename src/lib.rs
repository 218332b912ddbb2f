//! # docmate
//!
//! Document question answering engine.
//!
//! Each question is planned by a [`QueryPlanner`](agent::QueryPlanner),
//! answered by a bounded ReAct [`ReasoningAgent`](agent::ReasoningAgent)
//! that searches, summarizes and answers over a
//! [`Retriever`](retrieval::Retriever), and, when the plan splits it into
//! sub-questions, merged by a [`SynthesizerAgent`](agent::SynthesizerAgent).
//!
//! ## Example
//!
//! ```no_run
//! use docmate::{AgentConfig, DocumentQaService};
//!
//! # async fn run() -> Result<(), docmate::AgentError> {
//! let config = AgentConfig::builder()
//!     .corpus_path("policy.jsonl")
//!     .from_env()
//!     .build();
//! let service = DocumentQaService::from_config(config)?;
//! service.initialize().await?;
//!
//! let result = service.query("What is the refund policy?").await;
//! println!("{}", result.answer);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cli;
pub mod error;
pub mod retrieval;
pub mod service;

pub use agent::{AgentConfig, EngineContext, ExecutionResult, LlmProvider, Orchestrator, QueryPlan};
pub use error::{AgentError, CommandError, Error, Result};
pub use retrieval::{DocumentUnit, InMemoryRetriever, Retriever, SearchResult};
pub use service::{DocumentQaService, Readiness, ServiceStats};
