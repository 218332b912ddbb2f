//! Result types for agent runs and query execution.
//!
//! An [`AgentTrace`] is owned by one reasoning-agent invocation and
//! consumed by the orchestrator, which folds traces into an
//! [`ExecutionResult`]. Nothing here outlives a single query.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::message::{ChatMessage, TokenUsage};
use super::plan::QueryPlan;
use super::prompt::build_observation_message;

/// Evidence kind recorded for retrieval side effects.
pub const EVIDENCE_KIND_SEARCH: &str = "document_search";

/// Evidence source tag for retrieval side effects.
pub const EVIDENCE_SOURCE_SEARCH: &str = "vector_search";

/// Why a reasoning-agent run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The model emitted the final-answer marker.
    FinalAnswer,
    /// The model answered without any marker.
    Unstructured,
    /// The iteration cap was reached.
    MaxIterations,
    /// A completion call failed.
    Error,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FinalAnswer => "final_answer",
            Self::Unstructured => "unstructured",
            Self::MaxIterations => "max_iterations",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// One tool dispatch recorded during an agent run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolObservation {
    /// Tool name as requested by the model.
    pub tool: String,
    /// Tool input.
    pub input: String,
    /// Observation text returned to the model.
    pub observation: String,
    /// Passages retrieved; set only for document searches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_found: Option<usize>,
    /// Whether the dispatch failed or named an unknown tool.
    pub is_error: bool,
}

/// A retrieval side effect observed during an agent run.
///
/// Informational only; it does not link an answer to specific passages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// Evidence kind, e.g. `document_search`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The observation text that reported the retrieval.
    pub content: String,
    /// Where the evidence came from.
    pub source: String,
}

/// Result of one reasoning-agent run on one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTrace {
    /// Final answer text; never empty.
    pub answer: String,
    /// Iterations consumed; never more than the configured maximum.
    pub iterations: usize,
    /// Ordered transcript of exchanged messages.
    pub transcript: Vec<ChatMessage>,
    /// Tool dispatches in order.
    #[serde(default)]
    pub observations: Vec<ToolObservation>,
    /// Why the run stopped.
    pub stop_reason: StopReason,
    /// Tokens consumed across the run, tool completions included.
    #[serde(default)]
    pub usage: TokenUsage,
}

impl AgentTrace {
    /// Evidence entries for every search that found documents.
    ///
    /// Content is the observation message as it appears in the transcript.
    #[must_use]
    pub fn evidence(&self) -> Vec<Evidence> {
        self.observations
            .iter()
            .filter(|obs| obs.documents_found.is_some_and(|n| n > 0))
            .map(|obs| Evidence {
                kind: EVIDENCE_KIND_SEARCH.to_string(),
                content: build_observation_message(&obs.observation),
                source: EVIDENCE_SOURCE_SEARCH.to_string(),
            })
            .collect()
    }
}

/// Answer to one sub-question of a complex plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAnswer {
    /// The sub-question.
    pub question: String,
    /// The agent's answer.
    pub answer: String,
    /// Iterations the agent consumed.
    pub iterations: usize,
}

/// Which execution path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionType {
    /// A single agent run on the original question.
    Simple,
    /// One agent run per sub-question followed by synthesis.
    Complex,
}

impl fmt::Display for ExecutionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => f.write_str("simple"),
            Self::Complex => f.write_str("complex"),
        }
    }
}

/// Metadata attached to an [`ExecutionResult`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    /// Iterations of the single agent run (simple path).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,
    /// The plan's complexity score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity_score: Option<i64>,
    /// Number of sub-questions executed (complex path).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_questions_count: Option<usize>,
    /// Per-sub-question answers in plan order (complex path).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_answers: Vec<SubAnswer>,
    /// Retrieval evidence collected across sub-runs (complex path).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<Evidence>,
    /// Total tokens consumed by every completion call of the request.
    #[serde(default)]
    pub total_tokens: u32,
    /// Set when the request failed at the executor level.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

/// Top-level output of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// The original question.
    pub query: String,
    /// The plan; absent when the request failed before planning finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<QueryPlan>,
    /// The path taken; absent on executor-level failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_type: Option<ExecutionType>,
    /// Answer text; never empty.
    pub answer: String,
    /// Execution metadata.
    pub metadata: ExecutionMetadata,
}

impl ExecutionResult {
    /// Builds an error result for an executor-level failure.
    #[must_use]
    pub fn error(query: &str, message: impl fmt::Display) -> Self {
        Self {
            query: query.to_string(),
            plan: None,
            execution_type: None,
            answer: format!("Error executing query: {message}"),
            metadata: ExecutionMetadata {
                error: true,
                ..ExecutionMetadata::default()
            },
        }
    }

    /// Whether this result reports an executor-level failure.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.metadata.error
    }
}
