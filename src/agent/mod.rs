//! Query orchestration engine.
//!
//! Plans a question, drives a bounded ReAct agent over the retrieval and
//! completion gateways, and synthesizes multi-step answers.
//!
//! # Architecture
//!
//! ```text
//! question → Orchestrator
//!   ├── QueryPlanner (plan, fallback on any failure)
//!   ├── complexity_score <= threshold
//!   │   └── ReasoningAgent once on the question
//!   └── otherwise, sequentially per sub-question
//!       ├── ReasoningAgent → SubAnswer + Evidence
//!       └── SynthesizerAgent → final answer (numbered fallback)
//! ```
//!
//! Gateways, configuration and prompts are injected through
//! [`EngineContext`].

pub mod action;
pub mod client;
pub mod config;
pub mod context;
pub mod executor;
pub mod message;
pub mod orchestrator;
pub mod outcome;
pub mod plan;
pub mod planner;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod react;
pub mod synthesizer;
pub mod tool;
pub mod traits;

// Re-export key types
pub use action::{AgentStep, classify};
pub use config::AgentConfig;
pub use context::EngineContext;
pub use executor::ToolExecutor;
pub use message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
pub use orchestrator::Orchestrator;
pub use outcome::{
    AgentTrace, Evidence, ExecutionMetadata, ExecutionResult, ExecutionType, StopReason, SubAnswer,
    ToolObservation,
};
pub use plan::{PlanStep, PrioritizedStep, QueryPlan};
pub use planner::QueryPlanner;
pub use prompt::PromptSet;
pub use provider::LlmProvider;
pub use react::ReasoningAgent;
pub use synthesizer::SynthesizerAgent;
pub use tool::{ToolCall, ToolDefinition, ToolKind, ToolResult, ToolSet};
pub use traits::{Agent, AgentResponse};
