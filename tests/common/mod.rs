//! Shared test doubles for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use docmate::agent::{ChatRequest, ChatResponse, LlmProvider, PromptSet, TokenUsage};
use docmate::retrieval::{ChunkMetadata, RetrievalStats, SearchResult};
use docmate::{AgentConfig, AgentError, DocumentUnit, EngineContext, Orchestrator, Retriever};

/// A scripted completion.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Respond with this text.
    Text(String),
    /// Fail the call.
    Fail,
}

impl Reply {
    pub fn text(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Completion gateway that answers by request kind.
///
/// - JSON-mode requests are planner calls.
/// - Requests containing `Original Question:` are synthesis calls.
/// - Requests whose second message starts with `Question:` are agent turns;
///   replies are consumed in order and the last one repeats.
/// - Anything else is a tool completion.
pub struct ScriptedProvider {
    plan: Reply,
    agent: Mutex<VecDeque<Reply>>,
    synthesis: Reply,
    tool: Reply,
    /// Agent runs started (first turn of each run).
    pub agent_runs: AtomicUsize,
    /// Agent turns across all runs.
    pub agent_turns: AtomicUsize,
    /// Synthesis calls.
    pub synthesis_calls: AtomicUsize,
    /// Questions each agent run was started with, in order.
    pub questions: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(plan: Reply, agent: Vec<Reply>) -> Self {
        Self {
            plan,
            agent: Mutex::new(agent.into()),
            synthesis: Reply::text("integrated answer"),
            tool: Reply::text("tool output"),
            agent_runs: AtomicUsize::new(0),
            agent_turns: AtomicUsize::new(0),
            synthesis_calls: AtomicUsize::new(0),
            questions: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_synthesis(mut self, reply: Reply) -> Self {
        self.synthesis = reply;
        self
    }

    #[must_use]
    pub fn with_tool(mut self, reply: Reply) -> Self {
        self.tool = reply;
        self
    }

    pub fn runs(&self) -> usize {
        self.agent_runs.load(Ordering::SeqCst)
    }

    fn next_agent_reply(&self) -> Reply {
        let mut queue = self.agent.lock().unwrap_or_else(|_| unreachable!());
        if queue.len() > 1 {
            queue.pop_front().unwrap_or(Reply::Fail)
        } else {
            queue.front().cloned().unwrap_or(Reply::Fail)
        }
    }
}

fn respond(reply: Reply) -> Result<ChatResponse, AgentError> {
    match reply {
        Reply::Text(content) => Ok(ChatResponse {
            content,
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            },
            finish_reason: Some("stop".to_string()),
        }),
        Reply::Fail => Err(AgentError::ApiRequest {
            message: "scripted failure".to_string(),
            status: Some(500),
        }),
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
        if request.json_mode {
            return respond(self.plan.clone());
        }
        if request
            .messages
            .iter()
            .any(|m| m.content.contains("Original Question:"))
        {
            self.synthesis_calls.fetch_add(1, Ordering::SeqCst);
            return respond(self.synthesis.clone());
        }
        if let Some(second) = request.messages.get(1)
            && second.content.starts_with("Question:")
        {
            if request.messages.len() == 2 {
                self.agent_runs.fetch_add(1, Ordering::SeqCst);
                if let Ok(mut questions) = self.questions.lock() {
                    let q = second.content.trim_start_matches("Question:").trim();
                    questions.push(q.to_string());
                }
            }
            self.agent_turns.fetch_add(1, Ordering::SeqCst);
            return respond(self.next_agent_reply());
        }
        respond(self.tool.clone())
    }
}

/// Retriever returning the same passages for every query.
pub struct StaticRetriever {
    results: Vec<SearchResult>,
    pub searches: AtomicUsize,
}

impl StaticRetriever {
    pub fn new(passages: &[(&str, f64)]) -> Self {
        let results = passages
            .iter()
            .enumerate()
            .map(|(i, (content, score))| SearchResult {
                content: (*content).to_string(),
                metadata: ChunkMetadata {
                    source: "policy.pdf".to_string(),
                    chunk_index: i,
                    ..ChunkMetadata::default()
                },
                score: *score,
            })
            .collect();
        Self {
            results,
            searches: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(&[])
    }
}

#[async_trait]
impl Retriever for StaticRetriever {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn search(&self, _query: &str, k: usize) -> Result<Vec<SearchResult>, AgentError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.iter().take(k).cloned().collect())
    }

    async fn add_documents(&self, units: Vec<DocumentUnit>) -> Result<usize, AgentError> {
        Ok(units.len())
    }

    fn stats(&self) -> Result<RetrievalStats, AgentError> {
        Ok(RetrievalStats {
            document_count: 1,
            unit_count: self.results.len(),
        })
    }
}

/// Builds an orchestrator over the given doubles with default prompts.
pub fn orchestrator(
    provider: Arc<ScriptedProvider>,
    retriever: Arc<StaticRetriever>,
    config: AgentConfig,
) -> Orchestrator {
    Orchestrator::new(EngineContext::with_prompts(
        provider,
        retriever,
        config,
        PromptSet::defaults(),
    ))
}

/// A plan JSON document with the given score and sub-questions.
pub fn plan_json(score: i64, sub_questions: &[&str]) -> String {
    serde_json::json!({
        "query_type": if score > 2 { "multi-part" } else { "simple" },
        "complexity_score": score,
        "sub_questions": sub_questions,
        "execution_plan": [
            {"step": 1, "action": "search", "target": "documents", "purpose": "find facts"}
        ],
        "expected_sources": ["policy documents"]
    })
    .to_string()
}
