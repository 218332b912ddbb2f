//! Tool executor for the reasoning agent.
//!
//! Maps tool names to calls against the retrieval and completion
//! gateways. Every gateway failure is absorbed here and replaced by a
//! fixed degraded observation, so a tool call never fails the run.

use tracing::{debug, warn};

use super::config::AgentConfig;
use super::message::{ChatRequest, TokenUsage, user_message};
use super::prompt::{build_answer_prompt, build_summary_prompt};
use super::provider::LlmProvider;
use super::tool::{ToolCall, ToolKind, ToolResult};
use crate::error::AgentError;
use crate::retrieval::Retriever;

/// Maximum byte length of a tool input from the model.
const MAX_TOOL_INPUT_LEN: usize = 100_000;

/// Observation when a search finds nothing.
pub const NO_DOCUMENTS_FOUND: &str = "No relevant documents found.";
/// Observation when summarization fails.
pub const SUMMARY_FAILED: &str = "Error generating summary";
/// Observation when answering fails.
pub const ANSWER_FAILED: &str = "Error generating answer";

/// Executes tool calls against the gateways.
///
/// Borrowed for the duration of one agent run; holds no state of its own.
pub struct ToolExecutor<'a> {
    retriever: &'a dyn Retriever,
    provider: &'a dyn LlmProvider,
    config: &'a AgentConfig,
}

impl<'a> ToolExecutor<'a> {
    /// Creates an executor over the given gateways.
    #[must_use]
    pub fn new(
        retriever: &'a dyn Retriever,
        provider: &'a dyn LlmProvider,
        config: &'a AgentConfig,
    ) -> Self {
        Self {
            retriever,
            provider,
            config,
        }
    }

    /// Dispatches a tool call.
    ///
    /// Unknown tool names produce an `Unknown action` observation flagged
    /// as an error; the caller is expected to keep going.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        if call.input.len() > MAX_TOOL_INPUT_LEN {
            return ToolResult {
                content: format!(
                    "tool input too large ({} bytes, max {MAX_TOOL_INPUT_LEN})",
                    call.input.len()
                ),
                is_error: true,
                ..ToolResult::default()
            };
        }

        let Some(kind) = ToolKind::from_name(&call.name) else {
            warn!(tool = %call.name, "unknown tool requested");
            return ToolResult {
                content: format!("Unknown action: {}", call.name),
                is_error: true,
                ..ToolResult::default()
            };
        };

        let result = match kind {
            ToolKind::SearchDocuments => self.search_documents(&call.input).await,
            ToolKind::SummarizeContent => self.summarize_content(&call.input).await,
            ToolKind::AnswerQuestion => self.answer_question(&call.input).await,
        };

        debug!(
            tool = %kind,
            is_error = result.is_error,
            documents_found = ?result.documents_found,
            "tool execution complete"
        );
        result
    }

    // -----------------------------------------------------------------------
    // Tool implementations
    // -----------------------------------------------------------------------

    /// Searches and previews the top results.
    async fn search_documents(&self, query: &str) -> ToolResult {
        let results = match self.retriever.search(query, self.config.search_top_k).await {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, retriever = self.retriever.name(), "search_documents failed");
                return ToolResult {
                    content: NO_DOCUMENTS_FOUND.to_string(),
                    is_error: true,
                    documents_found: Some(0),
                    usage: TokenUsage::default(),
                };
            }
        };

        if results.is_empty() {
            return ToolResult {
                content: NO_DOCUMENTS_FOUND.to_string(),
                documents_found: Some(0),
                ..ToolResult::default()
            };
        }

        let previews: Vec<String> = results
            .iter()
            .take(self.config.preview_count)
            .map(|r| format!("- {}...", truncate_chars(&r.content, self.config.preview_chars)))
            .collect();

        ToolResult {
            content: format!(
                "Found {} relevant documents:\n{}",
                results.len(),
                previews.join("\n")
            ),
            documents_found: Some(results.len()),
            ..ToolResult::default()
        }
    }

    async fn summarize_content(&self, content: &str) -> ToolResult {
        match self.complete(&build_summary_prompt(content)).await {
            Ok((text, usage)) => ToolResult {
                content: text,
                usage,
                ..ToolResult::default()
            },
            Err(e) => {
                warn!(error = %e, "summarize_content failed");
                degraded(SUMMARY_FAILED)
            }
        }
    }

    /// Re-queries retrieval for context, then answers grounded in it.
    async fn answer_question(&self, question: &str) -> ToolResult {
        let context = match self.retriever.search(question, self.config.answer_top_k).await {
            Ok(results) => results
                .iter()
                .map(|r| r.content.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => {
                warn!(error = %e, "answer_question retrieval failed, using empty context");
                String::new()
            }
        };

        match self.complete(&build_answer_prompt(question, &context)).await {
            Ok((text, usage)) => ToolResult {
                content: text,
                usage,
                ..ToolResult::default()
            },
            Err(e) => {
                warn!(error = %e, "answer_question failed");
                degraded(ANSWER_FAILED)
            }
        }
    }

    /// One single-message completion with the agent's model settings.
    async fn complete(&self, prompt: &str) -> Result<(String, TokenUsage), AgentError> {
        let request = ChatRequest {
            model: self.config.agent_model.clone(),
            messages: vec![user_message(prompt)],
            temperature: Some(self.config.agent_temperature),
            max_tokens: Some(self.config.max_tokens),
            json_mode: false,
        };
        let response = self.provider.chat(&request).await?;
        Ok((response.content, response.usage))
    }
}

fn degraded(message: &str) -> ToolResult {
    ToolResult {
        content: message.to_string(),
        is_error: true,
        ..ToolResult::default()
    }
}

/// Returns at most `max_chars` characters of `text`.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(idx, _)| &text[..idx])
}
