//! Tool types for the reasoning agent.
//!
//! The tool set is fixed: the agent names a tool in free text and the
//! [`ToolExecutor`](super::executor::ToolExecutor) dispatches it. Tool
//! descriptions are rendered into the agent's system prompt.

use std::fmt;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use super::message::TokenUsage;

/// The tools the reasoning agent may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Retrieves passages and previews the top few.
    SearchDocuments,
    /// Summarizes the given content with one completion call.
    SummarizeContent,
    /// Retrieves context and answers the question grounded in it.
    AnswerQuestion,
}

impl ToolKind {
    /// All tools, in prompt order.
    pub const ALL: [Self; 3] = [
        Self::SearchDocuments,
        Self::SummarizeContent,
        Self::AnswerQuestion,
    ];

    /// Name the agent uses to invoke this tool.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SearchDocuments => "search_documents",
            Self::SummarizeContent => "summarize_content",
            Self::AnswerQuestion => "answer_question",
        }
    }

    /// Resolves a tool from its invocation name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    const fn description(self) -> &'static str {
        match self {
            Self::SearchDocuments => "Search for relevant documents",
            Self::SummarizeContent => "Summarize given content",
            Self::AnswerQuestion => "Answer a question based on context",
        }
    }

    const fn input_hint(self) -> &'static str {
        match self {
            Self::SearchDocuments => "search query",
            Self::SummarizeContent => "content to summarize",
            Self::AnswerQuestion => "question",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A tool definition shown to the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDefinition {
    /// Invocation name.
    pub name: &'static str,
    /// What the tool does.
    pub description: &'static str,
    /// What the `Action Input` line should contain.
    pub input: &'static str,
}

impl From<ToolKind> for ToolDefinition {
    fn from(kind: ToolKind) -> Self {
        Self {
            name: kind.name(),
            description: kind.description(),
            input: kind.input_hint(),
        }
    }
}

/// A tool invocation parsed from an agent response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    /// Tool name as written by the model; may not name a known tool.
    pub name: String,
    /// Raw input line.
    pub input: String,
}

impl ToolCall {
    /// Creates a call for `name` with `input`.
    #[must_use]
    pub fn new(name: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input: input.into(),
        }
    }
}

/// The result of dispatching a [`ToolCall`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolResult {
    /// Observation text fed back to the agent.
    pub content: String,
    /// Whether the tool failed or was unknown. Failures still carry an observation.
    pub is_error: bool,
    /// Number of passages retrieved; set only by `search_documents`.
    pub documents_found: Option<usize>,
    /// Tokens consumed by completion calls inside the tool.
    pub usage: TokenUsage,
}

/// A set of tool definitions scoped to an agent role.
#[derive(Debug, Clone, Default)]
pub struct ToolSet {
    definitions: Vec<ToolDefinition>,
}

impl ToolSet {
    /// Returns the tool definitions in this set.
    #[must_use]
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Returns `true` if this set contains no tools.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns the number of tools in this set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Tool set for the reasoning agent: all three tools.
    #[must_use]
    pub fn react_tools() -> Self {
        Self {
            definitions: ToolKind::ALL.into_iter().map(ToolDefinition::from).collect(),
        }
    }

    /// Renders the set as a bullet list for a system prompt.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for def in &self.definitions {
            let _ = writeln!(out, "- {}: {} (input: {})", def.name, def.description, def.input);
        }
        out.trim_end().to_string()
    }
}
