//! Bounded ReAct loop.
//!
//! Each iteration sends the transcript to the completion gateway and
//! classifies the response:
//!
//! ```text
//! THINKING ──► FINAL_ANSWER  ─► done (iterations = i + 1)
//!     │   ├──► UNSTRUCTURED  ─► done, raw text is the answer (i + 1)
//!     │   └──► ACTION ─► tool ─► observation appended ─► THINKING
//!     └── gateway error ─► done with error answer (i)
//! cap reached ─► done with exhaustion answer (max_iterations)
//! ```
//!
//! The transcript is private to one run. Unknown tools yield an
//! observation and the loop continues.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::action::{AgentStep, classify};
use super::config::AgentConfig;
use super::executor::ToolExecutor;
use super::message::{
    ChatMessage, TokenUsage, assistant_message, system_message, user_message,
};
use super::outcome::{AgentTrace, StopReason, ToolObservation};
use super::prompt::{build_agent_system_prompt, build_observation_message, build_question_message};
use super::provider::LlmProvider;
use super::tool::{ToolCall, ToolSet};
use super::traits::Agent;

/// Answer returned when the iteration cap is reached.
pub const MAX_ITERATIONS_ANSWER: &str =
    "Maximum iterations reached. Unable to provide a complete answer.";

/// Answer substituted when the model's answer is empty.
pub const EMPTY_ANSWER: &str = "No answer could be produced for this question.";

/// Tool-using reasoning agent.
pub struct ReasoningAgent {
    model: String,
    temperature: f32,
    max_tokens: u32,
    max_iterations: usize,
    system_prompt: String,
    tools: ToolSet,
}

impl ReasoningAgent {
    /// Creates an agent from configuration and a prompt template.
    ///
    /// The template's `{tools}` placeholder is replaced by the tool list.
    #[must_use]
    pub fn new(config: &AgentConfig, template: &str) -> Self {
        let tools = ToolSet::react_tools();
        Self {
            model: config.agent_model.clone(),
            temperature: config.agent_temperature,
            max_tokens: config.max_tokens,
            max_iterations: config.max_iterations,
            system_prompt: build_agent_system_prompt(template, &tools),
            tools,
        }
    }

    /// Returns the agent's tool set.
    #[must_use]
    pub const fn tools(&self) -> &ToolSet {
        &self.tools
    }

    /// Returns the iteration cap.
    #[must_use]
    pub const fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Runs the loop on one question.
    ///
    /// Never fails: gateway errors end the run with an error-describing
    /// answer. `iterations` never exceeds the cap.
    pub async fn run(
        &self,
        provider: &dyn LlmProvider,
        executor: &ToolExecutor<'_>,
        question: &str,
    ) -> AgentTrace {
        let mut request = self.request(vec![
            system_message(&self.system_prompt),
            user_message(&build_question_message(question)),
        ]);
        let mut observations = Vec::new();
        let mut usage = TokenUsage::default();

        for iteration in 0..self.max_iterations {
            let response = match provider.chat(&request).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(iteration, error = %e, "agent completion failed");
                    return AgentTrace {
                        answer: format!("Error processing query: {e}"),
                        iterations: iteration,
                        transcript: request.messages,
                        observations,
                        stop_reason: StopReason::Error,
                        usage,
                    };
                }
            };
            usage.accumulate(response.usage);

            match classify(&response.content) {
                AgentStep::FinalAnswer(answer) => {
                    debug!(iteration, "agent produced final answer");
                    request.messages.push(assistant_message(&response.content));
                    return finish(
                        request.messages,
                        observations,
                        usage,
                        answer,
                        iteration + 1,
                        StopReason::FinalAnswer,
                    );
                }
                AgentStep::Unstructured(text) => {
                    debug!(iteration, "agent response has no markers, using it as answer");
                    request.messages.push(assistant_message(&response.content));
                    return finish(
                        request.messages,
                        observations,
                        usage,
                        text,
                        iteration + 1,
                        StopReason::Unstructured,
                    );
                }
                AgentStep::Action { name, input } => {
                    debug!(iteration, tool = %name, "agent requested tool");
                    let call = ToolCall::new(name, input);
                    let result = executor.execute(&call).await;
                    usage.accumulate(result.usage);

                    request.messages.push(assistant_message(&response.content));
                    request
                        .messages
                        .push(user_message(&build_observation_message(&result.content)));

                    observations.push(ToolObservation {
                        tool: call.name,
                        input: call.input,
                        observation: result.content,
                        documents_found: result.documents_found,
                        is_error: result.is_error,
                    });
                }
            }
        }

        warn!(max_iterations = self.max_iterations, "agent reached iteration cap");
        AgentTrace {
            answer: MAX_ITERATIONS_ANSWER.to_string(),
            iterations: self.max_iterations,
            transcript: request.messages,
            observations,
            stop_reason: StopReason::MaxIterations,
            usage,
        }
    }
}

fn finish(
    transcript: Vec<ChatMessage>,
    observations: Vec<ToolObservation>,
    usage: TokenUsage,
    answer: String,
    iterations: usize,
    stop_reason: StopReason,
) -> AgentTrace {
    let answer = if answer.trim().is_empty() {
        EMPTY_ANSWER.to_string()
    } else {
        answer
    };
    AgentTrace {
        answer,
        iterations,
        transcript,
        observations,
        stop_reason,
        usage,
    }
}

#[async_trait]
impl Agent for ReasoningAgent {
    fn name(&self) -> &'static str {
        "react"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}
