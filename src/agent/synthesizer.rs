//! Synthesizer agent for combining sub-answers.
//!
//! Takes the per-sub-question answers of a complex plan and asks the
//! completion gateway for one integrated answer. Synthesis never fails:
//! a gateway error or an empty response yields a numbered concatenation
//! of the sub-answers.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::config::AgentConfig;
use super::message::TokenUsage;
use super::outcome::SubAnswer;
use super::prompt::build_synthesis_prompt;
use super::provider::LlmProvider;
use super::traits::Agent;

/// Agent that synthesizes sub-answers into a final response.
pub struct SynthesizerAgent {
    model: String,
    temperature: f32,
    max_tokens: u32,
    system_prompt: String,
}

impl SynthesizerAgent {
    /// Creates a new synthesizer agent with the given configuration and system prompt.
    #[must_use]
    pub fn new(config: &AgentConfig, system_prompt: String) -> Self {
        Self {
            model: config.synthesizer_model.clone(),
            temperature: config.agent_temperature,
            max_tokens: config.max_tokens,
            system_prompt,
        }
    }

    /// Produces one answer for `question` from the sub-answers, with tokens spent.
    pub async fn synthesize(
        &self,
        provider: &dyn LlmProvider,
        question: &str,
        sub_answers: &[SubAnswer],
    ) -> (String, TokenUsage) {
        let prompt = build_synthesis_prompt(question, sub_answers);
        match self.execute(provider, &prompt).await {
            Ok(response) if !response.content.trim().is_empty() => {
                debug!(sub_answers = sub_answers.len(), "synthesis complete");
                (response.content, response.usage)
            }
            Ok(response) => {
                warn!("synthesis returned empty text, concatenating sub-answers");
                (fallback_answer(sub_answers), response.usage)
            }
            Err(e) => {
                warn!(error = %e, "synthesis failed, concatenating sub-answers");
                (fallback_answer(sub_answers), TokenUsage::default())
            }
        }
    }
}

/// Numbered concatenation of sub-answers in plan order.
#[must_use]
pub fn fallback_answer(sub_answers: &[SubAnswer]) -> String {
    let numbered: Vec<String> = sub_answers
        .iter()
        .enumerate()
        .map(|(i, sub)| format!("{}. {}", i + 1, sub.answer))
        .collect();
    format!("Based on the analysis:\n\n{}", numbered.join("\n\n"))
}

#[async_trait]
impl Agent for SynthesizerAgent {
    fn name(&self) -> &'static str {
        "synthesizer"
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::message::{ChatRequest, ChatResponse};
    use crate::agent::prompt::SYNTHESIZER_SYSTEM_PROMPT;
    use crate::error::AgentError;

    struct FixedProvider(Option<&'static str>);

    #[async_trait]
    impl LlmProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse, AgentError> {
            self.0
                .map(|content| ChatResponse {
                    content: content.to_string(),
                    usage: TokenUsage {
                        prompt_tokens: 40,
                        completion_tokens: 10,
                        total_tokens: 50,
                    },
                    finish_reason: Some("stop".to_string()),
                })
                .ok_or_else(|| AgentError::ApiRequest {
                    message: "unavailable".to_string(),
                    status: Some(503),
                })
        }
    }

    fn subs() -> Vec<SubAnswer> {
        vec![
            SubAnswer {
                question: "What does plan A cover?".to_string(),
                answer: "Plan A covers parts.".to_string(),
                iterations: 2,
            },
            SubAnswer {
                question: "What does plan B cover?".to_string(),
                answer: "Plan B covers labor.".to_string(),
                iterations: 1,
            },
        ]
    }

    fn agent() -> SynthesizerAgent {
        SynthesizerAgent::new(&AgentConfig::default(), SYNTHESIZER_SYSTEM_PROMPT.to_string())
    }

    #[test]
    fn test_fallback_answer_format() {
        assert_eq!(
            fallback_answer(&subs()),
            "Based on the analysis:\n\n1. Plan A covers parts.\n\n2. Plan B covers labor."
        );
    }

    #[tokio::test]
    async fn test_synthesize_success() {
        let (answer, usage) = agent()
            .synthesize(&FixedProvider(Some("A covers parts, B covers labor.")), "Compare", &subs())
            .await;
        assert_eq!(answer, "A covers parts, B covers labor.");
        assert_eq!(usage.total_tokens, 50);
    }

    #[tokio::test]
    async fn test_synthesize_failure_falls_back() {
        let (answer, usage) = agent().synthesize(&FixedProvider(None), "Compare", &subs()).await;
        assert_eq!(answer, fallback_answer(&subs()));
        assert_eq!(usage, TokenUsage::default());
    }

    #[tokio::test]
    async fn test_synthesize_empty_falls_back() {
        let (answer, _) = agent().synthesize(&FixedProvider(Some("  ")), "Compare", &subs()).await;
        assert_eq!(answer, fallback_answer(&subs()));
    }

    #[test]
    fn test_agent_properties() {
        let config = AgentConfig::builder().synthesizer_model("gpt-4o").max_tokens(8192).build();
        let agent = SynthesizerAgent::new(&config, "prompt".to_string());
        assert_eq!(agent.name(), "synthesizer");
        assert_eq!(agent.model(), "gpt-4o");
        assert!(!agent.json_mode());
        assert_eq!(agent.max_tokens(), 8192);
    }
}
