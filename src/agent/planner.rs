//! Query planner.
//!
//! Asks the completion gateway for a structured [`QueryPlan`]. Any
//! failure, whether the call itself or the parse of its output,
//! substitutes [`QueryPlan::fallback`]. The planner never fails.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::config::AgentConfig;
use super::message::TokenUsage;
use super::plan::QueryPlan;
use super::prompt::build_planner_prompt;
use super::provider::LlmProvider;
use super::traits::Agent;
use crate::error::AgentError;

/// Agent that decomposes a question into a plan.
pub struct QueryPlanner {
    model: String,
    temperature: f32,
    max_tokens: u32,
    system_prompt: String,
}

impl QueryPlanner {
    /// Creates a planner with the given configuration and system prompt.
    #[must_use]
    pub fn new(config: &AgentConfig, system_prompt: String) -> Self {
        Self {
            model: config.planner_model.clone(),
            temperature: config.planner_temperature,
            max_tokens: config.max_tokens,
            system_prompt,
        }
    }

    /// Produces a plan for `question`.
    ///
    /// Always returns a plan with at least one sub-question.
    pub async fn decompose(&self, provider: &dyn LlmProvider, question: &str) -> QueryPlan {
        self.plan(provider, question).await.0
    }

    /// Produces a plan for `question` along with the tokens spent on it.
    pub async fn plan(&self, provider: &dyn LlmProvider, question: &str) -> (QueryPlan, TokenUsage) {
        let response = match self.execute(provider, &build_planner_prompt(question)).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "planner call failed, using fallback plan");
                return (QueryPlan::fallback(question), TokenUsage::default());
            }
        };

        match Self::parse_plan(&response.content) {
            Ok(plan) => {
                info!(
                    query_type = %plan.query_type,
                    complexity_score = plan.complexity_score,
                    sub_questions = plan.sub_questions.len(),
                    "plan created"
                );
                (plan, response.usage)
            }
            Err(e) => {
                warn!(error = %e, "plan parse failed, using fallback plan");
                debug!(content = %response.content, "unparsable plan");
                (QueryPlan::fallback(question), response.usage)
            }
        }
    }

    /// Parses the planner's JSON response.
    ///
    /// Fenced code blocks are unwrapped. A plan with no sub-questions is
    /// rejected; every other field passes through unvalidated.
    fn parse_plan(content: &str) -> Result<QueryPlan, AgentError> {
        let trimmed = content.trim();

        let json_str = if trimmed.starts_with("```") {
            trimmed
                .trim_start_matches("```json")
                .trim_start_matches("```")
                .trim_end_matches("```")
                .trim()
        } else {
            trimmed
        };

        let plan: QueryPlan =
            serde_json::from_str(json_str).map_err(|e| AgentError::ResponseParse {
                message: format!("failed to parse query plan: {e}"),
                content: content.to_string(),
            })?;

        if plan.sub_questions.is_empty() {
            return Err(AgentError::ResponseParse {
                message: "query plan has no sub-questions".to_string(),
                content: content.to_string(),
            });
        }

        Ok(plan)
    }
}

#[async_trait]
impl Agent for QueryPlanner {
    fn name(&self) -> &'static str {
        "planner"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    fn json_mode(&self) -> bool {
        true
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
    use crate::agent::prompt::PLANNER_SYSTEM_PROMPT;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedProvider {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FixedProvider {
        const fn new(reply: Option<&'static str>) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(request.json_mode);
            self.reply.map_or_else(
                || {
                    Err(AgentError::ApiRequest {
                        message: "timeout".to_string(),
                        status: None,
                    })
                },
                |reply| {
                    Ok(ChatResponse {
                        content: reply.to_string(),
                        usage: TokenUsage {
                            prompt_tokens: 20,
                            completion_tokens: 10,
                            total_tokens: 30,
                        },
                        finish_reason: Some("stop".to_string()),
                    })
                },
            )
        }
    }

    fn planner() -> QueryPlanner {
        QueryPlanner::new(&AgentConfig::default(), PLANNER_SYSTEM_PROMPT.to_string())
    }

    #[test]
    fn test_parse_plan_valid() {
        let json = r#"{
            "query_type": "comparative",
            "complexity_score": 4,
            "sub_questions": ["What does plan A cover?", "What does plan B cover?"],
            "execution_plan": [{"step": 1, "action": "search", "target": "plan A", "purpose": "coverage"}],
            "expected_sources": ["policy documents"]
        }"#;
        let plan = QueryPlanner::parse_plan(json).unwrap_or_else(|_| unreachable!());
        assert_eq!(plan.query_type, "comparative");
        assert_eq!(plan.complexity_score, 4);
        assert_eq!(plan.sub_questions.len(), 2);
        assert_eq!(plan.execution_plan[0].rationale, "coverage");
    }

    #[test]
    fn test_parse_plan_code_block() {
        let json = "```json\n{\"query_type\": \"simple\", \"complexity_score\": 1, \"sub_questions\": [\"q\"]}\n```";
        assert!(QueryPlanner::parse_plan(json).is_ok());
    }

    #[test]
    fn test_parse_plan_out_of_range_passes_through() {
        let json = r#"{"query_type": "", "complexity_score": 0, "sub_questions": ["q"]}"#;
        let plan = QueryPlanner::parse_plan(json).unwrap_or_else(|_| unreachable!());
        assert_eq!(plan.complexity_score, 0);
        assert_eq!(plan.query_type, "");
    }

    #[test]
    fn test_parse_plan_float_score() {
        let json = r#"{"query_type": "comparative", "complexity_score": 4.0, "sub_questions": ["a", "b"]}"#;
        let plan = QueryPlanner::parse_plan(json).unwrap_or_else(|_| unreachable!());
        assert_eq!(plan.complexity_score, 4);
        assert!(!plan.is_simple(2));
    }

    #[test]
    fn test_parse_plan_rejects_malformed() {
        assert!(QueryPlanner::parse_plan("not json").is_err());
        assert!(QueryPlanner::parse_plan(r#"{"query_type": "simple"}"#).is_err());
        assert!(
            QueryPlanner::parse_plan(
                r#"{"query_type": "simple", "complexity_score": 1, "sub_questions": []}"#
            )
            .is_err()
        );
        assert!(
            QueryPlanner::parse_plan(
                r#"{"query_type": "simple", "complexity_score": "high", "sub_questions": ["q"]}"#
            )
            .is_err()
        );
    }

    #[tokio::test]
    async fn test_decompose_unparsable_uses_fallback() {
        let provider = FixedProvider::new(Some("I think this is a simple question."));
        let (plan, usage) = planner().plan(&provider, "What is the refund policy?").await;
        assert_eq!(plan, QueryPlan::fallback("What is the refund policy?"));
        assert_eq!(usage.total_tokens, 30);
    }

    #[tokio::test]
    async fn test_decompose_gateway_failure_uses_fallback() {
        let provider = FixedProvider::new(None);
        let plan = planner().decompose(&provider, "q").await;
        assert_eq!(plan.complexity_score, 1);
        assert_eq!(plan.sub_questions, vec!["q"]);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_decompose_returns_parsed_plan() {
        let provider = FixedProvider::new(Some(
            r#"{"query_type": "multi-part", "complexity_score": 3, "sub_questions": ["a", "b", "c"]}"#,
        ));
        let plan = planner().decompose(&provider, "q").await;
        assert_eq!(plan.query_type, "multi-part");
        assert_eq!(plan.sub_questions, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_agent_properties() {
        let config = AgentConfig::builder().planner_model("gpt-4o").build();
        let planner = QueryPlanner::new(&config, "prompt".to_string());
        assert_eq!(planner.name(), "planner");
        assert_eq!(planner.model(), "gpt-4o");
        assert!(planner.json_mode());
        assert!((planner.temperature() - 0.3).abs() < f32::EPSILON);
    }
}
