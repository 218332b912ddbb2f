//! Query executor.
//!
//! Coordinates the query pipeline: plan → route by complexity →
//! reasoning agent once (simple) or once per sub-question followed by
//! synthesis (complex). Every step runs sequentially within one call.

use std::time::Instant;

use tracing::{debug, error, info};

use super::context::EngineContext;
use super::executor::ToolExecutor;
use super::message::TokenUsage;
use super::outcome::{AgentTrace, ExecutionMetadata, ExecutionResult, ExecutionType, SubAnswer};
use super::plan::QueryPlan;
use super::planner::QueryPlanner;
use super::react::ReasoningAgent;
use super::synthesizer::SynthesizerAgent;
use crate::error::AgentError;

/// Orchestrates planning, reasoning and synthesis for one question at a time.
///
/// Holds no per-request state; concurrent calls share only the gateways.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    ctx: EngineContext,
}

impl Orchestrator {
    /// Creates an orchestrator over the given context.
    #[must_use]
    pub const fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Returns the engine context.
    #[must_use]
    pub const fn context(&self) -> &EngineContext {
        &self.ctx
    }

    /// Answers a question.
    ///
    /// Never fails: executor-level failures come back as an
    /// [`ExecutionResult`] with `metadata.error` set.
    pub async fn execute(&self, question: &str) -> ExecutionResult {
        self.execute_traced(question).await.0
    }

    /// Answers a question and returns every agent trace produced, in order.
    pub async fn execute_traced(&self, question: &str) -> (ExecutionResult, Vec<AgentTrace>) {
        let start = Instant::now();
        match self.try_execute(question).await {
            Ok((result, traces)) => {
                info!(
                    execution_type = ?result.execution_type,
                    total_tokens = result.metadata.total_tokens,
                    elapsed_ms = start.elapsed().as_millis(),
                    "query executed"
                );
                (result, traces)
            }
            Err(e) => {
                error!(error = %e, "query execution failed");
                (ExecutionResult::error(question, e), Vec::new())
            }
        }
    }

    /// Produces the plan for a question without executing it.
    pub async fn plan(&self, question: &str) -> QueryPlan {
        self.planner()
            .decompose(self.ctx.provider.as_ref(), question)
            .await
    }

    async fn try_execute(
        &self,
        question: &str,
    ) -> Result<(ExecutionResult, Vec<AgentTrace>), AgentError> {
        validate_question(question)?;

        let (plan, plan_usage) = self.planner().plan(self.ctx.provider.as_ref(), question).await;

        if plan.is_simple(self.ctx.config.complexity_threshold) {
            info!(complexity_score = plan.complexity_score, "executing simple query");
            Ok(self.execute_simple(question, plan, plan_usage).await)
        } else {
            info!(
                complexity_score = plan.complexity_score,
                sub_questions = plan.sub_questions.len(),
                "executing complex query"
            );
            self.execute_complex(question, plan, plan_usage).await
        }
    }

    /// One agent run on the original question.
    async fn execute_simple(
        &self,
        question: &str,
        plan: QueryPlan,
        mut usage: TokenUsage,
    ) -> (ExecutionResult, Vec<AgentTrace>) {
        let trace = self.run_agent(question).await;
        usage.accumulate(trace.usage);

        let result = ExecutionResult {
            query: question.to_string(),
            execution_type: Some(ExecutionType::Simple),
            answer: trace.answer.clone(),
            metadata: ExecutionMetadata {
                iterations: Some(trace.iterations),
                complexity_score: Some(plan.complexity_score),
                total_tokens: usage.total_tokens,
                ..ExecutionMetadata::default()
            },
            plan: Some(plan),
        };
        (result, vec![trace])
    }

    /// One agent run per sub-question in plan order, then synthesis.
    async fn execute_complex(
        &self,
        question: &str,
        plan: QueryPlan,
        mut usage: TokenUsage,
    ) -> Result<(ExecutionResult, Vec<AgentTrace>), AgentError> {
        if plan.sub_questions.is_empty() {
            return Err(AgentError::Orchestration {
                message: "complex plan has no sub-questions".to_string(),
            });
        }

        let mut sub_answers = Vec::with_capacity(plan.sub_questions.len());
        let mut evidence = Vec::new();
        let mut traces = Vec::with_capacity(plan.sub_questions.len());

        for (i, sub_question) in plan.sub_questions.iter().enumerate() {
            debug!(index = i + 1, sub_question = %sub_question, "executing sub-question");
            let trace = self.run_agent(sub_question).await;
            usage.accumulate(trace.usage);
            evidence.extend(trace.evidence());
            sub_answers.push(SubAnswer {
                question: sub_question.clone(),
                answer: trace.answer.clone(),
                iterations: trace.iterations,
            });
            traces.push(trace);
        }

        let synthesizer =
            SynthesizerAgent::new(&self.ctx.config, self.ctx.prompts.synthesizer.clone());
        let (answer, synthesis_usage) = synthesizer
            .synthesize(self.ctx.provider.as_ref(), question, &sub_answers)
            .await;
        usage.accumulate(synthesis_usage);

        let result = ExecutionResult {
            query: question.to_string(),
            execution_type: Some(ExecutionType::Complex),
            answer,
            metadata: ExecutionMetadata {
                complexity_score: Some(plan.complexity_score),
                sub_questions_count: Some(sub_answers.len()),
                sub_answers,
                evidence,
                total_tokens: usage.total_tokens,
                ..ExecutionMetadata::default()
            },
            plan: Some(plan),
        };
        Ok((result, traces))
    }

    async fn run_agent(&self, question: &str) -> AgentTrace {
        let provider = self.ctx.provider.as_ref();
        let executor = ToolExecutor::new(self.ctx.retriever.as_ref(), provider, &self.ctx.config);
        let agent = ReasoningAgent::new(&self.ctx.config, &self.ctx.prompts.agent);
        let trace = agent.run(provider, &executor, question).await;
        debug!(
            iterations = trace.iterations,
            stop_reason = %trace.stop_reason,
            "agent run finished"
        );
        trace
    }

    fn planner(&self) -> QueryPlanner {
        QueryPlanner::new(&self.ctx.config, self.ctx.prompts.planner.clone())
    }
}

fn validate_question(question: &str) -> Result<(), AgentError> {
    if question.trim().is_empty() {
        return Err(AgentError::Orchestration {
            message: "Query cannot be empty".to_string(),
        });
    }
    Ok(())
}
