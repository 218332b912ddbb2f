//! Output formatting for CLI commands.
//!
//! Every command renders either human-readable text or JSON. JSON output
//! is the serde form of the underlying types.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::json;

use crate::agent::{AgentTrace, ExecutionResult, QueryPlan};
use crate::error::{CommandError, Result};
use crate::service::ServiceStats;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Parses a format name. Unknown names fall back to text.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Serializes a value as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::OutputFormat`] if serialization fails.
    pub fn to_json<T: Serialize + ?Sized>(self, value: &T) -> Result<String> {
        serde_json::to_string_pretty(value).map_err(|e| {
            CommandError::OutputFormat(format!("JSON serialization failed: {e}")).into()
        })
    }
}

/// Formats a query result, optionally followed by the agent traces.
pub fn format_result(
    result: &ExecutionResult,
    traces: Option<&[AgentTrace]>,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut output = result.answer.clone();
            output.push_str("\n\n---\n");

            let kind = result
                .execution_type
                .map_or_else(|| "error".to_string(), |t| t.to_string());
            let _ = write!(output, "Type: {kind}");
            if let Some(score) = result.metadata.complexity_score {
                let _ = write!(output, " | Complexity: {score}");
            }
            if let Some(iterations) = result.metadata.iterations {
                let _ = write!(output, " | Iterations: {iterations}");
            }
            if let Some(count) = result.metadata.sub_questions_count {
                let _ = write!(output, " | Sub-questions: {count}");
            }
            let _ = writeln!(output, " | Tokens: {}", result.metadata.total_tokens);

            for (i, sub) in result.metadata.sub_answers.iter().enumerate() {
                let _ = writeln!(
                    output,
                    "  {}. {} ({} iterations)",
                    i + 1,
                    sub.question,
                    sub.iterations
                );
            }
            if !result.metadata.evidence.is_empty() {
                let _ = writeln!(output, "Evidence: {} search(es)", result.metadata.evidence.len());
            }

            if let Some(traces) = traces {
                output.push_str(&format_traces_text(traces));
            }
            Ok(output)
        }
        OutputFormat::Json => match traces {
            Some(traces) => format.to_json(&json!({
                "result": result,
                "traces": traces,
            })),
            None => format.to_json(result),
        },
    }
}

fn format_traces_text(traces: &[AgentTrace]) -> String {
    let mut output = String::new();
    for (i, trace) in traces.iter().enumerate() {
        let _ = writeln!(
            output,
            "\nTrace {} ({}, {} iterations, {} tokens)",
            i + 1,
            trace.stop_reason,
            trace.iterations,
            trace.usage.total_tokens
        );
        if trace.observations.is_empty() {
            output.push_str("  (no tool calls)\n");
        }
        for obs in &trace.observations {
            let marker = if obs.is_error { " [error]" } else { "" };
            let _ = writeln!(output, "  > {}: {}{marker}", obs.tool, obs.input);
            for line in obs.observation.lines() {
                let _ = writeln!(output, "    {line}");
            }
        }
    }
    output
}

/// Formats a plan together with its prioritized execution steps.
pub fn format_plan(question: &str, plan: &QueryPlan, format: OutputFormat) -> Result<String> {
    let steps = plan.prioritized_steps();
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "Question: {question}");
            let _ = writeln!(
                output,
                "Type: {} | Complexity: {}",
                plan.query_type, plan.complexity_score
            );

            output.push_str("\nSub-questions:\n");
            for (i, sub) in plan.sub_questions.iter().enumerate() {
                let _ = writeln!(output, "  {}. {sub}", i + 1);
            }

            if !steps.is_empty() {
                output.push_str("\nSteps (by priority):\n");
                for p in &steps {
                    let _ = write!(
                        output,
                        "  [{}] {}. {} {}",
                        p.priority, p.step.step, p.step.action, p.step.target
                    );
                    if !p.step.rationale.is_empty() {
                        let _ = write!(output, " - {}", p.step.rationale);
                    }
                    output.push('\n');
                }
            }

            if !plan.expected_sources.is_empty() {
                let _ = writeln!(
                    output,
                    "\nExpected sources: {}",
                    plan.expected_sources.join(", ")
                );
            }
            Ok(output)
        }
        OutputFormat::Json => format.to_json(&json!({
            "query": question,
            "plan": plan,
            "prioritized_steps": steps,
        })),
    }
}

/// Formats service statistics.
pub fn format_stats(stats: &ServiceStats, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format!(
            "State: {}\nDocuments: {}\nUnits: {}\n",
            stats.state, stats.document_count, stats.unit_count
        )),
        OutputFormat::Json => format.to_json(stats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{
        ExecutionMetadata, ExecutionType, PlanStep, StopReason, SubAnswer, TokenUsage,
        ToolObservation,
    };
    use crate::service::Readiness;

    fn simple_result() -> ExecutionResult {
        ExecutionResult {
            query: "What is the refund policy?".to_string(),
            plan: Some(QueryPlan::fallback("What is the refund policy?")),
            execution_type: Some(ExecutionType::Simple),
            answer: "Refunds within 30 days.".to_string(),
            metadata: ExecutionMetadata {
                iterations: Some(2),
                complexity_score: Some(1),
                total_tokens: 120,
                ..ExecutionMetadata::default()
            },
        }
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(OutputFormat::parse("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse(" JSON "), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::parse("yaml"), OutputFormat::Text);
    }

    #[test]
    fn test_format_result_text() {
        let out = format_result(&simple_result(), None, OutputFormat::Text).unwrap_or_default();
        assert!(out.starts_with("Refunds within 30 days."));
        assert!(out.contains("Type: simple | Complexity: 1 | Iterations: 2 | Tokens: 120"));
    }

    #[test]
    fn test_format_result_complex_lists_sub_questions() {
        let mut result = simple_result();
        result.execution_type = Some(ExecutionType::Complex);
        result.metadata.iterations = None;
        result.metadata.sub_questions_count = Some(1);
        result.metadata.sub_answers = vec![SubAnswer {
            question: "What does plan A cover?".to_string(),
            answer: "Parts.".to_string(),
            iterations: 3,
        }];
        let out = format_result(&result, None, OutputFormat::Text).unwrap_or_default();
        assert!(out.contains("Sub-questions: 1"));
        assert!(out.contains("1. What does plan A cover? (3 iterations)"));
    }

    #[test]
    fn test_format_result_json_shape() {
        let out = format_result(&simple_result(), None, OutputFormat::Json).unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap_or_default();
        assert_eq!(value["execution_type"], "simple");
        assert_eq!(value["answer"], "Refunds within 30 days.");
        assert_eq!(value["metadata"]["iterations"], 2);
        assert_eq!(value["plan"]["query_type"], "simple");
    }

    #[test]
    fn test_format_result_with_traces() {
        let trace = AgentTrace {
            answer: "Refunds within 30 days.".to_string(),
            iterations: 2,
            transcript: Vec::new(),
            observations: vec![ToolObservation {
                tool: "search_documents".to_string(),
                input: "refund policy".to_string(),
                observation: "Found 1 relevant documents:\n- Refunds...".to_string(),
                documents_found: Some(1),
                is_error: false,
            }],
            stop_reason: StopReason::FinalAnswer,
            usage: TokenUsage::default(),
        };
        let traces = [trace];
        let text =
            format_result(&simple_result(), Some(&traces), OutputFormat::Text).unwrap_or_default();
        assert!(text.contains("Trace 1 (final_answer, 2 iterations"));
        assert!(text.contains("> search_documents: refund policy"));
        assert!(text.contains("    - Refunds..."));

        let json =
            format_result(&simple_result(), Some(&traces), OutputFormat::Json).unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(value["traces"][0]["stop_reason"], "final_answer");
        assert_eq!(value["result"]["answer"], "Refunds within 30 days.");
    }

    #[test]
    fn test_format_plan_orders_steps() {
        let mut plan = QueryPlan::fallback("q");
        plan.execution_plan = vec![
            PlanStep {
                step: 2,
                action: "answer".to_string(),
                target: "q".to_string(),
                rationale: String::new(),
            },
            PlanStep {
                step: 1,
                action: "search".to_string(),
                target: "q".to_string(),
                rationale: "find it".to_string(),
            },
        ];
        let out = format_plan("q", &plan, OutputFormat::Text).unwrap_or_default();
        let search = out.find("[2] 1. search q - find it").unwrap_or(usize::MAX);
        let answer = out.find("[1] 2. answer q").unwrap_or(0);
        assert!(search < answer);

        let json = format_plan("q", &plan, OutputFormat::Json).unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap_or_default();
        assert_eq!(value["prioritized_steps"][0]["action"], "search");
        assert_eq!(value["prioritized_steps"][0]["priority"], 2);
    }

    #[test]
    fn test_format_stats() {
        let stats = ServiceStats {
            state: Readiness::Ready,
            document_count: 2,
            unit_count: 5,
        };
        let text = format_stats(&stats, OutputFormat::Text).unwrap_or_default();
        assert_eq!(text, "State: ready\nDocuments: 2\nUnits: 5\n");
        let json = format_stats(&stats, OutputFormat::Json).unwrap_or_default();
        assert!(json.contains("\"state\": \"ready\""));
    }
}
