//! Query plan data types.
//!
//! A [`QueryPlan`] is produced once per top-level question by the
//! [`QueryPlanner`](super::planner::QueryPlanner) and owned by the
//! orchestrator for the lifetime of that request.

use serde::{Deserialize, Deserializer, Serialize};

/// Query type tag used by the fallback plan.
pub const FALLBACK_QUERY_TYPE: &str = "simple";

/// Expected source descriptor used by the fallback plan.
pub const FALLBACK_SOURCE: &str = "any relevant documents";

/// One step of a plan's execution outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Step index as reported by the planner (1-based by convention).
    #[serde(default)]
    pub step: i64,
    /// Action tag, e.g. `search`, `analyze`, `answer`.
    #[serde(default)]
    pub action: String,
    /// What the step operates on.
    #[serde(default)]
    pub target: String,
    /// Why the step exists.
    #[serde(default, alias = "purpose")]
    pub rationale: String,
}

impl PlanStep {
    fn new(step: i64, action: &str, target: &str, rationale: &str) -> Self {
        Self {
            step,
            action: action.to_string(),
            target: target.to_string(),
            rationale: rationale.to_string(),
        }
    }
}

/// A plan step with an assigned priority (higher runs first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrioritizedStep {
    /// The underlying step.
    #[serde(flatten)]
    pub step: PlanStep,
    /// Priority, `len - position` after ordering by step index.
    pub priority: usize,
}

/// Structured decomposition of a question.
///
/// Parsed plans are passed through without range validation: a
/// `complexity_score` outside 1..=5 or an empty `execution_plan` is
/// tolerated downstream. `sub_questions` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPlan {
    /// Free-form type tag (simple, complex, multi-part, comparative, analytical).
    pub query_type: String,
    /// Complexity in 1..=5 by convention; drives routing.
    #[serde(deserialize_with = "deserialize_score")]
    pub complexity_score: i64,
    /// Ordered sub-questions.
    pub sub_questions: Vec<String>,
    /// Ordered execution outline.
    #[serde(default)]
    pub execution_plan: Vec<PlanStep>,
    /// Descriptors of the document types the answer needs.
    #[serde(default)]
    pub expected_sources: Vec<String>,
}

/// Reads a score written as an integer or a float.
///
/// Fractional scores round up, which keeps `score <= threshold` unchanged
/// for any integer threshold.
#[allow(clippy::cast_possible_truncation)]
fn deserialize_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Number::deserialize(deserializer)?;
    if let Some(score) = raw.as_i64() {
        return Ok(score);
    }
    match raw.as_f64() {
        Some(score) if score.is_finite() && score.abs() < 1e15 => Ok(score.ceil() as i64),
        _ => Err(serde::de::Error::custom(format!(
            "complexity_score out of range: {raw}"
        ))),
    }
}

impl QueryPlan {
    /// Builds the single-step fallback plan for `question`.
    ///
    /// Substituted whenever decomposition fails, so routing always has a
    /// plan with `complexity_score == 1` and `sub_questions == [question]`.
    #[must_use]
    pub fn fallback(question: &str) -> Self {
        Self {
            query_type: FALLBACK_QUERY_TYPE.to_string(),
            complexity_score: 1,
            sub_questions: vec![question.to_string()],
            execution_plan: vec![
                PlanStep::new(1, "search", question, "Find relevant information"),
                PlanStep::new(
                    2,
                    "answer",
                    question,
                    "Provide answer based on found information",
                ),
            ],
            expected_sources: vec![FALLBACK_SOURCE.to_string()],
        }
    }

    /// Whether the plan takes the simple path under `threshold`.
    #[must_use]
    pub const fn is_simple(&self, threshold: i64) -> bool {
        self.complexity_score <= threshold
    }

    /// Orders steps by step index and assigns descending priorities.
    ///
    /// The sort is stable, so steps sharing an index keep plan order.
    #[must_use]
    pub fn prioritized_steps(&self) -> Vec<PrioritizedStep> {
        let mut steps = self.execution_plan.clone();
        steps.sort_by_key(|s| s.step);
        let len = steps.len();
        steps
            .into_iter()
            .enumerate()
            .map(|(position, step)| PrioritizedStep {
                step,
                priority: len - position,
            })
            .collect()
    }
}
