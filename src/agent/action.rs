//! Classifier for free-text agent responses.
//!
//! Works in two stages. [`detect_marker`] decides what kind of step the
//! response announces. [`classify`] then extracts the structured fields
//! for that kind. Keeping both out of the control loop lets each be
//! tested against present, absent and malformed markers.

use std::sync::LazyLock;

use regex::Regex;
use tracing::error;

/// Marker that introduces the final answer.
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// Marker that introduces a tool invocation.
pub const ACTION_MARKER: &str = "Action:";

/// Marker that introduces the tool input.
const ACTION_INPUT_MARKER: &str = "Action Input:";

static ACTION_RE: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"Action:\s*(\w+)"));

static ACTION_INPUT_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"Action Input:\s*([^\n]+)"));

fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .map_err(|e| error!(pattern, error = %e, "action pattern failed to compile"))
        .ok()
}

/// Marker found by the first classification stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// The response contains [`FINAL_ANSWER_MARKER`].
    FinalAnswer,
    /// The response contains [`ACTION_MARKER`].
    Action,
    /// Neither marker is present.
    None,
}

/// A classified agent step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentStep {
    /// Terminal answer; the text after the last final-answer marker, trimmed.
    FinalAnswer(String),
    /// Tool invocation request.
    Action {
        /// Tool name as written by the model.
        name: String,
        /// Tool input; empty when no input line was given.
        input: String,
    },
    /// Protocol drift; the raw response is used as the answer.
    Unstructured(String),
}

/// Stage one: detects which marker the response carries.
///
/// The final-answer marker wins when both are present.
#[must_use]
pub fn detect_marker(text: &str) -> Marker {
    if text.contains(FINAL_ANSWER_MARKER) {
        Marker::FinalAnswer
    } else if text.contains(ACTION_MARKER) {
        Marker::Action
    } else {
        Marker::None
    }
}

/// Stage two for actions: extracts the tool name and its input.
///
/// The input capture runs to the end of its line. Returns `None` when the
/// action marker is not followed by a tool name.
#[must_use]
pub fn extract_action(text: &str) -> Option<(String, String)> {
    let (Some(action_re), Some(input_re)) = (ACTION_RE.as_ref(), ACTION_INPUT_RE.as_ref()) else {
        return scan_action(text);
    };

    let name = action_re.captures(text)?.get(1)?.as_str().to_string();

    let input = input_re
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    Some((name, input))
}

/// Marker scan used when the action patterns are unavailable.
///
/// Accepts the same shapes as the patterns: the first action marker
/// followed by a word, and the first non-blank input line.
fn scan_action(text: &str) -> Option<(String, String)> {
    let name = text.match_indices(ACTION_MARKER).find_map(|(at, marker)| {
        let name: String = text[at + marker.len()..]
            .trim_start()
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        (!name.is_empty()).then_some(name)
    })?;

    let input = text
        .match_indices(ACTION_INPUT_MARKER)
        .find_map(|(at, marker)| {
            let rest = text[at + marker.len()..].trim_start();
            let line = rest.lines().next().unwrap_or_default().trim();
            (!line.is_empty()).then(|| line.to_string())
        })
        .unwrap_or_default();

    Some((name, input))
}

/// Extracts the final answer text following the last marker.
#[must_use]
pub fn extract_final_answer(text: &str) -> String {
    text.rsplit_once(FINAL_ANSWER_MARKER)
        .map_or(text, |(_, answer)| answer)
        .trim()
        .to_string()
}

/// Classifies a raw agent response into a step.
///
/// A malformed action (marker without a tool name) degrades to
/// [`AgentStep::Unstructured`].
#[must_use]
pub fn classify(text: &str) -> AgentStep {
    match detect_marker(text) {
        Marker::FinalAnswer => AgentStep::FinalAnswer(extract_final_answer(text)),
        Marker::Action => match extract_action(text) {
            Some((name, input)) => AgentStep::Action { name, input },
            None => AgentStep::Unstructured(text.to_string()),
        },
        Marker::None => AgentStep::Unstructured(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Final Answer: Refunds within 30 days.", Marker::FinalAnswer; "final answer")]
    #[test_case("Thought: search\nAction: search_documents\nAction Input: refunds", Marker::Action; "action")]
    #[test_case("Action: search_documents\nFinal Answer: done", Marker::FinalAnswer; "final wins over action")]
    #[test_case("Refunds are accepted within 30 days.", Marker::None; "plain text")]
    #[test_case("", Marker::None; "empty")]
    #[test_case("final answer: lowercase", Marker::None; "case sensitive")]
    fn test_detect_marker(text: &str, expected: Marker) {
        assert_eq!(detect_marker(text), expected);
    }

    #[test_case(
        "Thought: look it up\nAction: search_documents\nAction Input: refund policy",
        "search_documents", "refund policy";
        "well formed"
    )]
    #[test_case(
        "Action: answer_question\nAction Input:   What is covered?  \nObservation: ignored",
        "answer_question", "What is covered?";
        "input stops at end of line"
    )]
    #[test_case("Action: summarize_content", "summarize_content", ""; "missing input")]
    #[test_case("Action: delete_everything\nAction Input: now", "delete_everything", "now"; "unknown tool still parsed")]
    fn test_classify_action(text: &str, name: &str, input: &str) {
        assert_eq!(classify(text), AgentStep::Action {
            name: name.to_string(),
            input: input.to_string(),
        });
    }

    #[test_case("Final Answer: Refunds within 30 days.", "Refunds within 30 days."; "single marker")]
    #[test_case("Thought: done\nFinal Answer:\n  Yes.  \n", "Yes."; "trims whitespace")]
    #[test_case("Final Answer: draft\nFinal Answer: revised", "revised"; "last marker wins")]
    #[test_case("Final Answer:", ""; "empty answer")]
    fn test_classify_final_answer(text: &str, expected: &str) {
        assert_eq!(classify(text), AgentStep::FinalAnswer(expected.to_string()));
    }

    #[test_case("The policy allows returns."; "no markers")]
    #[test_case("Action: !!!"; "action marker without name")]
    #[test_case("Action:"; "bare action marker")]
    fn test_classify_unstructured(text: &str) {
        assert_eq!(classify(text), AgentStep::Unstructured(text.to_string()));
    }

    #[test]
    fn test_extract_action_absent() {
        assert!(extract_action("Thought: nothing to do").is_none());
    }

    #[test_case("Thought: look it up\nAction: search_documents\nAction Input: refund policy"; "well formed")]
    #[test_case("Action: answer_question\nAction Input:   What is covered?  \nObservation: ignored"; "input stops at end of line")]
    #[test_case("Action: summarize_content"; "missing input")]
    #[test_case("Action: !!!\nAction: search_documents"; "first named action")]
    #[test_case("Action:\n  search_documents\nAction Input:\n  refunds"; "markers on their own lines")]
    #[test_case("Action: !!!"; "marker without name")]
    #[test_case("Thought: nothing to do"; "no marker")]
    fn test_scan_action_matches_patterns(text: &str) {
        assert!(ACTION_RE.is_some());
        assert!(ACTION_INPUT_RE.is_some());
        assert_eq!(scan_action(text), extract_action(text));
    }
}
