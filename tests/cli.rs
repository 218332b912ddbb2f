//! Binary-level tests for the docmate CLI.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn docmate() -> Command {
    let mut cmd = Command::cargo_bin("docmate").unwrap_or_else(|_| unreachable!());
    cmd.env_remove("OPENAI_API_KEY")
        .env_remove("DOCMATE_API_KEY")
        .env_remove("DOCMATE_CORPUS")
        .env_remove("DOCMATE_PROMPT_DIR")
        .env_remove("RUST_LOG");
    cmd
}

fn write_corpus(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("policy.jsonl");
    let mut file = std::fs::File::create(&path).unwrap_or_else(|_| unreachable!());
    for line in [
        r#"{"content": "Refunds are issued within 30 days.", "metadata": {"source": "policy.pdf"}}"#,
        "",
        r#"{"content": "Plan A covers parts.", "metadata": {"source": "plans.pdf", "chunk_index": 0}}"#,
        r#"{"content": "Plan B covers labor.", "metadata": {"source": "plans.pdf", "chunk_index": 1}}"#,
    ] {
        writeln!(file, "{line}").unwrap_or_else(|_| unreachable!());
    }
    path
}

#[test]
fn test_help_lists_commands() {
    docmate()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("init-prompts"));
}

#[test]
fn test_ask_help_shows_examples() {
    docmate()
        .args(["ask", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--corpus"))
        .stdout(predicate::str::contains("--max-iterations"))
        .stdout(predicate::str::contains("Examples:"));
}

#[test]
fn test_init_prompts_writes_templates() {
    let temp = TempDir::new().unwrap_or_else(|_| unreachable!());
    let dir = temp.path().join("prompts");

    docmate()
        .args(["init-prompts", "--dir"])
        .arg(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 3 prompt template(s)"));

    assert!(dir.join("planner.md").exists());
    assert!(dir.join("agent.md").exists());
    assert!(dir.join("synthesizer.md").exists());

    docmate()
        .args(["init-prompts", "--dir"])
        .arg(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("already exist"));
}

#[test]
fn test_stats_text() {
    let temp = TempDir::new().unwrap_or_else(|_| unreachable!());
    let corpus = write_corpus(&temp);

    docmate()
        .args(["stats", "--corpus"])
        .arg(&corpus)
        .assert()
        .success()
        .stdout(predicate::str::contains("Documents: 2"))
        .stdout(predicate::str::contains("Units: 3"));
}

#[test]
fn test_stats_json_from_directory() {
    let temp = TempDir::new().unwrap_or_else(|_| unreachable!());
    write_corpus(&temp);

    let output = docmate()
        .args(["--format", "json", "stats", "-c"])
        .arg(temp.path())
        .output()
        .unwrap_or_else(|_| unreachable!());
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap_or_default();
    assert_eq!(value["state"], "ready");
    assert_eq!(value["document_count"], 2);
    assert_eq!(value["unit_count"], 3);
}

#[test]
fn test_stats_missing_corpus_fails() {
    docmate()
        .args(["stats", "--corpus", "/nonexistent/docmate.jsonl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load corpus"));
}

#[test]
fn test_ask_without_api_key_fails() {
    docmate()
        .args(["ask", "What is the refund policy?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key missing"));
}
