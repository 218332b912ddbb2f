//! CLI command implementations.
//!
//! Each command is synchronous at this boundary: commands that touch the
//! async engine build a tokio runtime and block on it.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::{debug, warn};

use crate::agent::{AgentConfig, PromptSet};
use crate::cli::output::{OutputFormat, format_plan, format_result, format_stats};
use crate::cli::parser::{Cli, Commands};
use crate::error::{CommandError, Result};
use crate::retrieval::{InMemoryRetriever, Retriever, corpus};
use crate::service::{DocumentQaService, Readiness, ServiceStats};

/// Parameters for the ask command.
#[derive(Debug, Clone, Default)]
pub struct AskParams<'a> {
    /// The question to answer.
    pub question: &'a str,
    /// Corpus files or directories.
    pub corpus: &'a [PathBuf],
    /// Iteration cap override.
    pub max_iterations: Option<usize>,
    /// Prompt template directory override.
    pub prompt_dir: Option<&'a Path>,
    /// Include agent traces in the output.
    pub show_trace: bool,
}

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Ask {
            question,
            corpus,
            max_iterations,
            prompt_dir,
            show_trace,
        } => {
            let params = AskParams {
                question,
                corpus,
                max_iterations: *max_iterations,
                prompt_dir: prompt_dir.as_deref(),
                show_trace: *show_trace,
            };
            cmd_ask(&params, format)
        }
        Commands::Plan {
            question,
            prompt_dir,
        } => cmd_plan(question, prompt_dir.as_deref(), format),
        Commands::Stats { corpus } => cmd_stats(corpus, format),
        Commands::InitPrompts { dir } => cmd_init_prompts(dir.as_deref(), format),
    }
}

/// Creates the tokio runtime used as the sync/async bridge.
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to create async runtime: {e}")).into()
    })
}

fn build_service(config: AgentConfig) -> Result<DocumentQaService> {
    DocumentQaService::from_config(config).map_err(|e| {
        CommandError::ExecutionFailed(format!("Provider creation failed: {e}")).into()
    })
}

fn cmd_ask(params: &AskParams<'_>, format: OutputFormat) -> Result<String> {
    let mut builder = AgentConfig::builder();
    for path in params.corpus {
        builder = builder.corpus_path(path);
    }
    if let Some(n) = params.max_iterations {
        builder = builder.max_iterations(n);
    }
    if let Some(dir) = params.prompt_dir {
        builder = builder.prompt_dir(dir);
    }
    let config = builder.from_env().build();

    if config.corpus_paths.is_empty() {
        warn!("no corpus configured; searches will find nothing");
    }

    let service = build_service(config)?;
    let rt = runtime()?;

    let (result, traces) = rt.block_on(async {
        let indexed = service.initialize().await.map_err(|e| {
            CommandError::ExecutionFailed(format!("Failed to load corpus: {e}"))
        })?;
        debug!(indexed, "corpus indexed");
        Ok::<_, CommandError>(service.query_traced(params.question).await)
    })?;

    let traces = params.show_trace.then_some(traces.as_slice());
    format_result(&result, traces, format)
}

fn cmd_plan(question: &str, prompt_dir: Option<&Path>, format: OutputFormat) -> Result<String> {
    let mut builder = AgentConfig::builder();
    if let Some(dir) = prompt_dir {
        builder = builder.prompt_dir(dir);
    }
    let service = build_service(builder.from_env().build())?;
    let rt = runtime()?;

    let plan = rt.block_on(service.plan(question));
    format_plan(question, &plan, format)
}

/// Loads corpora into an in-memory index and reports its statistics.
///
/// Needs no completion provider.
fn cmd_stats(paths: &[PathBuf], format: OutputFormat) -> Result<String> {
    let paths = if paths.is_empty() {
        AgentConfig::builder().from_env().build().corpus_paths
    } else {
        paths.to_vec()
    };

    let retriever = InMemoryRetriever::new()?;
    let rt = runtime()?;
    rt.block_on(async {
        for path in &paths {
            let units = corpus::load_path(path)?;
            retriever.add_documents(units).await?;
        }
        Ok::<_, crate::error::AgentError>(())
    })
    .map_err(|e| CommandError::ExecutionFailed(format!("Failed to load corpus: {e}")))?;

    let retrieval = retriever.stats()?;
    let stats = ServiceStats {
        state: Readiness::Ready,
        document_count: retrieval.document_count,
        unit_count: retrieval.unit_count,
    };
    format_stats(&stats, format)
}

fn cmd_init_prompts(dir: Option<&Path>, format: OutputFormat) -> Result<String> {
    let target_dir = dir
        .map(PathBuf::from)
        .or_else(PromptSet::default_dir)
        .ok_or_else(|| {
            CommandError::ExecutionFailed(
                "Could not determine home directory for default prompt path".to_string(),
            )
        })?;

    let written = PromptSet::write_defaults(&target_dir).map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to write prompt templates: {e}"))
    })?;

    match format {
        OutputFormat::Text => {
            if written.is_empty() {
                return Ok(format!(
                    "All prompt templates already exist in: {}\n",
                    target_dir.display()
                ));
            }
            let mut output = format!(
                "Wrote {} prompt template(s) to: {}\n",
                written.len(),
                target_dir.display()
            );
            for path in &written {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("unknown");
                let _ = writeln!(output, "  {name}");
            }
            output.push_str("\nEdit these files to customize agent system prompts.\n");
            Ok(output)
        }
        OutputFormat::Json => format.to_json(&json!({
            "directory": target_dir.to_string_lossy(),
            "written": written
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect::<Vec<_>>(),
            "count": written.len(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn corpus_file(dir: &TempDir, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap_or_else(|_| unreachable!());
        for line in lines {
            writeln!(file, "{line}").unwrap_or_else(|_| unreachable!());
        }
        path
    }

    #[test]
    fn test_cmd_init_prompts_writes_once() {
        let temp = TempDir::new().unwrap_or_else(|_| unreachable!());
        let dir = temp.path().join("prompts");

        let first = cmd_init_prompts(Some(&dir), OutputFormat::Text).unwrap_or_default();
        assert!(first.contains("Wrote 3 prompt template(s)"));
        assert!(first.contains("planner.md"));
        assert!(dir.join("agent.md").exists());

        let second = cmd_init_prompts(Some(&dir), OutputFormat::Json).unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(&second).unwrap_or_default();
        assert_eq!(value["count"], 0);
    }

    #[test]
    fn test_cmd_stats_counts_documents_and_units() {
        let temp = TempDir::new().unwrap_or_else(|_| unreachable!());
        let path = corpus_file(
            &temp,
            "corpus.jsonl",
            &[
                r#"{"content": "Refunds within 30 days.", "metadata": {"source": "policy.pdf"}}"#,
                r#"{"content": "Shipping is free.", "metadata": {"source": "policy.pdf"}}"#,
                r#"{"content": "Plan A covers parts.", "metadata": {"source": "plans.pdf"}}"#,
            ],
        );

        let out = cmd_stats(&[path], OutputFormat::Text).unwrap_or_default();
        assert_eq!(out, "State: ready\nDocuments: 2\nUnits: 3\n");
    }

    #[test]
    fn test_cmd_stats_reports_malformed_corpus() {
        let temp = TempDir::new().unwrap_or_else(|_| unreachable!());
        let path = corpus_file(&temp, "bad.jsonl", &["{not json"]);
        let err = cmd_stats(&[path], OutputFormat::Text);
        assert!(err.is_err_and(|e| e.to_string().contains("line 1")));
    }
}
