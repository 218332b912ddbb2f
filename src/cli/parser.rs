//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docmate: ask questions of a document collection.
///
/// Plans each question, runs a bounded reasoning agent over retrieved
/// passages, and synthesizes one answer for multi-part questions.
#[derive(Parser, Debug)]
#[command(name = "docmate")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer a question over one or more corpus files.
    ///
    /// Corpus files are JSON Lines, one pre-chunked unit per line:
    /// `{"content": "...", "metadata": {"source": "policy.pdf"}}`.
    /// Requires `OPENAI_API_KEY` (or `DOCMATE_API_KEY`).
    #[command(after_help = r#"Examples:
  docmate ask "What is the refund policy?" --corpus policy.jsonl
  docmate ask "Compare plan A and plan B" --corpus ./corpus/
  docmate ask "Who signs off on refunds?" -c a.jsonl -c b.jsonl --show-trace
  docmate --format json ask "What is covered?" -c policy.jsonl | jq '.answer'
"#)]
    Ask {
        /// The question to answer.
        question: String,

        /// Corpus file or directory of `*.jsonl` files (repeatable).
        ///
        /// Falls back to `DOCMATE_CORPUS` when omitted.
        #[arg(short, long = "corpus")]
        corpus: Vec<PathBuf>,

        /// Maximum reasoning iterations per agent run.
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Directory containing prompt template files.
        ///
        /// Overrides `DOCMATE_PROMPT_DIR` and `~/.config/docmate/prompts/`.
        #[arg(long)]
        prompt_dir: Option<PathBuf>,

        /// Print each agent's tool calls and observations.
        #[arg(long)]
        show_trace: bool,
    },

    /// Show the plan for a question without answering it.
    ///
    /// Requires `OPENAI_API_KEY` (or `DOCMATE_API_KEY`).
    #[command(after_help = r#"Examples:
  docmate plan "Compare plan A and plan B"
  docmate --format json plan "What changed in v2?" | jq '.plan.sub_questions'
"#)]
    Plan {
        /// The question to plan.
        question: String,

        /// Directory containing prompt template files.
        #[arg(long)]
        prompt_dir: Option<PathBuf>,
    },

    /// Load corpus files and report collection statistics.
    #[command(after_help = r#"Examples:
  docmate stats --corpus policy.jsonl
  docmate --format json stats -c ./corpus/
"#)]
    Stats {
        /// Corpus file or directory of `*.jsonl` files (repeatable).
        #[arg(short, long = "corpus")]
        corpus: Vec<PathBuf>,
    },

    /// Write default prompt templates to a directory for customization.
    ///
    /// Existing files are never overwritten.
    #[command(after_help = r#"Examples:
  docmate init-prompts                   # ~/.config/docmate/prompts/
  docmate init-prompts --dir ./prompts   # Custom directory
"#)]
    InitPrompts {
        /// Target directory (defaults to `~/.config/docmate/prompts/`).
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}
