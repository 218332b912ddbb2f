//! Error types for docmate.
//!
//! [`AgentError`] covers everything the query engine and its gateways can
//! report. [`CommandError`] covers CLI-level failures. [`Error`] wraps both
//! for the binary and the command layer.

use std::path::PathBuf;

/// Crate-level result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Engine or gateway failure.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// CLI command failure.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the query engine, its gateways, and the service layer.
///
/// Most of these never reach a caller of
/// [`Orchestrator::execute`](crate::agent::Orchestrator::execute): they are
/// recovered at the smallest enclosing step or folded into an error
/// [`ExecutionResult`](crate::agent::ExecutionResult).
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// No API key was configured for the completion provider.
    #[error("API key missing: set OPENAI_API_KEY or DOCMATE_API_KEY")]
    ApiKeyMissing,

    /// The configured provider name is not known.
    #[error("unsupported provider: {name}")]
    UnsupportedProvider {
        /// Provider name as configured.
        name: String,
    },

    /// The completion service rejected or failed a request.
    #[error("API request failed: {message}")]
    ApiRequest {
        /// Provider error message.
        message: String,
        /// HTTP status, when known.
        status: Option<u16>,
    },

    /// Model output could not be parsed into the expected structure.
    #[error("failed to parse response: {message}")]
    ResponseParse {
        /// What went wrong.
        message: String,
        /// The raw model output.
        content: String,
    },

    /// A tool could not be executed.
    #[error("tool '{name}' failed: {message}")]
    ToolExecution {
        /// Tool name.
        name: String,
        /// Failure detail.
        message: String,
    },

    /// The retrieval collaborator failed.
    #[error("retrieval failed: {message}")]
    Retrieval {
        /// Failure detail.
        message: String,
    },

    /// A corpus file could not be loaded.
    #[error("failed to load corpus {}: {message}", path.display())]
    CorpusLoad {
        /// Offending file or directory.
        path: PathBuf,
        /// Failure detail.
        message: String,
    },

    /// Executor-level failure outside the recoverable categories.
    #[error("{message}")]
    Orchestration {
        /// Failure detail.
        message: String,
    },

    /// The service is not in the `Ready` state.
    #[error("service is not ready (state: {state})")]
    NotReady {
        /// Current readiness state.
        state: String,
    },
}

/// Errors raised by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The command ran but failed.
    #[error("{0}")]
    ExecutionFailed(String),

    /// An argument was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Output could not be rendered.
    #[error("output error: {0}")]
    OutputFormat(String),
}
