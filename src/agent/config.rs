//! Agent configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.

use std::fmt;
use std::path::PathBuf;

/// Default model for every agent role.
const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default sampling temperature for the reasoning agent and its tools.
const DEFAULT_AGENT_TEMPERATURE: f32 = 0.7;
/// Default sampling temperature for the planner.
const DEFAULT_PLANNER_TEMPERATURE: f32 = 0.3;
/// Default completion token limit.
const DEFAULT_MAX_TOKENS: u32 = 4000;
/// Default reasoning loop iteration cap.
const DEFAULT_MAX_ITERATIONS: usize = 5;
/// Default result count for the `search_documents` tool.
const DEFAULT_SEARCH_TOP_K: usize = 5;
/// Default result count for the `answer_question` tool's context lookup.
const DEFAULT_ANSWER_TOP_K: usize = 3;
/// Number of passages shown in a `search_documents` observation.
const DEFAULT_PREVIEW_COUNT: usize = 3;
/// Characters kept per passage in a `search_documents` observation.
const DEFAULT_PREVIEW_CHARS: usize = 200;
/// Plans scoring at or below this take the simple path.
const DEFAULT_COMPLEXITY_THRESHOLD: i64 = 2;

/// Configuration for the query engine.
///
/// `Debug` output masks the API key.
#[derive(Clone)]
pub struct AgentConfig {
    /// LLM provider name (e.g., "openai").
    pub provider: String,
    /// API key for the provider. Only required once a provider is created.
    pub api_key: Option<String>,
    /// Optional base URL override (for proxies or compatible APIs).
    pub base_url: Option<String>,
    /// Model for the query planner.
    pub planner_model: String,
    /// Model for the reasoning agent and its completion-backed tools.
    pub agent_model: String,
    /// Model for multi-step answer synthesis.
    pub synthesizer_model: String,
    /// Sampling temperature for the reasoning agent and tools.
    pub agent_temperature: f32,
    /// Sampling temperature for the planner.
    pub planner_temperature: f32,
    /// Maximum tokens per completion.
    pub max_tokens: u32,
    /// Reasoning loop iteration cap. The only bound on per-question latency.
    pub max_iterations: usize,
    /// Result count requested by `search_documents`.
    pub search_top_k: usize,
    /// Result count requested by `answer_question`.
    pub answer_top_k: usize,
    /// Passages listed in a `search_documents` observation.
    pub preview_count: usize,
    /// Characters kept per listed passage.
    pub preview_chars: usize,
    /// Plans with `complexity_score <= complexity_threshold` run the simple path.
    pub complexity_threshold: i64,
    /// Directory containing prompt template files.
    ///
    /// Missing files fall back to compiled-in defaults.
    pub prompt_dir: Option<PathBuf>,
    /// Pre-chunked corpus files or directories loaded at service start.
    pub corpus_paths: Vec<PathBuf>,
}

impl AgentConfig {
    /// Creates a new builder for `AgentConfig`.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::builder().from_env().build()
    }
}

/// Debug stand-in for a secret.
const fn masked(secret: Option<&String>) -> Option<&'static str> {
    match secret {
        Some(_) => Some("***"),
        None => None,
    }
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field("provider", &self.provider)
            .field("api_key", &masked(self.api_key.as_ref()))
            .field("base_url", &self.base_url)
            .field("planner_model", &self.planner_model)
            .field("agent_model", &self.agent_model)
            .field("synthesizer_model", &self.synthesizer_model)
            .field("agent_temperature", &self.agent_temperature)
            .field("planner_temperature", &self.planner_temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_iterations", &self.max_iterations)
            .field("search_top_k", &self.search_top_k)
            .field("answer_top_k", &self.answer_top_k)
            .field("preview_count", &self.preview_count)
            .field("preview_chars", &self.preview_chars)
            .field("complexity_threshold", &self.complexity_threshold)
            .field("prompt_dir", &self.prompt_dir)
            .field("corpus_paths", &self.corpus_paths)
            .finish()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`AgentConfig`].
#[derive(Clone, Default)]
pub struct AgentConfigBuilder {
    provider: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    planner_model: Option<String>,
    agent_model: Option<String>,
    synthesizer_model: Option<String>,
    agent_temperature: Option<f32>,
    planner_temperature: Option<f32>,
    max_tokens: Option<u32>,
    max_iterations: Option<usize>,
    search_top_k: Option<usize>,
    answer_top_k: Option<usize>,
    preview_count: Option<usize>,
    preview_chars: Option<usize>,
    complexity_threshold: Option<i64>,
    prompt_dir: Option<PathBuf>,
    corpus_paths: Vec<PathBuf>,
}

impl fmt::Debug for AgentConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfigBuilder")
            .field("provider", &self.provider)
            .field("api_key", &masked(self.api_key.as_ref()))
            .field("base_url", &self.base_url)
            .field("max_iterations", &self.max_iterations)
            .field("prompt_dir", &self.prompt_dir)
            .field("corpus_paths", &self.corpus_paths)
            .finish_non_exhaustive()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl AgentConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.provider.is_none() {
            self.provider = std::env::var("DOCMATE_PROVIDER").ok();
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var("OPENAI_API_KEY")
                .or_else(|_| std::env::var("DOCMATE_API_KEY"))
                .ok();
        }
        if self.base_url.is_none() {
            self.base_url = std::env::var("OPENAI_BASE_URL")
                .or_else(|_| std::env::var("DOCMATE_BASE_URL"))
                .ok();
        }
        if self.planner_model.is_none() {
            self.planner_model = std::env::var("DOCMATE_PLANNER_MODEL").ok();
        }
        if self.agent_model.is_none() {
            self.agent_model = std::env::var("DOCMATE_AGENT_MODEL").ok();
        }
        if self.synthesizer_model.is_none() {
            self.synthesizer_model = std::env::var("DOCMATE_SYNTHESIZER_MODEL").ok();
        }
        if self.agent_temperature.is_none() {
            self.agent_temperature = env_parse("DOCMATE_TEMPERATURE");
        }
        if self.max_tokens.is_none() {
            self.max_tokens = env_parse("DOCMATE_MAX_TOKENS");
        }
        if self.max_iterations.is_none() {
            self.max_iterations = env_parse("DOCMATE_MAX_ITERATIONS");
        }
        if self.search_top_k.is_none() {
            self.search_top_k = env_parse("DOCMATE_SEARCH_TOP_K");
        }
        if self.complexity_threshold.is_none() {
            self.complexity_threshold = env_parse("DOCMATE_COMPLEXITY_THRESHOLD");
        }
        if self.prompt_dir.is_none() {
            self.prompt_dir = std::env::var("DOCMATE_PROMPT_DIR").ok().map(PathBuf::from);
        }
        if self.corpus_paths.is_empty()
            && let Some(paths) = std::env::var_os("DOCMATE_CORPUS")
        {
            self.corpus_paths = std::env::split_paths(&paths).collect();
        }
        self
    }

    /// Sets the LLM provider name.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the planner model.
    #[must_use]
    pub fn planner_model(mut self, model: impl Into<String>) -> Self {
        self.planner_model = Some(model.into());
        self
    }

    /// Sets the reasoning agent model.
    #[must_use]
    pub fn agent_model(mut self, model: impl Into<String>) -> Self {
        self.agent_model = Some(model.into());
        self
    }

    /// Sets the synthesizer model.
    #[must_use]
    pub fn synthesizer_model(mut self, model: impl Into<String>) -> Self {
        self.synthesizer_model = Some(model.into());
        self
    }

    /// Sets the reasoning agent temperature.
    #[must_use]
    pub const fn agent_temperature(mut self, t: f32) -> Self {
        self.agent_temperature = Some(t);
        self
    }

    /// Sets the planner temperature.
    #[must_use]
    pub const fn planner_temperature(mut self, t: f32) -> Self {
        self.planner_temperature = Some(t);
        self
    }

    /// Sets the completion token limit.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the reasoning loop iteration cap.
    #[must_use]
    pub const fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Sets the `search_documents` result count.
    #[must_use]
    pub const fn search_top_k(mut self, n: usize) -> Self {
        self.search_top_k = Some(n);
        self
    }

    /// Sets the `answer_question` context result count.
    #[must_use]
    pub const fn answer_top_k(mut self, n: usize) -> Self {
        self.answer_top_k = Some(n);
        self
    }

    /// Sets how many passages a search observation lists.
    #[must_use]
    pub const fn preview_count(mut self, n: usize) -> Self {
        self.preview_count = Some(n);
        self
    }

    /// Sets the per-passage preview length in characters.
    #[must_use]
    pub const fn preview_chars(mut self, n: usize) -> Self {
        self.preview_chars = Some(n);
        self
    }

    /// Sets the simple/complex routing threshold.
    #[must_use]
    pub const fn complexity_threshold(mut self, n: i64) -> Self {
        self.complexity_threshold = Some(n);
        self
    }

    /// Sets the prompt template directory.
    #[must_use]
    pub fn prompt_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prompt_dir = Some(dir.into());
        self
    }

    /// Adds a corpus path loaded at service start.
    #[must_use]
    pub fn corpus_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.corpus_paths.push(path.into());
        self
    }

    /// Builds the [`AgentConfig`].
    #[must_use]
    pub fn build(self) -> AgentConfig {
        let agent_model = self
            .agent_model
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        AgentConfig {
            provider: self.provider.unwrap_or_else(|| "openai".to_string()),
            api_key: self.api_key,
            base_url: self.base_url,
            planner_model: self
                .planner_model
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            synthesizer_model: self
                .synthesizer_model
                .unwrap_or_else(|| agent_model.clone()),
            agent_model,
            agent_temperature: self
                .agent_temperature
                .unwrap_or(DEFAULT_AGENT_TEMPERATURE),
            planner_temperature: self
                .planner_temperature
                .unwrap_or(DEFAULT_PLANNER_TEMPERATURE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            max_iterations: self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
            search_top_k: self.search_top_k.unwrap_or(DEFAULT_SEARCH_TOP_K),
            answer_top_k: self.answer_top_k.unwrap_or(DEFAULT_ANSWER_TOP_K),
            preview_count: self.preview_count.unwrap_or(DEFAULT_PREVIEW_COUNT),
            preview_chars: self.preview_chars.unwrap_or(DEFAULT_PREVIEW_CHARS),
            complexity_threshold: self
                .complexity_threshold
                .unwrap_or(DEFAULT_COMPLEXITY_THRESHOLD),
            prompt_dir: self.prompt_dir,
            corpus_paths: self.corpus_paths,
        }
    }
}
