//! Shared engine context.
//!
//! Bundles the gateways, configuration and prompts the planner, agent and
//! synthesizer are built from. Constructed once by the owning service and
//! passed down explicitly; cloning is cheap.

use std::sync::Arc;

use super::config::AgentConfig;
use super::prompt::PromptSet;
use super::provider::LlmProvider;
use crate::retrieval::Retriever;

/// Dependencies shared by every query.
#[derive(Clone)]
pub struct EngineContext {
    /// Completion gateway.
    pub provider: Arc<dyn LlmProvider>,
    /// Retrieval gateway.
    pub retriever: Arc<dyn Retriever>,
    /// Engine configuration.
    pub config: Arc<AgentConfig>,
    /// System prompts.
    pub prompts: Arc<PromptSet>,
}

impl EngineContext {
    /// Creates a context, loading prompts from the configured directory.
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        retriever: Arc<dyn Retriever>,
        config: AgentConfig,
    ) -> Self {
        let prompts = PromptSet::load(config.prompt_dir.as_deref());
        Self::with_prompts(provider, retriever, config, prompts)
    }

    /// Creates a context with explicit prompts.
    #[must_use]
    pub fn with_prompts(
        provider: Arc<dyn LlmProvider>,
        retriever: Arc<dyn Retriever>,
        config: AgentConfig,
        prompts: PromptSet,
    ) -> Self {
        Self {
            provider,
            retriever,
            config: Arc::new(config),
            prompts: Arc::new(prompts),
        }
    }
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("provider", &self.provider.name())
            .field("retriever", &self.retriever.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
