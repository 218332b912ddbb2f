//! Provider registry and factory.
//!
//! Maps provider names to concrete [`LlmProvider`] implementations.

use crate::agent::config::AgentConfig;
use crate::agent::provider::LlmProvider;
use crate::agent::providers::OpenAiProvider;
use crate::error::AgentError;

/// Creates an [`LlmProvider`] based on the configured provider name.
///
/// # Supported Providers
///
/// - `"openai"` (default): OpenAI-compatible APIs via `async-openai`
///
/// # Errors
///
/// Returns [`AgentError::UnsupportedProvider`] for unknown provider names
/// and [`AgentError::ApiKeyMissing`] when no key is configured.
pub fn create_provider(config: &AgentConfig) -> Result<Box<dyn LlmProvider>, AgentError> {
    match config.provider.as_str() {
        "openai" => {
            let api_key = config.api_key.as_deref().ok_or(AgentError::ApiKeyMissing)?;
            Ok(Box::new(OpenAiProvider::new(
                api_key,
                config.base_url.as_deref(),
            )))
        }
        other => Err(AgentError::UnsupportedProvider {
            name: other.to_string(),
        }),
    }
}
