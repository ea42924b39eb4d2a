//! # VedaRx Providers
//!
//! Text-generation provider boundary. The orchestrator only sees the
//! [`Provider`] trait: one synchronous-looking call taking a prompt string
//! and returning raw text or a [`GenerationError`]. All OpenAI-compatible
//! APIs (OpenAI, Gemini, DeepSeek, Groq, OpenRouter, Ollama, llama.cpp)
//! are handled by a single [`OpenAiCompatibleProvider`]; they differ only
//! by endpoint URL, auth style, and API key.

pub mod openai_compatible;
pub mod registry;

pub use openai_compatible::OpenAiCompatibleProvider;

use async_trait::async_trait;
use vedarx_core::config::LlmConfig;
use vedarx_core::error::{GenerationError, Result, VedarxError};

/// Sampling parameters for a generation call.
#[derive(Debug, Clone)]
pub struct GenerateParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl From<&LlmConfig> for GenerateParams {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// A text-generation backend.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    /// Send one prompt and return the raw response text.
    async fn complete(
        &self,
        prompt: &str,
        params: &GenerateParams,
    ) -> Result<String, GenerationError>;
}

/// Create a provider from configuration.
///
/// `provider` is either a registry name (e.g. "gemini", "ollama") or a
/// custom endpoint: `"custom:https://my-server.com/v1"`.
pub fn create_provider(config: &LlmConfig) -> Result<Box<dyn Provider>> {
    let name = config.provider.as_str();

    if let Some(rest) = name.strip_prefix("custom:") {
        return Ok(Box::new(OpenAiCompatibleProvider::custom(rest, config)));
    }

    let entry = registry::get_provider_config(name).ok_or_else(|| {
        VedarxError::Config(format!(
            "unknown provider '{name}' (known: {})",
            registry::all_provider_names().join(", ")
        ))
    })?;
    Ok(Box::new(OpenAiCompatibleProvider::from_registry(
        entry, config,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_known_provider() {
        let config = LlmConfig {
            provider: "ollama".into(),
            ..Default::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_create_custom_provider() {
        let config = LlmConfig {
            provider: "custom:http://localhost:9999/v1".into(),
            ..Default::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "custom");
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let config = LlmConfig {
            provider: "oracle-bones".into(),
            ..Default::default()
        };
        assert!(matches!(
            create_provider(&config),
            Err(VedarxError::Config(_))
        ));
    }
}
