//! Unified OpenAI-compatible provider.
//!
//! A single struct that handles chat completions for all OpenAI-compatible
//! APIs. Different providers are distinguished only by endpoint URL, auth
//! style, and API key. Every request carries an explicit timeout and holds
//! no shared lock while waiting on the upstream call.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use vedarx_core::config::LlmConfig;
use vedarx_core::error::GenerationError;

use crate::registry::{AuthStyle, ProviderConfig};
use crate::{GenerateParams, Provider};

pub struct OpenAiCompatibleProvider {
    /// Provider name (e.g., "gemini", "ollama").
    name: String,
    /// API key for authentication.
    api_key: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    base_url: String,
    /// Path for chat completions (e.g., "/chat/completions").
    chat_path: String,
    /// Authentication style.
    auth_style: AuthStyle,
    /// Per-request timeout in seconds.
    timeout_secs: u64,
    /// HTTP client.
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    /// Create from a known registry entry + LlmConfig.
    ///
    /// Resolution order:
    /// - API key: `config.api_key` > env vars > empty
    /// - Base URL: `config.endpoint` > env override > registry default
    pub fn from_registry(registry: &ProviderConfig, config: &LlmConfig) -> Self {
        let api_key = if !config.api_key.is_empty() {
            config.api_key.clone()
        } else {
            registry
                .env_keys
                .iter()
                .find_map(|key| std::env::var(key).ok())
                .unwrap_or_default()
        };

        let base_url = if !config.endpoint.is_empty() {
            config.endpoint.trim_end_matches('/').to_string()
        } else {
            registry
                .base_url_env
                .and_then(|env_key| {
                    let val = std::env::var(env_key).ok()?;
                    // For OLLAMA_HOST / LLAMACPP_HOST, append /v1 if not present
                    if val.ends_with("/v1") {
                        Some(val)
                    } else {
                        Some(format!("{}/v1", val.trim_end_matches('/')))
                    }
                })
                .unwrap_or_else(|| registry.base_url.to_string())
        };

        Self {
            name: registry.name.to_string(),
            api_key,
            base_url,
            chat_path: registry.chat_path.to_string(),
            auth_style: registry.auth_style,
            timeout_secs: config.timeout_secs,
            client: reqwest::Client::new(),
        }
    }

    /// Create for a custom endpoint (the part after "custom:").
    pub fn custom(endpoint: &str, config: &LlmConfig) -> Self {
        let api_key = if !config.api_key.is_empty() {
            config.api_key.clone()
        } else {
            std::env::var("CUSTOM_API_KEY").unwrap_or_default()
        };

        let auth_style = if api_key.is_empty() {
            AuthStyle::None
        } else {
            AuthStyle::Bearer
        };

        Self {
            name: "custom".to_string(),
            api_key,
            base_url: endpoint.trim_end_matches('/').to_string(),
            chat_path: "/chat/completions".to_string(),
            auth_style,
            timeout_secs: config.timeout_secs,
            client: reqwest::Client::new(),
        }
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_style {
            AuthStyle::Bearer if !self.api_key.is_empty() => {
                req.header("Authorization", format!("Bearer {}", self.api_key))
            }
            _ => req,
        }
    }
}

#[async_trait]
impl Provider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        prompt: &str,
        params: &GenerateParams,
    ) -> Result<String, GenerationError> {
        if self.auth_style != AuthStyle::None && self.api_key.is_empty() {
            return Err(GenerationError::ApiKeyMissing(self.name.clone()));
        }

        let body = json!({
            "model": params.model,
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let url = format!("{}{}", self.base_url, self.chat_path);
        tracing::debug!(provider = %self.name, %url, prompt_chars = prompt.len(), "calling generation provider");

        let req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&body);
        let req = self.apply_auth(req);

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout(self.timeout_secs)
            } else {
                GenerationError::Http(format!("{} connection failed ({url}): {e}", self.name))
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout(self.timeout_secs)
            } else {
                GenerationError::Http(e.to_string())
            }
        })?;

        match json["choices"][0]["message"]["content"].as_str() {
            Some(content) if !content.trim().is_empty() => Ok(content.to_string()),
            _ => Err(GenerationError::Unparseable {
                raw: json.to_string(),
            }),
        }
    }
}
