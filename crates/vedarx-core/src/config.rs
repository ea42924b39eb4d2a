//! VedaRx configuration system.
//!
//! TOML file with per-field defaults so a partial (or absent) config still
//! yields a working setup. Scoring weights live here rather than as
//! constants in the ranker: the 10/8/3 defaults are empirical, and keeping
//! them in config makes the policy tunable without touching the engine.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, VedarxError};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VedarxConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub ranking: ScoringPolicy,
    #[serde(default)]
    pub prompt: PromptConfig,
}

impl VedarxConfig {
    /// Load config from a path, falling back to defaults if the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| VedarxError::Config(format!("failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| VedarxError::Config(format!("failed to parse config: {e}")))?;
        Ok(config)
    }
}

/// Generation provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name (e.g. "gemini", "openai", "ollama", "custom:<url>").
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Model identifier sent to the provider.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key; falls back to the provider's env vars when empty.
    #[serde(default)]
    pub api_key: String,
    /// Endpoint override; falls back to the provider registry when empty.
    #[serde(default)]
    pub endpoint: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Upstream call timeout. The generation call is the only operation
    /// that blocks meaningfully, so it always carries an explicit timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: String::new(),
            endpoint: String::new(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Knowledge base configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Path to the case dataset CSV.
    #[serde(default = "default_dataset")]
    pub dataset: String,
}

fn default_dataset() -> String {
    "./AyurGenixAI_Dataset.csv".into()
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
        }
    }
}

/// How a query field is compared against a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Case-insensitive equality.
    Exact,
    /// Case-insensitive containment, either direction.
    Substring,
}

/// Named scoring weights and matching modes for the ranking engine.
///
/// Constitution is categorical (exact by default, no partial credit).
/// Diagnosis is substring-tolerant in both directions because clinical
/// free text varies in specificity. Symptom evidence is cumulative: each
/// matching query symptom adds `symptom_weight`, so a rich symptom list
/// can outweigh a single categorical mismatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringPolicy {
    #[serde(default = "default_constitution_weight")]
    pub constitution_weight: u32,
    #[serde(default = "default_diagnosis_weight")]
    pub diagnosis_weight: u32,
    #[serde(default = "default_symptom_weight")]
    pub symptom_weight: u32,
    #[serde(default = "default_constitution_match")]
    pub constitution_match: MatchMode,
    #[serde(default = "default_diagnosis_match")]
    pub diagnosis_match: MatchMode,
    #[serde(default = "default_symptom_match")]
    pub symptom_match: MatchMode,
    /// How many matches `rank` returns by default.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_constitution_weight() -> u32 {
    10
}
fn default_diagnosis_weight() -> u32 {
    8
}
fn default_symptom_weight() -> u32 {
    3
}
fn default_constitution_match() -> MatchMode {
    MatchMode::Exact
}
fn default_diagnosis_match() -> MatchMode {
    MatchMode::Substring
}
fn default_symptom_match() -> MatchMode {
    MatchMode::Substring
}
fn default_top_k() -> usize {
    5
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            constitution_weight: default_constitution_weight(),
            diagnosis_weight: default_diagnosis_weight(),
            symptom_weight: default_symptom_weight(),
            constitution_match: default_constitution_match(),
            diagnosis_match: default_diagnosis_match(),
            symptom_match: default_symptom_match(),
            top_k: default_top_k(),
        }
    }
}

/// Prompt assembly configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Upper bound on worked examples included in the prompt.
    #[serde(default = "default_max_cases")]
    pub max_cases: usize,
    /// Character budget for the whole prompt. Match examples are dropped
    /// lowest-ranked-first when the budget would be exceeded; the patient
    /// profile itself is never truncated.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_max_cases() -> usize {
    3
}
fn default_max_chars() -> usize {
    6000
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            max_cases: default_max_cases(),
            max_chars: default_max_chars(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VedarxConfig::default();
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.ranking.constitution_weight, 10);
        assert_eq!(config.ranking.diagnosis_weight, 8);
        assert_eq!(config.ranking.symptom_weight, 3);
        assert_eq!(config.ranking.constitution_match, MatchMode::Exact);
        assert_eq!(config.prompt.max_cases, 3);
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            [llm]
            provider = "ollama"
            model = "llama3.2"
            timeout_secs = 10

            [ranking]
            constitution_weight = 20
            symptom_match = "exact"
        "#;

        let config: VedarxConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.llm.model, "llama3.2");
        assert_eq!(config.llm.timeout_secs, 10);
        assert_eq!(config.ranking.constitution_weight, 20);
        assert_eq!(config.ranking.symptom_match, MatchMode::Exact);
        // Untouched fields keep their defaults.
        assert_eq!(config.ranking.diagnosis_weight, 8);
        assert_eq!(config.knowledge.dataset, "./AyurGenixAI_Dataset.csv");
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let config: VedarxConfig = toml::from_str("").unwrap();
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.ranking.top_k, 5);
    }
}
