//! # VedaRx Generation Orchestrator
//!
//! Turns a patient profile plus ranked matches into a structured
//! prescription via one upstream generation call. Per request the flow is
//! build prompt → call upstream → parse, with exactly one retry when the
//! upstream failure is transient (timeout, connection, 5xx). A malformed
//! response is never retried — the same prompt would reproduce the same
//! structure — and is surfaced with the raw text attached.
//!
//! No state persists across requests; the orchestrator itself is immutable
//! and can be shared freely between concurrent tasks.

pub mod parse;
pub mod prompt;

use vedarx_core::config::PromptConfig;
use vedarx_core::error::GenerationError;
use vedarx_core::types::{GenerationMode, PatientProfile, Prescription, RankedCase};
use vedarx_providers::{GenerateParams, Provider};

use crate::prompt::PromptBuilder;

pub struct Orchestrator {
    provider: Box<dyn Provider>,
    params: GenerateParams,
    builder: PromptBuilder,
}

impl Orchestrator {
    pub fn new(provider: Box<dyn Provider>, params: GenerateParams, prompt: &PromptConfig) -> Self {
        Self {
            provider,
            params,
            builder: PromptBuilder::new(prompt),
        }
    }

    /// Generate a prescription for one request.
    ///
    /// An empty `matches` slice is valid — the prompt then carries no
    /// worked examples. A failed generation is always distinguishable from
    /// "no matches found": the latter is an empty-but-successful ranking.
    pub async fn generate(
        &self,
        profile: &PatientProfile,
        matches: &[RankedCase<'_>],
        mode: GenerationMode,
    ) -> Result<Prescription, GenerationError> {
        let prompt = self.builder.build(profile, matches, mode);

        let raw = match self.provider.complete(&prompt, &self.params).await {
            Ok(raw) => raw,
            Err(e) if e.is_transient() => {
                tracing::warn!(provider = self.provider.name(), "generation attempt failed ({e}), retrying once");
                self.provider.complete(&prompt, &self.params).await?
            }
            Err(e) => return Err(e),
        };

        let prescription = parse::parse_response(&raw);
        if prescription.is_empty_for(mode) {
            tracing::warn!(
                mode = %mode,
                raw_chars = raw.len(),
                "generation response had none of the requested sections"
            );
            return Err(GenerationError::Unparseable { raw });
        }

        tracing::debug!(
            medicines = prescription.medicines.len(),
            lifestyle = prescription.lifestyle.len(),
            diet_empty = prescription.diet.is_empty(),
            "generation complete"
        );
        Ok(prescription)
    }
}
