//! Domain types shared across the VedaRx crates.

use serde::{Deserialize, Serialize};

/// One immutable case entry in the knowledge base.
///
/// Created once at load time; identity is the original row index (the
/// dataset has no natural primary key). `symptom_tokens` is the normalized
/// form of `symptoms`, computed once by the loader so ranking never
/// re-parses text per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Original row index in the dataset.
    pub index: usize,
    /// Constitution (dosha) tag, e.g. "Pitta".
    pub constitution: String,
    /// Disease / diagnosis label.
    pub disease: String,
    /// Raw symptom text as it appeared in the dataset.
    pub symptoms: String,
    /// Case-folded, delimiter-split, trimmed symptom tokens.
    #[serde(default, skip_serializing)]
    pub symptom_tokens: Vec<String>,
    /// Herbs and formulations that were prescribed.
    pub herbs: String,
    /// Diet recommendations from the case.
    pub diet: String,
    /// Lifestyle recommendations from the case.
    pub lifestyle: String,
}

/// Per-request query describing the patient to match against the
/// knowledge base.
///
/// `name`, `age`, and `gender` are descriptive: they appear in the
/// generation prompt but never participate in ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientProfile {
    pub name: String,
    pub age: u32,
    pub gender: String,
    /// Constitution (dosha) tag — categorical ranking signal.
    pub constitution: String,
    /// Doctor's diagnosis — ranking signal.
    pub diagnosis: String,
    /// Symptom phrases — cumulative ranking signal.
    pub symptoms: Vec<String>,
}

/// A `(record, score)` pair produced by the ranking engine.
///
/// Ordering is descending by score with ties broken by original record
/// order, so results are deterministic.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCase<'a> {
    pub record: &'a CaseRecord,
    pub score: u32,
}

/// Which prescription sections a generation request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Medicines, diet chart, and lifestyle.
    Full,
    /// Medicines and lifestyle only.
    Medication,
    /// Diet chart only.
    Diet,
}

impl GenerationMode {
    pub fn wants_medicines(self) -> bool {
        matches!(self, Self::Full | Self::Medication)
    }

    pub fn wants_diet(self) -> bool {
        matches!(self, Self::Full | Self::Diet)
    }

    pub fn wants_lifestyle(self) -> bool {
        matches!(self, Self::Full | Self::Medication)
    }
}

impl std::str::FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "medication" => Ok(Self::Medication),
            "diet" => Ok(Self::Diet),
            other => Err(format!(
                "unknown mode '{other}' (expected full, medication, or diet)"
            )),
        }
    }
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Full => "full",
            Self::Medication => "medication",
            Self::Diet => "diet",
        };
        f.write_str(s)
    }
}

/// Per-meal rows of the diet section, parsed out of the response's table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietChart {
    #[serde(default)]
    pub breakfast: String,
    #[serde(default)]
    pub lunch: String,
    #[serde(default)]
    pub dinner: String,
    #[serde(default)]
    pub drinks: String,
}

impl DietChart {
    pub fn is_empty(&self) -> bool {
        self.breakfast.is_empty()
            && self.lunch.is_empty()
            && self.dinner.is_empty()
            && self.drinks.is_empty()
    }
}

/// Structured output parsed from the raw generation response.
///
/// A section the upstream text omitted is empty, not an error — partial
/// results are preferred to total failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Prescription {
    pub medicines: Vec<String>,
    pub diet: DietChart,
    pub lifestyle: Vec<String>,
    /// Raw response text, kept for display and diagnostics.
    pub raw: String,
}

impl Prescription {
    /// True when every section the given mode requested came back empty.
    pub fn is_empty_for(&self, mode: GenerationMode) -> bool {
        let medicines_empty = !mode.wants_medicines() || self.medicines.is_empty();
        let diet_empty = !mode.wants_diet() || self.diet.is_empty();
        let lifestyle_empty = !mode.wants_lifestyle() || self.lifestyle.is_empty();
        medicines_empty && diet_empty && lifestyle_empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_round_trip() {
        for s in ["full", "medication", "diet"] {
            let mode: GenerationMode = s.parse().unwrap();
            assert_eq!(mode.to_string(), s);
        }
        assert!("prescription".parse::<GenerationMode>().is_err());
    }

    #[test]
    fn test_mode_section_selection() {
        assert!(GenerationMode::Full.wants_diet());
        assert!(!GenerationMode::Medication.wants_diet());
        assert!(GenerationMode::Medication.wants_lifestyle());
        assert!(!GenerationMode::Diet.wants_medicines());
    }

    #[test]
    fn test_empty_for_mode() {
        let p = Prescription {
            medicines: vec!["Triphala Churna".into()],
            ..Default::default()
        };
        // Medicines present satisfies full and medication modes.
        assert!(!p.is_empty_for(GenerationMode::Full));
        assert!(!p.is_empty_for(GenerationMode::Medication));
        // Diet-only mode ignores the medicines section.
        assert!(p.is_empty_for(GenerationMode::Diet));
    }
}
