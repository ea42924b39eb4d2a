//! Prompt assembly.
//!
//! One textual prompt per request: the patient profile verbatim, a bounded
//! number of ranked matches as worked examples, and an explicit instruction
//! describing the output structure the parser expects. The profile and the
//! instruction are never truncated; when the character budget runs out,
//! match examples are dropped lowest-ranked first.

use std::fmt::Write;

use vedarx_core::config::PromptConfig;
use vedarx_core::types::{GenerationMode, PatientProfile, RankedCase};

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    max_cases: usize,
    max_chars: usize,
}

impl PromptBuilder {
    pub fn new(config: &PromptConfig) -> Self {
        Self {
            max_cases: config.max_cases,
            max_chars: config.max_chars,
        }
    }

    /// Build the full prompt for one request.
    pub fn build(
        &self,
        profile: &PatientProfile,
        matches: &[RankedCase<'_>],
        mode: GenerationMode,
    ) -> String {
        let patient = patient_section(profile);
        let instruction = instruction_section(mode);

        // Fixed parts always fit; the budget constrains only the examples.
        let fixed_len = patient.len() + instruction.len();
        let mut cases = String::from("SIMILAR SUCCESSFUL CASES:\n");
        let mut included = 0usize;

        for (i, m) in matches.iter().take(self.max_cases).enumerate() {
            let block = case_block(i + 1, m);
            if fixed_len + cases.len() + block.len() > self.max_chars {
                tracing::debug!(
                    included,
                    dropped = matches.len().min(self.max_cases) - included,
                    "prompt budget reached, dropping lowest-ranked examples"
                );
                break;
            }
            cases.push_str(&block);
            included += 1;
        }

        if included == 0 {
            cases.push_str("(no similar cases found in the knowledge base)\n");
        }

        format!("{patient}\n{cases}\n{instruction}")
    }
}

fn patient_section(profile: &PatientProfile) -> String {
    format!(
        "You are an expert Ayurvedic doctor. Based on the patient information and \
         similar successful cases, create a recommendation.\n\n\
         PATIENT: {}, {} years, {}\n\
         CONSTITUTION: {}\n\
         SYMPTOMS: {}\n\
         DIAGNOSIS: {}\n",
        profile.name,
        profile.age,
        profile.gender,
        profile.constitution,
        profile.symptoms.join(", "),
        profile.diagnosis,
    )
}

fn case_block(number: usize, m: &RankedCase<'_>) -> String {
    let r = m.record;
    let mut block = String::new();
    let _ = writeln!(block, "\nCase {number}: {}", r.disease);
    let _ = writeln!(block, "- Constitution: {}", r.constitution);
    let _ = writeln!(block, "- Symptoms: {}", r.symptoms);
    let _ = writeln!(block, "- Herbs used: {}", r.herbs);
    let _ = writeln!(block, "- Diet advice: {}", r.diet);
    let _ = writeln!(block, "- Lifestyle advice: {}", r.lifestyle);
    block
}

/// The output-structure instruction. Section numbering stays stable across
/// modes so the parser's markers never change.
fn instruction_section(mode: GenerationMode) -> String {
    let mut sections = String::new();

    if mode.wants_medicines() {
        sections.push_str(
            "1. Ayurvedic Medicines:\n\
             \u{2022} [Medicine 1]: [dosage and timing]\n\
             \u{2022} [Medicine 2]: [dosage and timing]\n\
             \u{2022} [Medicine 3]: [dosage and timing]\n\n",
        );
    }
    if mode.wants_diet() {
        sections.push_str(
            "2. Diet Recommendation:\n\
             | Meal      | Recommendation |\n\
             | Breakfast | [specific breakfast recommendation] |\n\
             | Lunch     | [specific lunch recommendation] |\n\
             | Dinner    | [specific dinner recommendation] |\n\
             | Drinks    | [recommended beverages] |\n\n",
        );
    }
    if mode.wants_lifestyle() {
        sections.push_str(
            "3. Lifestyle Recommendations:\n\
             \u{2022} [specific practice with duration]\n\
             \u{2022} [specific practice with timing]\n\
             \u{2022} [specific dietary restriction]\n\n",
        );
    }

    format!(
        "Generate the output following EXACTLY this structure and format:\n\n\
         {sections}\
         Requirements:\n\
         - Use authentic Ayurvedic medicines appropriate for the constitution and symptoms\n\
         - Keep recommendations practical and specific, with precise dosages and timings\n\
         - Keep the exact formatting with bullet points (\u{2022}) and the table structure\n\
         - Output ONLY the sections listed above\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use vedarx_core::types::CaseRecord;

    fn profile() -> PatientProfile {
        PatientProfile {
            name: "Asha".into(),
            age: 34,
            gender: "female".into(),
            constitution: "Pitta".into(),
            diagnosis: "Hyperacidity".into(),
            symptoms: vec!["acidity".into(), "burning".into()],
        }
    }

    fn record(index: usize, herbs_len: usize) -> CaseRecord {
        CaseRecord {
            index,
            constitution: "Pitta".into(),
            disease: format!("Disease {index}"),
            symptoms: "acidity".into(),
            symptom_tokens: vec!["acidity".into()],
            herbs: "h".repeat(herbs_len),
            diet: "Cooling foods".into(),
            lifestyle: "Early nights".into(),
        }
    }

    #[test]
    fn test_patient_fields_always_present() {
        let builder = PromptBuilder::new(&PromptConfig::default());
        let prompt = builder.build(&profile(), &[], GenerationMode::Full);
        assert!(prompt.contains("PATIENT: Asha, 34 years, female"));
        assert!(prompt.contains("CONSTITUTION: Pitta"));
        assert!(prompt.contains("SYMPTOMS: acidity, burning"));
        assert!(prompt.contains("no similar cases found"));
    }

    #[test]
    fn test_mode_selects_instruction_sections() {
        let builder = PromptBuilder::new(&PromptConfig::default());

        let full = builder.build(&profile(), &[], GenerationMode::Full);
        assert!(full.contains("1. Ayurvedic Medicines:"));
        assert!(full.contains("2. Diet Recommendation:"));
        assert!(full.contains("3. Lifestyle Recommendations:"));

        let diet = builder.build(&profile(), &[], GenerationMode::Diet);
        assert!(!diet.contains("1. Ayurvedic Medicines:"));
        assert!(diet.contains("2. Diet Recommendation:"));
        assert!(!diet.contains("3. Lifestyle Recommendations:"));
    }

    #[test]
    fn test_cases_bounded_by_max_cases() {
        let records: Vec<CaseRecord> = (0..5).map(|i| record(i, 10)).collect();
        let matches: Vec<RankedCase<'_>> = records
            .iter()
            .map(|r| RankedCase { record: r, score: 10 })
            .collect();

        let builder = PromptBuilder::new(&PromptConfig {
            max_cases: 2,
            max_chars: 100_000,
        });
        let prompt = builder.build(&profile(), &matches, GenerationMode::Full);
        assert!(prompt.contains("Case 1:"));
        assert!(prompt.contains("Case 2:"));
        assert!(!prompt.contains("Case 3:"));
    }

    #[test]
    fn test_budget_drops_lowest_ranked_first() {
        // First record small, second enormous: the second must be the one
        // dropped, and the patient section must survive untouched.
        let small = record(0, 10);
        let huge = record(1, 50_000);
        let records = vec![small, huge];
        let matches: Vec<RankedCase<'_>> = records
            .iter()
            .map(|r| RankedCase { record: r, score: 10 })
            .collect();

        let builder = PromptBuilder::new(&PromptConfig {
            max_cases: 3,
            max_chars: 3000,
        });
        let prompt = builder.build(&profile(), &matches, GenerationMode::Full);
        assert!(prompt.contains("Case 1: Disease 0"));
        assert!(!prompt.contains("Disease 1"));
        assert!(prompt.contains("PATIENT: Asha"));
        assert!(prompt.len() <= 3000 + 200); // fixed parts are small
    }
}
