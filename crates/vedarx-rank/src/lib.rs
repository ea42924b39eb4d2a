//! # VedaRx Ranking Engine
//!
//! Scores every case record against a patient profile by weighted field
//! overlap and returns the top-K matches. Pure and deterministic: no I/O,
//! no hidden state, stable order on ties.
//!
//! Per record the score is the sum of:
//! - constitution match → `constitution_weight` (categorical, no partial
//!   credit),
//! - diagnosis match → `diagnosis_weight` (substring-tolerant in both
//!   directions),
//! - each matching query symptom → `symptom_weight` (cumulative).
//!
//! Zero-score records stay eligible and rank last — the engine returns
//! best-effort matches even on weak queries. Complexity is
//! O(records × query_symptoms), which is fine at hundreds of records; an
//! inverted index is an explicit non-goal at this scale.

use vedarx_core::config::{MatchMode, ScoringPolicy};
use vedarx_core::types::{CaseRecord, PatientProfile, RankedCase};

/// The ranking engine. Construction is cheap; one instance can serve any
/// number of concurrent requests since `rank` takes everything by
/// reference.
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    policy: ScoringPolicy,
}

impl Ranker {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Rank `records` against `query`, returning at most `top_k` matches
    /// in descending score order. Ties preserve original record order.
    pub fn rank<'a>(
        &self,
        records: &'a [CaseRecord],
        query: &PatientProfile,
        top_k: usize,
    ) -> Vec<RankedCase<'a>> {
        let mut scored: Vec<RankedCase<'a>> = records
            .iter()
            .map(|record| RankedCase {
                record,
                score: self.score(record, query),
            })
            .collect();

        // sort_by is stable, so equal scores keep dataset order.
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(top_k);
        scored
    }

    /// Score a single record against the query. Empty query fields
    /// contribute zero without special-casing.
    pub fn score(&self, record: &CaseRecord, query: &PatientProfile) -> u32 {
        let mut score = 0;

        if field_matches(
            self.policy.constitution_match,
            &query.constitution,
            &record.constitution,
        ) {
            score += self.policy.constitution_weight;
        }

        if field_matches(self.policy.diagnosis_match, &query.diagnosis, &record.disease) {
            score += self.policy.diagnosis_weight;
        }

        for symptom in &query.symptoms {
            let q = symptom.trim().to_lowercase();
            if q.is_empty() {
                continue;
            }
            let hit = record
                .symptom_tokens
                .iter()
                .any(|token| token_matches(self.policy.symptom_match, &q, token));
            if hit {
                score += self.policy.symptom_weight;
            }
        }

        score
    }
}

fn field_matches(mode: MatchMode, query: &str, target: &str) -> bool {
    let q = query.trim().to_lowercase();
    let t = target.trim().to_lowercase();
    if q.is_empty() || t.is_empty() {
        return false;
    }
    match mode {
        MatchMode::Exact => q == t,
        MatchMode::Substring => t.contains(&q) || q.contains(&t),
    }
}

/// Tokens are already normalized by the loader, so only the query side
/// needs folding (done by the caller).
fn token_matches(mode: MatchMode, query: &str, token: &str) -> bool {
    match mode {
        MatchMode::Exact => query == token,
        MatchMode::Substring => token.contains(query) || query.contains(token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, constitution: &str, disease: &str, symptoms: &[&str]) -> CaseRecord {
        CaseRecord {
            index,
            constitution: constitution.into(),
            disease: disease.into(),
            symptoms: symptoms.join(", "),
            symptom_tokens: symptoms.iter().map(|s| s.to_lowercase()).collect(),
            herbs: String::new(),
            diet: String::new(),
            lifestyle: String::new(),
        }
    }

    fn query(constitution: &str, diagnosis: &str, symptoms: &[&str]) -> PatientProfile {
        PatientProfile {
            name: "Test".into(),
            age: 40,
            gender: "F".into(),
            constitution: constitution.into(),
            diagnosis: diagnosis.into(),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_reference_scenario() {
        // Knowledge base of 3 records from the design review:
        // expected scores 21 / 13 / 8 for a (Pitta, Hyperacidity, acidity)
        // query, so ranking is record 0, record 2, record 1.
        let records = vec![
            record(0, "Pitta", "Hyperacidity", &["acidity", "burning"]),
            record(1, "Vata", "Hyperacidity", &["bloating"]),
            record(2, "Pitta", "Migraine", &["acidity"]),
        ];
        let q = query("Pitta", "Hyperacidity", &["acidity"]);

        let ranked = Ranker::default().rank(&records, &q, 5);
        let scores: Vec<(usize, u32)> = ranked.iter().map(|m| (m.record.index, m.score)).collect();
        assert_eq!(scores, vec![(0, 21), (2, 13), (1, 8)]);
    }

    #[test]
    fn test_weight_additivity() {
        let r = record(0, "Pitta", "Hyperacidity", &["acidity", "burning", "nausea"]);
        let ranker = Ranker::default();

        // Constitution alone scores exactly the constitution weight.
        assert_eq!(ranker.score(&r, &query("Pitta", "", &[])), 10);
        // Constitution + diagnosis + 2 symptoms = 10 + 8 + 3 + 3.
        assert_eq!(
            ranker.score(&r, &query("Pitta", "Hyperacidity", &["acidity", "burning"])),
            24
        );
    }

    #[test]
    fn test_constitution_is_exact_not_fuzzy() {
        let r = record(0, "Pitta-Kapha", "X", &[]);
        let ranker = Ranker::default();
        // "Pitta" is a substring of "Pitta-Kapha" but constitution is
        // categorical: no partial credit under the default exact mode.
        assert_eq!(ranker.score(&r, &query("Pitta", "", &[])), 0);
        assert_eq!(ranker.score(&r, &query("pitta-kapha", "", &[])), 10);
    }

    #[test]
    fn test_diagnosis_substring_both_directions() {
        let ranker = Ranker::default();
        let r = record(0, "X", "Chronic Hyperacidity", &[]);
        assert_eq!(ranker.score(&r, &query("", "hyperacidity", &[])), 8);

        let r2 = record(0, "X", "Migraine", &[]);
        assert_eq!(ranker.score(&r2, &query("", "migraine with aura", &[])), 8);
    }

    #[test]
    fn test_symptom_counts_once_per_query_symptom() {
        // One query symptom matching several record tokens still scores 3.
        let r = record(0, "X", "Y", &["acidity", "acid reflux"]);
        let ranker = Ranker::default();
        assert_eq!(ranker.score(&r, &query("", "", &["acid"])), 3);
    }

    #[test]
    fn test_empty_records_yield_empty_result() {
        let ranked = Ranker::default().rank(&[], &query("Pitta", "Hyperacidity", &["acidity"]), 5);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_empty_query_degrades_to_constitution_only() {
        let records = vec![
            record(0, "Vata", "A", &["x"]),
            record(1, "Pitta", "B", &["y"]),
            record(2, "Pitta", "C", &["z"]),
        ];
        let ranked = Ranker::default().rank(&records, &query("Pitta", "", &[]), 5);
        assert_eq!(ranked[0].record.index, 1);
        assert_eq!(ranked[0].score, 10);
        assert_eq!(ranked[1].record.index, 2);
        // Zero-score record ranks last but is still returned.
        assert_eq!(ranked[2].record.index, 0);
        assert_eq!(ranked[2].score, 0);
    }

    #[test]
    fn test_ties_preserve_dataset_order() {
        let records: Vec<CaseRecord> = (0..4)
            .map(|i| record(i, "Pitta", "Same", &["same"]))
            .collect();
        let ranked = Ranker::default().rank(&records, &query("Pitta", "Same", &["same"]), 4);
        let indices: Vec<usize> = ranked.iter().map(|m| m.record.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_top_k_truncates() {
        let records: Vec<CaseRecord> = (0..10).map(|i| record(i, "Pitta", "X", &[])).collect();
        let ranked = Ranker::default().rank(&records, &query("Pitta", "", &[]), 3);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_custom_policy_weights() {
        let policy = ScoringPolicy {
            constitution_weight: 1,
            diagnosis_weight: 100,
            symptom_weight: 2,
            ..Default::default()
        };
        let ranker = Ranker::new(policy);
        let r = record(0, "Pitta", "Hyperacidity", &["acidity"]);
        assert_eq!(
            ranker.score(&r, &query("Pitta", "Hyperacidity", &["acidity"])),
            103
        );
    }
}
