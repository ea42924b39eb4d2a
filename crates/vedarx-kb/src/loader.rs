//! CSV parsing for the case dataset.
//!
//! Required columns: `Constitution`, `Disease`, `Symptoms`,
//! `Ayurvedic_Herbs`, `Diet_Recommendations`, `Lifestyle_Recommendations`.
//! `Formulation` is optional and is folded into the herbs field.
//!
//! A missing column is fatal; a row with empty required cells is skipped
//! and counted. Symptom text is normalized once here so ranking never
//! re-parses it per request.

use std::io::Read;

use csv::ReaderBuilder;
use vedarx_core::error::DataLoadError;
use vedarx_core::types::CaseRecord;

const COL_CONSTITUTION: &str = "Constitution";
const COL_DISEASE: &str = "Disease";
const COL_SYMPTOMS: &str = "Symptoms";
const COL_HERBS: &str = "Ayurvedic_Herbs";
const COL_FORMULATION: &str = "Formulation";
const COL_DIET: &str = "Diet_Recommendations";
const COL_LIFESTYLE: &str = "Lifestyle_Recommendations";

/// Resolved positions of the dataset columns.
struct ColumnMap {
    constitution: usize,
    disease: usize,
    symptoms: usize,
    herbs: usize,
    formulation: Option<usize>,
    diet: usize,
    lifestyle: usize,
}

impl ColumnMap {
    fn resolve(headers: &[String]) -> Result<Self, DataLoadError> {
        let find = |name: &'static str| -> Result<usize, DataLoadError> {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or(DataLoadError::MissingColumn(name))
        };
        Ok(Self {
            constitution: find(COL_CONSTITUTION)?,
            disease: find(COL_DISEASE)?,
            symptoms: find(COL_SYMPTOMS)?,
            herbs: find(COL_HERBS)?,
            formulation: headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(COL_FORMULATION)),
            diet: find(COL_DIET)?,
            lifestyle: find(COL_LIFESTYLE)?,
        })
    }
}

/// Parse the dataset into records plus a skipped-row count.
pub fn parse_csv<R: Read>(reader: R) -> Result<(Vec<CaseRecord>, usize), DataLoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| DataLoadError::Malformed(format!("failed to read headers: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let columns = ColumnMap::resolve(&headers)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (index, result) in rdr.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::debug!(row = index, "skipping unreadable row: {e}");
                skipped += 1;
                continue;
            }
        };

        let cell = |idx: usize| row.get(idx).unwrap_or("").trim();

        let constitution = cell(columns.constitution);
        let disease = cell(columns.disease);
        let symptoms = cell(columns.symptoms);

        // Matching fields are required; outcome fields may be sparse.
        if constitution.is_empty() || disease.is_empty() || symptoms.is_empty() {
            skipped += 1;
            continue;
        }

        let mut herbs = cell(columns.herbs).to_string();
        if let Some(idx) = columns.formulation {
            let formulation = cell(idx);
            if !formulation.is_empty() {
                if herbs.is_empty() {
                    herbs = formulation.to_string();
                } else {
                    herbs = format!("{herbs}; {formulation}");
                }
            }
        }

        records.push(CaseRecord {
            index,
            constitution: constitution.to_string(),
            disease: disease.to_string(),
            symptoms: symptoms.to_string(),
            symptom_tokens: normalize_symptoms(symptoms),
            herbs,
            diet: cell(columns.diet).to_string(),
            lifestyle: cell(columns.lifestyle).to_string(),
        });
    }

    Ok((records, skipped))
}

/// Case-fold, split on `,`/`;`, and trim symptom text into match tokens.
pub fn normalize_symptoms(raw: &str) -> Vec<String> {
    raw.split(|c| c == ',' || c == ';')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symptoms() {
        assert_eq!(
            normalize_symptoms("Acidity, Burning Sensation; BLOATING"),
            vec!["acidity", "burning sensation", "bloating"]
        );
        assert_eq!(normalize_symptoms("  ,; "), Vec::<String>::new());
        assert_eq!(normalize_symptoms(""), Vec::<String>::new());
    }

    #[test]
    fn test_header_match_is_case_insensitive() {
        let csv = "constitution,DISEASE,symptoms,ayurvedic_herbs,diet_recommendations,lifestyle_recommendations\n\
                   Pitta,Hyperacidity,acidity,Amla,Cooling foods,Rest\n";
        let (records, skipped) = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(skipped, 0);
        assert_eq!(records[0].disease, "Hyperacidity");
    }

    #[test]
    fn test_formulation_column_is_optional() {
        let csv = "Constitution,Disease,Symptoms,Ayurvedic_Herbs,Diet_Recommendations,Lifestyle_Recommendations\n\
                   Pitta,Hyperacidity,acidity,Amla,Cooling foods,Rest\n";
        let (records, _) = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(records[0].herbs, "Amla");
    }

    #[test]
    fn test_short_rows_do_not_panic() {
        // flexible(true) lets short rows through; empty required cells
        // then cause a skip rather than an error.
        let csv = "Constitution,Disease,Symptoms,Ayurvedic_Herbs,Diet_Recommendations,Lifestyle_Recommendations\n\
                   Pitta,Hyperacidity\n\
                   Vata,Insomnia,restlessness,Ashwagandha,Warm milk,Sleep early\n";
        let (records, skipped) = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(skipped, 1);
        assert_eq!(records[0].index, 1);
    }
}
