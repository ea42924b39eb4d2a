//! Section parsing for generation responses.
//!
//! Upstream free text drifts, so this is deliberately isolated and
//! deliberately forgiving: locate the section markers, collect bullet
//! lines and diet-table rows, and treat anything unrecognized as noise.
//! A missing marker yields an empty section, never an error — the
//! orchestrator decides whether an all-empty result is a failure.

use vedarx_core::types::{DietChart, Prescription};

const MEDICINES_MARKER: &str = "Ayurvedic Medicines";
const DIET_MARKER: &str = "Diet Recommendation";
const LIFESTYLE_MARKER: &str = "Lifestyle Recommendations";

#[derive(Clone, Copy, PartialEq)]
enum Section {
    None,
    Medicines,
    Diet,
    Lifestyle,
}

/// Parse a raw generation response into structured sections.
pub fn parse_response(raw: &str) -> Prescription {
    let mut medicines = Vec::new();
    let mut diet = DietChart::default();
    let mut lifestyle = Vec::new();
    let mut section = Section::None;

    for line in raw.lines() {
        let line = line.trim();

        if line.contains(MEDICINES_MARKER) {
            section = Section::Medicines;
            continue;
        }
        if line.contains(DIET_MARKER) {
            section = Section::Diet;
            continue;
        }
        if line.contains(LIFESTYLE_MARKER) {
            section = Section::Lifestyle;
            continue;
        }

        match section {
            Section::Medicines => {
                if let Some(item) = bullet_item(line) {
                    medicines.push(item);
                }
            }
            Section::Lifestyle => {
                if let Some(item) = bullet_item(line) {
                    lifestyle.push(item);
                }
            }
            Section::Diet => diet_row(line, &mut diet),
            Section::None => {}
        }
    }

    Prescription {
        medicines,
        diet,
        lifestyle,
        raw: raw.to_string(),
    }
}

/// Extract a bullet item. Accepts `•`, `-`, and `*` bullets; ignores
/// table borders and decoration lines.
fn bullet_item(line: &str) -> Option<String> {
    let rest = line
        .strip_prefix('\u{2022}')
        .or_else(|| line.strip_prefix("- "))
        .or_else(|| line.strip_prefix("* "))?;
    let item = rest.trim();
    if item.is_empty() || !item.chars().any(|c| c.is_alphanumeric()) {
        return None;
    }
    Some(item.to_string())
}

/// Fill a diet chart row from a `| Meal | Recommendation |` table line.
fn diet_row(line: &str, chart: &mut DietChart) {
    if !line.contains('|') {
        return;
    }
    let cells: Vec<&str> = line
        .split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    if cells.len() < 2 {
        return;
    }
    let meal = cells[0].to_lowercase();
    let text = cells[1].to_string();
    match meal.as_str() {
        "breakfast" => chart.breakfast = text,
        "lunch" => chart.lunch = text,
        "dinner" => chart.dinner = text,
        "drinks" => chart.drinks = text,
        _ => {} // header row or decoration
    }
}
