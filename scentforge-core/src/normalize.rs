//! Converts gram amounts into batch percentages and pure-active percentages.

use crate::catalog::CatalogSlice;
use scentforge_schemas::{
    formula::Formula,
    ingredient::{Ingredient, Note},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Vendor recorded on synthetic ingredients for unmatched lines.
pub const UNKNOWN_VENDOR: &str = "Unknown";

/// Name heuristic for carrier lines. Matches "Ethanol" exactly or anything
/// mentioning "solvent", ignoring case.
pub fn is_solvent_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower == "ethanol" || lower.contains("solvent")
}

/// `part` as a percentage of `whole`, or zero for an empty (or nonsensical) whole.
pub(crate) fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 && part.is_finite() {
        part * 100.0 / whole
    } else {
        0.0
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLine {
    pub ingredient: Ingredient,
    /// False when the catalog had no record and `ingredient` is synthetic.
    pub matched: bool,
    pub amount_grams: f64,
    pub dilution_percent: f64,
    pub percent_of_batch: f64,
    pub pure_active_grams: f64,
    pub percent_pure_in_product: f64,
}

impl NormalizedLine {
    pub fn is_solvent(&self) -> bool {
        is_solvent_name(&self.ingredient.name)
    }
}

/// Share of ingredient grams per note, each in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NotePyramid {
    pub top: f64,
    pub mid: f64,
    pub base: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFormula {
    pub formula_id: String,
    pub total_weight_grams: f64,
    pub diluent_percent: f64,
    pub oil_concentration_percent: f64,
    pub note_pyramid: NotePyramid,
    pub lines: Vec<NormalizedLine>,
}

impl NormalizedFormula {
    pub fn is_degenerate(&self) -> bool {
        !self.total_weight_grams.is_finite() || self.total_weight_grams <= 0.0
    }

    pub fn matched_lines(&self) -> impl Iterator<Item = &NormalizedLine> {
        self.lines.iter().filter(|l| l.matched)
    }
}

/// Normalizes every line of `formula` against the ingredients in `slice`.
///
/// Never fails: a line whose ingredient is missing from the slice is carried
/// with a neat, unrestricted placeholder so later stages see complete numbers.
pub fn normalize(formula: &Formula, slice: &CatalogSlice) -> NormalizedFormula {
    let total = formula.total_weight_grams();

    let lines: Vec<NormalizedLine> = formula
        .items
        .iter()
        .map(|item| {
            let (ingredient, matched) = match slice.get(&item.ingredient_id) {
                Some(found) => (found.clone(), true),
                None => {
                    debug!(ingredient_id = %item.ingredient_id, "no catalog match, using placeholder");
                    (
                        Ingredient::placeholder(&item.ingredient_id, &item.ingredient_id, UNKNOWN_VENDOR),
                        false,
                    )
                }
            };
            let dilution_percent = item
                .concentration_percent
                .unwrap_or(ingredient.dilution_percent);
            let pure_active_grams = item.amount_grams * dilution_percent / 100.0;

            NormalizedLine {
                matched,
                amount_grams: item.amount_grams,
                dilution_percent,
                percent_of_batch: percent_of(item.amount_grams, total),
                pure_active_grams,
                percent_pure_in_product: percent_of(pure_active_grams, total),
                ingredient,
            }
        })
        .collect();

    let ingredient_grams = formula.ingredient_grams();
    let note_grams = |note: Note| -> f64 {
        lines
            .iter()
            .filter(|l| l.ingredient.note == note)
            .map(|l| l.amount_grams)
            .sum()
    };
    let note_pyramid = NotePyramid {
        top: percent_of(note_grams(Note::Top), ingredient_grams),
        mid: percent_of(note_grams(Note::Mid), ingredient_grams),
        base: percent_of(note_grams(Note::Base), ingredient_grams),
    };

    NormalizedFormula {
        formula_id: formula.id.clone(),
        total_weight_grams: total,
        diluent_percent: percent_of(formula.diluent_amount_grams, total),
        oil_concentration_percent: percent_of(ingredient_grams, total),
        note_pyramid,
        lines,
    }
}
