//! Projected scent intensity over time.
//!
//! Each non-solvent line fades independently as `percent_of_batch * e^(-k t)`
//! with `k` chosen by the line's note. There are no interaction terms.

use crate::normalize::{round_to, NormalizedFormula};
use serde::{Deserialize, Serialize};

pub const CANONICAL_OFFSETS_HOURS: [f64; 6] = [0.0, 1.0, 2.0, 4.0, 6.0, 8.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityPoint {
    pub hour: f64,
    pub intensity: f64,
}

pub fn simulate_decay(normalized: &NormalizedFormula) -> Vec<IntensityPoint> {
    simulate_decay_at(normalized, &CANONICAL_OFFSETS_HOURS)
}

/// Aggregate intensity at each offset, rounded to one decimal place.
///
/// Returns an empty timeline when there is nothing to project (no lines or
/// zero batch weight).
pub fn simulate_decay_at(normalized: &NormalizedFormula, offsets_hours: &[f64]) -> Vec<IntensityPoint> {
    if normalized.lines.is_empty() || normalized.is_degenerate() {
        return Vec::new();
    }

    offsets_hours
        .iter()
        .map(|&hour| {
            let intensity: f64 = normalized
                .lines
                .iter()
                .filter(|line| !line.is_solvent())
                .map(|line| line.percent_of_batch * (-line.ingredient.note.decay_rate() * hour).exp())
                .sum();
            IntensityPoint {
                hour,
                intensity: round_to(intensity, 1),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::CatalogSlice, normalize::normalize};
    use scentforge_schemas::{
        formula::{Formula, FormulaItem},
        ingredient::{Ingredient, Note},
    };

    fn catalog() -> CatalogSlice {
        let mut calone = Ingredient::placeholder("calone", "Calone 1951", "Perfumer's Apprentice");
        calone.note = Note::Top;
        let mut vetiver = Ingredient::placeholder("vetiver", "Vetiver Haiti", "IFF");
        vetiver.note = Note::Base;
        let hedione = Ingredient::placeholder("hedione", "Hedione HC", "Firmenich");
        let ethanol = Ingredient::placeholder("ethanol", "Ethanol", "Solvent");
        [calone, vetiver, hedione, ethanol]
            .into_iter()
            .map(|i| (i.id.clone(), i))
            .collect()
    }

    #[test]
    fn single_top_note_follows_exponential() {
        let formula = Formula::new("f", "Marine").with_item(FormulaItem::new("calone", 100.0));
        let timeline = simulate_decay(&normalize(&formula, &catalog()));

        let values: Vec<f64> = timeline.iter().map(|p| p.intensity).collect();
        assert_eq!(values, vec![100.0, 44.9, 20.2, 4.1, 0.8, 0.2]);
        let hours: Vec<f64> = timeline.iter().map(|p| p.hour).collect();
        assert_eq!(hours, CANONICAL_OFFSETS_HOURS.to_vec());
    }

    #[test]
    fn single_mid_note_follows_exponential() {
        let formula = Formula::new("f", "Floral").with_item(FormulaItem::new("hedione", 100.0));
        let timeline = simulate_decay(&normalize(&formula, &catalog()));

        let values: Vec<f64> = timeline.iter().map(|p| p.intensity).collect();
        assert_eq!(values, vec![100.0, 67.0, 44.9, 20.2, 9.1, 4.1]);
    }

    #[test]
    fn solvent_lines_contribute_nothing() {
        let formula = Formula::new("f", "Marine")
            .with_item(FormulaItem::new("vetiver", 20.0))
            .with_item(FormulaItem::new("ethanol", 80.0));
        let timeline = simulate_decay_at(&normalize(&formula, &catalog()), &[0.0]);
        assert_eq!(timeline[0].intensity, 20.0);
    }

    #[test]
    fn diluent_dilutes_intensity() {
        let formula = Formula::new("f", "Marine")
            .with_item(FormulaItem::new("vetiver", 25.0))
            .with_diluent("Perfumer's Alcohol", 75.0);
        let timeline = simulate_decay_at(&normalize(&formula, &catalog()), &[0.0, 8.0]);
        assert_eq!(timeline[0].intensity, 25.0);
        assert_eq!(timeline[1].intensity, 11.2);
    }

    #[test]
    fn empty_or_weightless_formula_projects_nothing() {
        let empty = Formula::untitled("f");
        assert!(simulate_decay(&normalize(&empty, &catalog())).is_empty());

        let weightless = Formula::untitled("f").with_item(FormulaItem::new("calone", 0.0));
        assert!(simulate_decay(&normalize(&weightless, &catalog())).is_empty());
    }
}
