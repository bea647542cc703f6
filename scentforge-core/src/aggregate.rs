use crate::normalize::{percent_of, NormalizedFormula};
use serde::{Deserialize, Serialize};

/// Number of declarable allergens monitored under the 26-allergen list.
pub const MONITORED_ALLERGENS: usize = 26;
pub const PACKAGING_COST_ESTIMATE: f64 = 2.50;
pub const DILUTANT_COST_ESTIMATE: f64 = 1.50;

pub const RAW_MATERIALS_BUCKET: &str = "Raw Materials";
pub const SOLVENT_BUCKET: &str = "Solvent";
pub const PACKAGING_BUCKET: &str = "Packaging (Est)";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllergenLoad {
    pub count: usize,
    pub monitored: usize,
    /// `count` relative to the monitored list, for gauge scaling. May exceed 100.
    pub percent_of_monitored: f64,
}

pub fn allergen_load(normalized: &NormalizedFormula) -> AllergenLoad {
    let count = normalized
        .lines
        .iter()
        .filter(|l| l.ingredient.is_allergen)
        .count();
    AllergenLoad {
        count,
        monitored: MONITORED_ALLERGENS,
        percent_of_monitored: percent_of(count as f64, MONITORED_ALLERGENS as f64),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBucket {
    pub name: String,
    pub value: f64,
}

/// Normalized cost split into raw materials, solvent and estimated packaging.
pub fn cost_breakdown(normalized: &NormalizedFormula) -> Vec<CostBucket> {
    let mut material_cost = 0.0;
    let mut solvent_cost = 0.0;
    let mut packaging_cost = 0.0;

    if !normalized.is_degenerate() {
        for line in &normalized.lines {
            let cost = line.percent_of_batch * line.ingredient.cost_per_gram / 100.0;
            if line.is_solvent() {
                solvent_cost += cost;
            } else {
                material_cost += cost;
            }
        }
        packaging_cost = PACKAGING_COST_ESTIMATE;
    }

    vec![
        CostBucket { name: RAW_MATERIALS_BUCKET.to_string(), value: material_cost },
        CostBucket { name: SOLVENT_BUCKET.to_string(), value: solvent_cost },
        CostBucket { name: PACKAGING_BUCKET.to_string(), value: packaging_cost },
    ]
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchCost {
    pub materials_cost: f64,
    pub dilutant_cost: f64,
    pub packaging_cost: f64,
    pub total_cost: f64,
}

/// Cost of producing the batch as weighed: grams times price per gram, plus
/// fixed dilutant and bottle estimates.
pub fn batch_cost(normalized: &NormalizedFormula) -> BatchCost {
    if normalized.is_degenerate() {
        return BatchCost::default();
    }
    let materials_cost: f64 = normalized
        .lines
        .iter()
        .map(|l| l.ingredient.cost_per_gram * l.amount_grams)
        .sum();
    BatchCost {
        materials_cost,
        dilutant_cost: DILUTANT_COST_ESTIMATE,
        packaging_cost: PACKAGING_COST_ESTIMATE,
        total_cost: materials_cost + DILUTANT_COST_ESTIMATE + PACKAGING_COST_ESTIMATE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::CatalogSlice, normalize::normalize};
    use scentforge_schemas::{
        formula::{Formula, FormulaItem},
        ingredient::Ingredient,
    };

    fn catalog() -> CatalogSlice {
        let mut linalool = Ingredient::placeholder("linalool", "Linalool", "BASF");
        linalool.is_allergen = true;
        linalool.cost_per_gram = 0.5;
        let mut rose = Ingredient::placeholder("rose", "Rose Absolute", "Robertet");
        rose.is_allergen = true;
        rose.cost_per_gram = 4.0;
        let mut ethanol = Ingredient::placeholder("ethanol", "Ethanol", "Solvent");
        ethanol.cost_per_gram = 0.01;
        [linalool, rose, ethanol]
            .into_iter()
            .map(|i| (i.id.clone(), i))
            .collect()
    }

    #[test]
    fn allergens_are_counted_per_line() {
        let formula = Formula::new("f", "Floral")
            .with_item(FormulaItem::new("linalool", 1.0))
            .with_item(FormulaItem::new("linalool", 2.0))
            .with_item(FormulaItem::new("rose", 1.0))
            .with_item(FormulaItem::new("ethanol", 10.0));
        let load = allergen_load(&normalize(&formula, &catalog()));
        assert_eq!(load.count, 3);
        assert_eq!(load.monitored, 26);
        assert!((load.percent_of_monitored - 300.0 / 26.0).abs() < 1e-9);
    }

    #[test]
    fn cost_splits_solvent_from_materials() {
        let formula = Formula::new("f", "Floral")
            .with_item(FormulaItem::new("rose", 25.0))
            .with_item(FormulaItem::new("ethanol", 50.0))
            .with_diluent("Perfumer's Alcohol", 25.0);
        let buckets = cost_breakdown(&normalize(&formula, &catalog()));

        let names: Vec<&str> = buckets.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Raw Materials", "Solvent", "Packaging (Est)"]);
        assert_eq!(buckets[0].value, 1.0);
        assert_eq!(buckets[1].value, 0.005);
        assert_eq!(buckets[2].value, 2.5);
    }

    #[test]
    fn unknown_ingredients_cost_nothing() {
        let formula = Formula::new("f", "Floral").with_item(FormulaItem::new("mystery", 10.0));
        let buckets = cost_breakdown(&normalize(&formula, &catalog()));
        assert_eq!(buckets[0].value, 0.0);
    }

    #[test]
    fn weightless_formula_has_zero_buckets_and_cost() {
        let normalized = normalize(&Formula::untitled("f"), &catalog());
        assert!(cost_breakdown(&normalized).iter().all(|b| b.value == 0.0));
        assert_eq!(batch_cost(&normalized), BatchCost::default());
        assert_eq!(allergen_load(&normalized).count, 0);
    }

    #[test]
    fn batch_cost_uses_absolute_grams() {
        let formula = Formula::new("f", "Floral")
            .with_item(FormulaItem::new("rose", 2.0))
            .with_diluent("Perfumer's Alcohol", 98.0);
        let cost = batch_cost(&normalize(&formula, &catalog()));
        assert_eq!(cost.materials_cost, 8.0);
        assert_eq!(cost.total_cost, 12.0);
    }
}
