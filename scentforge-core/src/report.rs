use crate::{
    aggregate::{allergen_load, batch_cost, cost_breakdown, AllergenLoad, BatchCost, CostBucket},
    catalog::{resolve_slice, validate_formula, IngredientCatalog},
    compliance::{check_compliance, compliance_table, ComplianceTable},
    decay::{simulate_decay, IntensityPoint},
    error::ScentforgeError,
    normalize::{normalize, NormalizedFormula},
};
use chrono::{DateTime, Utc};
use scentforge_schemas::{category::IfraCategory, formula::Formula, request::ComplianceReport};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Everything the workbench shows for one formula in one product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulationReport {
    pub formula_id: String,
    pub formula_name: String,
    pub category: IfraCategory,
    pub generated_at: DateTime<Utc>,
    pub normalized: NormalizedFormula,
    pub compliance: ComplianceReport,
    pub compliance_table: ComplianceTable,
    pub decay_timeline: Vec<IntensityPoint>,
    pub allergens: AllergenLoad,
    pub cost_breakdown: Vec<CostBucket>,
    pub batch_cost: BatchCost,
}

impl FormulationReport {
    pub fn is_compliant(&self) -> bool {
        self.compliance.compliant
    }

    pub fn unmatched_ingredients(&self) -> Vec<&str> {
        self.normalized
            .lines
            .iter()
            .filter(|l| !l.matched)
            .map(|l| l.ingredient.id.as_str())
            .collect()
    }
}

/// Runs every analysis over `formula` with one catalog read.
///
/// # Errors
///
/// Returns a validation error when the formula breaks its weight invariants.
pub fn analyze<C: IngredientCatalog + ?Sized>(
    formula: &Formula,
    catalog: &C,
    category: IfraCategory,
) -> Result<FormulationReport, ScentforgeError> {
    validate_formula(formula)?;

    let ids: Vec<&str> = formula.items.iter().map(|i| i.ingredient_id.as_str()).collect();
    let slice = resolve_slice(catalog, &ids);
    let normalized = normalize(formula, &slice);

    let compliance = check_compliance(&normalized, category);
    let compliance_table = compliance_table(&normalized, category);
    let decay_timeline = simulate_decay(&normalized);
    let allergens = allergen_load(&normalized);
    let cost_breakdown = cost_breakdown(&normalized);
    let batch_cost = batch_cost(&normalized);

    info!(
        formula_id = %formula.id,
        %category,
        total_weight = normalized.total_weight_grams,
        allergens = allergens.count,
        total_cost = batch_cost.total_cost,
        "formulation analyzed"
    );

    Ok(FormulationReport {
        formula_id: formula.id.clone(),
        formula_name: formula.name.clone(),
        category,
        generated_at: Utc::now(),
        normalized,
        compliance,
        compliance_table,
        decay_timeline,
        allergens,
        cost_breakdown,
        batch_cost,
    })
}
