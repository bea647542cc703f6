//! Turns a generated "spark" suggestion (ingredient names mapped to grams)
//! into a formula snapshot against the catalog.

use crate::{catalog::InMemoryCatalog, error::ScentforgeError};
use scentforge_schemas::{
    formula::{Formula, FormulaItem},
    ingredient::Ingredient,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

pub const SPARK_VENDOR: &str = "AI Generated";
pub const SPARK_DILUENT: &str = "Ethanol";
pub const DEFAULT_TARGET_TOTAL_GRAMS: f64 = 100.0;

/// Output shape of the suggestion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparkSuggestion {
    pub formula: BTreeMap<String, f64>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SparkResolution {
    pub formula: Formula,
    /// Ingredients invented for names the catalog did not know.
    pub placeholders: Vec<Ingredient>,
}

fn placeholder_id(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    format!("ai-{}", slug)
}

/// Resolves `suggestion` into a new formula.
///
/// Names are matched to catalog ingredients ignoring case. Unknown names get a
/// neat, unrestricted placeholder. When the suggested grams fall short of
/// `target_total_grams` the remainder becomes ethanol diluent.
///
/// # Errors
///
/// Returns a validation error for a negative or non-finite amount.
pub fn resolve_spark(
    suggestion: &SparkSuggestion,
    catalog: &InMemoryCatalog,
    formula_id: &str,
    target_total_grams: f64,
) -> Result<SparkResolution, ScentforgeError> {
    let mut formula = Formula::new(formula_id, "AI Spark");
    let mut placeholders = Vec::new();

    for (name, &grams) in &suggestion.formula {
        if !grams.is_finite() || grams < 0.0 {
            return Err(ScentforgeError::Validation(format!(
                "Suggested amount for '{}' must be a non-negative number",
                name
            )));
        }
        let ingredient_id = match catalog.find_by_name(name) {
            Some(found) => found.id.clone(),
            None => {
                let id = placeholder_id(name);
                // Names differing only in case or punctuation share one placeholder.
                if !placeholders.iter().any(|p: &Ingredient| p.id == id) {
                    debug!(%name, %id, "suggested ingredient not in catalog");
                    placeholders.push(Ingredient::placeholder(&id, name, SPARK_VENDOR));
                }
                id
            }
        };
        formula = formula.with_item(FormulaItem::new(&ingredient_id, grams));
    }

    let shortfall = target_total_grams - formula.ingredient_grams();
    if shortfall > 0.0 {
        formula = formula.with_diluent(SPARK_DILUENT, shortfall);
    }

    Ok(SparkResolution {
        formula,
        placeholders,
    })
}
