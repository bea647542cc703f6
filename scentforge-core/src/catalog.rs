//! Read-only access to ingredient records.
//!
//! The engine never owns catalog storage. It asks a [`IngredientCatalog`] for
//! the handful of ingredients a formula references and works on that slice.

use crate::error::ScentforgeError;
use scentforge_schemas::{formula::Formula, ingredient::Ingredient};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Ingredients resolved for one calculation, keyed by id.
pub type CatalogSlice = HashMap<String, Ingredient>;

pub trait IngredientCatalog {
    /// Batch read. Ids with no record are simply absent from the result.
    fn lookup_many(&self, ids: &[&str]) -> Result<CatalogSlice, ScentforgeError>;

    fn lookup(&self, id: &str) -> Option<Ingredient> {
        self.lookup_many(&[id]).ok().and_then(|mut found| found.remove(id))
    }
}

impl IngredientCatalog for HashMap<String, Ingredient> {
    fn lookup_many(&self, ids: &[&str]) -> Result<CatalogSlice, ScentforgeError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.get(*id).map(|ing| (id.to_string(), ing.clone())))
            .collect())
    }
}

/// Fetches a slice for `ids`, treating a failed lookup as "nothing found".
pub fn resolve_slice<C: IngredientCatalog + ?Sized>(catalog: &C, ids: &[&str]) -> CatalogSlice {
    match catalog.lookup_many(ids) {
        Ok(slice) => {
            debug!(requested = ids.len(), found = slice.len(), "resolved catalog slice");
            slice
        }
        Err(err) => {
            warn!(error = %err, "catalog unavailable, treating every ingredient as unknown");
            CatalogSlice::new()
        }
    }
}

/// Checks the numeric invariants of a catalog record.
pub fn validate_ingredient(ingredient: &Ingredient) -> Result<(), ScentforgeError> {
    let invalid = |field: &'static str, value: f64| ScentforgeError::InvalidIngredient {
        id: ingredient.id.clone(),
        field,
        value,
    };

    if !ingredient.cost_per_gram.is_finite() || ingredient.cost_per_gram < 0.0 {
        return Err(invalid("cost_per_gram", ingredient.cost_per_gram));
    }
    if !is_percent(ingredient.ifra_limit_percent) {
        return Err(invalid("ifra_limit_percent", ingredient.ifra_limit_percent));
    }
    if let Some(limit) = ingredient.category_limits.values().find(|l| !is_percent(**l)) {
        return Err(invalid("category limit", *limit));
    }
    if !ingredient.dilution_percent.is_finite()
        || ingredient.dilution_percent <= 0.0
        || ingredient.dilution_percent > 100.0
    {
        return Err(invalid("dilution_percent", ingredient.dilution_percent));
    }
    Ok(())
}

fn is_percent(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Checks the weight invariants of a formula snapshot before any analysis.
///
/// # Errors
///
/// Returns a validation error naming the first offending field.
pub fn validate_formula(formula: &Formula) -> Result<(), ScentforgeError> {
    if !is_non_negative(formula.diluent_amount_grams) {
        return Err(ScentforgeError::Validation(
            "diluent_amount_grams must be a non-negative number".to_string(),
        ));
    }
    for (i, item) in formula.items.iter().enumerate() {
        if item.ingredient_id.trim().is_empty() {
            return Err(ScentforgeError::Validation(format!(
                "items[{}].ingredient_id must not be empty",
                i
            )));
        }
        if !is_non_negative(item.amount_grams) {
            return Err(ScentforgeError::Validation(format!(
                "items[{}].amount_grams must be a non-negative number",
                i
            )));
        }
        if let Some(c) = item.concentration_percent {
            if !c.is_finite() || c <= 0.0 || c > 100.0 {
                return Err(ScentforgeError::Validation(format!(
                    "items[{}].concentration_percent must be between 0 and 100",
                    i
                )));
            }
        }
    }
    Ok(())
}

/// A validated catalog held in memory, as loaded from catalog files.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    ingredients: HashMap<String, Ingredient>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog, rejecting the first record that breaks an invariant.
    pub fn from_ingredients<I>(ingredients: I) -> Result<Self, ScentforgeError>
    where
        I: IntoIterator<Item = Ingredient>,
    {
        let mut catalog = Self::new();
        for ingredient in ingredients {
            catalog.insert(ingredient)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, ingredient: Ingredient) -> Result<(), ScentforgeError> {
        validate_ingredient(&ingredient)?;
        self.ingredients.insert(ingredient.id.clone(), ingredient);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients.get(id)
    }

    /// Case-insensitive match on the display name.
    pub fn find_by_name(&self, name: &str) -> Option<&Ingredient> {
        let wanted = name.trim().to_lowercase();
        self.ingredients
            .values()
            .find(|ing| ing.name.to_lowercase() == wanted)
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.values()
    }
}

impl IngredientCatalog for InMemoryCatalog {
    fn lookup_many(&self, ids: &[&str]) -> Result<CatalogSlice, ScentforgeError> {
        self.ingredients.lookup_many(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scentforge_schemas::{category::IfraCategory, formula::FormulaItem, ingredient::Note};

    fn ingredient(id: &str) -> Ingredient {
        let mut ing = Ingredient::placeholder(id, "Clove Bud Oil", "Symrise");
        ing.note = Note::Mid;
        ing.cost_per_gram = 2.1;
        ing.ifra_restricted = true;
        ing.ifra_limit_percent = 0.5;
        ing
    }

    struct Offline;

    impl IngredientCatalog for Offline {
        fn lookup_many(&self, _ids: &[&str]) -> Result<CatalogSlice, ScentforgeError> {
            Err(ScentforgeError::CatalogUnavailable("connection refused".into()))
        }
    }

    #[test]
    fn lookup_many_omits_missing_ids() {
        let catalog = InMemoryCatalog::from_ingredients(vec![ingredient("clove")]).unwrap();
        let slice = catalog.lookup_many(&["clove", "oakmoss"]).unwrap();
        assert_eq!(slice.len(), 1);
        assert!(slice.contains_key("clove"));
        assert!(catalog.lookup("oakmoss").is_none());
    }

    #[test]
    fn failed_lookup_degrades_to_empty_slice() {
        assert!(resolve_slice(&Offline, &["clove"]).is_empty());
        assert!(Offline.lookup("clove").is_none());
    }

    #[test]
    fn rejects_out_of_range_limits() {
        let mut bad = ingredient("clove");
        bad.category_limits.insert(IfraCategory::Cat4, 140.0);
        let err = InMemoryCatalog::from_ingredients(vec![bad]).unwrap_err();
        assert!(matches!(
            err,
            ScentforgeError::InvalidIngredient { field: "category limit", .. }
        ));
    }

    #[test]
    fn rejects_zero_dilution_and_negative_cost() {
        let mut bad = ingredient("clove");
        bad.dilution_percent = 0.0;
        assert!(validate_ingredient(&bad).is_err());

        let mut bad = ingredient("clove");
        bad.cost_per_gram = -1.0;
        assert!(validate_ingredient(&bad).is_err());
    }

    #[test]
    fn negative_diluent_is_not_an_empty_formula() {
        let formula = Formula::new("f", "Clove")
            .with_item(FormulaItem::new("clove", 10.0))
            .with_diluent("Ethanol", -10.0);
        let err = validate_formula(&formula).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "diluent_amount_grams must be a non-negative number");
    }

    #[test]
    fn rejects_bad_line_amounts_and_concentrations() {
        let negative = Formula::new("f", "Clove").with_item(FormulaItem::new("clove", -1.0));
        assert!(validate_formula(&negative).unwrap_err().to_string().contains("items[0].amount_grams"));

        let nan = Formula::new("f", "Clove").with_item(FormulaItem::new("clove", f64::NAN));
        assert!(validate_formula(&nan).is_err());

        let strong = Formula::new("f", "Clove")
            .with_item(FormulaItem::new("iso", 5.0))
            .with_item(FormulaItem::new("clove", 10.0).with_concentration(500.0));
        assert!(validate_formula(&strong)
            .unwrap_err()
            .to_string()
            .contains("items[1].concentration_percent"));
    }

    #[test]
    fn accepts_a_well_formed_formula() {
        let formula = Formula::new("f", "Clove")
            .with_item(FormulaItem::new("clove", 0.0))
            .with_item(FormulaItem::new("clove", 2.0).with_concentration(100.0))
            .with_diluent("Ethanol", 98.0);
        assert!(validate_formula(&formula).is_ok());
        assert!(validate_formula(&Formula::untitled("f")).is_ok());
    }

    #[test]
    fn finds_by_name_ignoring_case() {
        let catalog = InMemoryCatalog::from_ingredients(vec![ingredient("clove")]).unwrap();
        assert_eq!(catalog.find_by_name("clove bud oil").map(|i| i.id.as_str()), Some("clove"));
    }
}
