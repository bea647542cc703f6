//! IFRA compliance: in-product concentration of each restricted material
//! against the limit for the target product category.

use crate::{
    catalog::{resolve_slice, IngredientCatalog},
    error::ScentforgeError,
    normalize::{normalize, round_to, NormalizedFormula, NormalizedLine},
};
use scentforge_schemas::{
    category::IfraCategory,
    formula::{Formula, FormulaItem},
    request::{ComplianceReport, ComplianceRequest, ComplianceResponse, Violation},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Fraction of a limit above which a material is flagged as a warning.
pub const WARNING_THRESHOLD: f64 = 0.8;

/// The limit that applies to `line` in `category`, or `None` when the line is
/// not checked at all (unknown, not restricted, or unrestricted in this category).
fn applicable_limit(line: &NormalizedLine, category: IfraCategory) -> Option<f64> {
    if !line.matched || !line.ingredient.ifra_restricted {
        return None;
    }
    line.ingredient.limit_for(category).percent()
}

/// One restricted material with every line that references it added up.
struct MaterialLoad<'a> {
    line: &'a NormalizedLine,
    percent_pure_in_product: f64,
    limit: f64,
}

/// Sums in-product pure concentration per restricted material, in order of
/// first appearance. A material split across several lines is limited on its total.
fn restricted_loads(normalized: &NormalizedFormula, category: IfraCategory) -> Vec<MaterialLoad<'_>> {
    let mut loads: Vec<MaterialLoad<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for line in &normalized.lines {
        let Some(limit) = applicable_limit(line, category) else {
            debug!(ingredient_id = %line.ingredient.id, "not subject to a limit, skipped");
            continue;
        };
        match index.get(line.ingredient.id.as_str()).copied() {
            Some(i) => loads[i].percent_pure_in_product += line.percent_pure_in_product,
            None => {
                index.insert(line.ingredient.id.as_str(), loads.len());
                loads.push(MaterialLoad {
                    line,
                    percent_pure_in_product: line.percent_pure_in_product,
                    limit,
                });
            }
        }
    }
    loads
}

pub fn check_compliance(normalized: &NormalizedFormula, category: IfraCategory) -> ComplianceReport {
    if normalized.is_degenerate() {
        return ComplianceReport {
            compliant: true,
            violations: Vec::new(),
            total_weight: 0.0,
            category: None,
            ingredient_count: None,
        };
    }

    let violations: Vec<Violation> = restricted_loads(normalized, category)
        .into_iter()
        // Compare unrounded so rounding can never hide an excess.
        .filter(|load| load.percent_pure_in_product > load.limit)
        .map(|load| Violation {
            ingredient_id: load.line.ingredient.id.clone(),
            name: load.line.ingredient.name.clone(),
            cas_number: load.line.ingredient.cas_number.clone(),
            percent_used: round_to(load.percent_pure_in_product, 4),
            percent_allowed: load.limit,
            category,
        })
        .collect();

    info!(
        formula_id = %normalized.formula_id,
        %category,
        violations = violations.len(),
        "compliance check complete"
    );

    ComplianceReport {
        compliant: violations.is_empty(),
        violations,
        total_weight: normalized.total_weight_grams,
        category: Some(category),
        ingredient_count: Some(normalized.lines.len()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    Violation,
    Warning,
    Pass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRow {
    pub ingredient_id: String,
    pub name: String,
    pub percent_used: f64,
    pub percent_allowed: f64,
    pub status: ComplianceStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceCounts {
    pub violation: usize,
    pub warning: usize,
    pub pass: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceTable {
    pub category: IfraCategory,
    pub rows: Vec<ComplianceRow>,
    pub counts: ComplianceCounts,
}

/// Per-material status for every restricted material, violations first.
pub fn compliance_table(normalized: &NormalizedFormula, category: IfraCategory) -> ComplianceTable {
    let mut rows: Vec<ComplianceRow> = restricted_loads(normalized, category)
        .into_iter()
        .map(|load| {
            let used = load.percent_pure_in_product;
            let status = if used > load.limit {
                ComplianceStatus::Violation
            } else if used > load.limit * WARNING_THRESHOLD {
                ComplianceStatus::Warning
            } else {
                ComplianceStatus::Pass
            };
            ComplianceRow {
                ingredient_id: load.line.ingredient.id.clone(),
                name: load.line.ingredient.name.clone(),
                percent_used: round_to(used, 4),
                percent_allowed: load.limit,
                status,
            }
        })
        .collect();
    rows.sort_by_key(|r| r.status);

    let count = |status: ComplianceStatus| rows.iter().filter(|r| r.status == status).count();
    let counts = ComplianceCounts {
        violation: count(ComplianceStatus::Violation),
        warning: count(ComplianceStatus::Warning),
        pass: count(ComplianceStatus::Pass),
        total: normalized.lines.len(),
    };

    ComplianceTable {
        category,
        rows,
        counts,
    }
}

fn validate_request(request: &ComplianceRequest) -> Result<IfraCategory, ScentforgeError> {
    let category: IfraCategory = request.category_id.parse()?;

    if !request.dilutant_quantity.is_finite() || request.dilutant_quantity < 0.0 {
        return Err(ScentforgeError::Validation(
            "dilutantQuantity must be a non-negative number".to_string(),
        ));
    }
    for (i, ing) in request.ingredients.iter().enumerate() {
        if ing.slug.trim().is_empty() {
            return Err(ScentforgeError::Validation(format!(
                "ingredients[{}].slug must not be empty",
                i
            )));
        }
        if !ing.quantity.is_finite() || ing.quantity < 0.0 {
            return Err(ScentforgeError::Validation(format!(
                "ingredients[{}].quantity must be a non-negative number",
                i
            )));
        }
        if let Some(c) = ing.concentration {
            if !c.is_finite() || c <= 0.0 || c > 100.0 {
                return Err(ScentforgeError::Validation(format!(
                    "ingredients[{}].concentration must be between 0 and 100",
                    i
                )));
            }
        }
    }
    Ok(category)
}

/// Runs a wire-shaped compliance request against `catalog`.
///
/// # Errors
///
/// Returns a validation error for a malformed request. Catalog failures are
/// not errors: every ingredient is then treated as unknown.
pub fn check_request<C: IngredientCatalog + ?Sized>(
    request: &ComplianceRequest,
    catalog: &C,
) -> Result<ComplianceReport, ScentforgeError> {
    let category = validate_request(request)?;

    let slugs: Vec<&str> = request.ingredients.iter().map(|i| i.slug.as_str()).collect();
    let slice = resolve_slice(catalog, &slugs);

    let mut formula = Formula::new("request", "Compliance request");
    formula.diluent_amount_grams = request.dilutant_quantity;
    formula.items = request
        .ingredients
        .iter()
        .map(|i| FormulaItem {
            ingredient_id: i.slug.clone(),
            amount_grams: i.quantity,
            concentration_percent: i.concentration,
        })
        .collect();

    Ok(check_compliance(&normalize(&formula, &slice), category))
}

pub fn respond<C: IngredientCatalog + ?Sized>(request: &ComplianceRequest, catalog: &C) -> ComplianceResponse {
    match check_request(request, catalog) {
        Ok(report) => ComplianceResponse::Success(report),
        Err(err) => ComplianceResponse::Failure(err.to_envelope()),
    }
}

/// Decodes a JSON request body and answers it; a body that does not decode
/// is answered with a 400 envelope.
pub fn respond_json<C: IngredientCatalog + ?Sized>(body: &str, catalog: &C) -> ComplianceResponse {
    match serde_json::from_str::<ComplianceRequest>(body) {
        Ok(request) => respond(&request, catalog),
        Err(err) => ComplianceResponse::Failure(ScentforgeError::from(err).to_envelope()),
    }
}
