use crate::category::IfraCategory;
use serde::{Deserialize, Serialize};

/// One line of a compliance request, referencing the catalog by slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedIngredient {
    pub slug: String,
    #[serde(alias = "quantityGrams")]
    pub quantity: f64,
    #[serde(default, alias = "concentrationPercent", skip_serializing_if = "Option::is_none")]
    pub concentration: Option<f64>,
}

/// Wire shape of a compliance check. The category stays a raw string here so
/// an unknown id surfaces as a validation message rather than a decode error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRequest {
    pub ingredients: Vec<RequestedIngredient>,
    #[serde(alias = "dilutantQuantityGrams")]
    pub dilutant_quantity: f64,
    pub category_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    #[serde(rename = "slug")]
    pub ingredient_id: String,
    pub name: String,
    #[serde(rename = "cas")]
    pub cas_number: Option<String>,
    /// Rounded to four decimals for display.
    pub percent_used: f64,
    pub percent_allowed: f64,
    pub category: IfraCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub compliant: bool,
    pub violations: Vec<Violation>,
    pub total_weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<IfraCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub status: u16,
}

/// Either a report or an error envelope, serialized untagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComplianceResponse {
    Success(ComplianceReport),
    Failure(ErrorEnvelope),
}
