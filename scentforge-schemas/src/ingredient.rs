use crate::category::IfraCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Limits at or above this value place no restriction on a material.
pub const UNRESTRICTED_LIMIT_PERCENT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    Top,
    Mid,
    Base,
}

impl Note {
    /// First-order evaporation constant per hour.
    pub fn decay_rate(&self) -> f64 {
        match self {
            Note::Top => 0.8,
            Note::Mid => 0.4,
            Note::Base => 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OlfactiveFamily {
    Floral,
    Woody,
    Citrus,
    Fruity,
    Spicy,
    Green,
    Gourmand,
    Aquatic,
    Amber,
    Musky,
    Animalic,
    Earthy,
}

/// The limit that applies to a material in one product category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "percent", rename_all = "snake_case")]
pub enum IfraLimit {
    Restricted(f64),
    Unrestricted,
}

impl IfraLimit {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= UNRESTRICTED_LIMIT_PERCENT {
            IfraLimit::Unrestricted
        } else {
            IfraLimit::Restricted(percent)
        }
    }

    pub fn percent(&self) -> Option<f64> {
        match self {
            IfraLimit::Restricted(p) => Some(*p),
            IfraLimit::Unrestricted => None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_percent() -> f64 {
    100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub vendor: String,
    pub cost_per_gram: f64,
    pub note: Note,
    #[serde(default)]
    pub olfactive_families: Vec<OlfactiveFamily>,
    #[serde(default)]
    pub is_allergen: bool,
    #[serde(default = "default_true")]
    pub ifra_restricted: bool,
    #[serde(default = "default_percent")]
    pub ifra_limit_percent: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub category_limits: BTreeMap<IfraCategory, f64>,
    #[serde(default = "default_percent")]
    pub dilution_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cas_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Ingredient {
    /// Stand-in for a line whose ingredient is not in the catalog: neat,
    /// unregulated, free and not an allergen.
    pub fn placeholder(id: &str, name: &str, vendor: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            vendor: vendor.to_string(),
            cost_per_gram: 0.0,
            note: Note::Mid,
            olfactive_families: Vec::new(),
            is_allergen: false,
            ifra_restricted: false,
            ifra_limit_percent: UNRESTRICTED_LIMIT_PERCENT,
            category_limits: BTreeMap::new(),
            dilution_percent: 100.0,
            cas_number: None,
            description: None,
        }
    }

    /// Category-specific limit when the catalog carries one, else the default.
    pub fn limit_for(&self, category: IfraCategory) -> IfraLimit {
        let percent = self
            .category_limits
            .get(&category)
            .copied()
            .unwrap_or(self.ifra_limit_percent);
        IfraLimit::from_percent(percent)
    }
}
