use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DILUENT_NAME: &str = "Perfumer's Alcohol (SDA 40B)";

fn default_diluent_name() -> String {
    DEFAULT_DILUENT_NAME.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaItem {
    pub ingredient_id: String,
    /// Mass of the material as supplied, not of its pure active.
    pub amount_grams: f64,
    /// Overrides the catalog dilution for this line only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration_percent: Option<f64>,
}

impl FormulaItem {
    pub fn new(ingredient_id: &str, amount_grams: f64) -> Self {
        Self {
            ingredient_id: ingredient_id.to_string(),
            amount_grams,
            concentration_percent: None,
        }
    }

    pub fn with_concentration(mut self, percent: f64) -> Self {
        self.concentration_percent = Some(percent);
        self
    }
}

/// A mixture snapshot. Edits consume the value and return the next snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formula {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<FormulaItem>,
    #[serde(default = "default_diluent_name")]
    pub diluent_name: String,
    #[serde(default)]
    pub diluent_amount_grams: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Formula {
    pub fn new(id: &str, name: &str) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            name: name.to_string(),
            items: Vec::new(),
            diluent_name: default_diluent_name(),
            diluent_amount_grams: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn untitled(id: &str) -> Self {
        Self::new(id, "Untitled Formula")
    }

    pub fn ingredient_grams(&self) -> f64 {
        self.items.iter().map(|i| i.amount_grams).sum()
    }

    pub fn total_weight_grams(&self) -> f64 {
        self.diluent_amount_grams + self.ingredient_grams()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn touched(mut self) -> Self {
        self.updated_at = Utc::now();
        self
    }

    /// Appends a line. Repeated ingredients stay as separate lines.
    pub fn with_item(mut self, item: FormulaItem) -> Self {
        self.items.push(item);
        self.touched()
    }

    pub fn without_ingredient(mut self, ingredient_id: &str) -> Self {
        self.items.retain(|i| i.ingredient_id != ingredient_id);
        self.touched()
    }

    /// Sets the amount of every line referencing `ingredient_id`.
    pub fn with_amount(mut self, ingredient_id: &str, amount_grams: f64) -> Self {
        for item in self.items.iter_mut().filter(|i| i.ingredient_id == ingredient_id) {
            item.amount_grams = amount_grams;
        }
        self.touched()
    }

    pub fn with_diluent(mut self, name: &str, amount_grams: f64) -> Self {
        self.diluent_name = name.to_string();
        self.diluent_amount_grams = amount_grams;
        self.touched()
    }

    pub fn renamed(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self.touched()
    }
}
