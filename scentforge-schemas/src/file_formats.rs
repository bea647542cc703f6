use crate::{formula::Formula, ingredient::Ingredient};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct IngredientFile {
    pub schema_version: String,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FormulaFile {
    pub schema_version: String,
    pub formula: Formula,
}
