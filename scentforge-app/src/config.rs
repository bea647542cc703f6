use anyhow::{Context, Result};
use scentforge_core::{
    catalog::{validate_formula, InMemoryCatalog},
    spark::SparkSuggestion,
};
use scentforge_schemas::{
    file_formats::{FormulaFile, IngredientFile},
    formula::Formula,
    ingredient::Ingredient,
};
use std::{collections::HashMap, fs, path::Path};
use tracing::info;

pub const DEFAULT_CATALOG_DIR: &str = "./data/catalog";
pub const DEFAULT_RUNS_DIR: &str = "./data/runs";
pub const FORMULA_SCHEMA_VERSION: &str = "1.0";

/// Static data for a session: the ingredient catalog every command reads from.
pub struct Workbench {
    pub catalog: InMemoryCatalog,
}

impl Workbench {
    /// Loads every YAML ingredient file under `catalog_dir`.
    pub fn load<P: AsRef<Path>>(catalog_dir: P) -> Result<Self> {
        let dir = catalog_dir.as_ref();
        info!(?dir, "loading ingredient catalog");

        let ingredients = load_yaml_files_into_map(
            dir,
            |file: IngredientFile| file.ingredients,
            |item: &Ingredient| item.id.clone(),
        )?;
        let catalog = InMemoryCatalog::from_ingredients(ingredients.into_values())
            .with_context(|| format!("Invalid ingredient record in {:?}", dir))?;

        info!(ingredients = catalog.len(), "catalog loaded");
        Ok(Self { catalog })
    }
}

pub fn load_formula<P: AsRef<Path>>(path: P) -> Result<Formula> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read formula {:?}", path))?;
    let file: FormulaFile =
        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse formula YAML from {:?}", path))?;
    validate_formula(&file.formula).with_context(|| format!("Invalid formula in {:?}", path))?;
    Ok(file.formula)
}

pub fn formula_to_yaml(formula: Formula) -> Result<String> {
    let file = FormulaFile {
        schema_version: FORMULA_SCHEMA_VERSION.to_string(),
        formula,
    };
    serde_yaml::to_string(&file).context("Failed to serialize formula")
}

pub fn load_spark<P: AsRef<Path>>(path: P) -> Result<SparkSuggestion> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read suggestion {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse suggestion JSON from {:?}", path))
}

/// Generic helper to load all YAML files in a directory into a HashMap.
/// Later files win when two records share a key.
fn load_yaml_files_into_map<P, F, E, T, K>(dir_path: P, extract_vec: E, get_key: K) -> Result<HashMap<String, T>>
where
    P: AsRef<Path>,
    F: for<'de> serde::Deserialize<'de>, // The file wrapper struct (e.g., IngredientFile)
    E: Fn(F) -> Vec<T>,
    K: Fn(&T) -> String,
{
    let mut paths: Vec<_> = fs::read_dir(dir_path.as_ref())
        .with_context(|| format!("Failed to read directory: {:?}", dir_path.as_ref()))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().map_or(false, |s| s == "yaml" || s == "yml"))
        .collect();
    paths.sort();

    let mut map = HashMap::new();
    for path in paths {
        let content = fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
        let file_wrapper: F =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse YAML from {:?}", path))?;

        for item in extract_vec(file_wrapper) {
            map.insert(get_key(&item), item);
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scentforge_schemas::{category::IfraCategory, formula::FormulaItem};

    const CATALOG_YAML: &str = r#"
schema_version: "1.0"
ingredients:
  - id: citral
    name: Citral
    vendor: BASF
    cost_per_gram: 0.12
    note: Top
    is_allergen: true
    ifra_limit_percent: 1.0
    category_limits:
      cat5a: 0.2
  - id: iso-e-super
    name: Iso E Super
    vendor: IFF
    cost_per_gram: 0.05
    note: Base
    ifra_restricted: false
"#;

    #[test]
    fn loads_catalog_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("core.yaml"), CATALOG_YAML).unwrap();
        fs::write(dir.path().join("README.md"), "not a catalog").unwrap();

        let bench = Workbench::load(dir.path()).unwrap();
        assert_eq!(bench.catalog.len(), 2);
        let citral = bench.catalog.get("citral").unwrap();
        assert_eq!(citral.category_limits.get(&IfraCategory::Cat5a), Some(&0.2));
        assert_eq!(citral.dilution_percent, 100.0);
        assert!(citral.ifra_restricted);
    }

    #[test]
    fn rejects_out_of_range_limits() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("bad.yaml"),
            CATALOG_YAML.replace("ifra_limit_percent: 1.0", "ifra_limit_percent: 140.0"),
        )
        .unwrap();
        assert!(Workbench::load(dir.path()).is_err());
    }

    #[test]
    fn formula_yaml_survives_a_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("formula.yaml");
        let formula = Formula::new("f-1", "Citrus Study")
            .with_item(FormulaItem::new("citral", 0.4))
            .with_diluent("Ethanol", 99.6);
        fs::write(&path, formula_to_yaml(formula.clone()).unwrap()).unwrap();

        assert_eq!(load_formula(&path).unwrap(), formula);
    }

    #[test]
    fn refuses_formula_with_negative_diluent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("formula.yaml");
        let formula = Formula::new("f-1", "Citrus Study")
            .with_item(FormulaItem::new("citral", 10.0))
            .with_diluent("Ethanol", -10.0);
        fs::write(&path, formula_to_yaml(formula).unwrap()).unwrap();

        let err = load_formula(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("diluent_amount_grams must be a non-negative number"));
    }
}
