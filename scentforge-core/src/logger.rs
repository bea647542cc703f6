use crate::{decay::IntensityPoint, error::ScentforgeError, normalize::NormalizedFormula};
use csv::Writer;
use scentforge_schemas::request::Violation;
use serde::Serialize;
use std::fs;

#[derive(Debug, Serialize)]
struct LineEntry<'a> {
    ingredient_id: &'a str,
    name: &'a str,
    matched: bool,
    amount_grams: f64,
    dilution_percent: f64,
    percent_of_batch: f64,
    pure_active_grams: f64,
    percent_pure_in_product: f64,
}

/// Writes serializable records to a CSV file, flushing after every row so a
/// partially written report is still readable.
pub struct ReportWriter {
    writer: Writer<fs::File>,
    path: String,
}

impl ReportWriter {
    pub fn new(path: &str) -> Result<Self, ScentforgeError> {
        let writer = Writer::from_path(path).map_err(|e| ScentforgeError::CsvError(path.to_string(), e))?;
        Ok(Self {
            writer,
            path: path.to_string(),
        })
    }

    pub fn write_row<T: Serialize>(&mut self, row: &T) -> Result<(), ScentforgeError> {
        self.writer
            .serialize(row)
            .map_err(|e| ScentforgeError::CsvError(self.path.clone(), e))?;
        self.writer
            .flush()
            .map_err(|e| ScentforgeError::FileIO(self.path.clone(), e))?;
        Ok(())
    }
}

pub fn write_decay_timeline(path: &str, timeline: &[IntensityPoint]) -> Result<(), ScentforgeError> {
    let mut writer = ReportWriter::new(path)?;
    for point in timeline {
        writer.write_row(point)?;
    }
    Ok(())
}

pub fn write_violations(path: &str, violations: &[Violation]) -> Result<(), ScentforgeError> {
    let mut writer = ReportWriter::new(path)?;
    for violation in violations {
        writer.write_row(violation)?;
    }
    Ok(())
}

pub fn write_lines(path: &str, normalized: &NormalizedFormula) -> Result<(), ScentforgeError> {
    let mut writer = ReportWriter::new(path)?;
    for line in &normalized.lines {
        writer.write_row(&LineEntry {
            ingredient_id: &line.ingredient.id,
            name: &line.ingredient.name,
            matched: line.matched,
            amount_grams: line.amount_grams,
            dilution_percent: line.dilution_percent,
            percent_of_batch: line.percent_of_batch,
            pure_active_grams: line.pure_active_grams,
            percent_pure_in_product: line.percent_pure_in_product,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scentforge_schemas::category::IfraCategory;

    #[test]
    fn timeline_csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("decay.csv");
        let path = path.to_str().unwrap();
        let timeline = vec![
            IntensityPoint { hour: 0.0, intensity: 100.0 },
            IntensityPoint { hour: 1.0, intensity: 44.9 },
        ];
        write_decay_timeline(path, &timeline).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["hour,intensity", "0.0,100.0", "1.0,44.9"]);
    }

    #[test]
    fn violations_csv_uses_wire_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("violations.csv");
        let path = path.to_str().unwrap();
        let violations = vec![Violation {
            ingredient_id: "clove-bud-oil".to_string(),
            name: "Clove Bud Oil".to_string(),
            cas_number: Some("8000-34-8".to_string()),
            percent_used: 1.25,
            percent_allowed: 0.5,
            category: IfraCategory::Cat4,
        }];
        write_violations(path, &violations).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("slug,name,cas,percentUsed,percentAllowed,category"));
        assert_eq!(lines.next(), Some("clove-bud-oil,Clove Bud Oil,8000-34-8,1.25,0.5,cat4"));
    }

    #[test]
    fn unwritable_path_is_a_csv_error() {
        let err = ReportWriter::new("/nonexistent-dir/report.csv").err().unwrap();
        assert!(matches!(err, ScentforgeError::CsvError(..)));
    }
}
