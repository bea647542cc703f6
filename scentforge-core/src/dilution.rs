use crate::error::ScentforgeError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DilutionPlan {
    pub final_mass_grams: f64,
    pub solvent_to_add_grams: f64,
}

/// Solvent needed to bring `mass_grams` of material at `current_percent`
/// down to `target_percent`.
///
/// # Errors
///
/// Returns a validation error unless `0 < target < current <= 100` and the
/// mass is a non-negative number.
pub fn plan_dilution(
    mass_grams: f64,
    current_percent: f64,
    target_percent: f64,
) -> Result<DilutionPlan, ScentforgeError> {
    if !mass_grams.is_finite() || mass_grams < 0.0 {
        return Err(ScentforgeError::Validation(
            "Mass must be a non-negative number".to_string(),
        ));
    }
    if !current_percent.is_finite() || current_percent <= 0.0 || current_percent > 100.0 {
        return Err(ScentforgeError::Validation(
            "Current concentration must be between 0 and 100".to_string(),
        ));
    }
    if !target_percent.is_finite() || target_percent <= 0.0 {
        return Err(ScentforgeError::Validation(
            "Target concentration must be greater than 0".to_string(),
        ));
    }
    if target_percent >= current_percent {
        return Err(ScentforgeError::Validation(
            "Target concentration must be lower than current concentration".to_string(),
        ));
    }

    let final_mass_grams = mass_grams * current_percent / target_percent;
    Ok(DilutionPlan {
        final_mass_grams,
        solvent_to_add_grams: final_mass_grams - mass_grams,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neat_to_ten_percent() {
        let plan = plan_dilution(10.0, 100.0, 10.0).unwrap();
        assert_eq!(plan.final_mass_grams, 100.0);
        assert_eq!(plan.solvent_to_add_grams, 90.0);
    }

    #[test]
    fn target_must_be_lower_than_current() {
        let err = plan_dilution(10.0, 10.0, 20.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Target concentration must be lower than current concentration"
        );
        assert!(plan_dilution(10.0, 10.0, 10.0).is_err());
    }

    #[test]
    fn rejects_zero_target() {
        assert!(plan_dilution(10.0, 100.0, 0.0).is_err());
    }
}
