use crate::catalogue::Indicator;

/// Inclusive bounds for a single user-supplied weight
pub const WEIGHT_MIN: f64 = 0.0;
pub const WEIGHT_MAX: f64 = 100.0;

/// True iff there are exactly 5 finite weights, each within [0, 100].
pub fn validate_weights(weights: &[f64]) -> bool {
    weight_errors(weights).is_ok()
}

/// Validate user-edited weights.
/// Returns all validation errors at once (not just the first).
pub fn weight_errors(weights: &[f64]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if weights.len() != Indicator::ALL.len() {
        errors.push(format!(
            "weights: expected {} values, got {}",
            Indicator::ALL.len(),
            weights.len()
        ));
    }

    for (i, &w) in weights.iter().enumerate() {
        let label = Indicator::ALL
            .get(i)
            .map(|ind| ind.label())
            .unwrap_or("extra");
        if !w.is_finite() {
            errors.push(format!("weights[{}] ({}): must be a number", i, label));
        } else if !(WEIGHT_MIN..=WEIGHT_MAX).contains(&w) {
            errors.push(format!(
                "weights[{}] ({}): {} is outside {}-{}",
                i, label, w, WEIGHT_MIN, WEIGHT_MAX
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::WeightVector;

    #[test]
    fn test_default_weights_valid() {
        assert!(validate_weights(WeightVector::default().as_slice()));
    }

    #[test]
    fn test_wrong_length_invalid() {
        assert!(!validate_weights(&[10.0, 10.0, 10.0, 10.0]));
        assert!(!validate_weights(&[10.0; 6]));
        assert!(!validate_weights(&[]));
    }

    #[test]
    fn test_bounds_inclusive() {
        assert!(validate_weights(&[0.0, 100.0, 0.0, 100.0, 50.0]));
        assert!(!validate_weights(&[0.0, 100.1, 0.0, 0.0, 0.0]));
        assert!(!validate_weights(&[-0.5, 10.0, 10.0, 10.0, 10.0]));
    }

    #[test]
    fn test_non_finite_invalid() {
        assert!(!validate_weights(&[f64::NAN, 10.0, 10.0, 10.0, 10.0]));
        assert!(!validate_weights(&[f64::INFINITY, 10.0, 10.0, 10.0, 10.0]));
    }

    #[test]
    fn test_collects_all_errors() {
        let errors = weight_errors(&[-1.0, 200.0, f64::NAN, 10.0]).unwrap_err();
        // length + three bad values
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("expected 5 values, got 4"));
        assert!(errors[1].contains("weights[0]"));
        assert!(errors[3].contains("must be a number"));
    }

    #[test]
    fn test_error_names_indicator() {
        let errors = weight_errors(&[10.0, 10.0, 101.0, 10.0, 10.0]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Migrant Worker Prevalence"));
    }
}
