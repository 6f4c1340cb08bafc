use super::criteria::{Scores, WeightVector};

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

/// Validate an employee name and score set.
/// Returns all validation errors at once (not just the first).
pub fn validate_employee(name: &str, scores: &Scores) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if name.trim().is_empty() {
        errors.push("name: must not be empty".to_string());
    }

    for (criterion, score) in scores.iter() {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            errors.push(format!(
                "scores.{}: must be between {} and {}, got {}",
                criterion, MIN_SCORE, MAX_SCORE, score
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a weight vector. Zero weights (and a zero total) are allowed.
pub fn validate_weights(weights: &WeightVector) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (criterion, weight) in weights.iter() {
        if !weight.is_finite() {
            errors.push(format!("weights.{}: must be a finite number", criterion));
        } else if weight < 0.0 {
            errors.push(format!(
                "weights.{}: must be non-negative, got {}",
                criterion, weight
            ));
        }
    }

    // Finite weights can still overflow when summed
    if errors.is_empty() && !weights.total().is_finite() {
        errors.push("weights: total must be a finite number".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
