//! Validation of generator settings values
//!
//! Every function returns a plain message; the caller scopes it to the
//! generator kind.

/// Allowed distance between a weight vector's sum and 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Validate a status weight vector and convert it to its fixed-size form
pub fn validate_status_weights<const N: usize>(weights: &[f64]) -> Result<[f64; N], String> {
    let weights: [f64; N] = weights
        .try_into()
        .map_err(|_| format!("status_weights must have exactly {N} values"))?;

    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
        return Err("status_weights must be non-negative numbers".to_string());
    }

    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err("status_weights must sum to approximately 1.0".to_string());
    }

    Ok(weights)
}

/// Validate the male weight of the user generator
pub fn validate_male_weight(male_weight: f64) -> Result<f64, String> {
    if !(0.0..=1.0).contains(&male_weight) {
        return Err("male_weight must be between 0.0 and 1.0".to_string());
    }
    Ok(male_weight)
}

/// Validate a generation interval in seconds
pub fn validate_interval(interval_secs: u64) -> Result<u64, String> {
    if interval_secs < 1 {
        return Err("interval must be at least 1 second".to_string());
    }
    Ok(interval_secs)
}
