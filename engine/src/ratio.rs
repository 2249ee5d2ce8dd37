use crate::error::EngineError;

/// Ratio of two mid prices.
///
/// ```text
/// ratio = mid_a / mid_b
/// ```
///
/// A zero or non-finite denominator is an error rather than a silent
/// `inf` / `NaN`, so a bad tick can never poison the moving average.
pub fn compute_ratio(mid_a: f64, mid_b: f64) -> Result<f64, EngineError> {
    if mid_b == 0.0 || !mid_b.is_finite() {
        return Err(EngineError::DivisionByZero { denominator: mid_b });
    }

    let ratio = mid_a / mid_b;

    // mid_a is validated upstream; this only trips on overflow
    if !ratio.is_finite() {
        return Err(EngineError::DivisionByZero { denominator: mid_b });
    }

    Ok(ratio)
}
