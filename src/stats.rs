//! Scalar statistics shared by the response aggregator and the propagators.

/// Floor added to every expert variance so precision weights (1/variance)
/// stay finite even for a single sample.
pub const VARIANCE_EPSILON: f64 = 1e-6;

/// Arithmetic mean. `None` on empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance with Bessel's correction (divide by n - 1).
/// Defined as 0 when fewer than two samples.
pub fn sample_variance(values: &[f64], mean: f64) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    sum_sq / (n - 1) as f64
}

/// Combine independent (mean, variance) estimates by inverse-variance
/// (precision) weighting:
///
/// w_i = 1/var_i, mean = Σ(w_i·m_i)/Σw_i, variance = 1/Σw_i.
///
/// `None` on empty input. Variances are assumed strictly positive; the
/// aggregator's epsilon floor guarantees that for expert statistics.
pub fn fuse_inverse_variance(estimates: &[(f64, f64)]) -> Option<(f64, f64)> {
    if estimates.is_empty() {
        return None;
    }
    let mut weight_total = 0.0;
    let mut weighted_sum = 0.0;
    for &(m, v) in estimates {
        let w = 1.0 / v;
        weight_total += w;
        weighted_sum += w * m;
    }
    Some((weighted_sum / weight_total, 1.0 / weight_total))
}

/// Mean and variance of the product of two independent uncertain quantities:
///
/// mean = mA·mB, variance = mA²·vB + mB²·vA + vA·vB.
pub fn product_of_independent(
    mean_a: f64,
    var_a: f64,
    mean_b: f64,
    var_b: f64,
) -> (f64, f64) {
    let mean = mean_a * mean_b;
    let variance = mean_a * mean_a * var_b + mean_b * mean_b * var_a + var_a * var_b;
    (mean, variance)
}

// =============================================================================
// TESTS
// =============================================================================
