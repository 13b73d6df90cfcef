use crate::classifier::Distribution;

/// Largest class probability as a percentage, rounded to two decimals.
pub fn confidence(distribution: &Distribution) -> f64 {
    round2(distribution.max() * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
