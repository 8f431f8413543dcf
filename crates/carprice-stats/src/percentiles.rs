//! Linearly interpolated percentiles of sorted data.

/// Computes a single percentile value from sorted data.
///
/// Uses linear interpolation between the two closest ranks, so the 50th
/// percentile of an even-sized dataset is the mean of the two middle values.
/// For `n` values the `k`-th percentile sits at fractional position
/// `(n - 1) * k / 100`.
///
/// Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use carprice_stats::percentiles::compute_percentile;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(compute_percentile(&values, 50.0), 3.0);
/// assert_eq!(compute_percentile(&values, 25.0), 2.0);
/// assert_eq!(compute_percentile(&values, 12.5), 1.5);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let last = sorted_values.len() - 1;
    let position = (last as f64 * percentile.clamp(0.0, 100.0)) / 100.0;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(last);
    let frac = position - position.floor();
    sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_nan() {
        assert!(compute_percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn test_extremes() {
        let values = [3.0, 8.0, 11.0];
        assert_eq!(compute_percentile(&values, 0.0), 3.0);
        assert_eq!(compute_percentile(&values, 100.0), 11.0);
    }

    #[test]
    fn test_quartiles_interpolate() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(compute_percentile(&values, 25.0), 1.75);
        assert_eq!(compute_percentile(&values, 50.0), 2.5);
        assert_eq!(compute_percentile(&values, 75.0), 3.25);
    }
}
