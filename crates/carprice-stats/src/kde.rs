//! Gaussian kernel density estimation for smooth distribution curves.

use std::f64::consts::PI;

use crate::descriptive::DescriptiveStats;

/// Gaussian kernel density estimate.
///
/// Bandwidth follows Scott's rule, `h = σ · n^(-1/5)`, with the sample
/// standard deviation `σ`.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Builds an estimator from the finite values of `values`.
    ///
    /// Returns `None` when fewer than two finite values remain or the values
    /// have no spread (the bandwidth would be zero).
    ///
    /// ```
    /// use carprice_stats::kde::GaussianKde;
    ///
    /// let kde = GaussianKde::new([1.0, 2.0, 2.0, 3.0]).unwrap();
    /// assert!(kde.density(2.0) > kde.density(5.0));
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let samples = values
            .into_iter()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        let stats = DescriptiveStats::new(samples.iter().copied())?;
        let bandwidth = stats.std_dev * (samples.len() as f64).powf(-0.2);
        if !bandwidth.is_finite() || bandwidth <= 0.0 {
            return None;
        }
        Some(Self { samples, bandwidth })
    }

    /// Estimated probability density at `x`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn density(&self, x: f64) -> f64 {
        let norm = 1.0 / ((2.0 * PI).sqrt() * self.bandwidth * self.samples.len() as f64);
        self.samples
            .iter()
            .map(|s| {
                let z = (x - s) / self.bandwidth;
                (-0.5 * z * z).exp()
            })
            .sum::<f64>()
            * norm
    }

    /// Evaluates the density on `points` evenly spaced points over `[lo, hi]`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn curve(&self, lo: f64, hi: f64, points: usize) -> Vec<(f64, f64)> {
        if points < 2 {
            return vec![];
        }
        let step = (hi - lo) / (points - 1) as f64;
        (0..points)
            .map(|i| {
                let x = lo + step * i as f64;
                (x, self.density(x))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_values_have_no_estimate() {
        assert!(GaussianKde::new([3.0, 3.0, 3.0]).is_none());
        assert!(GaussianKde::new([3.0]).is_none());
    }

    #[test]
    fn test_density_integrates_to_one() {
        let kde = GaussianKde::new([0.0, 1.0, 1.5, 2.0, 4.0]).unwrap();
        let curve = kde.curve(-20.0, 24.0, 4001);
        let step = curve[1].0 - curve[0].0;
        let area = curve.iter().map(|(_, y)| y).sum::<f64>() * step;
        assert!((area - 1.0).abs() < 1e-3, "area = {area}");
    }

    #[test]
    fn test_curve_endpoints() {
        let kde = GaussianKde::new([1.0, 2.0, 3.0]).unwrap();
        let curve = kde.curve(0.0, 4.0, 5);
        assert_eq!(curve.len(), 5);
        assert_eq!(curve[0].0, 0.0);
        assert_eq!(curve[4].0, 4.0);
    }
}
