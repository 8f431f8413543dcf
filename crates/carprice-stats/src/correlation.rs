//! Pearson correlation and correlation matrices.

use crate::distribution::StudentT;

/// Pearson product-moment correlation with a two-sided significance test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    /// Correlation coefficient in `[-1, 1]`.
    pub r: f64,
    /// Two-sided p-value for the null hypothesis `r = 0`.
    pub p_value: f64,
    /// Number of paired observations.
    pub count: usize,
}

impl Correlation {
    /// Computes the Pearson correlation of paired samples.
    ///
    /// Returns `None` when fewer than two pairs are given or either sample is
    /// constant, in which case the coefficient is undefined.
    ///
    /// # Panics
    ///
    /// Panics if `x` and `y` have different lengths.
    ///
    /// # Examples
    ///
    /// ```
    /// use carprice_stats::correlation::Correlation;
    ///
    /// let x = [1.0, 2.0, 3.0, 4.0];
    /// let y = [2.0, 4.0, 6.0, 8.0];
    /// let corr = Correlation::pearson(&x, &y).unwrap();
    /// assert!((corr.r - 1.0).abs() < 1e-12);
    /// assert_eq!(corr.p_value, 0.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn pearson(x: &[f64], y: &[f64]) -> Option<Self> {
        assert_eq!(x.len(), y.len(), "x and y must have the same length");
        let count = x.len();
        if count < 2 {
            return None;
        }

        let r = pearson_coefficient(x, y)?;
        let df = (count - 2) as f64;
        let p_value = if count == 2 {
            1.0
        } else if r.abs() >= 1.0 {
            0.0
        } else {
            let t = r * (df / (1.0 - r * r)).sqrt();
            let dist = StudentT::new(df)?;
            (2.0 * dist.sf(t.abs())).min(1.0)
        };

        Some(Self { r, p_value, count })
    }
}

/// Pearson coefficient alone, clamped to `[-1, 1]`.
#[expect(clippy::cast_precision_loss)]
fn pearson_coefficient(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let (sxy, sxx, syy) = x.iter().zip(y).fold((0.0, 0.0, 0.0), |(sxy, sxx, syy), (xi, yi)| {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        (sxy + dx * dy, sxx + dx * dx, syy + dy * dy)
    });
    if sxx.is_nan() || syy.is_nan() || sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    let r = sxy / (sxx * syy).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Pairwise Pearson correlation matrix.
///
/// Each entry uses only the rows where both columns are finite, so missing
/// values in one column do not remove rows from unrelated pairs. Entries that
/// cannot be computed (fewer than two pairs or a constant column) are `NaN`.
/// The diagonal is `1.0` whenever the column itself has spread.
///
/// # Panics
///
/// Panics if the columns have different lengths.
///
/// ```
/// use carprice_stats::correlation::correlation_matrix;
///
/// let a = [1.0, 2.0, 3.0, 4.0];
/// let b = [4.0, 3.0, 2.0, 1.0];
/// let matrix = correlation_matrix(&[&a, &b]);
/// assert!((matrix[0][1] + 1.0).abs() < 1e-12);
/// assert!((matrix[1][1] - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn correlation_matrix(columns: &[&[f64]]) -> Vec<Vec<f64>> {
    if let Some(first) = columns.first() {
        assert!(
            columns.iter().all(|c| c.len() == first.len()),
            "columns must have the same length"
        );
    }

    columns
        .iter()
        .map(|a| {
            columns
                .iter()
                .map(|b| {
                    let (xs, ys): (Vec<f64>, Vec<f64>) = a
                        .iter()
                        .zip(b.iter())
                        .filter(|(x, y)| x.is_finite() && y.is_finite())
                        .map(|(x, y)| (*x, *y))
                        .unzip();
                    if xs.len() < 2 {
                        return f64::NAN;
                    }
                    pearson_coefficient(&xs, &ys).unwrap_or(f64::NAN)
                })
                .collect()
        })
        .collect()
}
