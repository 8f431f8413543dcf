//! Locally weighted scatterplot smoothing (LOWESS).
//!
//! Each output point is the value of a weighted linear fit over the nearest
//! `frac · n` neighbours, with tricube distance weights. Robustness passes
//! re-weight observations by the bisquare of their scaled residuals so that
//! outliers stop pulling the curve.
//!
//! Points closer than `delta` to the previous fitted point are linearly
//! interpolated instead of fitted, which keeps large scatter plots cheap.

/// LOWESS configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lowess {
    /// Fraction of the data used in each local fit.
    pub frac: f64,
    /// Number of robustifying iterations after the initial fit.
    pub iterations: usize,
    /// Distance along `x` within which fits are interpolated.
    pub delta: f64,
}

impl Default for Lowess {
    fn default() -> Self {
        Self {
            frac: 2.0 / 3.0,
            iterations: 3,
            delta: 0.0,
        }
    }
}

impl Lowess {
    /// Smooths `y` against `x`, returning `(x, fitted)` pairs sorted by `x`.
    ///
    /// Pairs with a non-finite coordinate are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `x` and `y` have different lengths.
    ///
    /// # Examples
    ///
    /// ```
    /// use carprice_stats::smoothing::Lowess;
    ///
    /// let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    /// let y = [3.0, 5.0, 7.0, 9.0, 11.0, 13.0];
    /// let curve = Lowess::default().fit(&x, &y);
    /// for (xi, yi) in curve {
    ///     assert!((yi - (2.0 * xi + 1.0)).abs() < 1e-9);
    /// }
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn fit(&self, x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
        assert_eq!(x.len(), y.len(), "x and y must have the same length");

        let mut points = x
            .iter()
            .zip(y)
            .filter(|(xi, yi)| xi.is_finite() && yi.is_finite())
            .map(|(xi, yi)| (*xi, *yi))
            .collect::<Vec<_>>();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (xs, ys): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
        let n = xs.len();
        if n < 2 {
            return xs.into_iter().zip(ys).collect();
        }

        let k = ((self.frac * n as f64).ceil() as usize).clamp(2, n);
        let mut robustness = vec![1.0; n];
        let mut fitted = self.smooth_pass(&xs, &ys, &robustness, k);

        for _ in 0..self.iterations {
            let mut residuals = ys
                .iter()
                .zip(&fitted)
                .map(|(yi, fi)| (yi - fi).abs())
                .collect::<Vec<_>>();
            residuals.sort_by(f64::total_cmp);
            let scale = crate::percentiles::compute_percentile(&residuals, 50.0);
            if scale.is_nan() || scale <= 0.0 {
                break;
            }
            for ((weight, yi), fi) in robustness.iter_mut().zip(&ys).zip(&fitted) {
                *weight = bisquare((yi - fi) / (6.0 * scale));
            }
            fitted = self.smooth_pass(&xs, &ys, &robustness, k);
        }

        xs.into_iter().zip(fitted).collect()
    }

    fn smooth_pass(&self, xs: &[f64], ys: &[f64], robustness: &[f64], k: usize) -> Vec<f64> {
        let n = xs.len();
        let mut fitted = vec![0.0; n];
        let mut left = 0;
        let mut previous: Option<usize> = None;
        let mut i = 0;

        loop {
            // Slide the k-nearest window so it stays centered on xs[i]
            while left + k < n && xs[i] - xs[left] > xs[left + k] - xs[i] {
                left += 1;
            }
            let right = left + k - 1;
            fitted[i] = local_linear_fit(xs, ys, robustness, i, left, right);

            if let Some(p) = previous {
                let span = xs[i] - xs[p];
                for j in (p + 1)..i {
                    fitted[j] = if span > 0.0 {
                        let t = (xs[j] - xs[p]) / span;
                        fitted[p] + t * (fitted[i] - fitted[p])
                    } else {
                        fitted[p]
                    };
                }
            }
            if i + 1 >= n {
                break;
            }

            previous = Some(i);
            let mut j = i + 1;
            while j < n && xs[j] <= xs[i] + self.delta {
                j += 1;
            }
            i = if j - 1 > i { j - 1 } else { j };
        }

        fitted
    }
}

fn local_linear_fit(
    xs: &[f64],
    ys: &[f64],
    robustness: &[f64],
    i: usize,
    left: usize,
    right: usize,
) -> f64 {
    let x0 = xs[i];
    let h = f64::max(x0 - xs[left], xs[right] - x0);

    let weights = (left..=right)
        .map(|j| {
            let distance = if h > 0.0 { (xs[j] - x0).abs() / h } else { 0.0 };
            tricube(distance) * robustness[j]
        })
        .collect::<Vec<_>>();
    let total = weights.iter().sum::<f64>();
    if total.is_nan() || total <= 0.0 {
        return ys[i];
    }

    let window = left..=right;
    let mean_x = window
        .clone()
        .zip(&weights)
        .map(|(j, w)| w * xs[j])
        .sum::<f64>()
        / total;
    let mean_y = window
        .clone()
        .zip(&weights)
        .map(|(j, w)| w * ys[j])
        .sum::<f64>()
        / total;
    let (sxy, sxx) = window
        .zip(&weights)
        .fold((0.0, 0.0), |(sxy, sxx), (j, w)| {
            let dx = xs[j] - mean_x;
            (sxy + w * dx * (ys[j] - mean_y), sxx + w * dx * dx)
        });

    if sxx > f64::EPSILON * h * h * total {
        mean_y + sxy / sxx * (x0 - mean_x)
    } else {
        mean_y
    }
}

fn tricube(u: f64) -> f64 {
    if u >= 1.0 {
        0.0
    } else {
        (1.0 - u.powi(3)).powi(3)
    }
}

fn bisquare(u: f64) -> f64 {
    if u.abs() >= 1.0 {
        0.0
    } else {
        (1.0 - u * u).powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_sorted_by_x() {
        let x = [3.0, 1.0, 2.0, f64::NAN, 5.0, 4.0];
        let y = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let curve = Lowess::default().fit(&x, &y);
        assert_eq!(curve.len(), 5);
        assert!(curve.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn test_robust_to_single_outlier() {
        let x = (0..20).map(f64::from).collect::<Vec<_>>();
        let mut y = x.iter().map(|v| 0.5 * v + 2.0).collect::<Vec<_>>();
        y[10] += 100.0;
        let curve = Lowess::default().fit(&x, &y);
        let (x10, y10) = curve[10];
        assert_eq!(x10, 10.0);
        assert!((y10 - 7.0).abs() < 1.0, "fitted {y10}");
    }

    #[test]
    fn test_delta_interpolation_stays_on_line() {
        let x = (0..200).map(|i| f64::from(i) * 0.5).collect::<Vec<_>>();
        let y = x.iter().map(|v| -3.0 * v + 10.0).collect::<Vec<_>>();
        let lowess = Lowess {
            delta: 5.0,
            ..Lowess::default()
        };
        for (xi, yi) in lowess.fit(&x, &y) {
            assert!((yi - (-3.0 * xi + 10.0)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_tiny_inputs() {
        assert!(Lowess::default().fit(&[], &[]).is_empty());
        assert_eq!(Lowess::default().fit(&[1.0], &[2.0]), vec![(1.0, 2.0)]);
    }
}
