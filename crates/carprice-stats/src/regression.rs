//! Ordinary least squares fits.
//!
//! Two closed-form estimators are provided:
//!
//! - [`SimpleLinearFit`]: one predictor with intercept, `y = a + b·x`
//! - [`LinearRegression`]: several predictors with intercept, solved through
//!   the standardized normal equations; rank-deficient features are aliased
//!   instead of failing the fit
//!
//! [`FitQuality`] reports the in-sample coefficient of determination and mean
//! squared error of any set of predictions.

/// Least-squares line `y = intercept + slope · x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimpleLinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Number of observations used for the fit.
    pub count: usize,
}

impl SimpleLinearFit {
    /// Fits `y` on `x` by the closed-form least-squares solution.
    ///
    /// Degenerate inputs are not rejected: constant `x` yields a non-finite
    /// slope and an empty input yields `NaN` coefficients.
    ///
    /// # Panics
    ///
    /// Panics if `x` and `y` have different lengths.
    ///
    /// ```
    /// use carprice_stats::regression::SimpleLinearFit;
    ///
    /// let fit = SimpleLinearFit::fit(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
    /// assert_eq!(fit.slope, 2.0);
    /// assert_eq!(fit.intercept, 0.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fit(x: &[f64], y: &[f64]) -> Self {
        assert_eq!(x.len(), y.len(), "x and y must have the same length");

        let count = x.len();
        let n = count as f64;
        let mean_x = x.iter().sum::<f64>() / n;
        let mean_y = y.iter().sum::<f64>() / n;
        let (sxy, sxx) = x
            .iter()
            .zip(y)
            .fold((0.0, 0.0), |(sxy, sxx), (&xi, &yi)| {
                let dx = xi - mean_x;
                (sxy + dx * (yi - mean_y), sxx + dx * dx)
            });
        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;

        Self {
            slope,
            intercept,
            count,
        }
    }

    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Multiple linear regression `y = intercept + Σ coefficients[j] · x[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    /// Features left out of the fit because they are constant or a linear
    /// combination of earlier features. Their coefficient is zero.
    pub aliased: Vec<bool>,
}

/// Smallest pivot, relative to the unit diagonal of the standardized system,
/// for which a feature still counts as linearly independent.
const ALIAS_TOLERANCE: f64 = 1e-10;

impl LinearRegression {
    /// Fits `y` on the feature rows in `x` (one row per observation).
    ///
    /// Columns are centered and scaled to unit length before the normal
    /// equations are formed, so features of very different magnitude do not
    /// drown each other out. The system is solved by a Cholesky factorization
    /// that skips features whose remaining variance vanishes: such features
    /// are reported in [`aliased`](Self::aliased) and get a zero coefficient,
    /// and the fit is the least-squares fit over the remaining features.
    ///
    /// Returns `None` only when there are no observations or rows have
    /// inconsistent widths.
    ///
    /// ```
    /// use carprice_stats::regression::LinearRegression;
    ///
    /// // y = 1 + 2·a − 3·b
    /// let x = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![2.0, 3.0]];
    /// let y = vec![1.0, 3.0, -2.0, -4.0];
    /// let model = LinearRegression::fit(&x, &y).unwrap();
    /// assert!((model.intercept - 1.0).abs() < 1e-9);
    /// assert!((model.coefficients[0] - 2.0).abs() < 1e-9);
    /// assert!((model.coefficients[1] + 3.0).abs() < 1e-9);
    /// assert_eq!(model.aliased, [false, false]);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn fit<R>(x: &[R], y: &[f64]) -> Option<Self>
    where
        R: AsRef<[f64]>,
    {
        if x.is_empty() || x.len() != y.len() {
            return None;
        }
        let width = x[0].as_ref().len();
        if x.iter().any(|row| row.as_ref().len() != width) {
            return None;
        }

        let n = x.len() as f64;
        let mut sums = vec![0.0; width];
        let mut magnitudes = vec![0.0_f64; width];
        for row in x {
            let columns = sums.iter_mut().zip(&mut magnitudes);
            for ((sum, magnitude), value) in columns.zip(row.as_ref()) {
                *sum += value;
                *magnitude = magnitude.max(value.abs());
            }
        }
        let means = sums.iter().map(|sum| sum / n).collect::<Vec<_>>();
        let mean_y = y.iter().sum::<f64>() / n;

        // Centered cross products X'X and X'y
        let mut xtx = vec![vec![0.0; width]; width];
        let mut xty = vec![0.0; width];
        for (row, &yi) in x.iter().zip(y) {
            let centered = row
                .as_ref()
                .iter()
                .zip(&means)
                .map(|(value, mean)| value - mean)
                .collect::<Vec<_>>();
            let dy = yi - mean_y;
            for (i, &ci) in centered.iter().enumerate() {
                for (j, &cj) in centered.iter().enumerate() {
                    xtx[i][j] += ci * cj;
                }
                xty[i] += ci * dy;
            }
        }

        // Column lengths; constant columns (up to rounding) get none
        let norms = (0..width)
            .map(|j| {
                let norm = xtx[j][j].sqrt();
                let floor = ALIAS_TOLERANCE * magnitudes[j] * n.sqrt();
                (norm.is_finite() && norm > floor).then_some(norm)
            })
            .collect::<Vec<_>>();
        let scaled = |i: usize, j: usize| match (norms[i], norms[j]) {
            (Some(ni), Some(nj)) => xtx[i][j] / (ni * nj),
            _ => 0.0,
        };
        let system = (0..width)
            .map(|i| (0..width).map(|j| scaled(i, j)).collect())
            .collect::<Vec<Vec<f64>>>();
        let rhs = (0..width)
            .map(|i| norms[i].map_or(0.0, |ni| xty[i] / ni))
            .collect::<Vec<_>>();

        let (scaled_coefficients, aliased) = solve_normal_equations(&system, &rhs);
        let coefficients = scaled_coefficients
            .iter()
            .zip(&norms)
            .map(|(beta, norm)| norm.map_or(0.0, |norm| beta / norm))
            .collect::<Vec<_>>();
        let intercept = mean_y
            - coefficients
                .iter()
                .zip(&means)
                .map(|(beta, mean)| beta * mean)
                .sum::<f64>();

        Some(Self {
            intercept,
            coefficients,
            aliased,
        })
    }

    /// Predicts the response for one feature row.
    #[must_use]
    pub fn predict(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(beta, value)| beta * value)
                .sum::<f64>()
    }
}

/// Solves `A·b = c` for a symmetric positive semi-definite `A` with unit (or
/// zero) diagonal.
///
/// Pivots below [`ALIAS_TOLERANCE`] mark the feature as aliased; it is left
/// out of the factorization and its coefficient is zero.
fn solve_normal_equations(system: &[Vec<f64>], rhs: &[f64]) -> (Vec<f64>, Vec<bool>) {
    let n = system.len();
    let mut lower = vec![vec![0.0; n]; n];
    let mut aliased = vec![false; n];

    for k in 0..n {
        let dot = |i: usize| (0..k).map(|j| lower[i][j] * lower[k][j]).sum::<f64>();
        let pivot = system[k][k] - dot(k);
        if pivot.is_nan() || pivot <= ALIAS_TOLERANCE {
            aliased[k] = true;
            continue;
        }
        let diagonal = pivot.sqrt();
        let column = ((k + 1)..n)
            .map(|i| (system[i][k] - dot(i)) / diagonal)
            .collect::<Vec<_>>();
        lower[k][k] = diagonal;
        for (i, value) in ((k + 1)..n).zip(column) {
            lower[i][k] = value;
        }
    }

    // Forward then backward substitution over the independent features
    let mut z = vec![0.0; n];
    for k in (0..n).filter(|&k| !aliased[k]) {
        let tail = (0..k).map(|j| lower[k][j] * z[j]).sum::<f64>();
        z[k] = (rhs[k] - tail) / lower[k][k];
    }
    let mut solution = vec![0.0; n];
    for k in (0..n).rev().filter(|&k| !aliased[k]) {
        let tail = ((k + 1)..n).map(|i| lower[i][k] * solution[i]).sum::<f64>();
        solution[k] = (z[k] - tail) / lower[k][k];
    }
    (solution, aliased)
}

/// In-sample goodness of fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitQuality {
    /// Coefficient of determination, `1 − SS_res / SS_tot`.
    pub r_squared: f64,
    /// Mean squared error of the predictions.
    pub mse: f64,
}

impl FitQuality {
    /// Compares `actual` against `predicted`.
    ///
    /// # Panics
    ///
    /// Panics if the slices have different lengths.
    ///
    /// ```
    /// use carprice_stats::regression::FitQuality;
    ///
    /// let quality = FitQuality::new(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
    /// assert_eq!(quality.r_squared, 1.0);
    /// assert_eq!(quality.mse, 0.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(actual: &[f64], predicted: &[f64]) -> Self {
        assert_eq!(
            actual.len(),
            predicted.len(),
            "actual and predicted must have the same length"
        );
        let n = actual.len() as f64;
        let mean = actual.iter().sum::<f64>() / n;
        let ss_res = actual
            .iter()
            .zip(predicted)
            .map(|(a, p)| (a - p).powi(2))
            .sum::<f64>();
        let ss_tot = actual.iter().map(|a| (a - mean).powi(2)).sum::<f64>();

        Self {
            r_squared: 1.0 - ss_res / ss_tot,
            mse: ss_res / n,
        }
    }
}
