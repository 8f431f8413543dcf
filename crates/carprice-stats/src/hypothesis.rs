//! Two-sample hypothesis tests.
//!
//! Only Welch's unequal-variance t-test is provided; its p-value comes from
//! the Student's t distribution in [`crate::distribution`].

use crate::{descriptive::DescriptiveStats, distribution::StudentT};

/// Alternative hypothesis of a two-sample test, stated for `mean(a) − mean(b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alternative {
    /// `mean(a) ≠ mean(b)`
    TwoSided,
    /// `mean(a) < mean(b)`
    Less,
    /// `mean(a) > mean(b)`
    Greater,
}

/// Outcome of a t-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTestResult {
    pub statistic: f64,
    /// Welch–Satterthwaite degrees of freedom.
    pub df: f64,
    pub p_value: f64,
}

/// Welch's two-sample t-test (unequal variances).
///
/// Returns `None` when either sample has fewer than two values or both
/// samples have zero variance, since the statistic is undefined then.
///
/// # Examples
///
/// ```
/// use carprice_stats::hypothesis::{Alternative, welch_t_test};
///
/// let a = [19.8, 20.4, 19.6, 17.8, 18.5, 18.9, 18.3, 18.9, 19.5, 22.0];
/// let b = [28.2, 26.6, 20.1, 23.3, 25.2, 22.1, 17.7, 27.6, 20.6, 13.7];
/// let less = welch_t_test(&a, &b, Alternative::Less).unwrap();
/// let greater = welch_t_test(&a, &b, Alternative::Greater).unwrap();
/// assert!(less.statistic < 0.0);
/// assert!((less.p_value + greater.p_value - 1.0).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn welch_t_test(a: &[f64], b: &[f64], alternative: Alternative) -> Option<TTestResult> {
    if a.len() < 2 || b.len() < 2 {
        return None;
    }
    let stats_a = DescriptiveStats::new(a.iter().copied())?;
    let stats_b = DescriptiveStats::new(b.iter().copied())?;

    let va = stats_a.variance / a.len() as f64;
    let vb = stats_b.variance / b.len() as f64;
    let se2 = va + vb;
    if !(se2.is_finite() && se2 > 0.0) {
        return None;
    }

    let statistic = (stats_a.mean - stats_b.mean) / se2.sqrt();
    let df = se2 * se2
        / (va * va / (a.len() - 1) as f64 + vb * vb / (b.len() - 1) as f64);
    let dist = StudentT::new(df)?;
    let p_value = match alternative {
        Alternative::TwoSided => (2.0 * dist.sf(statistic.abs())).min(1.0),
        Alternative::Less => dist.cdf(statistic),
        Alternative::Greater => dist.sf(statistic),
    };

    Some(TTestResult {
        statistic,
        df,
        p_value,
    })
}
