//! Box-plot summaries (quartiles, Tukey whiskers and outliers).

use crate::percentiles::compute_percentile;

/// Five-number summary with Tukey whiskers, as drawn by a box plot.
///
/// Whiskers extend to the most extreme values within `1.5 · IQR` of the
/// quartiles; values beyond them are reported as outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlotStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxPlotStats {
    /// Summarizes the finite values of `values`; `None` if there are none.
    ///
    /// ```
    /// use carprice_stats::boxplot::BoxPlotStats;
    ///
    /// let stats = BoxPlotStats::new([1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
    /// assert_eq!(stats.median, 3.5);
    /// assert_eq!(stats.upper_whisker, 5.0);
    /// assert_eq!(stats.outliers, vec![100.0]);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values
            .into_iter()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = compute_percentile(&sorted, 25.0);
        let median = compute_percentile(&sorted, 50.0);
        let q3 = compute_percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let inside = sorted
            .iter()
            .copied()
            .filter(|v| (low_fence..=high_fence).contains(v))
            .collect::<Vec<_>>();
        let lower_whisker = inside.first().copied().unwrap_or(q1);
        let upper_whisker = inside.last().copied().unwrap_or(q3);
        let outliers = sorted
            .into_iter()
            .filter(|v| !(low_fence..=high_fence).contains(v))
            .collect();

        Some(Self {
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_outliers() {
        let stats = BoxPlotStats::new([4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.q1, 1.75);
        assert_eq!(stats.q3, 3.25);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 4.0);
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn test_empty_and_non_finite() {
        assert!(BoxPlotStats::new([]).is_none());
        assert!(BoxPlotStats::new([f64::NAN, f64::INFINITY]).is_none());
    }
}
