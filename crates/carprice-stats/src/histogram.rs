//! Equal-width histograms.

use std::ops::Range;

/// A histogram representation of a dataset's distribution.
///
/// The histogram divides the observed range `[min, max]` into equal-width
/// bins and counts the values falling into each bin. The maximum value is
/// counted in the last bin.
#[derive(Debug, Clone)]
pub struct Histogram {
    /// The bins comprising the histogram, in ascending order.
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
#[derive(Debug, Clone)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end).
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl Histogram {
    /// Creates a histogram with `num_bins` equal-width bins.
    ///
    /// Non-finite values are ignored. If every value is identical the single
    /// value is centered in a unit-wide range.
    ///
    /// # Examples
    ///
    /// ```
    /// # use carprice_stats::histogram::Histogram;
    /// let values = [1.0, 2.0, 2.5, 3.0, 4.0];
    /// let histogram = Histogram::new(values, 3);
    /// assert_eq!(histogram.bins.len(), 3);
    /// assert_eq!(histogram.total(), 5);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn new<I>(values: I, num_bins: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values
            .into_iter()
            .filter(|v| v.is_finite())
            .collect::<Vec<_>>();
        if values.is_empty() || num_bins == 0 {
            return Self { bins: vec![] };
        }

        let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max - min < f64::EPSILON * min.abs().max(1.0) {
            // Concentrated at a single value
            min -= 0.5;
            max += 0.5;
        }
        let bin_width = (max - min) / num_bins as f64;

        let mut bins = (0..num_bins)
            .map(|idx| HistogramBin {
                // Recompute boundaries from the origin to avoid accumulation errors
                range: (min + idx as f64 * bin_width)..(min + (idx + 1) as f64 * bin_width),
                count: 0,
            })
            .collect::<Vec<_>>();

        for val in values {
            let idx = ((val - min) / bin_width).floor() as usize;
            bins[idx.min(num_bins - 1)].count += 1;
        }

        Self { bins }
    }

    /// Total number of values counted.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    /// Width of each bin, or `None` for an empty histogram.
    #[must_use]
    pub fn bin_width(&self) -> Option<f64> {
        self.bins.first().map(|bin| bin.range.end - bin.range.start)
    }

    /// Largest bin count.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        let histogram = Histogram::new([], 10);
        assert!(histogram.bins.is_empty());
        assert_eq!(histogram.bin_width(), None);
    }

    #[test]
    fn test_max_value_in_last_bin() {
        let histogram = Histogram::new([0.0, 1.0, 2.0, 3.0, 4.0], 4);
        let counts = histogram.bins.iter().map(|b| b.count).collect::<Vec<_>>();
        assert_eq!(counts, vec![1, 1, 1, 2]);
        assert_eq!(histogram.max_count(), 2);
    }

    #[test]
    fn test_non_finite_ignored() {
        let histogram = Histogram::new([1.0, f64::NAN, f64::INFINITY, 2.0], 2);
        assert_eq!(histogram.total(), 2);
    }

    #[test]
    fn test_all_same_value() {
        let histogram = Histogram::new([42.0; 10], 5);
        assert_eq!(histogram.total(), 10);
        let first = &histogram.bins[0];
        let last = &histogram.bins[4];
        assert!(first.range.start < 42.0 && 42.0 < last.range.end);
    }
}
