//! Luxury vs economy price sensitivity
//!
//! Each listing carries the price sensitivity of its brand (see
//! [`BrandSlopeTable`]). The comparison asks whether luxury cars lose value
//! per km faster than economy cars, i.e. whether luxury sensitivities are
//! lower (more negative):
//!
//! - one-sided Welch t-test, alternative `mean(luxury) < mean(economy)`
//! - Pearson correlation of price and sensitivity inside each group
//!
//! Listings of brands without a slope are dropped from both groups first.
//! When a group is empty or all its sensitivities are equal, the statistics
//! are undefined and reported as [`TestOutcome::Skipped`].

use std::fmt;

use carprice_stats::{
    correlation::Correlation,
    descriptive::{DescriptiveStats, distinct_count},
    hypothesis::{Alternative, TTestResult, welch_t_test},
};

use crate::{brand::BrandClass, brand_slope::BrandSlopeTable, listing::CleanedListing};

/// Result of a statistic that may be undefined for the data at hand.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum TestOutcome<T> {
    Computed(T),
    Skipped(SkipReason),
}

impl<T> TestOutcome<T> {
    #[must_use]
    pub fn computed(&self) -> Option<&T> {
        match self {
            TestOutcome::Computed(value) => Some(value),
            TestOutcome::Skipped(_) => None,
        }
    }

    fn from_option(value: Option<T>) -> Self {
        value.map_or(TestOutcome::Skipped(SkipReason::Undefined), TestOutcome::Computed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The group has no listing with a known sensitivity.
    EmptyGroup(BrandClass),
    /// Every listing of the group shares one sensitivity value.
    ConstantSensitivity(BrandClass),
    /// The statistic is undefined for another reason, such as constant prices.
    Undefined,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyGroup(class) => write!(f, "no {class} listing has a sensitivity"),
            SkipReason::ConstantSensitivity(class) => {
                write!(f, "{class} sensitivity is constant")
            }
            SkipReason::Undefined => f.write_str("statistic is undefined for this data"),
        }
    }
}

/// Mean sensitivity of one group with its standard error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSummary {
    pub class: BrandClass,
    pub count: usize,
    /// `NaN` when the group is empty.
    pub mean: f64,
    /// Standard error of the mean (`n − 1` denominator); `NaN` below two rows.
    pub std_error: f64,
}

impl GroupSummary {
    fn new(class: BrandClass, sensitivities: &[f64]) -> Self {
        let stats = DescriptiveStats::new(sensitivities.iter().copied());
        Self {
            class,
            count: sensitivities.len(),
            mean: stats.as_ref().map_or(f64::NAN, |s| s.mean),
            std_error: stats.as_ref().map_or(f64::NAN, |s| s.std_error),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupComparison {
    pub luxury: GroupSummary,
    pub economy: GroupSummary,
    /// Welch t-test of luxury against economy sensitivity, alternative "less".
    pub t_test: TestOutcome<TTestResult>,
    pub luxury_correlation: TestOutcome<Correlation>,
    pub economy_correlation: TestOutcome<Correlation>,
    /// Listings removed because their brand has no sensitivity.
    pub dropped_missing: usize,
}

struct Group {
    class: BrandClass,
    prices: Vec<Option<f64>>,
    sensitivities: Vec<f64>,
}

impl Group {
    fn collect(
        class: BrandClass,
        listings: &[CleanedListing],
        slopes: &BrandSlopeTable,
    ) -> (Self, usize) {
        let mut dropped = 0;
        let mut prices = Vec::new();
        let mut sensitivities = Vec::new();
        for listing in listings.iter().filter(|l| l.brand_classification == class) {
            match slopes.sensitivity_for(&listing.brand) {
                Some(sensitivity) => {
                    prices.push(listing.price);
                    sensitivities.push(sensitivity);
                }
                None => dropped += 1,
            }
        }
        let group = Self {
            class,
            prices,
            sensitivities,
        };
        (group, dropped)
    }

    fn skip_reason(&self) -> Option<SkipReason> {
        match distinct_count(&self.sensitivities) {
            0 => Some(SkipReason::EmptyGroup(self.class)),
            1 => Some(SkipReason::ConstantSensitivity(self.class)),
            _ => None,
        }
    }

    /// Pearson correlation of price and sensitivity over rows with a price.
    fn price_correlation(&self) -> TestOutcome<Correlation> {
        let (prices, sensitivities): (Vec<f64>, Vec<f64>) = self
            .prices
            .iter()
            .zip(&self.sensitivities)
            .filter_map(|(price, &sensitivity)| Some(((*price)?, sensitivity)))
            .filter(|(price, _)| price.is_finite())
            .unzip();
        TestOutcome::from_option(Correlation::pearson(&prices, &sensitivities))
    }
}

impl GroupComparison {
    /// Compares luxury and economy listings using the shared slope table.
    ///
    /// Performance listings take no part in the comparison.
    #[must_use]
    pub fn new(listings: &[CleanedListing], slopes: &BrandSlopeTable) -> Self {
        let (luxury, luxury_dropped) = Group::collect(BrandClass::Luxury, listings, slopes);
        let (economy, economy_dropped) = Group::collect(BrandClass::Economy, listings, slopes);
        let dropped_missing = luxury_dropped + economy_dropped;
        if dropped_missing > 0 {
            log::warn!(
                "{dropped_missing} luxury/economy listings have no price sensitivity; \
                 removed from the comparison"
            );
        }

        let skip = luxury.skip_reason().or_else(|| economy.skip_reason());
        let (t_test, luxury_correlation, economy_correlation) = match skip {
            Some(reason) => {
                log::warn!("skipping sensitivity tests: {reason}");
                (
                    TestOutcome::Skipped(reason),
                    TestOutcome::Skipped(reason),
                    TestOutcome::Skipped(reason),
                )
            }
            None => (
                TestOutcome::from_option(welch_t_test(
                    &luxury.sensitivities,
                    &economy.sensitivities,
                    Alternative::Less,
                )),
                luxury.price_correlation(),
                economy.price_correlation(),
            ),
        };

        Self {
            luxury: GroupSummary::new(BrandClass::Luxury, &luxury.sensitivities),
            economy: GroupSummary::new(BrandClass::Economy, &economy.sensitivities),
            t_test,
            luxury_correlation,
            economy_correlation,
            dropped_missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brand_rows(
        brand: &str,
        class: BrandClass,
        slope: f64,
        base: f64,
        count: u32,
    ) -> Vec<CleanedListing> {
        (0..count)
            .map(|i| {
                let mileage = f64::from(i) * 5_000.0 + 2_000.0;
                let price = base + slope * mileage;
                CleanedListing {
                    brand: brand.into(),
                    price: Some(price),
                    mileage: Some(mileage),
                    car_age: Some(3.0),
                    price_per_km: Some(price / mileage),
                    brand_classification: class,
                    log_price: Some(price.ln_1p()),
                    log_mileage: Some(mileage.ln_1p()),
                }
            })
            .collect()
    }

    #[test]
    fn test_luxury_more_sensitive() {
        let mut listings = Vec::new();
        listings.extend(brand_rows("BMW", BrandClass::Luxury, -0.30, 60_000.0, 12));
        listings.extend(brand_rows("Audi", BrandClass::Luxury, -0.28, 55_000.0, 14));
        listings.extend(brand_rows("Lexus", BrandClass::Luxury, -0.33, 58_000.0, 13));
        listings.extend(brand_rows("Kia", BrandClass::Economy, -0.08, 18_000.0, 15));
        listings.extend(brand_rows("Opel", BrandClass::Economy, -0.10, 16_000.0, 12));
        listings.extend(brand_rows("Ford", BrandClass::Economy, -0.07, 17_000.0, 11));
        listings.extend(brand_rows("Tesla", BrandClass::Performance, -0.5, 70_000.0, 20));

        let slopes = BrandSlopeTable::from_listings(&listings);
        let comparison = GroupComparison::new(&listings, &slopes);

        assert_eq!(comparison.dropped_missing, 0);
        assert_eq!(comparison.luxury.count, 39);
        assert_eq!(comparison.economy.count, 38);
        assert!(comparison.luxury.mean < comparison.economy.mean);

        let t_test = comparison.t_test.computed().unwrap();
        assert!(t_test.statistic < 0.0);
        assert!(t_test.p_value < 0.001);
        assert!(comparison.luxury_correlation.is_computed());
        assert!(comparison.economy_correlation.is_computed());
    }

    #[test]
    fn test_constant_sensitivity_skips_all_tests() {
        let mut listings = Vec::new();
        listings.extend(brand_rows("BMW", BrandClass::Luxury, -0.30, 60_000.0, 12));
        listings.extend(brand_rows("Kia", BrandClass::Economy, -0.08, 18_000.0, 15));
        listings.extend(brand_rows("Opel", BrandClass::Economy, -0.10, 16_000.0, 12));

        let slopes = BrandSlopeTable::from_listings(&listings);
        let comparison = GroupComparison::new(&listings, &slopes);

        let expected = SkipReason::ConstantSensitivity(BrandClass::Luxury);
        assert_eq!(comparison.t_test, TestOutcome::Skipped(expected));
        assert_eq!(comparison.luxury_correlation, TestOutcome::Skipped(expected));
        assert_eq!(comparison.economy_correlation, TestOutcome::Skipped(expected));
        assert_eq!(comparison.luxury.count, 12);
        assert!(comparison.luxury.mean.is_finite());
    }

    #[test]
    fn test_brands_without_slope_are_dropped() {
        let mut listings = Vec::new();
        listings.extend(brand_rows("BMW", BrandClass::Luxury, -0.30, 60_000.0, 12));
        listings.extend(brand_rows("Audi", BrandClass::Luxury, -0.25, 50_000.0, 5));
        listings.extend(brand_rows("Kia", BrandClass::Economy, -0.08, 18_000.0, 15));

        let slopes = BrandSlopeTable::from_listings(&listings);
        let comparison = GroupComparison::new(&listings, &slopes);

        assert_eq!(comparison.dropped_missing, 5);
        assert_eq!(comparison.luxury.count, 12);
        assert!(comparison.t_test.is_skipped());
    }

    #[test]
    fn test_empty_group() {
        let listings = brand_rows("Kia", BrandClass::Economy, -0.08, 18_000.0, 15);
        let slopes = BrandSlopeTable::from_listings(&listings);
        let comparison = GroupComparison::new(&listings, &slopes);

        assert_eq!(
            comparison.t_test,
            TestOutcome::Skipped(SkipReason::EmptyGroup(BrandClass::Luxury))
        );
        assert_eq!(comparison.luxury.count, 0);
        assert!(comparison.luxury.mean.is_nan());
        assert_eq!(
            SkipReason::EmptyGroup(BrandClass::Luxury).to_string(),
            "no luxury listing has a sensitivity"
        );
    }
}
