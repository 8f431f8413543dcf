//! Per-brand price sensitivity
//!
//! For every brand with more than [`MIN_BRAND_OBSERVATIONS`] rows, price is
//! regressed on mileage with an intercept. The slope (price change per km)
//! is the brand's *price sensitivity*.
//!
//! The row count that decides eligibility includes rows with missing price or
//! mileage; the fit itself only uses rows where both are finite. Degenerate
//! fits (constant mileage, fewer than two usable rows) produce non-finite
//! coefficients and are kept as they are.

use std::collections::BTreeMap;

use carprice_stats::{descriptive::DescriptiveStats, regression::SimpleLinearFit};
use serde::Serialize;

use crate::{MIN_BRAND_OBSERVATIONS, listing::CleanedListing};

/// Regression of price on mileage for a single brand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandSlope {
    pub brand: String,
    pub slope: f64,
    pub intercept: f64,
    /// Rows of the brand, including those not usable for the fit.
    pub rows: usize,
    /// Rows the line was fitted on.
    pub fitted_rows: usize,
}

/// Brand slopes keyed by brand name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BrandSlopeTable {
    slopes: BTreeMap<String, BrandSlope>,
}

impl BrandSlopeTable {
    /// Fits a slope for each sufficiently represented brand.
    ///
    /// # Examples
    ///
    /// ```
    /// use carprice_analysis::{
    ///     brand::BrandClass, brand_slope::BrandSlopeTable, listing::CleanedListing,
    /// };
    ///
    /// let listing = |brand: &str, mileage: f64, price: f64| CleanedListing {
    ///     brand: brand.into(),
    ///     price: Some(price),
    ///     mileage: Some(mileage),
    ///     car_age: Some(5.0),
    ///     price_per_km: Some(price / mileage),
    ///     brand_classification: BrandClass::Economy,
    ///     log_price: Some(price.ln_1p()),
    ///     log_mileage: Some(mileage.ln_1p()),
    /// };
    ///
    /// let mut listings = (1..=11)
    ///     .map(|i| listing("Kia", f64::from(i) * 1000.0, 20_000.0 - f64::from(i) * 100.0))
    ///     .collect::<Vec<_>>();
    /// listings.push(listing("Opel", 5000.0, 9000.0));
    ///
    /// let table = BrandSlopeTable::from_listings(&listings);
    /// assert_eq!(table.len(), 1);
    /// assert!((table.sensitivity_for("Kia").unwrap() + 0.1).abs() < 1e-12);
    /// assert_eq!(table.sensitivity_for("Opel"), None);
    /// ```
    #[must_use]
    pub fn from_listings(listings: &[CleanedListing]) -> Self {
        let mut by_brand: BTreeMap<&str, Vec<&CleanedListing>> = BTreeMap::new();
        for listing in listings {
            by_brand.entry(listing.brand.as_str()).or_default().push(listing);
        }

        let slopes = by_brand
            .into_iter()
            .filter(|(_, rows)| rows.len() > MIN_BRAND_OBSERVATIONS)
            .map(|(brand, rows)| {
                let (mileage, price): (Vec<f64>, Vec<f64>) = rows
                    .iter()
                    .filter_map(|l| l.mileage.zip(l.price))
                    .filter(|(m, p)| m.is_finite() && p.is_finite())
                    .unzip();
                let fit = SimpleLinearFit::fit(&mileage, &price);
                log::debug!(
                    "{brand}: slope={:.6} intercept={:.2} rows={} fitted={}",
                    fit.slope,
                    fit.intercept,
                    rows.len(),
                    fit.count
                );
                let slope = BrandSlope {
                    brand: brand.to_owned(),
                    slope: fit.slope,
                    intercept: fit.intercept,
                    rows: rows.len(),
                    fitted_rows: fit.count,
                };
                (brand.to_owned(), slope)
            })
            .collect();

        Self { slopes }
    }

    /// Price sensitivity of `brand`, or `None` if it has no slope.
    ///
    /// A `NaN` slope from a degenerate fit is also reported as `None`.
    #[must_use]
    pub fn sensitivity_for(&self, brand: &str) -> Option<f64> {
        self.slopes
            .get(brand)
            .map(|s| s.slope)
            .filter(|slope| !slope.is_nan())
    }

    #[must_use]
    pub fn get(&self, brand: &str) -> Option<&BrandSlope> {
        self.slopes.get(brand)
    }

    /// Slopes in brand name order.
    pub fn iter(&self) -> impl Iterator<Item = &BrandSlope> + '_ {
        self.slopes.values()
    }

    /// Slopes ordered by increasing magnitude, as shown on the slope chart.
    #[must_use]
    pub fn sorted_by_magnitude(&self) -> Vec<&BrandSlope> {
        let mut sorted = self.slopes.values().collect::<Vec<_>>();
        sorted.sort_by(|a, b| a.slope.abs().total_cmp(&b.slope.abs()));
        sorted
    }

    /// Mean and median of the finite slopes.
    #[must_use]
    pub fn slope_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.iter().map(|s| s.slope).filter(|s| s.is_finite()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slopes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slopes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::BrandClass;

    fn listing(brand: &str, mileage: Option<f64>, price: Option<f64>) -> CleanedListing {
        CleanedListing {
            brand: brand.into(),
            price,
            mileage,
            car_age: Some(4.0),
            price_per_km: None,
            brand_classification: BrandClass::Luxury,
            log_price: None,
            log_mileage: None,
        }
    }

    fn brand_rows(brand: &str, count: u32) -> Vec<CleanedListing> {
        (0..count)
            .map(|i| {
                let mileage = f64::from(i) * 7_500.0 + 1_000.0;
                let price = 40_000.0 - 0.2 * mileage + f64::from(i % 3) * 250.0;
                listing(brand, Some(mileage), Some(price))
            })
            .collect()
    }

    #[test]
    fn test_membership_requires_more_than_ten_rows() {
        let mut listings = brand_rows("Audi", 11);
        listings.extend(brand_rows("Lexus", 10));
        listings.extend(brand_rows("BMW", 25));

        let table = BrandSlopeTable::from_listings(&listings);
        let brands = table.iter().map(|s| s.brand.as_str()).collect::<Vec<_>>();
        assert_eq!(brands, ["Audi", "BMW"]);
        assert_eq!(table.get("Audi").unwrap().rows, 11);
        assert!(table.get("Lexus").is_none());
    }

    #[test]
    fn test_slope_matches_closed_form() {
        let listings = brand_rows("BMW", 25);
        let table = BrandSlopeTable::from_listings(&listings);

        let x = listings.iter().filter_map(|l| l.mileage).collect::<Vec<_>>();
        let y = listings.iter().filter_map(|l| l.price).collect::<Vec<_>>();
        let n = 25.0;
        let mean_x = x.iter().sum::<f64>() / n;
        let mean_y = y.iter().sum::<f64>() / n;
        let sxy = x
            .iter()
            .zip(&y)
            .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
            .sum::<f64>();
        let sxx = x.iter().map(|xi| (xi - mean_x).powi(2)).sum::<f64>();

        let slope = table.get("BMW").unwrap();
        assert!((slope.slope - sxy / sxx).abs() < 1e-9);
        assert!((slope.intercept - (mean_y - sxy / sxx * mean_x)).abs() < 1e-6);
    }

    #[test]
    fn test_three_row_brand() {
        let listings = [(10_000.0, 30_000.0), (20_000.0, 25_000.0), (30_000.0, 20_000.0)]
            .map(|(m, p)| listing("Honda", Some(m), Some(p)));

        let fit = SimpleLinearFit::fit(&[10_000.0, 20_000.0, 30_000.0], &[30_000.0, 25_000.0, 20_000.0]);
        assert_eq!(fit.slope, -0.5);
        assert_eq!(fit.intercept, 35_000.0);
        assert!(BrandSlopeTable::from_listings(&listings).is_empty());
    }

    #[test]
    fn test_missing_values_count_but_are_not_fitted() {
        let mut listings = brand_rows("Audi", 9);
        listings.push(listing("Audi", None, Some(10_000.0)));
        listings.push(listing("Audi", Some(5_000.0), None));

        let table = BrandSlopeTable::from_listings(&listings);
        let slope = table.get("Audi").unwrap();
        assert_eq!(slope.rows, 11);
        assert_eq!(slope.fitted_rows, 9);
        assert!(slope.slope.is_finite());
    }

    #[test]
    fn test_constant_mileage_is_not_an_error() {
        let listings = (0..12)
            .map(|i| listing("Kia", Some(50_000.0), Some(10_000.0 + f64::from(i))))
            .collect::<Vec<_>>();

        let table = BrandSlopeTable::from_listings(&listings);
        assert_eq!(table.len(), 1);
        assert!(!table.get("Kia").unwrap().slope.is_finite());
    }

    #[test]
    fn test_sorted_by_magnitude() {
        let mut listings = Vec::new();
        for (brand, slope) in [("A", -0.3), ("B", 0.1), ("C", -0.05)] {
            listings.extend((0..11).map(|i| {
                let mileage = f64::from(i) * 1_000.0;
                listing(brand, Some(mileage), Some(20_000.0 + slope * mileage))
            }));
        }

        let table = BrandSlopeTable::from_listings(&listings);
        let order = table
            .sorted_by_magnitude()
            .iter()
            .map(|s| s.brand.as_str())
            .collect::<Vec<_>>();
        assert_eq!(order, ["C", "B", "A"]);
    }
}
