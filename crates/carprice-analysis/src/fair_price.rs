//! Fair-price estimator
//!
//! A single linear model `price ≈ b0 + b1·mileage + b2·car_age` is fitted over
//! all listings. The residual `price − predicted` says how far a listing sits
//! from the market line: a residual above [`PRICING_THRESHOLD`] marks it
//! [`PricingStatus::Underpriced`], below the negated threshold
//! [`PricingStatus::Overpriced`], anything in between (bounds included)
//! [`PricingStatus::Fair`].

use std::fmt;

use carprice_stats::regression::{FitQuality, LinearRegression};
use serde::{Deserialize, Serialize};

use crate::{PRICING_THRESHOLD, listing::CleanedListing};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum FairPriceError {
    #[display("no listing has a finite price, mileage and car age to fit on")]
    NoData,
}

const FEATURE_NAMES: [&str; 2] = ["mileage", "car_age"];

/// Linear model of price on mileage and car age.
#[derive(Debug, Clone, PartialEq)]
pub struct FairPriceModel {
    regression: LinearRegression,
    quality: FitQuality,
    fitted_rows: usize,
}

fn features(listing: &CleanedListing) -> Option<[f64; 2]> {
    let mileage = listing.mileage.filter(|v| v.is_finite())?;
    let car_age = listing.car_age.filter(|v| v.is_finite())?;
    Some([mileage, car_age])
}

impl FairPriceModel {
    /// Fits the model on listings whose price, mileage and car age are all
    /// finite.
    ///
    /// # Errors
    ///
    /// Returns [`FairPriceError::NoData`] when no listing qualifies.
    ///
    /// A feature that is constant over the fitted rows, or proportional to
    /// the other one, is dropped from the model with a zero coefficient
    /// instead of failing the fit.
    ///
    /// # Examples
    ///
    /// ```
    /// use carprice_analysis::{
    ///     brand::BrandClass, fair_price::FairPriceModel, listing::CleanedListing,
    /// };
    ///
    /// let listing = |mileage: f64, car_age: f64, price: f64| CleanedListing {
    ///     brand: "Toyota".into(),
    ///     price: Some(price),
    ///     mileage: Some(mileage),
    ///     car_age: Some(car_age),
    ///     price_per_km: Some(price / mileage),
    ///     brand_classification: BrandClass::Economy,
    ///     log_price: Some(price.ln_1p()),
    ///     log_mileage: Some(mileage.ln_1p()),
    /// };
    /// // price = 30000 − 0.1·mileage − 1000·car_age
    /// let listings = [
    ///     listing(10_000.0, 1.0, 28_000.0),
    ///     listing(50_000.0, 3.0, 22_000.0),
    ///     listing(90_000.0, 4.0, 17_000.0),
    ///     listing(20_000.0, 8.0, 20_000.0),
    /// ];
    ///
    /// let model = FairPriceModel::fit(&listings).unwrap();
    /// let predicted = model.predict(&listings[0]).unwrap();
    /// assert!((predicted - 28_000.0).abs() < 1e-6);
    /// assert!((model.quality().r_squared - 1.0).abs() < 1e-9);
    /// ```
    pub fn fit(listings: &[CleanedListing]) -> Result<Self, FairPriceError> {
        let (x, y): (Vec<[f64; 2]>, Vec<f64>) = listings
            .iter()
            .filter_map(|l| {
                let price = l.price.filter(|v| v.is_finite())?;
                Some((features(l)?, price))
            })
            .unzip();
        if x.is_empty() {
            return Err(FairPriceError::NoData);
        }

        let regression = LinearRegression::fit(&x, &y).ok_or(FairPriceError::NoData)?;
        for (name, _) in FEATURE_NAMES
            .iter()
            .zip(&regression.aliased)
            .filter(|(_, aliased)| **aliased)
        {
            log::warn!(
                "{name} does not vary independently over {} listings; fitted without it",
                x.len()
            );
        }
        let predicted = x.iter().map(|f| regression.predict(f)).collect::<Vec<_>>();
        let quality = FitQuality::new(&y, &predicted);

        Ok(Self {
            regression,
            quality,
            fitted_rows: x.len(),
        })
    }

    /// Predicted price, or `None` when mileage or car age is missing.
    #[must_use]
    pub fn predict(&self, listing: &CleanedListing) -> Option<f64> {
        features(listing).map(|f| self.regression.predict(&f))
    }

    /// `price − predicted`, or `None` when either side is unavailable.
    #[must_use]
    pub fn residual(&self, listing: &CleanedListing) -> Option<f64> {
        let price = listing.price.filter(|v| v.is_finite())?;
        Some(price - self.predict(listing)?)
    }

    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.regression.intercept
    }

    /// Price change per km of mileage.
    #[must_use]
    pub fn mileage_coefficient(&self) -> f64 {
        self.regression.coefficients[0]
    }

    /// Price change per year of age.
    #[must_use]
    pub fn car_age_coefficient(&self) -> f64 {
        self.regression.coefficients[1]
    }

    /// In-sample R² and MSE over the fitted rows.
    #[must_use]
    pub fn quality(&self) -> FitQuality {
        self.quality
    }

    #[must_use]
    pub fn fitted_rows(&self) -> usize {
        self.fitted_rows
    }
}

/// Mispricing flag derived from a residual.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PricingStatus {
    Underpriced,
    Overpriced,
    Fair,
}

impl fmt::Display for PricingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PricingStatus::Underpriced => "underpriced",
            PricingStatus::Overpriced => "overpriced",
            PricingStatus::Fair => "fair",
        };
        fmt::Display::fmt(name, f)
    }
}

impl PricingStatus {
    pub const ALL: [PricingStatus; 3] = [
        PricingStatus::Underpriced,
        PricingStatus::Overpriced,
        PricingStatus::Fair,
    ];

    /// Classifies a residual against [`PRICING_THRESHOLD`].
    ///
    /// ```
    /// use carprice_analysis::fair_price::PricingStatus;
    ///
    /// assert_eq!(PricingStatus::from_residual(3001.0), PricingStatus::Underpriced);
    /// assert_eq!(PricingStatus::from_residual(-3001.0), PricingStatus::Overpriced);
    /// assert_eq!(PricingStatus::from_residual(3000.0), PricingStatus::Fair);
    /// ```
    #[must_use]
    pub fn from_residual(residual: f64) -> Self {
        if residual > PRICING_THRESHOLD {
            PricingStatus::Underpriced
        } else if residual < -PRICING_THRESHOLD {
            PricingStatus::Overpriced
        } else {
            PricingStatus::Fair
        }
    }
}

/// Tally of pricing statuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub underpriced: usize,
    pub overpriced: usize,
    pub fair: usize,
    /// Listings without a residual.
    pub unflagged: usize,
}

impl StatusCounts {
    #[must_use]
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = Option<PricingStatus>>,
    {
        let mut counts = Self::default();
        for status in statuses {
            match status {
                Some(PricingStatus::Underpriced) => counts.underpriced += 1,
                Some(PricingStatus::Overpriced) => counts.overpriced += 1,
                Some(PricingStatus::Fair) => counts.fair += 1,
                None => counts.unflagged += 1,
            }
        }
        counts
    }

    #[must_use]
    pub fn get(&self, status: PricingStatus) -> usize {
        match status {
            PricingStatus::Underpriced => self.underpriced,
            PricingStatus::Overpriced => self.overpriced,
            PricingStatus::Fair => self.fair,
        }
    }

    /// Statuses by descending count, ties in [`PricingStatus::ALL`] order.
    #[must_use]
    pub fn sorted(&self) -> Vec<(PricingStatus, usize)> {
        let mut sorted = PricingStatus::ALL.map(|s| (s, self.get(s))).to_vec();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }
}
