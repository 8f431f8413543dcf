//! Full analysis of a set of cleaned listings
//!
//! [`AnalysisReport::from_listings`] runs every analysis once, in dependency
//! order:
//!
//! ```text
//! listings ──► DatasetSummary
//!          ├─► BrandSlopeTable ──┬─► price_sensitivity per listing
//!          │                     └─► GroupComparison
//!          └─► FairPriceModel ──► predicted_price, residual, pricing_status
//! ```
//!
//! The slope table is computed a single time and shared by the slope chart
//! and the group comparison.

use carprice_stats::descriptive::DescriptiveStats;

use crate::{
    brand_slope::BrandSlopeTable,
    comparison::GroupComparison,
    fair_price::{FairPriceError, FairPriceModel, PricingStatus, StatusCounts},
    listing::CleanedListing,
    summary::DatasetSummary,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("cannot fit fair-price model")]
    FairPrice { source: FairPriceError },
}

/// A cleaned listing with the columns derived during analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedListing {
    pub listing: CleanedListing,
    pub predicted_price: Option<f64>,
    /// `price − predicted_price`; positive means cheaper than the model.
    pub residual: Option<f64>,
    pub pricing_status: Option<PricingStatus>,
    /// Slope of the listing's brand, `None` for brands without one.
    pub price_sensitivity: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub listings: Vec<AnalyzedListing>,
    pub summary: DatasetSummary,
    pub slopes: BrandSlopeTable,
    pub model: FairPriceModel,
    pub status_counts: StatusCounts,
    /// Residuals of the listings that have one.
    pub residual_stats: Option<DescriptiveStats>,
    pub comparison: GroupComparison,
}

impl AnalysisReport {
    /// Analyzes `listings`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::FairPrice`] if the fair-price model cannot be
    /// fitted. Degenerate inputs for the other statistics are not errors.
    pub fn from_listings(listings: Vec<CleanedListing>) -> Result<Self, AnalysisError> {
        let summary = DatasetSummary::new(&listings);
        let slopes = BrandSlopeTable::from_listings(&listings);
        log::info!("Fitted price sensitivity for {} brands", slopes.len());

        let model =
            FairPriceModel::fit(&listings).map_err(|source| AnalysisError::FairPrice { source })?;
        log::info!(
            "Fitted fair-price model on {} of {} listings",
            model.fitted_rows(),
            listings.len()
        );
        let comparison = GroupComparison::new(&listings, &slopes);

        let listings = listings
            .into_iter()
            .map(|listing| {
                let predicted_price = model.predict(&listing);
                let residual = model.residual(&listing);
                let price_sensitivity = slopes.sensitivity_for(&listing.brand);
                AnalyzedListing {
                    listing,
                    predicted_price,
                    residual,
                    pricing_status: residual.map(PricingStatus::from_residual),
                    price_sensitivity,
                }
            })
            .collect::<Vec<_>>();

        let status_counts = StatusCounts::from_statuses(listings.iter().map(|l| l.pricing_status));
        let residual_stats = DescriptiveStats::new(
            listings
                .iter()
                .filter_map(|l| l.residual)
                .filter(|r| r.is_finite()),
        );

        Ok(Self {
            listings,
            summary,
            slopes,
            model,
            status_counts,
            residual_stats,
            comparison,
        })
    }
}
