//! Used-car price analysis pipeline
//!
//! This crate turns a raw used-car listing table into cleaned, feature-rich
//! records and runs the price analyses over them.
//!
//! # Overview
//!
//! The pipeline has two stages:
//!
//! ## Preprocessing
//!
//! 1. **Load Raw Table** ([`io::read_raw_table`]): Read the source CSV as text
//! 2. **Classify Brands** ([`brand::BrandCatalog`]): Map each brand to luxury,
//!    performance or economy; unknown brands are dropped
//! 3. **Derive Features** ([`preprocess::Preprocessor`]): Coerce price and
//!    mileage, compute car age, price per km and log transforms
//! 4. **Write Cleaned Table** ([`io::write_cleaned_table`])
//!
//! ## Analysis
//!
//! 1. **Load Listings** ([`io::read_cleaned_listings`])
//! 2. **Brand Slopes** ([`brand_slope::BrandSlopeTable`]): Per-brand OLS of
//!    price on mileage (price sensitivity)
//! 3. **Fair Price** ([`fair_price::FairPriceModel`]): Global regression of
//!    price on mileage and car age, residual-based pricing status
//! 4. **Group Comparison** ([`comparison::GroupComparison`]): Luxury vs economy
//!    sensitivity, Welch t-test and Pearson correlations
//! 5. **Summaries** ([`summary::DatasetSummary`]): Descriptive statistics shown
//!    next to the charts
//!
//! [`report::AnalysisReport`] bundles the analysis results computed from one
//! set of listings.
//!
//! # Examples
//!
//! ```
//! use carprice_analysis::{
//!     brand::BrandCatalog,
//!     listing::RawTable,
//!     preprocess::Preprocessor,
//! };
//!
//! let raw = RawTable {
//!     headers: vec![
//!         "brand".into(),
//!         "year".into(),
//!         "price (eur)".into(),
//!         "mileage (kms)".into(),
//!     ],
//!     rows: vec![
//!         vec!["BMW".into(), "2020".into(), "30000".into(), "10000".into()],
//!         vec!["Lada".into(), "1990".into(), "900".into(), "200000".into()],
//!     ],
//! };
//!
//! let preprocessor = Preprocessor::new(BrandCatalog::default(), 2025);
//! let cleaned = preprocessor.clean(&raw).unwrap();
//! assert_eq!(cleaned.len(), 1);
//! assert_eq!(cleaned.rows[0].listing.car_age, Some(5.0));
//! assert_eq!(cleaned.summary.dropped_unknown, 1);
//! ```

pub mod brand;
pub mod brand_slope;
pub mod comparison;
pub mod fair_price;
pub mod io;
pub mod listing;
pub mod preprocess;
pub mod report;
pub mod summary;

/// A brand needs strictly more rows than this to get its own slope.
pub const MIN_BRAND_OBSERVATIONS: usize = 10;

/// Residual magnitude beyond which a listing is flagged as mispriced.
pub const PRICING_THRESHOLD: f64 = 3000.0;

/// Year that car ages are measured from.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2025;
