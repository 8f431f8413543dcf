//! Descriptive summaries of the cleaned listings
//!
//! These are the numbers printed to the console and annotated on the charts:
//! log-scale distributions, price by brand class, price/mileage correlation
//! per class and the correlation matrix of the numeric columns.

use carprice_stats::{
    boxplot::BoxPlotStats,
    correlation::{Correlation, correlation_matrix},
    descriptive::{DescriptiveStats, mean},
};

use crate::{
    brand::BrandClass,
    comparison::{SkipReason, TestOutcome},
    listing::{CleanedListing, column},
};

/// Price distribution of one brand class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassPriceSummary {
    pub class: BrandClass,
    pub stats: DescriptiveStats,
    pub boxplot: BoxPlotStats,
}

/// Pearson correlation of price and mileage within one brand class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassCorrelation {
    pub class: BrandClass,
    pub correlation: TestOutcome<Correlation>,
}

/// Correlation matrix with its column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<&'static str>,
    /// `values[i][j]` correlates `labels[i]` with `labels[j]`; `NaN` when
    /// undefined.
    pub values: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub rows: usize,
    pub log_price: Option<DescriptiveStats>,
    pub log_mileage: Option<DescriptiveStats>,
    /// Classes present in the data, in [`BrandClass::ALL`] order.
    pub price_by_class: Vec<ClassPriceSummary>,
    /// Unweighted mean of the per-class mean prices.
    pub mean_of_class_means: f64,
    /// Unweighted mean of the per-class median prices.
    pub mean_of_class_medians: f64,
    pub price_mileage_correlation: Vec<ClassCorrelation>,
    pub correlation: CorrelationMatrix,
}

fn finite(values: impl IntoIterator<Item = Option<f64>>) -> Vec<f64> {
    values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect()
}

fn column_values(
    listings: &[CleanedListing],
    get: fn(&CleanedListing) -> Option<f64>,
) -> Vec<f64> {
    listings
        .iter()
        .map(|l| get(l).unwrap_or(f64::NAN))
        .collect()
}

impl DatasetSummary {
    #[must_use]
    pub fn new(listings: &[CleanedListing]) -> Self {
        let log_price = DescriptiveStats::new(finite(listings.iter().map(|l| l.log_price)));
        let log_mileage = DescriptiveStats::new(finite(listings.iter().map(|l| l.log_mileage)));

        let in_class = |class: BrandClass| {
            listings
                .iter()
                .filter(move |l| l.brand_classification == class)
        };

        let price_by_class = BrandClass::ALL
            .into_iter()
            .filter_map(|class| {
                let prices = finite(in_class(class).map(|l| l.price));
                Some(ClassPriceSummary {
                    class,
                    stats: DescriptiveStats::new(prices.iter().copied())?,
                    boxplot: BoxPlotStats::new(prices)?,
                })
            })
            .collect::<Vec<_>>();
        let class_means = price_by_class.iter().map(|c| c.stats.mean).collect::<Vec<_>>();
        let class_medians = price_by_class
            .iter()
            .map(|c| c.stats.median)
            .collect::<Vec<_>>();

        let price_mileage_correlation = BrandClass::ALL
            .into_iter()
            .filter(|&class| in_class(class).next().is_some())
            .map(|class| {
                let (mileage, price): (Vec<f64>, Vec<f64>) = in_class(class)
                    .filter_map(|l| l.mileage.zip(l.price))
                    .filter(|(m, p)| m.is_finite() && p.is_finite())
                    .unzip();
                let correlation = match Correlation::pearson(&mileage, &price) {
                    Some(correlation) => TestOutcome::Computed(correlation),
                    None => {
                        log::warn!("price/mileage correlation undefined for {class} listings");
                        TestOutcome::Skipped(SkipReason::Undefined)
                    }
                };
                ClassCorrelation { class, correlation }
            })
            .collect();

        let numeric = [
            column_values(listings, |l| l.price),
            column_values(listings, |l| l.mileage),
            column_values(listings, |l| l.car_age),
            column_values(listings, |l| l.price_per_km),
        ];
        let columns = numeric.iter().map(Vec::as_slice).collect::<Vec<_>>();
        let correlation = CorrelationMatrix {
            labels: vec![
                column::PRICE,
                column::MILEAGE,
                column::CAR_AGE,
                column::PRICE_PER_KM,
            ],
            values: correlation_matrix(&columns),
        };

        Self {
            rows: listings.len(),
            log_price,
            log_mileage,
            price_by_class,
            mean_of_class_means: mean(&class_means),
            mean_of_class_medians: mean(&class_medians),
            price_mileage_correlation,
            correlation,
        }
    }
}
