use std::path::PathBuf;

use carprice_analysis::{
    brand::BrandClass,
    brand_slope::BrandSlope,
    comparison::{GroupComparison, GroupSummary, TestOutcome},
    fair_price::StatusCounts,
    report::AnalysisReport,
};
use carprice_stats::{correlation::Correlation, hypothesis::TTestResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// JSON form of an analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportFile {
    pub generated_at: DateTime<Utc>,
    pub input: PathBuf,
    pub listings: usize,
    pub fair_price: FairPriceEntry,
    pub status_counts: StatusCounts,
    /// Ordered by increasing slope magnitude.
    pub brand_slopes: Vec<BrandSlope>,
    pub comparison: ComparisonEntry,
}

#[derive(Debug, Clone, Serialize)]
pub struct FairPriceEntry {
    pub intercept: f64,
    pub mileage_coefficient: f64,
    pub car_age_coefficient: f64,
    pub r_squared: f64,
    pub mse: f64,
    pub fitted_rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupEntry {
    pub class: BrandClass,
    pub count: usize,
    pub mean_sensitivity: f64,
    pub std_error: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutcomeEntry<T> {
    Computed(T),
    Skipped { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct TTestEntry {
    pub statistic: f64,
    pub df: f64,
    pub p_value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationEntry {
    pub r: f64,
    pub p_value: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonEntry {
    pub luxury: GroupEntry,
    pub economy: GroupEntry,
    pub t_test: OutcomeEntry<TTestEntry>,
    pub luxury_correlation: OutcomeEntry<CorrelationEntry>,
    pub economy_correlation: OutcomeEntry<CorrelationEntry>,
    pub dropped_missing: usize,
}

impl ReportFile {
    pub fn new(input: PathBuf, report: &AnalysisReport) -> Self {
        let model = &report.model;
        let quality = model.quality();
        Self {
            generated_at: Utc::now(),
            input,
            listings: report.listings.len(),
            fair_price: FairPriceEntry {
                intercept: model.intercept(),
                mileage_coefficient: model.mileage_coefficient(),
                car_age_coefficient: model.car_age_coefficient(),
                r_squared: quality.r_squared,
                mse: quality.mse,
                fitted_rows: model.fitted_rows(),
            },
            status_counts: report.status_counts,
            brand_slopes: report
                .slopes
                .sorted_by_magnitude()
                .into_iter()
                .cloned()
                .collect(),
            comparison: ComparisonEntry::new(&report.comparison),
        }
    }
}

impl From<&GroupSummary> for GroupEntry {
    fn from(summary: &GroupSummary) -> Self {
        Self {
            class: summary.class,
            count: summary.count,
            mean_sensitivity: summary.mean,
            std_error: summary.std_error,
        }
    }
}

impl<T> OutcomeEntry<T> {
    fn from_outcome<S>(outcome: &TestOutcome<S>, convert: impl FnOnce(&S) -> T) -> Self {
        match outcome {
            TestOutcome::Computed(value) => OutcomeEntry::Computed(convert(value)),
            TestOutcome::Skipped(reason) => OutcomeEntry::Skipped {
                reason: reason.to_string(),
            },
        }
    }
}

fn t_test_entry(result: &TTestResult) -> TTestEntry {
    TTestEntry {
        statistic: result.statistic,
        df: result.df,
        p_value: result.p_value,
    }
}

fn correlation_entry(correlation: &Correlation) -> CorrelationEntry {
    CorrelationEntry {
        r: correlation.r,
        p_value: correlation.p_value,
        count: correlation.count,
    }
}

impl ComparisonEntry {
    fn new(comparison: &GroupComparison) -> Self {
        Self {
            luxury: (&comparison.luxury).into(),
            economy: (&comparison.economy).into(),
            t_test: OutcomeEntry::from_outcome(&comparison.t_test, t_test_entry),
            luxury_correlation: OutcomeEntry::from_outcome(
                &comparison.luxury_correlation,
                correlation_entry,
            ),
            economy_correlation: OutcomeEntry::from_outcome(
                &comparison.economy_correlation,
                correlation_entry,
            ),
            dropped_missing: comparison.dropped_missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use carprice_analysis::comparison::SkipReason;

    use super::*;

    #[test]
    fn test_outcome_entry_is_tagged() {
        let computed = OutcomeEntry::from_outcome(
            &TestOutcome::Computed(TTestResult {
                statistic: -2.5,
                df: 10.0,
                p_value: 0.0125,
            }),
            t_test_entry,
        );
        let json = serde_json::to_value(&computed).unwrap();
        assert_eq!(json["status"], "computed");
        assert_eq!(json["p_value"], 0.0125);

        let skipped = OutcomeEntry::<TTestEntry>::from_outcome(
            &TestOutcome::Skipped(SkipReason::ConstantSensitivity(BrandClass::Luxury)),
            t_test_entry,
        );
        let json = serde_json::to_value(&skipped).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["reason"], "luxury sensitivity is constant");
    }

    #[test]
    fn test_group_entry_nan_serializes_as_null() {
        let summary = GroupSummary {
            class: BrandClass::Economy,
            count: 0,
            mean: f64::NAN,
            std_error: f64::NAN,
        };
        let json = serde_json::to_value(GroupEntry::from(&summary)).unwrap();
        assert_eq!(json["class"], "economy");
        assert!(json["mean_sensitivity"].is_null());
    }
}
