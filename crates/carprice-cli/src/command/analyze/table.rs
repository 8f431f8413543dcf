//! Console tables for the analysis command
//!
//! Each function prints the numbers annotated on the matching chart.

use carprice_analysis::{
    brand_slope::BrandSlopeTable,
    comparison::{GroupComparison, GroupSummary, TestOutcome},
    fair_price::FairPriceModel,
    report::AnalysisReport,
    summary::{CorrelationMatrix, DatasetSummary},
};
use carprice_stats::{correlation::Correlation, descriptive::DescriptiveStats};

fn print_title(title: &str) {
    println!("{title}");
    println!("{}", "=".repeat(title.chars().count()));
}

/// Formats a possibly undefined statistic.
fn fmt_value(value: f64, precision: usize) -> String {
    if value.is_nan() {
        "N/A".to_string()
    } else {
        format!("{value:.precision$}")
    }
}

fn fmt_correlation(outcome: &TestOutcome<Correlation>) -> String {
    match outcome {
        TestOutcome::Computed(c) => {
            format!("r={:.4}, p-value={:.2e}, n={}", c.r, c.p_value, c.count)
        }
        TestOutcome::Skipped(reason) => format!("skipped ({reason})"),
    }
}

fn print_center(label: &str, stats: Option<&DescriptiveStats>) {
    match stats {
        Some(stats) => println!(
            "  {:<16} {:>8} {:>12.4} {:>12.4}",
            label, stats.count, stats.mean, stats.median
        ),
        None => println!("  {label:<16} {:>8} {:>12} {:>12}", 0, "N/A", "N/A"),
    }
}

pub(super) fn print_log_distributions(summary: &DatasetSummary) {
    print_title("Log-Scale Distributions");
    println!("  {:<16} {:>8} {:>12} {:>12}", "Column", "Count", "Mean", "Median");
    println!("  {}", "-".repeat(51));
    print_center("log_price", summary.log_price.as_ref());
    print_center("log_mileage", summary.log_mileage.as_ref());
    println!();
}

pub(super) fn print_price_by_class(summary: &DatasetSummary) {
    print_title("Price by Classification");
    println!(
        "  {:<12} {:>8} {:>12} {:>12} {:>12} {:>12}",
        "Class", "Count", "Mean", "Median", "Q1", "Q3"
    );
    println!("  {}", "-".repeat(73));
    for class in &summary.price_by_class {
        println!(
            "  {:<12} {:>8} {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
            class.class.as_str(),
            class.stats.count,
            class.stats.mean,
            class.stats.median,
            class.boxplot.q1,
            class.boxplot.q3,
        );
    }
    println!(
        "  Mean of class means: {}, mean of class medians: {}",
        fmt_value(summary.mean_of_class_means, 2),
        fmt_value(summary.mean_of_class_medians, 2)
    );
    println!();
}

pub(super) fn print_price_mileage_correlation(summary: &DatasetSummary) {
    print_title("Price vs Mileage Correlation");
    for class in &summary.price_mileage_correlation {
        println!(
            "  {:<12} {}",
            class.class.as_str(),
            fmt_correlation(&class.correlation)
        );
    }
    println!();
}

pub(super) fn print_correlation_matrix(matrix: &CorrelationMatrix) {
    print_title("Correlation Matrix (Pearson)");
    print!("  {:<14}", "");
    for label in &matrix.labels {
        print!(" {label:>14}");
    }
    println!();
    for (label, row) in matrix.labels.iter().zip(&matrix.values) {
        print!("  {label:<14}");
        for value in row {
            print!(" {:>14}", fmt_value(*value, 4));
        }
        println!();
    }
    println!();
}

pub(super) fn print_brand_slopes(slopes: &BrandSlopeTable) {
    print_title("Price Sensitivity by Brand");
    println!(
        "  {:<16} {:>14} {:>14} {:>8} {:>8}",
        "Brand", "Slope", "Intercept", "Rows", "Fitted"
    );
    println!("  {}", "-".repeat(64));
    for slope in slopes.sorted_by_magnitude() {
        println!(
            "  {:<16} {:>14} {:>14} {:>8} {:>8}",
            slope.brand,
            fmt_value(slope.slope, 6),
            fmt_value(slope.intercept, 2),
            slope.rows,
            slope.fitted_rows,
        );
    }
    match slopes.slope_stats() {
        Some(stats) => println!(
            "  Mean slope: {:.6}, median slope: {:.6}",
            stats.mean, stats.median
        ),
        None => println!("  No brand has more than the minimum number of listings"),
    }
    println!();
}

pub(super) fn print_fit_quality(model: &FairPriceModel) {
    let quality = model.quality();
    print_title("Fair-Price Model");
    println!(
        "  price = {:.2} + {:.6} * mileage + {:.2} * car_age",
        model.intercept(),
        model.mileage_coefficient(),
        model.car_age_coefficient()
    );
    println!("  {:<12} {:>16}", "Fitted rows", model.fitted_rows());
    println!("  {:<12} {:>16.4}", "R-squared", quality.r_squared);
    println!("  {:<12} {:>16.2}", "MSE", quality.mse);
    println!();
}

pub(super) fn print_residuals(report: &AnalysisReport) {
    print_title("Residuals and Pricing Status");
    match &report.residual_stats {
        Some(stats) => println!(
            "  Mean residual: {:.2}, median residual: {:.2}",
            stats.mean, stats.median
        ),
        None => println!("  No listing has a residual"),
    }
    for (status, count) in report.status_counts.sorted() {
        println!("  {:<12} {:>8}", status.to_string(), count);
    }
    if report.status_counts.unflagged > 0 {
        println!("  {:<12} {:>8}", "(missing)", report.status_counts.unflagged);
    }
    println!();
}

fn print_group(group: &GroupSummary) {
    println!(
        "  {:<12} {:>8} {:>14} {:>14}",
        group.class.as_str(),
        group.count,
        fmt_value(group.mean, 6),
        fmt_value(group.std_error, 6),
    );
}

pub(super) fn print_comparison(comparison: &GroupComparison) {
    print_title("Luxury vs Economy Price Sensitivity");
    if comparison.dropped_missing > 0 {
        println!(
            "  {} listings without a sensitivity were excluded",
            comparison.dropped_missing
        );
    }
    println!(
        "  {:<12} {:>8} {:>14} {:>14}",
        "Class", "Count", "Mean", "Std. error"
    );
    println!("  {}", "-".repeat(51));
    print_group(&comparison.luxury);
    print_group(&comparison.economy);

    match &comparison.t_test {
        TestOutcome::Computed(t) => println!(
            "  Welch t-test (luxury < economy): t={:.4}, df={:.2}, p-value={:.4}",
            t.statistic, t.df, t.p_value
        ),
        TestOutcome::Skipped(reason) => println!("  Welch t-test skipped: {reason}"),
    }
    println!(
        "  Luxury price vs sensitivity: {}",
        fmt_correlation(&comparison.luxury_correlation)
    );
    println!(
        "  Economy price vs sensitivity: {}",
        fmt_correlation(&comparison.economy_correlation)
    );
    println!();
}

#[cfg(test)]
mod tests {
    use carprice_analysis::{brand::BrandClass, comparison::SkipReason};

    use super::*;

    #[test]
    fn test_fmt_value() {
        assert_eq!(fmt_value(f64::NAN, 2), "N/A");
        assert_eq!(fmt_value(-0.123_456, 4), "-0.1235");
        assert_eq!(fmt_value(f64::INFINITY, 2), "inf");
    }

    #[test]
    fn test_fmt_correlation() {
        let computed = TestOutcome::Computed(Correlation {
            r: -0.5,
            p_value: 0.0012,
            count: 40,
        });
        assert_eq!(
            fmt_correlation(&computed),
            "r=-0.5000, p-value=1.20e-3, n=40"
        );

        let skipped = TestOutcome::Skipped(SkipReason::EmptyGroup(BrandClass::Economy));
        assert_eq!(
            fmt_correlation(&skipped),
            "skipped (no economy listing has a sensitivity)"
        );
    }
}
