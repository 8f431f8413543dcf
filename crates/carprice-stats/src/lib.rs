//! Statistical kernels for the used-car price analysis.
//!
//! This crate provides the numeric building blocks the analysis pipeline is
//! composed from. It has no dependencies and works on `f64` slices.
//!
//! - **Descriptive statistics**: mean, median, variance, standard error
//! - **Percentiles**: linearly interpolated quantiles
//! - **Box plots**: quartiles, Tukey whiskers and outliers
//! - **Histogram**: equal-width frequency bins
//! - **Kernel density**: Gaussian KDE with Scott's bandwidth
//! - **Regression**: closed-form simple OLS and multiple linear regression
//! - **Distribution**: Student's t CDF via the regularized incomplete beta
//! - **Hypothesis tests**: Welch's two-sample t-test
//! - **Correlation**: Pearson coefficient with significance
//! - **Smoothing**: LOWESS curves for scatter plots
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Percentile computation
//! - [`boxplot`]: Box plot summaries
//! - [`histogram`]: Histogram construction for visualizing data distributions
//! - [`kde`]: Kernel density estimation
//! - [`regression`]: Least-squares fits and fit quality
//! - [`distribution`]: Student's t distribution
//! - [`hypothesis`]: Welch's t-test
//! - [`correlation`]: Pearson correlation
//! - [`smoothing`]: Locally weighted scatterplot smoothing
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use carprice_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.median, 3.0);
//! ```
//!
//! ## Fitting a line
//!
//! ```
//! use carprice_stats::regression::SimpleLinearFit;
//!
//! let mileage = [10_000.0, 20_000.0, 30_000.0];
//! let price = [30_000.0, 25_000.0, 20_000.0];
//! let fit = SimpleLinearFit::fit(&mileage, &price);
//! assert!((fit.slope + 0.5).abs() < 1e-9);
//! assert!((fit.intercept - 35_000.0).abs() < 1e-6);
//! ```
//!
//! ## Comparing two samples
//!
//! ```
//! use carprice_stats::hypothesis::{Alternative, welch_t_test};
//!
//! let a = [1.0, 2.0, 3.0, 4.0];
//! let b = [5.0, 6.0, 7.0, 8.0];
//! let result = welch_t_test(&a, &b, Alternative::Less).unwrap();
//! assert!(result.p_value < 0.01);
//! ```

pub mod boxplot;
pub mod correlation;
pub mod descriptive;
pub mod distribution;
pub mod histogram;
pub mod hypothesis;
pub mod kde;
pub mod percentiles;
pub mod regression;
pub mod smoothing;
