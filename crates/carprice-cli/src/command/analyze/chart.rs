//! PNG charts for the analysis command
//!
//! Every chart is written to its own numbered file in the chart directory.
//! Categorical axes are drawn on `f64` coordinates with one category per
//! integer position, so the same chart can mix bars, whiskers and text.

use std::{
    ops::Range,
    path::{Path, PathBuf},
};

use anyhow::Context;
use carprice_analysis::{brand::BrandClass, comparison::TestOutcome, report::AnalysisReport};
use carprice_stats::{descriptive::DescriptiveStats, histogram, kde::GaussianKde, smoothing::Lowess};
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const CHART_SIZE: (u32, u32) = (1200, 700);
const HISTOGRAM_BINS: usize = 40;
const CURVE_POINTS: usize = 200;

const MEAN_COLOR: RGBColor = RGBColor(214, 39, 40);
const MEDIAN_COLOR: RGBColor = RGBColor(44, 160, 44);
const BAR_COLOR: RGBColor = RGBColor(70, 130, 180);
const MISSING_COLOR: RGBColor = RGBColor(200, 200, 200);

fn caption_font() -> FontDesc<'static> {
    ("sans-serif", 24).into_font()
}

fn annotation_font() -> FontDesc<'static> {
    ("sans-serif", 18).into_font()
}

fn class_color(class: BrandClass) -> RGBColor {
    match class {
        BrandClass::Luxury => RGBColor(31, 119, 180),
        BrandClass::Performance => RGBColor(255, 127, 14),
        BrandClass::Economy => RGBColor(44, 160, 44),
    }
}

/// Maps a correlation in `[-1, 1]` onto a blue-white-red scale.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn diverging_color(value: f64) -> RGBColor {
    const LOW: [f64; 3] = [59.0, 76.0, 192.0];
    const MID: [f64; 3] = [221.0, 221.0, 221.0];
    const HIGH: [f64; 3] = [180.0, 4.0, 38.0];

    if value.is_nan() {
        return MISSING_COLOR;
    }
    let t = value.clamp(-1.0, 1.0);
    let (to, f) = if t < 0.0 { (LOW, -t) } else { (HIGH, t) };
    let [r, g, b] = [0, 1, 2].map(|i| (MID[i] + (to[i] - MID[i]) * f).round() as u8);
    RGBColor(r, g, b)
}

/// Linear axis range covering `[lo, hi]` with a 5% margin.
fn padded(lo: f64, hi: f64) -> Range<f64> {
    if !(lo.is_finite() && hi.is_finite()) {
        return -1.0..1.0;
    }
    let span = hi - lo;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        lo.abs().max(1.0) * 0.5
    };
    (lo - pad)..(hi + pad)
}

/// Log axis range covering the positive finite values, `None` if there are
/// none.
fn log_range<I>(values: I) -> Option<Range<f64>>
where
    I: IntoIterator<Item = f64>,
{
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })?;
    Some((lo / 1.25)..(hi * 1.25))
}

/// Axis label for a categorical coordinate; empty between categories.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn category_label<S>(names: &[S], position: f64) -> String
where
    S: AsRef<str>,
{
    let index = position.round();
    if (position - index).abs() > 1e-6 || index < 0.0 || index >= names.len() as f64 {
        return String::new();
    }
    names[index as usize].as_ref().to_owned()
}

/// Labeled vertical line on a histogram.
struct Marker {
    label: String,
    x: f64,
    color: RGBColor,
}

fn center_markers(stats: Option<&DescriptiveStats>, precision: usize) -> Vec<Marker> {
    stats.map_or_else(Vec::new, |stats| {
        vec![
            Marker {
                label: format!("Mean: {:.precision$}", stats.mean),
                x: stats.mean,
                color: MEAN_COLOR,
            },
            Marker {
                label: format!("Median: {:.precision$}", stats.median),
                x: stats.median,
                color: MEDIAN_COLOR,
            },
        ]
    })
}

fn draw_no_data(area: &Area<'_>, title: &str) -> anyhow::Result<()> {
    log::warn!("{title}: nothing to plot");
    let area = area.titled(title, caption_font())?;
    area.draw(&Text::new("No data", (40, 40), annotation_font()))?;
    Ok(())
}

/// Histogram with a KDE curve scaled to counts and labeled vertical markers.
#[expect(clippy::cast_precision_loss)]
fn histogram_panel(
    area: &Area<'_>,
    title: &str,
    x_desc: &str,
    values: &[f64],
    color: RGBColor,
    markers: &[Marker],
) -> anyhow::Result<()> {
    let hist = histogram::Histogram::new(values.iter().copied(), HISTOGRAM_BINS);
    let (Some(bin_width), Some(first), Some(last)) =
        (hist.bin_width(), hist.bins.first(), hist.bins.last())
    else {
        return draw_no_data(area, title);
    };

    let x_lo = markers
        .iter()
        .map(|m| m.x)
        .filter(|x| x.is_finite())
        .fold(first.range.start, f64::min);
    let x_hi = markers
        .iter()
        .map(|m| m.x)
        .filter(|x| x.is_finite())
        .fold(last.range.end, f64::max);
    let scale = hist.total() as f64 * bin_width;
    let curve = GaussianKde::new(values.iter().copied())
        .map(|kde| {
            kde.curve(x_lo, x_hi, CURVE_POINTS)
                .into_iter()
                .map(|(x, density)| (x, density * scale))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let y_hi = curve
        .iter()
        .map(|p| p.1)
        .fold(hist.max_count() as f64, f64::max)
        * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(title, caption_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(padded(x_lo, x_hi), 0.0..y_hi)?;
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("Count")
        .draw()?;

    chart.draw_series(hist.bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.range.start, 0.0), (bin.range.end, bin.count as f64)],
            color.mix(0.5).filled(),
        )
    }))?;
    chart.draw_series(LineSeries::new(curve, color.stroke_width(2)))?;
    for marker in markers.iter().filter(|m| m.x.is_finite()) {
        let line_color = marker.color;
        chart
            .draw_series([PathElement::new(
                vec![(marker.x, 0.0), (marker.x, y_hi)],
                line_color.stroke_width(2),
            )])?
            .label(marker.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], line_color.stroke_width(2))
            });
    }
    if !markers.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

/// `(predicted, actual)` price pairs, in plotting order (x, y).
fn prediction_points(report: &AnalysisReport) -> Vec<(f64, f64)> {
    report
        .listings
        .iter()
        .filter_map(|l| l.predicted_price.zip(l.listing.price))
        .filter(|(predicted, actual)| predicted.is_finite() && actual.is_finite())
        .collect()
}

pub(super) struct ChartWriter<'a> {
    dir: &'a Path,
}

impl<'a> ChartWriter<'a> {
    pub(super) fn new(dir: &'a Path) -> Self {
        Self { dir }
    }

    fn render<F>(&self, file_name: &str, draw: F) -> anyhow::Result<()>
    where
        F: FnOnce(&Area<'_>) -> anyhow::Result<()>,
    {
        let path: PathBuf = self.dir.join(file_name);
        let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)
            .with_context(|| format!("Failed to prepare chart: {}", path.display()))?;
        draw(&root).with_context(|| format!("Failed to draw chart: {}", path.display()))?;
        root.present()
            .with_context(|| format!("Failed to save chart: {}", path.display()))?;
        log::info!("Saved chart {}", path.display());
        Ok(())
    }

    pub(super) fn log_distributions(&self, report: &AnalysisReport) -> anyhow::Result<()> {
        let log_price = report
            .listings
            .iter()
            .filter_map(|l| l.listing.log_price)
            .collect::<Vec<_>>();
        let log_mileage = report
            .listings
            .iter()
            .filter_map(|l| l.listing.log_mileage)
            .collect::<Vec<_>>();

        self.render("01_log_distributions.png", |root| {
            let panels = root.split_evenly((1, 2));
            histogram_panel(
                &panels[0],
                "Distribution of log(1 + price)",
                "log(1 + price)",
                &log_price,
                class_color(BrandClass::Luxury),
                &center_markers(report.summary.log_price.as_ref(), 2),
            )?;
            histogram_panel(
                &panels[1],
                "Distribution of log(1 + mileage)",
                "log(1 + mileage)",
                &log_mileage,
                class_color(BrandClass::Economy),
                &center_markers(report.summary.log_mileage.as_ref(), 2),
            )
        })
    }

    #[expect(clippy::cast_precision_loss)]
    pub(super) fn price_by_classification(&self, report: &AnalysisReport) -> anyhow::Result<()> {
        let summary = &report.summary;
        let classes = &summary.price_by_class;
        let names = classes.iter().map(|c| c.class.as_str()).collect::<Vec<_>>();

        self.render("02_price_by_classification.png", |root| {
            let title = "Price by Brand Classification";
            let extremes = classes.iter().flat_map(|c| {
                [c.boxplot.lower_whisker, c.boxplot.upper_whisker]
                    .into_iter()
                    .chain(c.boxplot.outliers.iter().copied())
            });
            let Some(y_range) = log_range(extremes) else {
                return draw_no_data(root, title);
            };
            let floor = y_range.start;
            let clamp = |v: f64| v.max(floor);

            let mut chart = ChartBuilder::on(root)
                .caption(title, caption_font())
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(80)
                .build_cartesian_2d(-0.5..(classes.len() as f64 - 0.5), y_range.log_scale())?;
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(2 * classes.len() + 1)
                .x_label_formatter(&|x| category_label(&names, *x))
                .x_desc("Brand classification")
                .y_desc("Price (EUR, log scale)")
                .draw()?;

            for (i, class) in classes.iter().enumerate() {
                let x = i as f64;
                let b = &class.boxplot;
                let color = class_color(class.class);
                let (q1, median, q3) = (clamp(b.q1), clamp(b.median), clamp(b.q3));
                let (lower, upper) = (clamp(b.lower_whisker), clamp(b.upper_whisker));

                chart.draw_series([
                    Rectangle::new([(x - 0.3, q1), (x + 0.3, q3)], color.mix(0.6).filled()),
                    Rectangle::new([(x - 0.3, q1), (x + 0.3, q3)], BLACK.stroke_width(1)),
                ])?;
                chart.draw_series(
                    [
                        vec![(x - 0.3, median), (x + 0.3, median)],
                        vec![(x, lower), (x, q1)],
                        vec![(x, q3), (x, upper)],
                        vec![(x - 0.15, lower), (x + 0.15, lower)],
                        vec![(x - 0.15, upper), (x + 0.15, upper)],
                    ]
                    .into_iter()
                    .map(|points| PathElement::new(points, BLACK.stroke_width(2))),
                )?;
                chart.draw_series(
                    b.outliers
                        .iter()
                        .filter(|v| **v > 0.0)
                        .map(|&v| Circle::new((x, v), 3, color.stroke_width(1))),
                )?;
            }

            root.draw(&Text::new(
                format!(
                    "Mean of class means: {:.0} EUR, mean of class medians: {:.0} EUR",
                    summary.mean_of_class_means, summary.mean_of_class_medians
                ),
                (100, 50),
                annotation_font(),
            ))?;
            Ok(())
        })
    }

    pub(super) fn price_vs_mileage(&self, report: &AnalysisReport) -> anyhow::Result<()> {
        let groups = BrandClass::ALL
            .into_iter()
            .map(|class| {
                let points = report
                    .listings
                    .iter()
                    .map(|l| &l.listing)
                    .filter(|l| l.brand_classification == class)
                    .filter_map(|l| l.mileage.zip(l.price))
                    .filter(|&(m, p)| m.is_finite() && p.is_finite() && m > 0.0 && p > 0.0)
                    .collect::<Vec<_>>();
                (class, points)
            })
            .filter(|(_, points)| !points.is_empty())
            .collect::<Vec<_>>();

        let correlation_label = |class: BrandClass| {
            let outcome = report
                .summary
                .price_mileage_correlation
                .iter()
                .find(|c| c.class == class)
                .map(|c| &c.correlation);
            match outcome {
                Some(TestOutcome::Computed(c)) => {
                    format!("{class}: Pearson={:.2}, p-value={:.2e}", c.r, c.p_value)
                }
                _ => format!("{class}: Pearson=N/A"),
            }
        };

        self.render("03_price_vs_mileage.png", |root| {
            let title = "Price vs Mileage by Brand Classification (log-log)";
            let all_points = groups.iter().flat_map(|(_, points)| points);
            let (Some(x_range), Some(y_range)) = (
                log_range(all_points.clone().map(|p| p.0)),
                log_range(all_points.map(|p| p.1)),
            ) else {
                return draw_no_data(root, title);
            };

            let mut chart = ChartBuilder::on(root)
                .caption(title, caption_font())
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(80)
                .build_cartesian_2d(x_range.log_scale(), y_range.log_scale())?;
            chart
                .configure_mesh()
                .x_desc("Mileage (km, log scale)")
                .y_desc("Price (EUR, log scale)")
                .draw()?;

            for (class, points) in &groups {
                let color = class_color(*class);
                chart
                    .draw_series(
                        points
                            .iter()
                            .map(|&p| Circle::new(p, 2, color.mix(0.3).filled())),
                    )?
                    .label(correlation_label(*class))
                    .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));

                let (x, y): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
                let x_span = x.iter().copied().fold(f64::NEG_INFINITY, f64::max)
                    - x.iter().copied().fold(f64::INFINITY, f64::min);
                let lowess = Lowess {
                    delta: 0.01 * x_span,
                    ..Lowess::default()
                };
                let curve = lowess.fit(&x, &y).into_iter().filter(|&(_, fitted)| fitted > 0.0);
                chart.draw_series(LineSeries::new(curve, color.stroke_width(3)))?;
            }

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
            Ok(())
        })
    }

    #[expect(clippy::cast_precision_loss)]
    pub(super) fn correlation_heatmap(&self, report: &AnalysisReport) -> anyhow::Result<()> {
        let matrix = &report.summary.correlation;
        let n = matrix.labels.len();
        let column_names = matrix.labels.clone();
        let row_names = matrix.labels.iter().rev().copied().collect::<Vec<_>>();

        self.render("04_correlation_heatmap.png", |root| {
            let size = n as f64;
            let mut chart = ChartBuilder::on(root)
                .caption("Correlation Matrix (Pearson)", caption_font())
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(120)
                .build_cartesian_2d(0.0..size, 0.0..size)?;
            chart
                .configure_mesh()
                .disable_mesh()
                .x_labels(2 * n + 1)
                .y_labels(2 * n + 1)
                .x_label_formatter(&|x| category_label(&column_names, *x - 0.5))
                .y_label_formatter(&|y| category_label(&row_names, *y - 0.5))
                .draw()?;

            let cells = matrix.values.iter().enumerate().flat_map(|(i, row)| {
                row.iter().enumerate().map(move |(j, &value)| {
                    ((j as f64, size - 1.0 - i as f64), value)
                })
            });
            chart.draw_series(cells.clone().map(|((x, y), value)| {
                Rectangle::new([(x, y), (x + 1.0, y + 1.0)], diverging_color(value).filled())
            }))?;
            chart.draw_series(cells.map(|((x, y), value)| {
                let text_color = if value.abs() > 0.6 { WHITE } else { BLACK };
                let text = if value.is_nan() {
                    "N/A".to_string()
                } else {
                    format!("{value:.2}")
                };
                Text::new(
                    text,
                    (x + 0.5, y + 0.5),
                    annotation_font()
                        .color(&text_color)
                        .pos(Pos::new(HPos::Center, VPos::Center)),
                )
            }))?;
            Ok(())
        })
    }

    #[expect(clippy::cast_precision_loss)]
    pub(super) fn brand_slopes(&self, report: &AnalysisReport) -> anyhow::Result<()> {
        let slopes = report
            .slopes
            .sorted_by_magnitude()
            .into_iter()
            .filter(|s| s.slope.is_finite())
            .collect::<Vec<_>>();
        let names = slopes.iter().map(|s| s.brand.as_str()).collect::<Vec<_>>();
        let slope_stats = report.slopes.slope_stats();

        self.render("05_brand_slopes.png", |root| {
            let title = "Price Sensitivity to Mileage by Brand";
            if slopes.is_empty() {
                return draw_no_data(root, title);
            }
            let lo = slopes.iter().map(|s| s.slope).fold(0.0, f64::min);
            let hi = slopes.iter().map(|s| s.slope).fold(0.0, f64::max);
            let top = slopes.len() as f64 - 0.5;

            let mut chart = ChartBuilder::on(root)
                .caption(title, caption_font())
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(140)
                .build_cartesian_2d(padded(lo, hi), -0.5..top)?;
            chart
                .configure_mesh()
                .disable_y_mesh()
                .y_labels(2 * slopes.len() + 1)
                .y_label_formatter(&|y| category_label(&names, *y))
                .x_desc("Price change per km (EUR)")
                .y_desc("Brand")
                .draw()?;

            chart.draw_series(slopes.iter().enumerate().map(|(i, s)| {
                let y = i as f64;
                Rectangle::new(
                    [(s.slope.min(0.0), y - 0.4), (s.slope.max(0.0), y + 0.4)],
                    BAR_COLOR.filled(),
                )
            }))?;
            chart.draw_series([PathElement::new(
                vec![(0.0, -0.5), (0.0, top)],
                BLACK.stroke_width(1),
            )])?;

            if let Some(stats) = slope_stats {
                for (label, x, color) in [
                    (format!("Mean slope: {:.4}", stats.mean), stats.mean, MEAN_COLOR),
                    (format!("Median slope: {:.4}", stats.median), stats.median, MEDIAN_COLOR),
                ] {
                    chart
                        .draw_series([PathElement::new(
                            vec![(x, -0.5), (x, top)],
                            color.stroke_width(2),
                        )])?
                        .label(label)
                        .legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                        });
                }
                chart
                    .configure_series_labels()
                    .position(SeriesLabelPosition::LowerLeft)
                    .background_style(WHITE.mix(0.8))
                    .border_style(BLACK)
                    .draw()?;
            }
            Ok(())
        })
    }

    pub(super) fn actual_vs_predicted(&self, report: &AnalysisReport) -> anyhow::Result<()> {
        let points = prediction_points(report);
        let quality = report.model.quality();

        self.render("06_actual_vs_predicted.png", |root| {
            let title = "Actual vs Predicted Price";
            if points.is_empty() {
                return draw_no_data(root, title);
            }
            let lo = points
                .iter()
                .flat_map(|&(p, a)| [p, a])
                .fold(f64::INFINITY, f64::min);
            let hi = points
                .iter()
                .flat_map(|&(p, a)| [p, a])
                .fold(f64::NEG_INFINITY, f64::max);
            let range = padded(lo, hi);

            let mut chart = ChartBuilder::on(root)
                .caption(title, caption_font())
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(80)
                .build_cartesian_2d(range.clone(), range)?;
            chart
                .configure_mesh()
                .x_desc("Predicted price (EUR)")
                .y_desc("Actual price (EUR)")
                .draw()?;

            chart.draw_series(
                points
                    .iter()
                    .map(|&p| Circle::new(p, 2, BAR_COLOR.mix(0.4).filled())),
            )?;
            chart.draw_series(LineSeries::new([(lo, lo), (hi, hi)], MEAN_COLOR.stroke_width(2)))?;

            root.draw(&Text::new(
                format!("R² = {:.4}, MSE = {:.0}", quality.r_squared, quality.mse),
                (100, 50),
                annotation_font(),
            ))?;
            Ok(())
        })
    }

    pub(super) fn residuals(&self, report: &AnalysisReport) -> anyhow::Result<()> {
        let residuals = report
            .listings
            .iter()
            .filter_map(|l| l.residual)
            .filter(|r| r.is_finite())
            .collect::<Vec<_>>();
        let mut markers = vec![Marker {
            label: "Zero".to_string(),
            x: 0.0,
            color: BLACK,
        }];
        markers.extend(center_markers(report.residual_stats.as_ref(), 0));

        self.render("07_residuals.png", |root| {
            histogram_panel(
                root,
                "Distribution of Residuals (actual - predicted)",
                "Residual (EUR)",
                &residuals,
                BAR_COLOR,
                &markers,
            )
        })
    }

    #[expect(clippy::cast_precision_loss)]
    pub(super) fn sensitivity_by_class(&self, report: &AnalysisReport) -> anyhow::Result<()> {
        let comparison = &report.comparison;
        let groups = [&comparison.luxury, &comparison.economy];
        let names = groups.map(|g| g.class.as_str());
        let p_value = match &comparison.t_test {
            TestOutcome::Computed(t) => format!("p-value = {:.4}", t.p_value),
            TestOutcome::Skipped(_) => "p-value = N/A".to_string(),
        };

        self.render("08_sensitivity_by_class.png", |root| {
            let error = |std_error: f64| {
                if std_error.is_finite() {
                    std_error
                } else {
                    0.0
                }
            };
            let drawn = groups
                .iter()
                .enumerate()
                .filter(|(_, g)| g.mean.is_finite())
                .collect::<Vec<_>>();
            let bounds = drawn
                .iter()
                .flat_map(|(_, g)| [g.mean - error(g.std_error), g.mean + error(g.std_error)]);
            let lo = bounds.clone().fold(0.0, f64::min);
            let hi = bounds.fold(0.0, f64::max);

            let mut chart = ChartBuilder::on(root)
                .caption("Mean Price Sensitivity: Luxury vs Economy", caption_font())
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(100)
                .build_cartesian_2d(-0.5..(groups.len() as f64 - 0.5), padded(lo, hi))?;
            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(2 * groups.len() + 1)
                .x_label_formatter(&|x| category_label(&names, *x))
                .x_desc("Brand classification")
                .y_desc("Mean price change per km (EUR)")
                .draw()?;

            for &(i, group) in &drawn {
                let x = i as f64;
                let se = error(group.std_error);
                chart.draw_series([Rectangle::new(
                    [(x - 0.3, group.mean.min(0.0)), (x + 0.3, group.mean.max(0.0))],
                    class_color(group.class).mix(0.8).filled(),
                )])?;
                chart.draw_series([ErrorBar::new_vertical(
                    x,
                    group.mean - se,
                    group.mean,
                    group.mean + se,
                    BLACK.stroke_width(2),
                    6,
                )])?;
            }

            root.draw(&Text::new(p_value.as_str(), (120, 50), annotation_font()))?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use carprice_analysis::listing::CleanedListing;

    use super::*;

    const CHART_FILES: [&str; 8] = [
        "01_log_distributions.png",
        "02_price_by_classification.png",
        "03_price_vs_mileage.png",
        "04_correlation_heatmap.png",
        "05_brand_slopes.png",
        "06_actual_vs_predicted.png",
        "07_residuals.png",
        "08_sensitivity_by_class.png",
    ];

    fn listing(
        brand: &str,
        class: BrandClass,
        mileage: f64,
        car_age: f64,
        price: f64,
    ) -> CleanedListing {
        CleanedListing {
            brand: brand.into(),
            price: Some(price),
            mileage: Some(mileage),
            car_age: Some(car_age),
            price_per_km: Some(price / mileage),
            brand_classification: class,
            log_price: Some(price.ln_1p()),
            log_mileage: Some(mileage.ln_1p()),
        }
    }

    fn render_all(report: &AnalysisReport) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let charts = ChartWriter::new(dir.path());
        charts.log_distributions(report).unwrap();
        charts.price_by_classification(report).unwrap();
        charts.price_vs_mileage(report).unwrap();
        charts.correlation_heatmap(report).unwrap();
        charts.brand_slopes(report).unwrap();
        charts.actual_vs_predicted(report).unwrap();
        charts.residuals(report).unwrap();
        charts.sensitivity_by_class(report).unwrap();
        dir
    }

    fn assert_charts_written(dir: &Path) {
        for name in CHART_FILES {
            let metadata = std::fs::metadata(dir.join(name))
                .unwrap_or_else(|e| panic!("{name} was not written: {e}"));
            assert!(metadata.len() > 0, "{name} is empty");
        }
    }

    #[test]
    fn test_renders_every_chart() {
        let brands = [
            ("BMW", BrandClass::Luxury, 45_000.0, 0.12),
            ("Audi", BrandClass::Luxury, 42_000.0, 0.10),
            ("Porsche", BrandClass::Performance, 80_000.0, 0.25),
            ("Dacia", BrandClass::Economy, 16_000.0, 0.05),
            ("Skoda", BrandClass::Economy, 20_000.0, 0.06),
        ];
        let listings = brands
            .iter()
            .flat_map(|&(brand, class, base, per_km)| {
                (0..15).map(move |i| {
                    let age = f64::from(i % 8 + 1);
                    let mileage = 12_000.0 * age + f64::from(i * 1_700);
                    let noise = f64::from((i * 7) % 5) * 400.0 - 800.0;
                    let price = base - per_km * mileage - 900.0 * age + noise;
                    listing(brand, class, mileage, age, price)
                })
            })
            .collect::<Vec<_>>();

        let report = AnalysisReport::from_listings(listings).unwrap();
        assert!(report.comparison.t_test.is_computed());
        let dir = render_all(&report);
        assert_charts_written(dir.path());
    }

    #[test]
    fn test_prediction_points_put_predicted_on_x() {
        // Constant mileage and age: every prediction is the mean price
        let prices = [9_000.0, 10_000.0, 14_000.0];
        let listings = prices
            .map(|price| listing("Dacia", BrandClass::Economy, 50_000.0, 4.0, price))
            .to_vec();
        let report = AnalysisReport::from_listings(listings).unwrap();

        let points = prediction_points(&report);
        assert_eq!(points.len(), 3);
        for (&(predicted, actual), price) in points.iter().zip(prices) {
            assert!((predicted - 11_000.0).abs() < 1e-6);
            assert_eq!(actual, price);
        }
    }

    #[test]
    fn test_renders_degenerate_market() {
        // One economy brand below the slope threshold with constant mileage
        // and age: no slopes, no luxury group, skipped tests, NaN correlations
        let listings = (0..5)
            .map(|i| {
                let price = 8_000.0 + f64::from(i) * 1_000.0;
                listing("Dacia", BrandClass::Economy, 50_000.0, 4.0, price)
            })
            .collect::<Vec<_>>();

        let report = AnalysisReport::from_listings(listings).unwrap();
        assert!(report.slopes.slope_stats().is_none());
        assert!(!report.comparison.t_test.is_computed());
        let dir = render_all(&report);
        assert_charts_written(dir.path());
    }

    #[test]
    fn test_padded() {
        assert_eq!(padded(0.0, 10.0), -0.5..10.5);
        assert_eq!(padded(3.0, 3.0), 1.5..4.5);
        assert_eq!(padded(f64::NAN, 1.0), -1.0..1.0);
    }

    #[test]
    fn test_log_range_ignores_non_positive() {
        assert_eq!(log_range([0.0, -3.0, 100.0, 1000.0]), Some(80.0..1250.0));
        assert_eq!(log_range([0.0, f64::NAN]), None);
    }

    #[test]
    fn test_category_label() {
        let names = ["luxury", "economy"];
        assert_eq!(category_label(&names, 0.0), "luxury");
        assert_eq!(category_label(&names, 1.0), "economy");
        assert_eq!(category_label(&names, 0.5), "");
        assert_eq!(category_label(&names, -1.0), "");
        assert_eq!(category_label(&names, 2.0), "");
    }

    #[test]
    fn test_diverging_color() {
        assert_eq!(diverging_color(-1.0).rgb(), (59, 76, 192));
        assert_eq!(diverging_color(0.0).rgb(), (221, 221, 221));
        assert_eq!(diverging_color(1.0).rgb(), (180, 4, 38));
        assert_eq!(diverging_color(2.0).rgb(), (180, 4, 38));
        assert_eq!(diverging_color(f64::NAN).rgb(), MISSING_COLOR.rgb());
    }

    #[test]
    fn test_class_colors_are_distinct() {
        let colors = BrandClass::ALL.map(|c| class_color(c).rgb());
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn test_center_markers() {
        let stats = DescriptiveStats::new([1.0, 2.0, 6.0]).unwrap();
        let markers = center_markers(Some(&stats), 1);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].label, "Mean: 3.0");
        assert_eq!(markers[1].label, "Median: 2.0");
        assert!(center_markers(None, 1).is_empty());
    }
}
