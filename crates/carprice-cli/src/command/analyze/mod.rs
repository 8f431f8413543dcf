//! Analysis command
//!
//! Loads the cleaned listings, runs every analysis once and presents the
//! results step by step: each step prints its console table and renders its
//! chart before the next one starts.
//!
//! ```text
//! cleaned CSV ──► AnalysisReport ──┬─► console tables (stdout)
//!                                  ├─► charts/NN_*.png
//!                                  └─► JSON report (--report)
//! ```

use std::{fs, path::PathBuf};

use anyhow::Context;
use carprice_analysis::{io, report::AnalysisReport};

use crate::{
    command::{DEFAULT_CHART_DIR, DEFAULT_CLEANED_PATH},
    schema::report::ReportFile,
    util::Output,
};

mod chart;
mod table;

#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub(crate) struct AnalyzeArg {
    /// Cleaned listing CSV written by the preprocess stage
    #[arg(long, default_value = DEFAULT_CLEANED_PATH)]
    pub input: PathBuf,
    /// Directory the charts are written to
    #[arg(long, default_value = DEFAULT_CHART_DIR)]
    pub chart_dir: PathBuf,
    /// Save the analysis results as JSON to this path (`-` for stdout)
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    log::info!("Loading cleaned listings from {}", arg.input.display());
    let listings = io::read_cleaned_listings(&arg.input)
        .with_context(|| format!("Failed to load cleaned listings: {}", arg.input.display()))?;
    log::info!("Loaded {} listings", listings.len());

    let report = AnalysisReport::from_listings(listings)
        .with_context(|| format!("Failed to analyze {}", arg.input.display()))?;

    fs::create_dir_all(&arg.chart_dir).with_context(|| {
        format!(
            "Failed to create chart directory: {}",
            arg.chart_dir.display()
        )
    })?;
    let charts = chart::ChartWriter::new(&arg.chart_dir);

    println!("Used Car Price Analysis ({} listings)", report.listings.len());
    println!("==========================================\n");

    table::print_log_distributions(&report.summary);
    charts.log_distributions(&report)?;

    table::print_price_by_class(&report.summary);
    charts.price_by_classification(&report)?;

    table::print_price_mileage_correlation(&report.summary);
    charts.price_vs_mileage(&report)?;

    table::print_correlation_matrix(&report.summary.correlation);
    charts.correlation_heatmap(&report)?;

    table::print_brand_slopes(&report.slopes);
    charts.brand_slopes(&report)?;

    table::print_fit_quality(&report.model);
    charts.actual_vs_predicted(&report)?;

    table::print_residuals(&report);
    charts.residuals(&report)?;

    table::print_comparison(&report.comparison);
    charts.sensitivity_by_class(&report)?;

    log::info!("Charts written to {}", arg.chart_dir.display());

    if let Some(target) = &arg.report {
        let file = ReportFile::new(arg.input.clone(), &report);
        Output::save_json(&file, Output::parse_target(target))?;
        log::info!("Analysis report saved to {}", target.display());
    }

    Ok(())
}
