use std::path::PathBuf;

use anyhow::Context;
use carprice_analysis::{
    DEFAULT_REFERENCE_YEAR,
    brand::BrandCatalog,
    io,
    preprocess::{PreprocessSummary, Preprocessor},
};

use crate::{
    command::{DEFAULT_CLEANED_PATH, DEFAULT_RAW_INPUT},
    util,
};

#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub(crate) struct PreprocessArg {
    /// Raw listing CSV file
    #[arg(long, default_value = DEFAULT_RAW_INPUT)]
    pub input: PathBuf,
    /// Where to write the cleaned listing CSV (overwritten)
    #[arg(long, default_value = DEFAULT_CLEANED_PATH)]
    pub output: PathBuf,
    /// Secondary CSV table to load; only its shape is reported
    #[arg(long)]
    pub auxiliary: Option<PathBuf>,
    /// JSON file with `luxury`, `performance` and `economy` brand lists
    #[arg(long)]
    pub brands: Option<PathBuf>,
    /// Year car ages are measured from
    #[arg(long, default_value_t = DEFAULT_REFERENCE_YEAR)]
    pub reference_year: i32,
}

pub(crate) fn run(arg: &PreprocessArg) -> anyhow::Result<()> {
    let catalog = match &arg.brands {
        Some(path) => BrandCatalog::from_lists(&util::read_brand_lists_file(path)?),
        None => BrandCatalog::default(),
    };
    log::info!("Brand catalog holds {} brands", catalog.len());

    log::info!("Loading raw listings from {}", arg.input.display());
    let raw = io::read_raw_table(&arg.input)
        .with_context(|| format!("Failed to load raw listings: {}", arg.input.display()))?;
    log::info!(
        "Loaded {} rows with {} columns",
        raw.len(),
        raw.headers.len()
    );

    if let Some(path) = &arg.auxiliary {
        let auxiliary = io::read_raw_table(path)
            .with_context(|| format!("Failed to load auxiliary table: {}", path.display()))?;
        log::info!(
            "Loaded auxiliary table {} ({} rows, {} columns); not used further",
            path.display(),
            auxiliary.len(),
            auxiliary.headers.len()
        );
    }

    let cleaned = Preprocessor::new(catalog, arg.reference_year)
        .clean(&raw)
        .with_context(|| format!("Failed to preprocess {}", arg.input.display()))?;
    print_summary(&cleaned.summary);

    io::write_cleaned_table(&arg.output, &cleaned)
        .with_context(|| format!("Failed to save cleaned listings: {}", arg.output.display()))?;
    log::info!(
        "Saved {} cleaned listings to {}",
        cleaned.len(),
        arg.output.display()
    );

    Ok(())
}

fn print_summary(summary: &PreprocessSummary) {
    if summary.infinite_price_per_km > 0 {
        log::warn!(
            "{} listings have zero mileage and an infinite price per km",
            summary.infinite_price_per_km
        );
    }

    println!("Preprocessing Summary");
    println!("=====================");
    println!("  {:<28} {:>10}", "Rows read", summary.rows_read);
    println!("  {:<28} {:>10}", "Rows kept", summary.rows_kept);
    println!("  {:<28} {:>10}", "Dropped (unknown brand)", summary.dropped_unknown);
    println!("  {:<28} {:>10}", "Missing price", summary.missing_price);
    println!("  {:<28} {:>10}", "Missing mileage", summary.missing_mileage);
    println!("  {:<28} {:>10}", "Missing year", summary.missing_year);
    println!(
        "  {:<28} {:>10}",
        "Infinite price per km", summary.infinite_price_per_km
    );
    println!();
}
