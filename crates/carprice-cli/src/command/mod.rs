use clap::{Parser, Subcommand};

use self::{analyze::AnalyzeArg, preprocess::PreprocessArg, run::RunArg};

mod analyze;
mod preprocess;
mod run;

const DEFAULT_RAW_INPUT: &str = "used_cars_data.csv";
const DEFAULT_CLEANED_PATH: &str = "processed_used_cars.csv";
const DEFAULT_CHART_DIR: &str = "charts";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Pipeline stage to run (both stages when omitted)
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Clean the raw listing table and derive feature columns
    Preprocess(#[clap(flatten)] PreprocessArg),
    /// Analyze the cleaned listings, print summaries and render charts
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Preprocess and analyze in one go
    Run(#[clap(flatten)] RunArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or_else(|| Mode::Run(RunArg::default())) {
        Mode::Preprocess(arg) => preprocess::run(&arg)?,
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::Run(arg) => run::run(&arg)?,
    }
    Ok(())
}
