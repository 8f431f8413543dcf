use std::path::PathBuf;

use carprice_analysis::DEFAULT_REFERENCE_YEAR;

use crate::command::{
    DEFAULT_CHART_DIR, DEFAULT_CLEANED_PATH, DEFAULT_RAW_INPUT,
    analyze::{self, AnalyzeArg},
    preprocess::{self, PreprocessArg},
};

#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub(crate) struct RunArg {
    /// Raw listing CSV file
    #[arg(long, default_value = DEFAULT_RAW_INPUT)]
    pub input: PathBuf,
    /// Cleaned listing CSV written by the first stage and read by the second
    #[arg(long, default_value = DEFAULT_CLEANED_PATH)]
    pub cleaned: PathBuf,
    /// Secondary CSV table to load; only its shape is reported
    #[arg(long)]
    pub auxiliary: Option<PathBuf>,
    /// JSON file with `luxury`, `performance` and `economy` brand lists
    #[arg(long)]
    pub brands: Option<PathBuf>,
    /// Year car ages are measured from
    #[arg(long, default_value_t = DEFAULT_REFERENCE_YEAR)]
    pub reference_year: i32,
    /// Directory the charts are written to
    #[arg(long, default_value = DEFAULT_CHART_DIR)]
    pub chart_dir: PathBuf,
    /// Save the analysis results as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl Default for RunArg {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_RAW_INPUT),
            cleaned: PathBuf::from(DEFAULT_CLEANED_PATH),
            auxiliary: None,
            brands: None,
            reference_year: DEFAULT_REFERENCE_YEAR,
            chart_dir: PathBuf::from(DEFAULT_CHART_DIR),
            report: None,
        }
    }
}

impl RunArg {
    fn preprocess_arg(&self) -> PreprocessArg {
        PreprocessArg {
            input: self.input.clone(),
            output: self.cleaned.clone(),
            auxiliary: self.auxiliary.clone(),
            brands: self.brands.clone(),
            reference_year: self.reference_year,
        }
    }

    fn analyze_arg(&self) -> AnalyzeArg {
        AnalyzeArg {
            input: self.cleaned.clone(),
            chart_dir: self.chart_dir.clone(),
            report: self.report.clone(),
        }
    }
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    preprocess::run(&arg.preprocess_arg())?;
    analyze::run(&arg.analyze_arg())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_args_share_cleaned_path() {
        let arg = RunArg {
            cleaned: PathBuf::from("out/clean.csv"),
            ..RunArg::default()
        };
        assert_eq!(arg.preprocess_arg().output, arg.analyze_arg().input);
        assert_eq!(arg.preprocess_arg().input, PathBuf::from(DEFAULT_RAW_INPUT));
        assert_eq!(arg.analyze_arg().chart_dir, PathBuf::from(DEFAULT_CHART_DIR));
    }
}
