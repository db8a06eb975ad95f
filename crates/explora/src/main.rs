//! CLI entry point for the report builder.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use explora::{BivariateAnalysis, ReportBuilder, Subsection, infer_data_type_str};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI-compatible subsection selector
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliSubsection {
    /// Scatter-plot matrix of column combinations
    Pairplot,
    /// Pairwise correlation heatmaps
    Correlations,
    /// Cross tabulations of categorical pairs
    ContingencyTable,
}

impl From<CliSubsection> for Subsection {
    fn from(cli: CliSubsection) -> Self {
        match cli {
            CliSubsection::Pairplot => Subsection::PairPlot,
            CliSubsection::Correlations => Subsection::CorrelationPlot,
            CliSubsection::ContingencyTable => Subsection::ContingencyTable,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Automated EDA report builder",
    long_about = "Builds an exploratory data analysis report from a CSV file.\n\n\
                  EXAMPLES:\n  \
                  # Full report with one call per analysis\n  \
                  explora -i data.csv --verbosity 1 -o report.md\n\n  \
                  # Only correlations, restricted to a few columns\n  \
                  explora -i data.csv --subsections correlations --columns height,weight\n\n  \
                  # Just print the inferred column types\n  \
                  explora -i data.csv --infer-types"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long)]
    input: PathBuf,

    /// Output report path (.md for markdown, anything else for JSON)
    #[arg(short, long, default_value = "report.json")]
    output: PathBuf,

    /// Verbosity of the exported code (0, 1, or 2)
    #[arg(short, long, default_value_t = 0)]
    verbosity: i32,

    /// Columns to restrict the analysis to
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Column used to color plots
    #[arg(long)]
    color_col: Option<String>,

    /// Subsections to include, in order (defaults to all)
    #[arg(long, value_delimiter = ',')]
    subsections: Option<Vec<CliSubsection>>,

    /// Print inferred column types and exit
    #[arg(long)]
    infer_types: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log_level))
        .init();

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(args.input.clone()))
        .with_context(|| format!("failed to open {}", args.input.display()))?
        .finish()
        .context("failed to read CSV")?;
    info!(rows = df.height(), columns = df.width(), "dataset loaded");

    if args.infer_types {
        for column in df.get_columns() {
            println!(
                "{}: {}",
                column.name(),
                infer_data_type_str(column.as_materialized_series())
            );
        }
        return Ok(());
    }

    let mut builder = BivariateAnalysis::builder().verbosity(args.verbosity);
    if let Some(columns) = args.columns {
        builder = builder.columns(columns);
    }
    if let Some(color_col) = args.color_col {
        builder = builder.color_col(color_col);
    }
    if let Some(subsections) = args.subsections {
        builder = builder.subsections(subsections.into_iter().map(Subsection::from));
    }
    let section = builder.build().context("invalid report configuration")?;

    let report = ReportBuilder::new("Exploratory analysis")
        .section(section)
        .build();
    match args.output.extension().and_then(|ext| ext.to_str()) {
        Some("md") => report.write_markdown(&args.output)?,
        _ => report.write_json(&args.output)?,
    }
    println!("Report written to {}", args.output.display());
    Ok(())
}
