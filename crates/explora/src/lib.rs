//! explora: automated exploratory data analysis report building.
//!
//! # Overview
//!
//! Given a tabular dataset, this library:
//!
//! - **Infers column types**: a heuristic classifier assigns every column one
//!   of six semantic types (numeric, categorical, boolean, date, unknown,
//!   missing), used throughout to decide which analyses apply
//! - **Composes reports**: analysis sections form a shallow tree; a composite
//!   section fans every operation out to its subsections
//! - **Exports code**: every section emits notebook-style cells reproducing
//!   its analysis, at three levels of detail controlled by `verbosity`
//! - **Renders directly**: sections also draw their output immediately
//!   against a dataframe, without going through exported code
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use explora::{BivariateAnalysis, ReportBuilder, Subsection};
//! use polars::io::csv::read::CsvReadOptions;
//!
//! let df = CsvReadOptions::default()
//!     .with_has_header(true)
//!     .try_into_reader_with_file_path(Some("data.csv".into()))?
//!     .finish()?;
//!
//! // Pick analyses and code detail per subsection.
//! let section = BivariateAnalysis::builder()
//!     .verbosity(0)
//!     .verbosity_pairplot(2)
//!     .subsections([Subsection::PairPlot, Subsection::CorrelationPlot])
//!     .color_col("species")
//!     .build()?;
//!
//! // Render in place...
//! section.show(&df)?;
//!
//! // ...or export a notebook-style document.
//! let report = ReportBuilder::new("Exploratory analysis")
//!     .section(section)
//!     .build();
//! report.write_json("report.json".as_ref())?;
//! ```
//!
//! # Type inference
//!
//! ```rust,ignore
//! use explora::{DataType, infer_data_type};
//! use polars::prelude::*;
//!
//! let series = Series::new("flag".into(), &[0i64, 1, 1, 0]);
//! assert_eq!(infer_data_type(&series), DataType::Boolean);
//! ```

pub mod data_types;
pub mod error;
pub mod export;
pub mod render;
pub mod sections;

// Re-exports for convenient access
pub use data_types::{
    DEFAULT_UNIQUE_VALUE_COUNT_THRESHOLD, DataType, infer_data_type, infer_data_type_str,
};
pub use error::{ReportError, Result};
pub use export::{Report, ReportBuilder};
pub use sections::bivariate::{
    BivariateAnalysis, BivariateAnalysisBuilder, BivariateSection, ContingencyTable,
    CorrelationPlot, PairPlot, Subsection,
};
pub use sections::{Cell, ReportSection, Section};
