//! Bivariate analysis: relationships between pairs of columns.
//!
//! [`BivariateAnalysis`] is a composite section. A declarative list of
//! [`Subsection`] tags selects which analyses run, in which order; repeated
//! tags produce repeated independent subsections. Verbosity is fully
//! per-child: each kind can override the section-wide setting, and at
//! verbosity 0 the composite emits one aggregate call covering exactly the
//! children still at verbosity 0 while the overridden children emit their own
//! cells.

mod contingency;
mod correlations;
mod pairplot;
pub(crate) mod sources;

pub use contingency::ContingencyTable;
pub use correlations::CorrelationPlot;
pub use pairplot::PairPlot;

use polars::frame::DataFrame;

use super::code_formatting::{format_pair_list, format_string_list, quote, union_imports};
use super::{Cell, Section, new_uid, validate_verbosity};
use crate::error::Result;

/// Import making the aggregate entry function available in a notebook.
pub(crate) const ENTRY_IMPORT: &str =
    "from explora.report_sections.bivariate_analysis import BivariateAnalysis\n\
     bivariate_analysis = BivariateAnalysis.bivariate_analysis";

/// Selectable bivariate subsection kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsection {
    PairPlot,
    CorrelationPlot,
    ContingencyTable,
}

impl Subsection {
    /// Canonical default subsection list, in emission order.
    pub const DEFAULT: [Subsection; 3] = [
        Subsection::PairPlot,
        Subsection::CorrelationPlot,
        Subsection::ContingencyTable,
    ];

    /// Path of this tag in the generated notebook API.
    pub fn qualified_path(&self) -> &'static str {
        match self {
            Subsection::PairPlot => "BivariateAnalysis.BivariateAnalysisSubsection.PairPlot",
            Subsection::CorrelationPlot => {
                "BivariateAnalysis.BivariateAnalysisSubsection.CorrelationPlot"
            }
            Subsection::ContingencyTable => {
                "BivariateAnalysis.BivariateAnalysisSubsection.ContingencyTable"
            }
        }
    }
}

/// A concrete bivariate subsection. The set is closed: tags resolve onto
/// these variants and nothing else.
pub enum BivariateSection {
    PairPlot(PairPlot),
    CorrelationPlot(CorrelationPlot),
    ContingencyTable(ContingencyTable),
}

impl BivariateSection {
    /// The tag this subsection was instantiated from.
    pub fn kind(&self) -> Subsection {
        match self {
            BivariateSection::PairPlot(_) => Subsection::PairPlot,
            BivariateSection::CorrelationPlot(_) => Subsection::CorrelationPlot,
            BivariateSection::ContingencyTable(_) => Subsection::ContingencyTable,
        }
    }

    fn as_section(&self) -> &dyn Section {
        match self {
            BivariateSection::PairPlot(section) => section,
            BivariateSection::CorrelationPlot(section) => section,
            BivariateSection::ContingencyTable(section) => section,
        }
    }
}

impl Section for BivariateSection {
    fn name(&self) -> &str {
        self.as_section().name()
    }

    fn uid(&self) -> &str {
        self.as_section().uid()
    }

    fn verbosity(&self) -> u8 {
        self.as_section().verbosity()
    }

    fn required_imports(&self) -> Vec<String> {
        self.as_section().required_imports()
    }

    fn add_cells(&self, cells: &mut Vec<Cell>) {
        self.as_section().add_cells(cells)
    }

    fn show(&self, df: &DataFrame) -> Result<()> {
        self.as_section().show(df)
    }
}

/// Configuration for [`BivariateAnalysis`]; `build` validates fail-fast and
/// resolves subsections and column selections once.
#[derive(Debug, Clone, Default)]
pub struct BivariateAnalysisBuilder {
    verbosity: i32,
    verbosity_pairplot: Option<i32>,
    verbosity_correlations: Option<i32>,
    verbosity_contingency_table: Option<i32>,
    columns: Option<Vec<String>>,
    columns_x: Option<Vec<String>>,
    columns_y: Option<Vec<String>>,
    columns_pairs: Option<Vec<(String, String)>>,
    color_col: Option<String>,
    subsections: Option<Vec<Subsection>>,
}

impl BivariateAnalysisBuilder {
    /// Section-wide verbosity, inherited by every subsection kind that has no
    /// override of its own.
    pub fn verbosity(mut self, verbosity: i32) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn verbosity_pairplot(mut self, verbosity: i32) -> Self {
        self.verbosity_pairplot = Some(verbosity);
        self
    }

    pub fn verbosity_correlations(mut self, verbosity: i32) -> Self {
        self.verbosity_correlations = Some(verbosity);
        self
    }

    pub fn verbosity_contingency_table(mut self, verbosity: i32) -> Self {
        self.verbosity_contingency_table = Some(verbosity);
        self
    }

    /// Restrict the analysis to the given columns.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn columns_x<I, S>(mut self, columns_x: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns_x = Some(columns_x.into_iter().map(Into::into).collect());
        self
    }

    pub fn columns_y<I, S>(mut self, columns_y: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns_y = Some(columns_y.into_iter().map(Into::into).collect());
        self
    }

    /// Explicit column pairs; takes priority over `columns_x`/`columns_y`.
    pub fn columns_pairs<I, S, T>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        self.columns_pairs = Some(
            pairs
                .into_iter()
                .map(|(x, y)| (x.into(), y.into()))
                .collect(),
        );
        self
    }

    /// Column used to color plots in kinds that support visual grouping.
    pub fn color_col(mut self, color_col: impl Into<String>) -> Self {
        self.color_col = Some(color_col.into());
        self
    }

    /// Subsections to instantiate, in order; repeats are kept.
    pub fn subsections<I>(mut self, subsections: I) -> Self
    where
        I: IntoIterator<Item = Subsection>,
    {
        self.subsections = Some(subsections.into_iter().collect());
        self
    }

    pub fn build(self) -> Result<BivariateAnalysis> {
        let verbosity = validate_verbosity(self.verbosity, "verbosity")?;
        let verbosity_pairplot = match self.verbosity_pairplot {
            Some(value) => validate_verbosity(value, "verbosity_pairplot")?,
            None => verbosity,
        };
        let verbosity_correlations = match self.verbosity_correlations {
            Some(value) => validate_verbosity(value, "verbosity_correlations")?,
            None => verbosity,
        };
        let verbosity_contingency_table = match self.verbosity_contingency_table {
            Some(value) => validate_verbosity(value, "verbosity_contingency_table")?,
            None => verbosity,
        };

        let kinds = self
            .subsections
            .unwrap_or_else(|| Subsection::DEFAULT.to_vec());

        // Explicit pairs win: firsts become the x selection, seconds the y
        // selection, duplicates preserved. The raw configuration is kept
        // untouched for the verbosity-0 echo.
        let (resolved_x, resolved_y) = match &self.columns_pairs {
            Some(pairs) => (
                Some(pairs.iter().map(|(x, _)| x.clone()).collect::<Vec<_>>()),
                Some(pairs.iter().map(|(_, y)| y.clone()).collect::<Vec<_>>()),
            ),
            None => (self.columns_x.clone(), self.columns_y.clone()),
        };

        let subsections = kinds
            .iter()
            .map(|kind| {
                Ok(match kind {
                    Subsection::PairPlot => BivariateSection::PairPlot(PairPlot::new(
                        verbosity_pairplot as i32,
                        self.columns.clone(),
                        resolved_x.clone(),
                        resolved_y.clone(),
                        self.color_col.clone(),
                    )?),
                    Subsection::CorrelationPlot => {
                        BivariateSection::CorrelationPlot(CorrelationPlot::new(
                            verbosity_correlations as i32,
                            self.columns.clone(),
                            resolved_x.clone(),
                            resolved_y.clone(),
                        )?)
                    }
                    Subsection::ContingencyTable => {
                        BivariateSection::ContingencyTable(ContingencyTable::new(
                            verbosity_contingency_table as i32,
                            self.columns.clone(),
                            resolved_x.clone(),
                            resolved_y.clone(),
                            self.columns_pairs.clone(),
                        )?)
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(BivariateAnalysis {
            uid: new_uid(),
            verbosity,
            columns: self.columns,
            columns_x: self.columns_x,
            columns_y: self.columns_y,
            columns_pairs: self.columns_pairs,
            color_col: self.color_col,
            subsections,
        })
    }
}

/// Analysis of relationships between pairs of columns.
pub struct BivariateAnalysis {
    uid: String,
    verbosity: u8,
    columns: Option<Vec<String>>,
    columns_x: Option<Vec<String>>,
    columns_y: Option<Vec<String>>,
    columns_pairs: Option<Vec<(String, String)>>,
    color_col: Option<String>,
    subsections: Vec<BivariateSection>,
}

impl BivariateAnalysis {
    pub fn builder() -> BivariateAnalysisBuilder {
        BivariateAnalysisBuilder::default()
    }

    pub fn subsections(&self) -> &[BivariateSection] {
        &self.subsections
    }

    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    pub fn columns_x(&self) -> Option<&[String]> {
        self.columns_x.as_deref()
    }

    pub fn columns_y(&self) -> Option<&[String]> {
        self.columns_y.as_deref()
    }

    pub fn columns_pairs(&self) -> Option<&[(String, String)]> {
        self.columns_pairs.as_deref()
    }

    /// Tags of the children still at verbosity 0, in order.
    fn verbosity_0_kinds(&self) -> Vec<Subsection> {
        self.subsections
            .iter()
            .filter(|subsection| subsection.verbosity() == 0)
            .map(|subsection| subsection.kind())
            .collect()
    }

    /// The aggregate entry call covering `kinds`, echoing only non-default
    /// raw configuration.
    fn verbosity_0_call(&self, kinds: &[Subsection]) -> String {
        let mut call = String::from("bivariate_analysis(df=df");
        if kinds != Subsection::DEFAULT.as_slice() {
            let paths: Vec<&str> = kinds.iter().map(|kind| kind.qualified_path()).collect();
            call.push_str(&format!(", subsections=[{}]", paths.join(", ")));
        }
        match &self.columns_x {
            None => {
                if let Some(columns) = &self.columns {
                    call.push_str(&format!(", columns={}", format_string_list(columns)));
                }
            }
            Some(columns_x) => {
                call.push_str(&format!(", columns_x={}", format_string_list(columns_x)));
                if let Some(columns_y) = &self.columns_y {
                    call.push_str(&format!(", columns_y={}", format_string_list(columns_y)));
                }
            }
        }
        if let Some(pairs) = &self.columns_pairs {
            call.push_str(&format!(", columns_pairs={}", format_pair_list(pairs)));
        }
        if let Some(color_col) = &self.color_col {
            call.push_str(&format!(", color_col={}", quote(color_col)));
        }
        call.push(')');
        call
    }
}

impl Section for BivariateAnalysis {
    fn name(&self) -> &str {
        "Bivariate analysis"
    }

    fn uid(&self) -> &str {
        &self.uid
    }

    fn verbosity(&self) -> u8 {
        self.verbosity
    }

    fn required_imports(&self) -> Vec<String> {
        if self.verbosity == 0 {
            let mut sets = vec![vec![ENTRY_IMPORT.to_string()]];
            sets.extend(
                self.subsections
                    .iter()
                    .filter(|subsection| subsection.verbosity() > 0)
                    .map(|subsection| subsection.required_imports()),
            );
            union_imports(sets)
        } else {
            union_imports(
                self.subsections
                    .iter()
                    .map(|subsection| subsection.required_imports()),
            )
        }
    }

    fn add_cells(&self, cells: &mut Vec<Cell>) {
        cells.push(Cell::markdown(self.title(1)));
        if self.verbosity == 0 {
            let verbosity_0 = self.verbosity_0_kinds();
            if !verbosity_0.is_empty() {
                cells.push(Cell::code(self.verbosity_0_call(&verbosity_0)));
            }
            for subsection in self
                .subsections
                .iter()
                .filter(|subsection| subsection.verbosity() > 0)
            {
                subsection.add_cells(cells);
            }
        } else {
            for subsection in &self.subsections {
                subsection.add_cells(cells);
            }
        }
    }

    fn show(&self, df: &DataFrame) -> Result<()> {
        for subsection in &self.subsections {
            subsection.show(df)?;
        }
        Ok(())
    }
}
