//! Pair plot subsection: a scatter-plot matrix of column combinations.

use polars::frame::DataFrame;

use super::sources;
use crate::error::Result;
use crate::render;
use crate::sections::code_formatting::{format_string_list, quote};
use crate::sections::{Cell, Section, new_uid, validate_verbosity};

/// Pair plot of column combinations, optionally colored by a grouping column.
pub struct PairPlot {
    uid: String,
    verbosity: u8,
    columns: Option<Vec<String>>,
    columns_x: Option<Vec<String>>,
    columns_y: Option<Vec<String>>,
    color_col: Option<String>,
}

impl PairPlot {
    pub(crate) const ENTRY_IMPORT: &'static str =
        "from explora.report_sections.bivariate_analysis import PairPlot\n\
         plot_pairplot = PairPlot.plot_pairplot";

    pub fn new(
        verbosity: i32,
        columns: Option<Vec<String>>,
        columns_x: Option<Vec<String>>,
        columns_y: Option<Vec<String>>,
        color_col: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            uid: new_uid(),
            verbosity: validate_verbosity(verbosity, "verbosity_pairplot")?,
            columns,
            columns_x,
            columns_y,
            color_col,
        })
    }

    /// The one-line entry call with this section's non-default arguments.
    fn default_call(&self) -> String {
        let mut call = String::from("plot_pairplot(df=df");
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
        if let Some(color_col) = &self.color_col {
            call.push_str(&format!(", color_col={}", quote(color_col)));
        }
        call.push(')');
        call
    }
}

impl Section for PairPlot {
    fn name(&self) -> &str {
        "Pairplot"
    }

    fn uid(&self) -> &str {
        &self.uid
    }

    fn verbosity(&self) -> u8 {
        self.verbosity
    }

    fn required_imports(&self) -> Vec<String> {
        if self.verbosity <= 1 {
            vec![Self::ENTRY_IMPORT.to_string()]
        } else {
            sources::PAIRPLOT_IMPORTS
                .iter()
                .map(|import| import.to_string())
                .collect()
        }
    }

    fn add_cells(&self, cells: &mut Vec<Cell>) {
        cells.push(Cell::markdown(self.title(2)));
        let call = self.default_call();
        let code = if self.verbosity <= 1 {
            call
        } else {
            sources::render_with_sources(sources::PAIRPLOT_FUNCTIONS, &call)
        };
        cells.push(Cell::code(code));
    }

    fn show(&self, df: &DataFrame) -> Result<()> {
        let columns_x = match &self.columns_x {
            Some(columns_x) => columns_x.clone(),
            None => render::numeric_columns(df, self.columns.as_deref()),
        };
        let columns_y = match &self.columns_y {
            Some(columns_y) => columns_y.clone(),
            None => columns_x.clone(),
        };
        let plot = render::pairplot(df, &columns_x, &columns_y, self.color_col.as_deref())?;
        plot.show();
        Ok(())
    }
}
