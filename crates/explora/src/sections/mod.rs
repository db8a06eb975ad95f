//! Report section model: cells, the section contract, and the composite.
//!
//! A report is a tree of sections, at most one composite level deep. Every
//! section can render its analysis directly against a dataset and can export
//! notebook-style cells that reproduce the analysis as code. The `verbosity`
//! knob controls how much code detail is exported:
//!
//! * `0` exports a single call that generates the entire section
//! * `1` exports one call per subsection
//! * `2` exports the full source of the analysis
pub mod bivariate;
pub(crate) mod code_formatting;

use polars::frame::DataFrame;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ReportError, Result};

/// A single unit of exported notebook output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "snake_case")]
pub enum Cell {
    Markdown { source: String },
    Code { source: String },
}

impl Cell {
    /// Create a markdown cell.
    pub fn markdown(source: impl Into<String>) -> Self {
        Cell::Markdown {
            source: source.into(),
        }
    }

    /// Create a code cell.
    pub fn code(source: impl Into<String>) -> Self {
        Cell::Code {
            source: source.into(),
        }
    }

    /// The cell's source text.
    pub fn source(&self) -> &str {
        match self {
            Cell::Markdown { source } | Cell::Code { source } => source,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Cell::Code { .. })
    }
}

/// Validate a verbosity value, naming the offending parameter on failure.
pub(crate) fn validate_verbosity(value: i32, parameter: &'static str) -> Result<u8> {
    if (0..=2).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ReportError::InvalidVerbosity { parameter, value })
    }
}

/// Generate a fresh section identifier.
pub(crate) fn new_uid() -> String {
    Uuid::new_v4().to_string()
}

/// Contract every analysis unit satisfies.
///
/// Implementers hold no mutable state besides their fixed configuration and
/// identity: construct once, export or render any number of times, discard.
pub trait Section {
    /// Human-readable section title.
    fn name(&self) -> &str;

    /// Identifier used for table-of-contents anchors. Unique per instance,
    /// never used for ordering or equality.
    fn uid(&self) -> &str;

    /// Detail level of the code this section exports.
    fn verbosity(&self) -> u8;

    /// Markdown heading at the given level, carrying the anchor used by the
    /// table of contents. Top-level headings get a separator line.
    fn title(&self, level: usize) -> String {
        let mut title = format!("{} {}<a id='{}'>", "#".repeat(level), self.name(), self.uid());
        if level == 1 {
            title.push_str("\n---");
        }
        title
    }

    /// Import statements required by the code this section emits at its
    /// current verbosity. Duplicate-free; order carries no meaning.
    fn required_imports(&self) -> Vec<String>;

    /// Append this section's exported cells to `cells`.
    fn add_cells(&self, cells: &mut Vec<Cell>);

    /// Render the section's output for `df` immediately.
    fn show(&self, df: &DataFrame) -> Result<()>;
}

/// A top-level section composed of an ordered list of subsections.
///
/// Every contract method fans out to the children in order; the composite
/// contributes no cells of its own. A failure in one child during [`show`]
/// does not roll back what earlier children already rendered.
///
/// [`show`]: Section::show
pub struct ReportSection {
    name: String,
    uid: String,
    verbosity: u8,
    columns: Option<Vec<String>>,
    subsections: Vec<Box<dyn Section>>,
}

impl ReportSection {
    /// Create a composite section over `subsections`.
    ///
    /// Fails with [`ReportError::InvalidVerbosity`] before anything else when
    /// `verbosity` is not one of 0, 1, 2.
    pub fn new(
        name: impl Into<String>,
        verbosity: i32,
        columns: Option<Vec<String>>,
        subsections: Vec<Box<dyn Section>>,
    ) -> Result<Self> {
        let verbosity = validate_verbosity(verbosity, "verbosity")?;
        Ok(Self {
            name: name.into(),
            uid: new_uid(),
            verbosity,
            columns,
            subsections,
        })
    }

    pub fn subsections(&self) -> &[Box<dyn Section>] {
        &self.subsections
    }

    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }
}

impl Section for ReportSection {
    fn name(&self) -> &str {
        &self.name
    }

    fn uid(&self) -> &str {
        &self.uid
    }

    fn verbosity(&self) -> u8 {
        self.verbosity
    }

    fn required_imports(&self) -> Vec<String> {
        code_formatting::union_imports(
            self.subsections
                .iter()
                .map(|subsection| subsection.required_imports()),
        )
    }

    fn add_cells(&self, cells: &mut Vec<Cell>) {
        for subsection in &self.subsections {
            subsection.add_cells(cells);
        }
    }

    fn show(&self, df: &DataFrame) -> Result<()> {
        for subsection in &self.subsections {
            subsection.show(df)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct StubSection {
        uid: String,
        name: &'static str,
        imports: Vec<String>,
    }

    impl StubSection {
        fn new(name: &'static str, imports: &[&str]) -> Self {
            Self {
                uid: new_uid(),
                name,
                imports: imports.iter().map(|import| import.to_string()).collect(),
            }
        }
    }

    impl Section for StubSection {
        fn name(&self) -> &str {
            self.name
        }

        fn uid(&self) -> &str {
            &self.uid
        }

        fn verbosity(&self) -> u8 {
            0
        }

        fn required_imports(&self) -> Vec<String> {
            self.imports.clone()
        }

        fn add_cells(&self, cells: &mut Vec<Cell>) {
            cells.push(Cell::code(format!("{}()", self.name)));
        }

        fn show(&self, _df: &DataFrame) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_title_level_one_has_separator() {
        let section = StubSection::new("overview", &[]);
        let title = section.title(1);
        assert_eq!(
            title,
            format!("# overview<a id='{}'>\n---", section.uid())
        );
    }

    #[test]
    fn test_title_level_two_has_no_separator() {
        let section = StubSection::new("overview", &[]);
        assert_eq!(
            section.title(2),
            format!("## overview<a id='{}'>", section.uid())
        );
    }

    #[test]
    fn test_validate_verbosity_accepts_valid_values() {
        for value in 0..=2 {
            assert_eq!(validate_verbosity(value, "verbosity").unwrap(), value as u8);
        }
    }

    #[test]
    fn test_validate_verbosity_rejects_invalid_values() {
        for value in [-3, -1, 3, 10] {
            let error = validate_verbosity(value, "verbosity").unwrap_err();
            assert!(matches!(
                error,
                ReportError::InvalidVerbosity {
                    parameter: "verbosity",
                    value: got,
                } if got == value
            ));
        }
    }

    #[test]
    fn test_report_section_rejects_invalid_verbosity() {
        let result = ReportSection::new("overview", 7, None, Vec::new());
        assert!(matches!(
            result,
            Err(ReportError::InvalidVerbosity { value: 7, .. })
        ));
    }

    #[test]
    fn test_report_section_delegates_cells_in_order() {
        let section = ReportSection::new(
            "overview",
            0,
            None,
            vec![
                Box::new(StubSection::new("first", &[])),
                Box::new(StubSection::new("second", &[])),
            ],
        )
        .unwrap();

        let mut cells = Vec::new();
        section.add_cells(&mut cells);
        let sources: Vec<&str> = cells.iter().map(|cell| cell.source()).collect();
        assert_eq!(sources, vec!["first()", "second()"]);
    }

    #[test]
    fn test_report_section_unions_imports() {
        let section = ReportSection::new(
            "overview",
            0,
            None,
            vec![
                Box::new(StubSection::new("first", &["import pandas as pd", "import numpy as np"])),
                Box::new(StubSection::new("second", &["import numpy as np"])),
            ],
        )
        .unwrap();

        assert_eq!(
            section.required_imports(),
            vec![
                "import pandas as pd".to_string(),
                "import numpy as np".to_string()
            ]
        );
    }

    #[test]
    fn test_uids_are_unique_per_instance() {
        let first = StubSection::new("a", &[]);
        let second = StubSection::new("a", &[]);
        assert_ne!(first.uid(), second.uid());
    }

    #[test]
    fn test_cell_serialization_tags() {
        let code = serde_json::to_value(Cell::code("df.head()")).unwrap();
        assert_eq!(code["cell_type"], "code");
        assert_eq!(code["source"], "df.head()");

        let markdown = serde_json::to_value(Cell::markdown("# Title")).unwrap();
        assert_eq!(markdown["cell_type"], "markdown");
    }
}
