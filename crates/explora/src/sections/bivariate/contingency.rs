//! Contingency table subsection: cross tabulations of categorical pairs.

use polars::frame::DataFrame;

use super::sources;
use crate::error::Result;
use crate::render;
use crate::sections::code_formatting::{format_pair_list, format_string_list};
use crate::sections::{Cell, Section, new_uid, validate_verbosity};

/// Cross tabulation of value counts for pairs of categorical columns.
pub struct ContingencyTable {
    uid: String,
    verbosity: u8,
    columns: Option<Vec<String>>,
    columns_x: Option<Vec<String>>,
    columns_y: Option<Vec<String>>,
    columns_pairs: Option<Vec<(String, String)>>,
}

impl ContingencyTable {
    pub(crate) const ENTRY_IMPORT: &'static str =
        "from explora.report_sections.bivariate_analysis import ContingencyTable\n\
         contingency_tables = ContingencyTable.contingency_tables";

    pub fn new(
        verbosity: i32,
        columns: Option<Vec<String>>,
        columns_x: Option<Vec<String>>,
        columns_y: Option<Vec<String>>,
        columns_pairs: Option<Vec<(String, String)>>,
    ) -> Result<Self> {
        Ok(Self {
            uid: new_uid(),
            verbosity: validate_verbosity(verbosity, "verbosity_contingency_table")?,
            columns,
            columns_x,
            columns_y,
            columns_pairs,
        })
    }

    /// Explicit pairs win over x/y selections, which win over the
    /// section-wide column restriction.
    fn default_call(&self) -> String {
        let mut call = String::from("contingency_tables(df=df");
        if let Some(pairs) = &self.columns_pairs {
            call.push_str(&format!(", columns_pairs={}", format_pair_list(pairs)));
        } else if let Some(columns_x) = &self.columns_x {
            call.push_str(&format!(", columns_x={}", format_string_list(columns_x)));
            if let Some(columns_y) = &self.columns_y {
                call.push_str(&format!(", columns_y={}", format_string_list(columns_y)));
            }
        } else if let Some(columns) = &self.columns {
            call.push_str(&format!(", columns={}", format_string_list(columns)));
        }
        call.push(')');
        call
    }

    /// The column pairs this section analyzes for `df`.
    fn resolve_pairs(&self, df: &DataFrame) -> Vec<(String, String)> {
        if let Some(pairs) = &self.columns_pairs {
            return pairs.clone();
        }
        if let (Some(columns_x), Some(columns_y)) = (&self.columns_x, &self.columns_y) {
            return columns_x
                .iter()
                .flat_map(|x| columns_y.iter().map(move |y| (x.clone(), y.clone())))
                .collect();
        }
        let categorical = render::categorical_columns(df, self.columns.as_deref());
        let mut pairs = Vec::new();
        for (index, x) in categorical.iter().enumerate() {
            for y in &categorical[index + 1..] {
                pairs.push((x.clone(), y.clone()));
            }
        }
        pairs
    }
}

impl Section for ContingencyTable {
    fn name(&self) -> &str {
        "Contingency tables"
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
            sources::CONTINGENCY_IMPORTS
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
            sources::render_with_sources(sources::CONTINGENCY_FUNCTIONS, &call)
        };
        cells.push(Cell::code(code));
    }

    fn show(&self, df: &DataFrame) -> Result<()> {
        for (column_x, column_y) in self.resolve_pairs(df) {
            let table = render::contingency_table(df, &column_x, &column_y)?;
            println!("{table}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pairs_win_over_x_y() {
        let section = ContingencyTable::new(
            1,
            None,
            Some(vec!["x".to_string()]),
            Some(vec!["y".to_string()]),
            Some(vec![("a".to_string(), "b".to_string())]),
        )
        .unwrap();
        let mut cells = Vec::new();
        section.add_cells(&mut cells);
        assert_eq!(
            cells.last().unwrap().source(),
            "contingency_tables(df=df, columns_pairs=[('a', 'b')])"
        );
    }

    #[test]
    fn test_columns_restriction_echoed_without_x_y() {
        let section = ContingencyTable::new(
            0,
            Some(vec!["a".to_string(), "b".to_string()]),
            None,
            None,
            None,
        )
        .unwrap();
        let mut cells = Vec::new();
        section.add_cells(&mut cells);
        assert_eq!(
            cells.last().unwrap().source(),
            "contingency_tables(df=df, columns=['a', 'b'])"
        );
    }

    #[test]
    fn test_full_verbosity_embeds_both_functions() {
        let section = ContingencyTable::new(2, None, None, None, None).unwrap();
        let mut cells = Vec::new();
        section.add_cells(&mut cells);
        let code = cells.last().unwrap().source();
        let tables = code.find("def contingency_tables(").unwrap();
        let table = code.find("def contingency_table(df, column1").unwrap();
        assert!(tables < table);
        assert!(code.ends_with("\n\ncontingency_tables(df=df)"));
        assert!(!code.contains("ContingencyTable."));
    }
}
