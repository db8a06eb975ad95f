//! Assembles sections into an exportable notebook-style report.
//!
//! The exported document starts with one code cell holding the union of the
//! sections' required imports, followed by a table of contents linking each
//! section's anchor, followed by every section's own cells.

use std::fs;
use std::path::Path;

use chrono::Local;
use polars::frame::DataFrame;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::error::Result;
use crate::sections::code_formatting::union_imports;
use crate::sections::{Cell, Section};

/// A fully assembled report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: String,
    pub cells: Vec<Cell>,
}

/// Collects sections and assembles them into a [`Report`].
pub struct ReportBuilder {
    title: String,
    sections: Vec<Box<dyn Section>>,
}

impl ReportBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Append a section; sections keep their insertion order.
    pub fn section(mut self, section: impl Section + 'static) -> Self {
        self.sections.push(Box::new(section));
        self
    }

    /// Assemble the report cells.
    pub fn build(&self) -> Report {
        let mut cells = Vec::new();
        cells.push(Cell::markdown(format!("# {}", self.title)));

        let imports = union_imports(
            self.sections
                .iter()
                .map(|section| section.required_imports()),
        );
        if !imports.is_empty() {
            cells.push(Cell::code(imports.join("\n")));
        }

        if !self.sections.is_empty() {
            let entries: Vec<String> = self
                .sections
                .iter()
                .map(|section| format!("* [{}](#{})", section.name(), section.uid()))
                .collect();
            cells.push(Cell::markdown(format!(
                "## Table of Contents\n{}",
                entries.join("\n")
            )));
        }

        for section in &self.sections {
            section.add_cells(&mut cells);
        }

        Report {
            generated_at: Local::now().to_rfc3339(),
            cells,
        }
    }

    /// Render every section against `df` in order.
    pub fn show(&self, df: &DataFrame) -> Result<()> {
        for section in &self.sections {
            section.show(df)?;
        }
        Ok(())
    }
}

impl Report {
    /// Write the report as notebook-style JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let document = json!({
            "metadata": { "generated_at": self.generated_at },
            "cells": self.cells,
        });
        fs::write(path, serde_json::to_string_pretty(&document)?)?;
        info!(path = %path.display(), cells = self.cells.len(), "report written");
        Ok(())
    }

    /// Write the report as a markdown document with fenced code blocks.
    pub fn write_markdown(&self, path: &Path) -> Result<()> {
        let mut out = String::new();
        for cell in &self.cells {
            match cell {
                Cell::Markdown { source } => {
                    out.push_str(source);
                    out.push_str("\n\n");
                }
                Cell::Code { source } => {
                    out.push_str("```python\n");
                    out.push_str(source);
                    out.push_str("\n```\n\n");
                }
            }
        }
        fs::write(path, out)?;
        info!(path = %path.display(), cells = self.cells.len(), "report written");
        Ok(())
    }
}
