//! Concrete analysis routines behind [`Section::show`].
//!
//! Column selection is driven by the type classifier, so sections render the
//! columns an analyst would expect without explicit configuration.
//!
//! [`Section::show`]: crate::sections::Section::show

use std::collections::BTreeMap;

use plotly::common::Mode;
use plotly::layout::{Axis, Layout};
use plotly::{HeatMap, Plot, Scatter};
use polars::datatypes::DataType as PolarsDataType;
use polars::frame::DataFrame;
use polars::prelude::Column;
use polars::series::Series;
use tracing::debug;

use crate::data_types::{DataType, infer_data_type};
use crate::error::{ReportError, Result};

/// Names of the columns classified as numeric, optionally restricted.
pub fn numeric_columns(df: &DataFrame, restrict: Option<&[String]>) -> Vec<String> {
    select_by_type(df, restrict, |data_type| data_type == DataType::Numeric)
}

/// Names of the columns classified as categorical or boolean, optionally
/// restricted.
pub fn categorical_columns(df: &DataFrame, restrict: Option<&[String]>) -> Vec<String> {
    select_by_type(df, restrict, |data_type| {
        matches!(data_type, DataType::Categorical | DataType::Boolean)
    })
}

fn select_by_type(
    df: &DataFrame,
    restrict: Option<&[String]>,
    predicate: impl Fn(DataType) -> bool,
) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|column| {
            restrict.is_none_or(|names| names.iter().any(|name| name == column.name().as_str()))
        })
        .filter(|column| predicate(infer_data_type(column.as_materialized_series())))
        .map(|column| column.name().to_string())
        .collect()
}

/// Scatter-plot matrix over the given column selections.
///
/// With a color column, each x/y combination gets one trace per distinct
/// color value.
pub fn pairplot(
    df: &DataFrame,
    columns_x: &[String],
    columns_y: &[String],
    color_col: Option<&str>,
) -> Result<Plot> {
    if columns_x.is_empty() || columns_y.is_empty() {
        return Err(ReportError::EmptySelection("pairplot".to_string()));
    }
    let color_values = match color_col {
        Some(name) => Some(string_values(column(df, name)?)?),
        None => None,
    };

    let mut plot = Plot::new();
    for column_x in columns_x {
        for column_y in columns_y {
            let xs = numeric_values(column(df, column_x)?)?;
            let ys = numeric_values(column(df, column_y)?)?;
            match &color_values {
                None => {
                    let (points_x, points_y) = complete_points(&xs, &ys);
                    plot.add_trace(
                        Scatter::new(points_x, points_y)
                            .mode(Mode::Markers)
                            .name(&format!("{column_x} vs {column_y}")),
                    );
                }
                Some(groups) => {
                    let mut grouped: BTreeMap<&str, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
                    for ((x, y), group) in xs.iter().zip(&ys).zip(groups) {
                        if let Some((x, y)) = (*x).zip(*y) {
                            let entry = grouped.entry(group.as_str()).or_default();
                            entry.0.push(x);
                            entry.1.push(y);
                        }
                    }
                    for (group, (points_x, points_y)) in grouped {
                        plot.add_trace(
                            Scatter::new(points_x, points_y)
                                .mode(Mode::Markers)
                                .name(&format!("{column_x} vs {column_y} ({group})")),
                        );
                    }
                }
            }
        }
    }
    plot.set_layout(Layout::new().title("Pairplot"));
    debug!(
        columns_x = columns_x.len(),
        columns_y = columns_y.len(),
        "pairplot assembled"
    );
    Ok(plot)
}

/// Pairwise Pearson correlation over two column selections.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    pub columns_x: Vec<String>,
    pub columns_y: Vec<String>,
    /// One row per y column, one value per x column. `NaN` marks pairs with
    /// fewer than two complete observations or zero variance.
    pub values: Vec<Vec<f64>>,
}

/// Compute the Pearson correlation matrix for the given selections, using
/// pairwise-complete observations.
pub fn correlation_matrix(
    df: &DataFrame,
    columns_x: &[String],
    columns_y: &[String],
) -> Result<CorrelationMatrix> {
    if columns_x.is_empty() || columns_y.is_empty() {
        return Err(ReportError::EmptySelection("correlations".to_string()));
    }
    let series_x = columns_x
        .iter()
        .map(|name| numeric_values(column(df, name)?))
        .collect::<Result<Vec<_>>>()?;
    let series_y = columns_y
        .iter()
        .map(|name| numeric_values(column(df, name)?))
        .collect::<Result<Vec<_>>>()?;

    let values = series_y
        .iter()
        .map(|y| series_x.iter().map(|x| pearson(x, y)).collect())
        .collect();

    Ok(CorrelationMatrix {
        columns_x: columns_x.to_vec(),
        columns_y: columns_y.to_vec(),
        values,
    })
}

/// Heatmap of the Pearson correlation matrix.
pub fn correlation_heatmap(
    df: &DataFrame,
    columns_x: &[String],
    columns_y: &[String],
) -> Result<Plot> {
    let matrix = correlation_matrix(df, columns_x, columns_y)?;
    let mut plot = Plot::new();
    plot.add_trace(HeatMap::new(
        matrix.columns_x,
        matrix.columns_y,
        matrix.values,
    ));
    plot.set_layout(
        Layout::new()
            .title("Pearson correlation")
            .x_axis(Axis::new().title("x"))
            .y_axis(Axis::new().title("y")),
    );
    Ok(plot)
}

/// Cross tabulation of value counts for two columns. The first output column
/// holds the distinct values of `column_x`; the remaining columns hold counts
/// per distinct value of `column_y`.
pub fn contingency_table(df: &DataFrame, column_x: &str, column_y: &str) -> Result<DataFrame> {
    let xs = string_values(column(df, column_x)?)?;
    let ys = string_values(column(df, column_y)?)?;

    let mut counts: BTreeMap<(String, String), u32> = BTreeMap::new();
    for (x, y) in xs.iter().zip(&ys) {
        *counts.entry((x.clone(), y.clone())).or_insert(0) += 1;
    }
    let mut row_keys: Vec<String> = xs.clone();
    row_keys.sort();
    row_keys.dedup();
    let mut col_keys: Vec<String> = ys.clone();
    col_keys.sort();
    col_keys.dedup();

    let mut columns = Vec::with_capacity(col_keys.len() + 1);
    columns.push(Column::new(column_x.into(), row_keys.clone()));
    for key in &col_keys {
        let column_counts: Vec<u32> = row_keys
            .iter()
            .map(|row| {
                counts
                    .get(&(row.clone(), key.clone()))
                    .copied()
                    .unwrap_or(0)
            })
            .collect();
        columns.push(Column::new(key.as_str().into(), column_counts));
    }
    Ok(DataFrame::new(columns)?)
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    Ok(df
        .column(name)
        .map_err(|_| ReportError::ColumnNotFound(name.to_string()))?
        .as_materialized_series())
}

fn numeric_values(series: &Series) -> Result<Vec<Option<f64>>> {
    let floats = series.cast(&PolarsDataType::Float64)?;
    Ok(floats.f64()?.into_iter().collect())
}

fn string_values(series: &Series) -> Result<Vec<String>> {
    if series.dtype() == &PolarsDataType::String {
        return Ok(series
            .str()?
            .into_iter()
            .map(|value| value.map_or_else(|| "null".to_string(), |s| s.to_string()))
            .collect());
    }
    Ok((0..series.len())
        .map(|index| {
            series
                .get(index)
                .map_or_else(|_| "null".to_string(), |value| value.to_string())
        })
        .collect())
}

fn complete_points(xs: &[Option<f64>], ys: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    xs.iter()
        .zip(ys)
        .filter_map(|(x, y)| (*x).zip(*y))
        .unzip()
}

fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a.iter().zip(b).filter_map(|(x, y)| (*x).zip(*y)).collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;
    let mut covariance = 0.0;
    let mut variance_a = 0.0;
    let mut variance_b = 0.0;
    for (x, y) in &pairs {
        covariance += (x - mean_a) * (y - mean_b);
        variance_a += (x - mean_a).powi(2);
        variance_b += (y - mean_b).powi(2);
    }
    if variance_a == 0.0 || variance_b == 0.0 {
        return f64::NAN;
    }
    covariance / (variance_a.sqrt() * variance_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::df;
    use pretty_assertions::assert_eq;

    fn test_df() -> DataFrame {
        df!(
            "height" => [1.0f64, 2.0, 3.0, 4.0],
            "weight" => [2.0f64, 4.0, 6.0, 8.0],
            "inverse" => [4.0f64, 3.0, 2.0, 1.0],
            "group" => ["a", "b", "a", "b"],
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_columns_selection() {
        let frame = test_df();
        assert_eq!(
            numeric_columns(&frame, None),
            vec!["height", "weight", "inverse"]
        );
        let restrict = vec!["height".to_string(), "group".to_string()];
        assert_eq!(numeric_columns(&frame, Some(&restrict)), vec!["height"]);
    }

    #[test]
    fn test_categorical_columns_selection() {
        let frame = test_df();
        assert_eq!(categorical_columns(&frame, None), vec!["group"]);
    }

    #[test]
    fn test_perfect_correlation() {
        let frame = test_df();
        let matrix = correlation_matrix(
            &frame,
            &["height".to_string()],
            &["weight".to_string(), "inverse".to_string()],
        )
        .unwrap();
        assert!((matrix.values[0][0] - 1.0).abs() < 1e-12);
        assert!((matrix.values[1][0] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_with_missing_values_is_pairwise() {
        let frame = df!(
            "a" => [Some(1.0f64), Some(2.0), None, Some(4.0)],
            "b" => [Some(2.0f64), Some(4.0), Some(5.0), Some(8.0)],
        )
        .unwrap();
        let matrix =
            correlation_matrix(&frame, &["a".to_string()], &["b".to_string()]).unwrap();
        assert!((matrix.values[0][0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_is_nan() {
        let frame = df!(
            "a" => [1.0f64, 1.0, 1.0],
            "b" => [1.0f64, 2.0, 3.0],
        )
        .unwrap();
        let matrix =
            correlation_matrix(&frame, &["a".to_string()], &["b".to_string()]).unwrap();
        assert!(matrix.values[0][0].is_nan());
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let frame = test_df();
        assert!(matches!(
            correlation_matrix(&frame, &[], &["weight".to_string()]),
            Err(ReportError::EmptySelection(_))
        ));
        assert!(matches!(
            pairplot(&frame, &[], &[], None),
            Err(ReportError::EmptySelection(_))
        ));
    }

    #[test]
    fn test_unknown_column_is_an_error() {
        let frame = test_df();
        assert!(matches!(
            correlation_matrix(&frame, &["missing".to_string()], &["weight".to_string()]),
            Err(ReportError::ColumnNotFound(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_contingency_table_counts() {
        let frame = df!(
            "color" => ["red", "red", "blue", "red"],
            "size" => ["s", "m", "s", "s"],
        )
        .unwrap();
        let table = contingency_table(&frame, "color", "size").unwrap();
        assert_eq!(table.shape(), (2, 3));
        // Rows are sorted: blue, red. Columns: color, m, s.
        let s_counts: Vec<u32> = table
            .column("s")
            .unwrap()
            .as_materialized_series()
            .u32()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(s_counts, vec![1, 2]);
        let m_counts: Vec<u32> = table
            .column("m")
            .unwrap()
            .as_materialized_series()
            .u32()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(m_counts, vec![0, 1]);
    }

    #[test]
    fn test_pairplot_builds_for_valid_selection() {
        let frame = test_df();
        let columns = vec!["height".to_string(), "weight".to_string()];
        assert!(pairplot(&frame, &columns, &columns, Some("group")).is_ok());
    }
}
