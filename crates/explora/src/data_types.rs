//! Semantic column types and the heuristic classifier that assigns them.
//!
//! The classifier is a best-effort decision procedure, not a type system: it
//! favors simple, explainable rules over statistical rigor. It is pure and
//! total; a column it cannot make sense of comes back as
//! [`DataType::Unknown`], never as an error.

use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use polars::datatypes::DataType as PolarsDataType;
use polars::prelude::PolarsResult;
use polars::series::Series;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum distinct-value count for an integer column to qualify as
/// categorical.
pub const DEFAULT_UNIQUE_VALUE_COUNT_THRESHOLD: usize = 10;

// Date pattern regexes - compiled once at startup
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}$").expect("Invalid regex: YYYY-MM-DD"),
        Regex::new(r"^\d{1,2}[-/]\d{1,2}[-/]\d{4}$").expect("Invalid regex: MM-DD-YYYY"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}\s\d{2}:\d{2}:\d{2}").expect("Invalid regex: datetime"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").expect("Invalid regex: ISO"),
    ]
});

/// Formats tried, in order, when parsing a value as a date.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Semantic type of a column, as inferred by [`infer_data_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Numeric,
    Categorical,
    Boolean,
    Date,
    Unknown,
    Missing,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Numeric => "numeric",
            DataType::Categorical => "categorical",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::Unknown => "unknown",
            DataType::Missing => "missing",
        };
        f.write_str(name)
    }
}

/// Infer the semantic type of a column.
///
/// An all-missing column is always [`DataType::Missing`]. Boolean takes
/// precedence over every predicate in the chain below and performs its own
/// missingness check.
pub fn infer_data_type(series: &Series) -> DataType {
    let mut inferred = if is_missing(series) {
        DataType::Missing
    } else {
        DataType::Unknown
    };
    if is_boolean(series) {
        inferred = DataType::Boolean;
    } else if is_date(series) {
        inferred = DataType::Date;
    } else if is_categorical(series, DEFAULT_UNIQUE_VALUE_COUNT_THRESHOLD) {
        inferred = DataType::Categorical;
    } else if is_numeric(series) {
        inferred = DataType::Numeric;
    }
    inferred
}

/// Infer the semantic type of a column as its lowercase string name.
pub fn infer_data_type_str(series: &Series) -> String {
    infer_data_type(series).to_string()
}

/// Whether every value in the column is missing.
pub fn is_missing(series: &Series) -> bool {
    series.null_count() == series.len()
}

/// Whether the column stores numbers.
///
/// An unrecognized or opaque storage type counts as non-numeric.
pub fn is_numeric(series: &Series) -> bool {
    !is_missing(series) && is_numeric_dtype(series.dtype())
}

/// Whether the column holds boolean values: native boolean storage, or a
/// numeric column whose non-missing values are a subset of `{0, 1}`.
pub fn is_boolean(series: &Series) -> bool {
    if is_missing(series) {
        return false;
    }
    if series.dtype() == &PolarsDataType::Boolean {
        return true;
    }
    if !is_numeric_dtype(series.dtype()) {
        return false;
    }
    unique_values_within_01(series).unwrap_or(false)
}

/// Whether the column holds dates.
///
/// Native temporal storage qualifies directly. Otherwise every value has to
/// parse as a date; a single unparseable value rejects the whole column, as
/// does any value whose textual form is purely numeric.
pub fn is_date(series: &Series) -> bool {
    if is_temporal_dtype(series.dtype()) {
        return true;
    }
    if is_missing(series) || is_numeric(series) {
        return false;
    }
    // A missing value never parses as a date.
    if series.null_count() > 0 {
        return false;
    }
    let Ok(strings) = series.cast(&PolarsDataType::String) else {
        return false;
    };
    let Ok(values) = strings.str() else {
        return false;
    };
    for value in values.into_iter() {
        let Some(value) = value else {
            return false;
        };
        let value = value.trim();
        if is_numeric_looking(value) {
            return false;
        }
        if !parses_as_date(value) {
            return false;
        }
    }
    true
}

/// Whether the column is categorical: a low-cardinality integer column, or a
/// string-like column regardless of cardinality.
pub fn is_categorical(series: &Series, unique_value_count_threshold: usize) -> bool {
    !is_missing(series)
        && !is_boolean(series)
        && !is_date(series)
        && (is_string_dtype(series.dtype())
            || (is_integer_dtype(series.dtype())
                && unique_value_count(series)
                    .map(|count| count <= unique_value_count_threshold)
                    .unwrap_or(false)))
}

fn is_numeric_dtype(dtype: &PolarsDataType) -> bool {
    matches!(
        dtype,
        PolarsDataType::Int8
            | PolarsDataType::Int16
            | PolarsDataType::Int32
            | PolarsDataType::Int64
            | PolarsDataType::UInt8
            | PolarsDataType::UInt16
            | PolarsDataType::UInt32
            | PolarsDataType::UInt64
            | PolarsDataType::Float32
            | PolarsDataType::Float64
    )
}

fn is_integer_dtype(dtype: &PolarsDataType) -> bool {
    matches!(
        dtype,
        PolarsDataType::Int8
            | PolarsDataType::Int16
            | PolarsDataType::Int32
            | PolarsDataType::Int64
            | PolarsDataType::UInt8
            | PolarsDataType::UInt16
            | PolarsDataType::UInt32
            | PolarsDataType::UInt64
    )
}

fn is_string_dtype(dtype: &PolarsDataType) -> bool {
    matches!(
        dtype,
        PolarsDataType::String | PolarsDataType::Categorical(_, _)
    )
}

fn is_temporal_dtype(dtype: &PolarsDataType) -> bool {
    matches!(
        dtype,
        PolarsDataType::Date | PolarsDataType::Datetime(_, _) | PolarsDataType::Time
    )
}

/// Distinct non-missing value count; errors bubble up to be swallowed by the
/// caller.
fn unique_value_count(series: &Series) -> PolarsResult<usize> {
    series.drop_nulls().n_unique()
}

fn unique_values_within_01(series: &Series) -> PolarsResult<bool> {
    let unique = series.drop_nulls().unique()?;
    let floats = unique.cast(&PolarsDataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .flatten()
        .all(|value| value == 0.0 || value == 1.0))
}

fn is_numeric_looking(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn parses_as_date(value: &str) -> bool {
    if !DATE_PATTERNS.iter().any(|pattern| pattern.is_match(value)) {
        return false;
    }
    DATE_FORMATS
        .iter()
        .any(|format| NaiveDate::parse_from_str(value, format).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::datatypes::TimeUnit;
    use polars::prelude::NamedFrom;

    #[test]
    fn test_all_missing_is_missing() {
        let series = Series::new("col".into(), &[None::<i64>, None, None]);
        assert_eq!(infer_data_type(&series), DataType::Missing);
    }

    #[test]
    fn test_all_missing_strings_is_missing() {
        let series = Series::new("col".into(), &[None::<&str>, None]);
        assert_eq!(infer_data_type(&series), DataType::Missing);
    }

    #[test]
    fn test_empty_series_is_missing() {
        let series = Series::new("col".into(), Vec::<i64>::new());
        assert_eq!(infer_data_type(&series), DataType::Missing);
    }

    #[test]
    fn test_native_boolean() {
        let series = Series::new("flag".into(), &[true, false, true]);
        assert_eq!(infer_data_type(&series), DataType::Boolean);
    }

    #[test]
    fn test_zero_one_integers_are_boolean() {
        let series = Series::new("flag".into(), &[0i64, 1, 1, 0, 1]);
        assert_eq!(infer_data_type(&series), DataType::Boolean);
    }

    #[test]
    fn test_zero_one_integers_with_missing_are_boolean() {
        let series = Series::new("flag".into(), &[Some(0i64), Some(1), None, Some(1)]);
        assert_eq!(infer_data_type(&series), DataType::Boolean);
    }

    #[test]
    fn test_zero_one_floats_are_boolean() {
        let series = Series::new("flag".into(), &[0.0f64, 1.0, 0.0]);
        assert_eq!(infer_data_type(&series), DataType::Boolean);
    }

    #[test]
    fn test_zero_one_strings_are_not_boolean() {
        let series = Series::new("flag".into(), &["0", "1", "1"]);
        assert!(!is_boolean(&series));
        assert_eq!(infer_data_type(&series), DataType::Categorical);
    }

    #[test]
    fn test_date_strings() {
        let series = Series::new(
            "date".into(),
            &["2024-01-15", "2024-02-20", "2024-03-25"],
        );
        assert_eq!(infer_data_type(&series), DataType::Date);
    }

    #[test]
    fn test_date_strings_with_time() {
        let series = Series::new(
            "timestamp".into(),
            &["2024-01-15 10:30:00", "2024-02-20 14:45:00"],
        );
        assert_eq!(infer_data_type(&series), DataType::Date);
    }

    #[test]
    fn test_one_bad_value_rejects_date() {
        let series = Series::new("date".into(), &["2024-01-15", "not a date"]);
        assert!(!is_date(&series));
        // Still a string column, so it falls through to categorical.
        assert_eq!(infer_data_type(&series), DataType::Categorical);
    }

    #[test]
    fn test_date_with_missing_is_not_date() {
        let series = Series::new("date".into(), &[Some("2024-01-15"), None]);
        assert!(!is_date(&series));
    }

    #[test]
    fn test_native_date_dtype() {
        let series = Series::new("date".into(), &[18993i32, 19000, 19007])
            .cast(&PolarsDataType::Date)
            .unwrap();
        assert_eq!(infer_data_type(&series), DataType::Date);
    }

    #[test]
    fn test_numeric_strings_are_not_dates() {
        // Could be timestamps; digit-only values must never parse as dates.
        let series = Series::new("ts".into(), &["1705312200", "1705398600"]);
        assert!(!is_date(&series));
        assert_eq!(infer_data_type(&series), DataType::Categorical);
    }

    #[test]
    fn test_low_cardinality_integers_are_categorical() {
        let series = Series::new("code".into(), &[1i64, 2, 3, 1, 2, 3, 1]);
        assert_eq!(infer_data_type(&series), DataType::Categorical);
    }

    #[test]
    fn test_eleven_distinct_integers_fall_through_to_numeric() {
        let values: Vec<i64> = (1..=11).collect();
        let series = Series::new("code".into(), values);
        assert!(!is_categorical(&series, DEFAULT_UNIQUE_VALUE_COUNT_THRESHOLD));
        assert_eq!(infer_data_type(&series), DataType::Numeric);
    }

    #[test]
    fn test_ten_distinct_integers_are_categorical() {
        let values: Vec<i64> = (1..=10).collect();
        let series = Series::new("code".into(), values);
        assert_eq!(infer_data_type(&series), DataType::Categorical);
    }

    #[test]
    fn test_high_cardinality_strings_are_categorical() {
        let values: Vec<String> = (0..1000).map(|i| format!("value{i}")).collect();
        let series = Series::new("label".into(), values);
        assert_eq!(infer_data_type(&series), DataType::Categorical);
    }

    #[test]
    fn test_floats_are_numeric() {
        let series = Series::new("price".into(), &[1.5f64, 2.5, 3.5]);
        assert_eq!(infer_data_type(&series), DataType::Numeric);
    }

    #[test]
    fn test_custom_categorical_threshold() {
        let values: Vec<i64> = (1..=11).collect();
        let series = Series::new("code".into(), values);
        assert!(is_categorical(&series, 11));
    }

    #[test]
    fn test_duration_dtype_is_unknown() {
        let series = Series::new("elapsed".into(), &[100i64, 200, 300])
            .cast(&PolarsDataType::Duration(TimeUnit::Milliseconds))
            .unwrap();
        assert_eq!(infer_data_type(&series), DataType::Unknown);
    }

    #[test]
    fn test_string_representation() {
        let series = Series::new("price".into(), &[1.5f64, 2.5]);
        assert_eq!(infer_data_type_str(&series), "numeric");
        assert_eq!(DataType::Missing.to_string(), "missing");
    }
}
