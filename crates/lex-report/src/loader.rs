//! Turn collaborator-supplied tabular input into a [`Table`].
//!
//! Parsing bytes is someone else's job: a spreadsheet or CSV reader hands
//! over header labels plus typed rows, or a polars `DataFrame`. The loader
//! keeps column order and raw values (whitespace, nulls, repeated header
//! labels) exactly as received.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

use crate::error::LoadError;
use crate::table::{CellValue, Table};
use crate::utils::{DtypeCategory, get_dtype_category};

/// Name polars' CSV reader gives the second and later copies of a header.
static REPEATED_HEADER_RENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*)_duplicated_\d+$").expect("valid regex"));

/// One input row, either aligned by position or keyed by header label.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRow {
    Positional(Vec<CellValue>),
    Named(HashMap<String, CellValue>),
}

impl From<Vec<CellValue>> for RawRow {
    fn from(cells: Vec<CellValue>) -> Self {
        RawRow::Positional(cells)
    }
}

impl From<HashMap<String, CellValue>> for RawRow {
    fn from(cells: HashMap<String, CellValue>) -> Self {
        RawRow::Named(cells)
    }
}

/// Header labels plus rows, as produced by an upstream parser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// `None` when the parser found no header row at all.
    pub headers: Option<Vec<String>>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new<H, R>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<RawRow>,
    {
        Self {
            headers: Some(headers.into_iter().map(Into::into).collect()),
            rows: rows.into_iter().map(Into::into).collect(),
        }
    }
}

/// Build a [`Table`] from header labels and rows.
///
/// Short positional rows are padded with nulls; named rows take a null for
/// every header they do not mention (a repeated label receives the same
/// value at each occurrence).
pub fn load_records(raw: RawTable) -> Result<Table, LoadError> {
    let headers = raw.headers.ok_or(LoadError::NoHeader)?;
    if headers.is_empty() {
        return Err(LoadError::NoColumns);
    }

    let width = headers.len();
    let mut rows = Vec::with_capacity(raw.rows.len());

    for (index, row) in raw.rows.into_iter().enumerate() {
        let cells = match row {
            RawRow::Positional(mut cells) => {
                if cells.len() > width {
                    return Err(LoadError::RowTooWide {
                        row: index,
                        expected: width,
                        found: cells.len(),
                    });
                }
                cells.resize(width, CellValue::Null);
                cells
            }
            RawRow::Named(named) => headers
                .iter()
                .map(|header| named.get(header).cloned().unwrap_or_default())
                .collect(),
        };
        rows.push(cells);
    }

    debug!("Loaded {} rows x {} columns", rows.len(), width);
    Ok(Table::from_parts(headers, rows))
}

/// Build a [`Table`] from a polars `DataFrame`.
///
/// Numeric dtypes become [`CellValue::Number`] (non-finite values become
/// null), dates and datetimes become [`CellValue::DateTime`], strings stay
/// text and every other dtype is cast to its string form.
///
/// A header renamed `<label>_duplicated_<n>` by the CSV reader gets its
/// written label back when `<label>` names an earlier column.
pub fn load_dataframe(df: &DataFrame) -> Result<Table, LoadError> {
    if df.width() == 0 {
        return Err(LoadError::NoColumns);
    }

    let mut headers: Vec<String> = Vec::with_capacity(df.width());
    for name in df.get_column_names() {
        let label = restore_repeated_label(name.as_str(), &headers);
        if label != name.as_str() {
            debug!("Restored repeated header '{}' from '{}'", label, name);
        }
        headers.push(label);
    }

    let mut rows: Vec<Vec<CellValue>> = (0..df.height())
        .map(|_| Vec::with_capacity(headers.len()))
        .collect();

    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let cells = series_to_cells(series).map_err(|e| LoadError::UnreadableColumn {
            column: series.name().to_string(),
            reason: e.to_string(),
        })?;
        for (row, cell) in rows.iter_mut().zip(cells) {
            row.push(cell);
        }
    }

    debug!("Loaded data frame with shape {:?}", df.shape());
    Ok(Table::from_parts(headers, rows))
}

fn restore_repeated_label(name: &str, earlier: &[String]) -> String {
    match REPEATED_HEADER_RENAME.captures(name).and_then(|c| c.get(1)) {
        Some(base) if earlier.iter().any(|h| h == base.as_str()) => base.as_str().to_string(),
        _ => name.to_string(),
    }
}

fn series_to_cells(series: &Series) -> PolarsResult<Vec<CellValue>> {
    let cells = match get_dtype_category(series.dtype()) {
        DtypeCategory::Numeric => {
            let floats = series.cast(&DataType::Float64)?;
            floats
                .f64()?
                .into_iter()
                .map(|value| value.map(CellValue::number).unwrap_or_default())
                .collect()
        }
        DtypeCategory::Datetime => {
            let millis = series
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
                .cast(&DataType::Int64)?;
            millis
                .i64()?
                .into_iter()
                .map(|value| {
                    value
                        .and_then(DateTime::<Utc>::from_timestamp_millis)
                        .map(|at| CellValue::DateTime(at.naive_utc()))
                        .unwrap_or_default()
                })
                .collect()
        }
        DtypeCategory::String | DtypeCategory::Other => {
            let text = series.cast(&DataType::String)?;
            text.str()?
                .into_iter()
                .map(|value| value.map(CellValue::from).unwrap_or_default())
                .collect()
        }
    };
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> CellValue {
        CellValue::text(value)
    }

    #[test]
    fn test_load_positional_preserves_raw_values() {
        let raw = RawTable::new(
            [" Name ", "name.1", "Email"],
            vec![vec![text(" Bob "), text("Bob"), CellValue::Null]],
        );
        let table = load_records(raw).unwrap();
        assert_eq!(table.columns(), &[" Name ", "name.1", "Email"]);
        assert_eq!(table.cell(0, 0), Some(&text(" Bob ")));
        assert_eq!(table.cell(0, 2), Some(&CellValue::Null));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let raw = RawTable::new(["A", "B", "C"], vec![vec![CellValue::Number(1.0)]]);
        let table = load_records(raw).unwrap();
        assert_eq!(
            table.rows()[0],
            vec![CellValue::Number(1.0), CellValue::Null, CellValue::Null]
        );
    }

    #[test]
    fn test_wide_row_is_rejected() {
        let raw = RawTable::new(
            ["A"],
            vec![vec![CellValue::Number(1.0)], vec![text("x"), text("y")]],
        );
        assert_eq!(
            load_records(raw).unwrap_err(),
            LoadError::RowTooWide {
                row: 1,
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn test_named_rows() {
        let mut row = HashMap::new();
        row.insert("B".to_string(), CellValue::Number(2.0));
        let raw = RawTable::new(["A", "B"], vec![RawRow::Named(row)]);
        let table = load_records(raw).unwrap();
        assert_eq!(table.rows()[0], vec![CellValue::Null, CellValue::Number(2.0)]);
    }

    #[test]
    fn test_missing_header_and_zero_columns() {
        let raw = RawTable {
            headers: None,
            rows: vec![],
        };
        assert_eq!(load_records(raw).unwrap_err(), LoadError::NoHeader);

        let raw = RawTable::new(Vec::<String>::new(), Vec::<RawRow>::new());
        assert_eq!(load_records(raw).unwrap_err(), LoadError::NoColumns);
    }

    #[test]
    fn test_load_dataframe() {
        let df = df! {
            "NAME" => [Some("ann"), None, Some("cy")],
            "AGE" => [Some(30i64), Some(41), None],
            "SCORE" => [1.5f64, f64::NAN, 3.0],
            "ACTIVE" => [true, false, true],
        }
        .unwrap();

        let table = load_dataframe(&df).unwrap();
        assert_eq!(table.shape(), (3, 4));
        assert_eq!(table.cell(0, 0), Some(&text("ann")));
        assert_eq!(table.cell(1, 0), Some(&CellValue::Null));
        assert_eq!(table.cell(1, 1), Some(&CellValue::Number(41.0)));
        assert_eq!(table.cell(2, 1), Some(&CellValue::Null));
        assert_eq!(table.cell(1, 2), Some(&CellValue::Null));
        assert_eq!(table.cell(0, 3), Some(&text("true")));
    }

    #[test]
    fn test_repeated_csv_headers_get_their_label_back() {
        let df = df! {
            "Name" => ["ann"],
            "Name_duplicated_0" => ["x"],
            "Name_duplicated_1" => ["y"],
            "Score_duplicated_0" => [1i64],
        }
        .unwrap();

        let table = load_dataframe(&df).unwrap();
        assert_eq!(
            table.columns(),
            &["Name", "Name", "Name", "Score_duplicated_0"]
        );
        assert_eq!(table.cell(0, 1), Some(&text("x")));
    }

    #[test]
    fn test_load_empty_dataframe() {
        assert_eq!(
            load_dataframe(&DataFrame::empty()).unwrap_err(),
            LoadError::NoColumns
        );
    }
}
