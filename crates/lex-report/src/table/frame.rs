//! Conversion from a [`Table`] into a polars [`DataFrame`].
//!
//! Used by the CLI to persist cleaned data with polars' CSV writer. The
//! opposite direction lives in [`crate::loader`].

use polars::prelude::*;

use super::{CellValue, ColumnKind, Table};

impl Table {
    /// Build a `DataFrame` with one series per column.
    ///
    /// Numeric columns become `Float64`, date/time columns become
    /// `Datetime(ms)`, anything else is rendered to `String`. Fails when
    /// column names repeat, so call it on cleaned tables.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut columns = Vec::with_capacity(self.width());

        for (index, name) in self.columns().iter().enumerate() {
            let series = match self.column_kind(index) {
                ColumnKind::Numeric => {
                    let values: Vec<Option<f64>> =
                        self.column_values(index).map(CellValue::as_number).collect();
                    Series::new(name.as_str().into(), values)
                }
                ColumnKind::DateTime => {
                    let millis: Vec<Option<i64>> = self
                        .column_values(index)
                        .map(|cell| {
                            cell.as_datetime()
                                .map(|value| value.and_utc().timestamp_millis())
                        })
                        .collect();
                    Series::new(name.as_str().into(), millis)
                        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
                }
                _ => {
                    let values: Vec<Option<String>> = self
                        .column_values(index)
                        .map(|cell| (!cell.is_null()).then(|| cell.to_string()))
                        .collect();
                    Series::new(name.as_str().into(), values)
                }
            };
            columns.push(series.into_column());
        }

        DataFrame::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_to_dataframe_types() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let table = Table::from_parts(
            vec!["NAME".into(), "AGE".into(), "JOINED".into()],
            vec![
                vec![CellValue::text("ANN"), CellValue::Number(30.0), CellValue::from(day)],
                vec![CellValue::Null, CellValue::Null, CellValue::Null],
            ],
        );

        let df = table.to_dataframe().unwrap();
        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.column("NAME").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("AGE").unwrap().dtype(), &DataType::Float64);
        assert!(matches!(
            df.column("JOINED").unwrap().dtype(),
            DataType::Datetime(TimeUnit::Milliseconds, None)
        ));
        assert_eq!(df.column("AGE").unwrap().null_count(), 1);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let table = Table::from_parts(
            vec!["A".into(), "A".into()],
            vec![vec![CellValue::Number(1.0), CellValue::Number(2.0)]],
        );
        assert!(table.to_dataframe().is_err());
    }
}
