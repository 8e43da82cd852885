//! Cell-level sanitization for rows and text columns.

use std::collections::HashSet;
use tracing::debug;

use crate::table::{CellValue, ColumnKind};
use crate::utils::collapse_whitespace;

/// Column whose text is lowercased instead of uppercased.
pub(crate) const EMAIL_COLUMN: &str = "EMAIL";

/// Drop rows in which every cell is null.
pub(crate) fn prune_empty_rows(rows: Vec<Vec<CellValue>>) -> Vec<Vec<CellValue>> {
    rows.into_iter()
        .filter(|row| !row.iter().all(CellValue::is_null))
        .collect()
}

/// Keep only the cells whose column is marked in `mask`.
pub(crate) fn project_row(row: Vec<CellValue>, mask: &[bool]) -> Vec<CellValue> {
    row.into_iter()
        .zip(mask)
        .filter_map(|(cell, &keep)| keep.then_some(cell))
        .collect()
}

/// Standardize every column that holds only text or null.
///
/// Text is trimmed, whitespace runs collapse to one space and the result is
/// uppercased; the `EMAIL` column is lowercased afterwards. Nulls stay null.
/// Returns the number of columns touched.
pub(crate) fn standardize_text_columns(columns: &[String], rows: &mut [Vec<CellValue>]) -> usize {
    let mut standardized = 0;

    for (index, name) in columns.iter().enumerate() {
        let kind = ColumnKind::of(rows.iter().map(|row| &row[index]));
        if kind != ColumnKind::Text {
            debug!("Leaving {} column '{}' as-is", kind.as_str(), name);
            continue;
        }

        let lowercase = name == EMAIL_COLUMN;
        for row in rows.iter_mut() {
            if let CellValue::Text(value) = &mut row[index] {
                let mut cleaned = collapse_whitespace(value).to_uppercase();
                if lowercase {
                    cleaned = cleaned.to_lowercase();
                }
                *value = cleaned;
            }
        }
        standardized += 1;
    }

    standardized
}

/// Remove rows equal to an earlier row; returns the survivors and the
/// number removed.
pub(crate) fn drop_duplicate_rows(rows: Vec<Vec<CellValue>>) -> (Vec<Vec<CellValue>>, usize) {
    let keep: Vec<bool> = {
        let mut seen: HashSet<&[CellValue]> = HashSet::with_capacity(rows.len());
        rows.iter().map(|row| seen.insert(row.as_slice())).collect()
    };

    let before = rows.len();
    let unique: Vec<Vec<CellValue>> = rows
        .into_iter()
        .zip(keep)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect();
    let removed = before - unique.len();

    (unique, removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> CellValue {
        CellValue::text(value)
    }

    #[test]
    fn test_prune_empty_rows() {
        let rows = vec![
            vec![CellValue::Null, CellValue::Null],
            vec![CellValue::Null, text("x")],
        ];
        let pruned = prune_empty_rows(rows);
        assert_eq!(pruned, vec![vec![CellValue::Null, text("x")]]);
    }

    #[test]
    fn test_project_row() {
        let row = vec![text("a"), text("b"), text("c")];
        assert_eq!(project_row(row, &[true, false, true]), vec![text("a"), text("c")]);
    }

    #[test]
    fn test_standardize_text_columns() {
        let columns = vec!["CITY".to_string(), "EMAIL".to_string(), "AGE".to_string()];
        let mut rows = vec![
            vec![text("  new   york "), text(" Bob@X.com "), CellValue::Number(4.0)],
            vec![CellValue::Null, CellValue::Null, CellValue::Null],
        ];

        let touched = standardize_text_columns(&columns, &mut rows);

        assert_eq!(touched, 2);
        assert_eq!(rows[0][0], text("NEW YORK"));
        assert_eq!(rows[0][1], text("bob@x.com"));
        assert_eq!(rows[0][2], CellValue::Number(4.0));
        assert_eq!(rows[1][0], CellValue::Null);
    }

    #[test]
    fn test_mixed_column_is_not_standardized() {
        let columns = vec!["CODE".to_string()];
        let mut rows = vec![vec![text(" ab ")], vec![CellValue::Number(7.0)]];
        assert_eq!(standardize_text_columns(&columns, &mut rows), 0);
        assert_eq!(rows[0][0], text(" ab "));
    }

    #[test]
    fn test_drop_duplicate_rows_keeps_first() {
        let rows = vec![
            vec![text("A"), CellValue::Number(1.0)],
            vec![text("B"), CellValue::Number(1.0)],
            vec![text("A"), CellValue::Number(1.0)],
            vec![text("A"), CellValue::Number(1.0)],
        ];
        let (unique, removed) = drop_duplicate_rows(rows);
        assert_eq!(removed, 2);
        assert_eq!(
            unique,
            vec![
                vec![text("A"), CellValue::Number(1.0)],
                vec![text("B"), CellValue::Number(1.0)],
            ]
        );
    }
}
