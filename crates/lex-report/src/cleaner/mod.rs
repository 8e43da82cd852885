//! Data cleaning module.
//!
//! [`DataCleaner::clean`] runs six steps in a fixed order, each feeding the
//! next:
//! 1. Drop rows where every cell is null
//! 2. Trim and uppercase headers
//! 3. Strip `.<digits>` disambiguation suffixes from headers
//! 4. Keep the left-most column of every repeated name, then drop rows
//!    that held values only in the discarded columns
//! 5. Standardize text-only columns
//! 6. Drop rows identical to an earlier row
//!
//! No step fails; a table that ends up with zero rows is a valid result.

mod headers;
mod sanitizers;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::table::Table;
use headers::{first_occurrence_mask, normalize_header, removed_names, strip_disambiguation_suffix};
use sanitizers::{drop_duplicate_rows, project_row, prune_empty_rows, standardize_text_columns};

/// What one cleaning pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Header labels exactly as loaded.
    pub original_columns: Vec<String>,
    /// Header labels after cleaning.
    pub cleaned_columns: Vec<String>,
    /// Normalized names that no longer exist after de-duplication.
    pub removed_columns: Vec<String>,
    /// Rows dropped for repeating an earlier row.
    pub duplicate_rows_removed: usize,
    /// Rows dropped for being entirely null, before or after column
    /// de-duplication.
    pub empty_rows_removed: usize,
}

impl CleaningReport {
    /// True when the pass removed nothing.
    pub fn is_noop(&self) -> bool {
        self.removed_columns.is_empty()
            && self.duplicate_rows_removed == 0
            && self.empty_rows_removed == 0
    }
}

/// Data cleaner producing a canonical table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner;

impl DataCleaner {
    /// Clean a table, returning the canonical table and what was removed.
    ///
    /// Removed columns compare the trimmed/uppercased raw headers against the
    /// surviving names by value, so a name that survives through another
    /// occurrence is never reported.
    pub fn clean(&self, table: Table) -> (Table, CleaningReport) {
        let (columns, rows) = table.into_parts();
        let original_columns = columns.clone();

        info!(
            "Cleaning table with {} rows x {} columns...",
            rows.len(),
            columns.len()
        );

        // 1. Drop all-null rows
        let rows_before = rows.len();
        let rows = prune_empty_rows(rows);
        let empty_rows_removed = rows_before - rows.len();
        debug!("Removed {} empty rows", empty_rows_removed);

        // 2. Trim + uppercase
        let normalized: Vec<String> = columns.iter().map(|c| normalize_header(c)).collect();

        // 3. Recover labels disambiguated upstream
        let stripped: Vec<String> = normalized
            .iter()
            .map(|c| strip_disambiguation_suffix(c))
            .collect();

        // 4. Left-most occurrence wins
        let mask = first_occurrence_mask(&stripped);
        let cleaned_columns: Vec<String> = stripped
            .iter()
            .zip(&mask)
            .filter_map(|(name, &keep)| keep.then(|| name.clone()))
            .collect();
        let projected: Vec<_> = rows.into_iter().map(|row| project_row(row, &mask)).collect();

        // Rows whose only values sat in a discarded column are now empty
        let projected_count = projected.len();
        let mut rows = prune_empty_rows(projected);
        let emptied_by_projection = projected_count - rows.len();
        if emptied_by_projection > 0 {
            debug!(
                "Removed {} rows left empty by column de-duplication",
                emptied_by_projection
            );
        }

        let removed_columns = removed_names(&normalized, &cleaned_columns);
        if !removed_columns.is_empty() {
            warn!(
                "Removed {} duplicate columns: {:?}",
                removed_columns.len(),
                removed_columns
            );
        }

        // 5. Text standardization
        let standardized = standardize_text_columns(&cleaned_columns, &mut rows);
        debug!("Standardized {} text columns", standardized);

        // 6. Exact duplicate rows
        let (rows, duplicate_rows_removed) = drop_duplicate_rows(rows);
        if duplicate_rows_removed > 0 {
            debug!("Removed {} duplicate rows", duplicate_rows_removed);
        } else {
            debug!("No duplicate rows found");
        }

        let report = CleaningReport {
            original_columns,
            cleaned_columns: cleaned_columns.clone(),
            removed_columns,
            duplicate_rows_removed,
            empty_rows_removed: empty_rows_removed + emptied_by_projection,
        };

        let cleaned = Table::from_parts(cleaned_columns, rows);
        info!("Cleaning complete: shape {:?}", cleaned.shape());

        (cleaned, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{RawTable, load_records};
    use crate::table::CellValue;
    use pretty_assertions::assert_eq;

    fn text(value: &str) -> CellValue {
        CellValue::text(value)
    }

    fn load(headers: &[&str], rows: Vec<Vec<CellValue>>) -> Table {
        load_records(RawTable::new(headers.iter().copied(), rows)).unwrap()
    }

    #[test]
    fn test_headers_and_duplicate_columns() {
        let table = load(
            &[" Name ", "name.1", "Email"],
            vec![
                vec![text("Bob"), text("Bob"), text("BOB@X.COM")],
                vec![text("Bob"), text("Bob"), text("bob@x.com")],
            ],
        );

        let (cleaned, report) = DataCleaner.clean(table);

        assert_eq!(cleaned.columns(), &["NAME", "EMAIL"]);
        assert_eq!(cleaned.rows(), &[vec![text("BOB"), text("bob@x.com")]]);
        assert_eq!(report.original_columns, vec![" Name ", "name.1", "Email"]);
        assert_eq!(report.removed_columns, vec!["NAME.1"]);
        assert_eq!(report.duplicate_rows_removed, 1);
        assert_eq!(report.empty_rows_removed, 0);
    }

    #[test]
    fn test_left_most_column_survives() {
        let table = load(
            &["ID", "ID.1"],
            vec![vec![CellValue::Number(1.0), CellValue::Number(99.0)]],
        );

        let (cleaned, _) = DataCleaner.clean(table);

        assert_eq!(cleaned.columns(), &["ID"]);
        assert_eq!(cleaned.rows(), &[vec![CellValue::Number(1.0)]]);
    }

    #[test]
    fn test_empty_row_is_not_a_duplicate() {
        let table = load(
            &["A", "B"],
            vec![
                vec![text("x"), CellValue::Number(1.0)],
                vec![CellValue::Null, CellValue::Null],
                vec![text("y"), CellValue::Number(2.0)],
                vec![CellValue::Null, CellValue::Null],
            ],
        );

        let (cleaned, report) = DataCleaner.clean(table);

        assert_eq!(cleaned.height(), 2);
        assert_eq!(report.empty_rows_removed, 2);
        assert_eq!(report.duplicate_rows_removed, 0);
    }

    #[test]
    fn test_rows_equal_only_after_standardization() {
        let table = load(
            &["City"],
            vec![vec![text("  new  york")], vec![text("NEW YORK ")]],
        );

        let (cleaned, report) = DataCleaner.clean(table);

        assert_eq!(cleaned.rows(), &[vec![text("NEW YORK")]]);
        assert_eq!(report.duplicate_rows_removed, 1);
    }

    #[test]
    fn test_nulls_survive_standardization() {
        let table = load(
            &["NAME", "NOTE"],
            vec![vec![text("a"), CellValue::Null], vec![text("b"), text(" hi ")]],
        );

        let (cleaned, _) = DataCleaner.clean(table);

        assert_eq!(cleaned.cell(0, 1), Some(&CellValue::Null));
        assert_eq!(cleaned.cell(1, 1), Some(&text("HI")));
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let table = load(
            &[" Name ", "NAME.2", "email", "Age"],
            vec![
                vec![text(" ann  lee"), text("z"), text("A@B.COM"), CellValue::Number(3.0)],
                vec![CellValue::Null, CellValue::Null, CellValue::Null, CellValue::Null],
                vec![text("ANN LEE"), text("q"), text("a@b.com"), CellValue::Number(3.0)],
                vec![text("cy"), CellValue::Null, CellValue::Null, CellValue::Number(5.0)],
            ],
        );

        let (once, first) = DataCleaner.clean(table);
        let (twice, second) = DataCleaner.clean(once.clone());

        assert!(!first.is_noop());
        assert_eq!(twice, once);
        assert!(second.is_noop());
        assert_eq!(second.cleaned_columns, first.cleaned_columns);
    }

    #[test]
    fn test_row_emptied_by_column_removal_is_dropped() {
        let table = load(
            &["A", "A.1"],
            vec![vec![CellValue::Null, text("x")], vec![text("y"), text("z")]],
        );

        let (once, first) = DataCleaner.clean(table);

        assert_eq!(once.rows(), &[vec![text("Y")]]);
        assert_eq!(first.empty_rows_removed, 1);
        assert_eq!(first.removed_columns, vec!["A.1"]);

        let (twice, second) = DataCleaner.clean(once.clone());
        assert_eq!(twice, once);
        assert!(second.is_noop());
    }

    #[test]
    fn test_zero_rows_is_valid() {
        let table = load(&["A"], vec![vec![CellValue::Null]]);
        let (cleaned, report) = DataCleaner.clean(table);
        assert_eq!(cleaned.shape(), (0, 1));
        assert_eq!(report.empty_rows_removed, 1);
    }
}
