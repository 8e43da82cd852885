//! Value frequencies of a categorical column.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::table::CellValue;

/// One row of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Count non-null values by their display label.
///
/// Sorted by count descending; equal counts keep first-encountered order.
pub(crate) fn category_frequency<'a>(
    cells: impl IntoIterator<Item = &'a CellValue>,
) -> Vec<CategoryCount> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for cell in cells.into_iter().filter(|cell| !cell.is_null()) {
        *counts.entry(cell.to_string()).or_insert(0) += 1;
    }

    let mut frequency: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(label, count)| CategoryCount { label, count })
        .collect();
    // stable sort keeps insertion order for ties
    frequency.sort_by(|a, b| b.count.cmp(&a.count));
    frequency
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, count: usize) -> CategoryCount {
        CategoryCount {
            label: label.to_string(),
            count,
        }
    }

    #[test]
    fn test_sorted_by_count_descending() {
        let cells: Vec<CellValue> = ["US", "FR", "US", "DE", "US", "FR"]
            .into_iter()
            .map(CellValue::from)
            .collect();
        assert_eq!(
            category_frequency(&cells),
            vec![entry("US", 3), entry("FR", 2), entry("DE", 1)]
        );
    }

    #[test]
    fn test_ties_keep_first_encountered_order() {
        let cells: Vec<CellValue> = ["PE", "AR", "CL", "AR", "PE", "CL"]
            .into_iter()
            .map(CellValue::from)
            .collect();
        assert_eq!(
            category_frequency(&cells),
            vec![entry("PE", 2), entry("AR", 2), entry("CL", 2)]
        );
    }

    #[test]
    fn test_nulls_are_not_counted() {
        let cells = vec![CellValue::Null, CellValue::from("US"), CellValue::Null];
        assert_eq!(category_frequency(&cells), vec![entry("US", 1)]);
    }

    #[test]
    fn test_numbers_use_display_labels() {
        let cells = vec![CellValue::Number(1.0), CellValue::Number(1.0)];
        assert_eq!(category_frequency(&cells), vec![entry("1", 2)]);
    }
}
