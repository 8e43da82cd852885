//! Artifact file names.

use serde::{Deserialize, Serialize};

use crate::types::SourceInfo;

/// File names of everything produced for one run, keyed by one timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactNames {
    /// `processed_<timestamp>.xlsx`
    pub workbook: String,
    /// `report_<timestamp>.pdf`
    pub document: String,
    /// `processed_<timestamp>.csv`
    pub cleaned_data: String,
}

impl ArtifactNames {
    pub fn new(timestamp: &str) -> Self {
        Self {
            workbook: format!("processed_{timestamp}.xlsx"),
            document: format!("report_{timestamp}.pdf"),
            cleaned_data: format!("processed_{timestamp}.csv"),
        }
    }

    pub fn for_source(source: &SourceInfo) -> Self {
        Self::new(&source.timestamp())
    }
}

/// Spreadsheet column letters for a zero-based index (`0` -> `A`, `26` -> `AA`).
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// A1 reference for zero-based sheet coordinates.
pub fn cell_ref(row: usize, column: usize) -> String {
    format!("{}{}", column_letter(column), row + 1)
}

/// Absolute range over one column of `sheet`, rows are zero-based and
/// inclusive.
pub fn column_range(sheet: &str, column: usize, first_row: usize, last_row: usize) -> String {
    let letter = column_letter(column);
    format!(
        "{sheet}!${letter}${}:${letter}${}",
        first_row + 1,
        last_row + 1
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_artifact_names() {
        let at = NaiveDate::from_ymd_opt(2025, 12, 31)
            .and_then(|d| d.and_hms_opt(23, 59, 58))
            .unwrap();
        let names = ArtifactNames::for_source(&SourceInfo::at("in.csv", at));
        assert_eq!(names.workbook, "processed_20251231_235958.xlsx");
        assert_eq!(names.document, "report_20251231_235958.pdf");
        assert_eq!(names.cleaned_data, "processed_20251231_235958.csv");
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_references() {
        assert_eq!(cell_ref(5, 1), "B6");
        assert_eq!(column_range("NUMERIC_STATS", 2, 1, 3), "NUMERIC_STATS!$C$2:$C$4");
    }
}
