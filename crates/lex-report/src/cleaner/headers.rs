//! Header normalization and column survivorship.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static DISAMBIGUATION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.\d+$").expect("valid regex"));

/// Trim surrounding whitespace and uppercase.
pub(crate) fn normalize_header(header: &str) -> String {
    header.trim().to_uppercase()
}

/// Drop a trailing `.<digits>` suffix (`NAME.1` -> `NAME`).
///
/// Upstream readers append these to repeated labels; removing them brings
/// the repeats back so de-duplication can resolve them. A genuine label that
/// happens to end in `.<digits>` is stripped too.
pub(crate) fn strip_disambiguation_suffix(header: &str) -> String {
    DISAMBIGUATION_SUFFIX.replace(header, "").into_owned()
}

/// Mask marking the left-most occurrence of every name.
pub(crate) fn first_occurrence_mask(names: &[String]) -> Vec<bool> {
    let mut seen = HashSet::with_capacity(names.len());
    names.iter().map(|name| seen.insert(name.as_str())).collect()
}

/// Names from `snapshot` absent from `survivors`, in first-seen order,
/// each reported once.
pub(crate) fn removed_names(snapshot: &[String], survivors: &[String]) -> Vec<String> {
    let survivors: HashSet<&str> = survivors.iter().map(String::as_str).collect();
    let mut reported = HashSet::new();
    snapshot
        .iter()
        .filter(|name| !survivors.contains(name.as_str()))
        .filter(|name| reported.insert(name.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  First Name "), "FIRST NAME");
        assert_eq!(normalize_header("email"), "EMAIL");
    }

    #[test]
    fn test_strip_disambiguation_suffix() {
        assert_eq!(strip_disambiguation_suffix("NAME.1"), "NAME");
        assert_eq!(strip_disambiguation_suffix("NAME.12"), "NAME");
        assert_eq!(strip_disambiguation_suffix("VERSION.2.10"), "VERSION.2");
        assert_eq!(strip_disambiguation_suffix("NAME"), "NAME");
        assert_eq!(strip_disambiguation_suffix("NAME.X"), "NAME.X");
        assert_eq!(strip_disambiguation_suffix("NAME.1A"), "NAME.1A");
    }

    #[test]
    fn test_first_occurrence_mask() {
        let mask = first_occurrence_mask(&names(&["A", "B", "A", "C", "B"]));
        assert_eq!(mask, vec![true, true, false, true, false]);
    }

    #[test]
    fn test_removed_names_by_value() {
        let snapshot = names(&["NAME", "NAME.1", "EMAIL", "NAME.1"]);
        let survivors = names(&["NAME", "EMAIL"]);
        assert_eq!(removed_names(&snapshot, &survivors), names(&["NAME.1"]));
    }

    #[test]
    fn test_surviving_duplicate_is_not_reported() {
        let snapshot = names(&["ID", "ID", "ID"]);
        let survivors = names(&["ID"]);
        assert!(removed_names(&snapshot, &survivors).is_empty());
    }
}
