//! Tagged cell values and column classification.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Format used whenever a date/time cell is rendered as text.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single cell of a [`Table`](super::Table).
///
/// Serialized untagged: `null`, a JSON number, an ISO-8601 date/time string
/// or a plain string. Deserialization tries the variants in that order, so a
/// string that parses as `NaiveDateTime` comes back as [`CellValue::DateTime`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Number(f64),
    DateTime(NaiveDateTime),
    Text(String),
}

impl CellValue {
    /// Build a numeric cell. NaN is the missing-value marker of float
    /// columns; it and the infinities become [`CellValue::Null`].
    pub fn number(value: f64) -> Self {
        if !value.is_finite() {
            CellValue::Null
        } else {
            CellValue::Number(value)
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(value) => Some(*value),
            _ => None,
        }
    }

    /// Non-null kind of this cell, `None` for nulls.
    fn kind(&self) -> Option<ColumnKind> {
        match self {
            CellValue::Null => None,
            CellValue::Number(_) => Some(ColumnKind::Numeric),
            CellValue::DateTime(_) => Some(ColumnKind::DateTime),
            CellValue::Text(_) => Some(ColumnKind::Text),
        }
    }
}

/// Whole numbers print without a fractional part (`10`, not `10.0`).
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Number(value) => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    write!(f, "{:.0}", value)
                } else {
                    write!(f, "{}", value)
                }
            }
            CellValue::DateTime(value) => write!(f, "{}", value.format(DATETIME_FORMAT)),
            CellValue::Text(value) => f.write_str(value),
        }
    }
}

// Numbers compare by value with every NaN equal to every other NaN, which
// keeps `Eq` an equivalence relation and lets rows live in a `HashSet`.
impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Number(a), CellValue::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (CellValue::DateTime(a), CellValue::DateTime(b)) => a == b,
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Number(value) => {
                let canonical = if *value == 0.0 {
                    0.0f64
                } else if value.is_nan() {
                    f64::NAN
                } else {
                    *value
                };
                canonical.to_bits().hash(state);
            }
            CellValue::DateTime(value) => value.hash(state),
            CellValue::Text(value) => value.hash(state),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Classification of a column by the kinds of its non-null cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Every cell is null (or the column has no rows).
    Empty,
    /// Text or null only.
    Text,
    /// Numbers or null only.
    Numeric,
    /// Date/time values or null only.
    DateTime,
    /// More than one non-null kind.
    Mixed,
}

impl ColumnKind {
    /// Classify a column from its cells.
    pub fn of<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let mut seen: Option<ColumnKind> = None;
        for kind in cells.into_iter().filter_map(CellValue::kind) {
            match seen {
                None => seen = Some(kind),
                Some(previous) if previous != kind => return ColumnKind::Mixed,
                Some(_) => {}
            }
        }
        seen.unwrap_or(ColumnKind::Empty)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Text => "text",
            Self::Numeric => "numeric",
            Self::DateTime => "datetime",
            Self::Mixed => "mixed",
        }
    }
}
