//! Descriptive statistics over the numeric values of one column.

use serde::{Deserialize, Serialize};

/// Summary statistics of a numeric column (nulls excluded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    /// Number of non-null values.
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample (n-1) standard deviation; `None` below two values.
    pub std_dev: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl NumericStats {
    /// Describe a set of values; `None` when there are none.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mean = calculate_mean(values);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            count: values.len(),
            mean,
            median: calculate_median(values),
            std_dev: calculate_std(values, mean),
            min,
            max,
        })
    }
}

pub(crate) fn calculate_mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Middle value, or the average of the two middle values.
pub(crate) fn calculate_median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation around `mean`.
pub(crate) fn calculate_std(values: &[f64], mean: f64) -> Option<f64> {
    let n = values.len() as f64;
    if n < 2.0 {
        return None;
    }

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==== calculate_median tests ====

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(calculate_median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(calculate_median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(calculate_median(&[7.0]), 7.0);
    }

    // ==== calculate_std tests ====

    #[test]
    fn test_std_is_sample_deviation() {
        let values = [10.0, 20.0, 30.0];
        let std = calculate_std(&values, calculate_mean(&values)).unwrap();
        assert!((std - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_std_undefined_below_two_values() {
        assert_eq!(calculate_std(&[5.0], 5.0), None);
    }

    #[test]
    fn test_std_of_constant_values() {
        assert_eq!(calculate_std(&[2.0, 2.0, 2.0], 2.0), Some(0.0));
    }

    // ==== NumericStats tests ====

    #[test]
    fn test_from_values() {
        let stats = NumericStats::from_values(&[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, 20.0);
        assert_eq!(stats.median, 20.0);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
    }

    #[test]
    fn test_from_no_values() {
        assert!(NumericStats::from_values(&[]).is_none());
    }
}
