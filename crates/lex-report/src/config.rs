//! Configuration types for the report pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup.

use serde::{Deserialize, Serialize};

/// Column the category frequency is computed over unless configured otherwise.
pub const DEFAULT_CATEGORY_COLUMN: &str = "COUNTRY";

/// Header used for the label column of the category table.
pub const DEFAULT_CATEGORY_LABEL: &str = "Country";

/// Score thresholds that pick the fill tier of the quality-score cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Scores at or above this value pass.
    pub pass: f64,
    /// Scores at or above this value (and below `pass`) warn.
    pub warn: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            pass: 80.0,
            warn: 50.0,
        }
    }
}

/// Background colors (RGB hex, no leading `#`) for each quality tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillColors {
    pub pass: String,
    pub warn: String,
    pub fail: String,
}

impl Default for FillColors {
    fn default() -> Self {
        Self {
            pass: "C6EFCE".to_string(),
            warn: "FFEB9C".to_string(),
            fail: "FFC7CE".to_string(),
        }
    }
}

/// Configuration for the report pipeline.
///
/// Use [`ReportConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_report::config::ReportConfig;
///
/// let config = ReportConfig::builder()
///     .category_column("REGION")
///     .category_label("Region")
///     .include_null_heatmap(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Normalized name of the column whose value frequencies are reported.
    /// Default: "COUNTRY"
    pub category_column: String,

    /// Header of the label column in the category sheet and table.
    /// Default: "Country"
    pub category_label: String,

    /// Title of the generated document.
    /// Default: "Data Processing Report"
    pub title: String,

    /// Static attribution line printed in every page header.
    /// Default: "Generated by lex-report"
    pub attribution: String,

    /// Quality-score thresholds for the conditional fill.
    pub quality_thresholds: QualityThresholds,

    /// Colors used for the conditional fill.
    pub fill_colors: FillColors,

    /// Color used to flag null cells in the DATA sheet.
    /// Default: "FFC7CE"
    pub heatmap_color: String,

    /// Whether to emit bar-chart descriptors.
    /// Default: true
    pub include_charts: bool,

    /// Whether to flag every null cell of the DATA sheet.
    /// Default: true
    pub include_null_heatmap: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            category_column: DEFAULT_CATEGORY_COLUMN.to_string(),
            category_label: DEFAULT_CATEGORY_LABEL.to_string(),
            title: "Data Processing Report".to_string(),
            attribution: "Generated by lex-report".to_string(),
            quality_thresholds: QualityThresholds::default(),
            fill_colors: FillColors::default(),
            heatmap_color: "FFC7CE".to_string(),
            include_charts: true,
            include_null_heatmap: true,
        }
    }
}

impl ReportConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let QualityThresholds { pass, warn } = self.quality_thresholds;

        for (field, value) in [("pass", pass), ("warn", warn)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigValidationError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if warn > pass {
            return Err(ConfigValidationError::ThresholdOrder { pass, warn });
        }

        for color in [
            &self.fill_colors.pass,
            &self.fill_colors.warn,
            &self.fill_colors.fail,
            &self.heatmap_color,
        ] {
            if !is_hex_color(color) {
                return Err(ConfigValidationError::InvalidColor(color.clone()));
            }
        }

        if self.category_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyCategoryColumn);
        }

        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 6 && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0 and 100)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Warn threshold {warn} is above pass threshold {pass}")]
    ThresholdOrder { pass: f64, warn: f64 },

    #[error("Invalid color '{0}' (expected six hex digits)")]
    InvalidColor(String),

    #[error("Category column must not be blank")]
    EmptyCategoryColumn,
}

/// Builder for [`ReportConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ReportConfigBuilder {
    category_column: Option<String>,
    category_label: Option<String>,
    title: Option<String>,
    attribution: Option<String>,
    quality_thresholds: Option<QualityThresholds>,
    fill_colors: Option<FillColors>,
    heatmap_color: Option<String>,
    include_charts: Option<bool>,
    include_null_heatmap: Option<bool>,
}

impl ReportConfigBuilder {
    /// Set the column whose value frequencies are reported.
    ///
    /// The name is matched against cleaned headers, so it is trimmed and
    /// uppercased here the same way.
    pub fn category_column(mut self, column: impl Into<String>) -> Self {
        self.category_column = Some(column.into().trim().to_uppercase());
        self
    }

    /// Set the header of the category label column.
    pub fn category_label(mut self, label: impl Into<String>) -> Self {
        self.category_label = Some(label.into());
        self
    }

    /// Set the document title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the attribution line printed in the page header.
    pub fn attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = Some(attribution.into());
        self
    }

    /// Set the pass/warn thresholds of the quality-score fill.
    ///
    /// # Arguments
    /// * `pass` - Scores at or above this value pass (e.g., 80.0)
    /// * `warn` - Scores at or above this value warn (e.g., 50.0)
    pub fn quality_thresholds(mut self, pass: f64, warn: f64) -> Self {
        self.quality_thresholds = Some(QualityThresholds { pass, warn });
        self
    }

    /// Set the tier fill colors.
    pub fn fill_colors(mut self, colors: FillColors) -> Self {
        self.fill_colors = Some(colors);
        self
    }

    /// Set the null heatmap color.
    pub fn heatmap_color(mut self, color: impl Into<String>) -> Self {
        self.heatmap_color = Some(color.into());
        self
    }

    /// Enable or disable chart descriptors.
    pub fn include_charts(mut self, include: bool) -> Self {
        self.include_charts = Some(include);
        self
    }

    /// Enable or disable the null heatmap.
    pub fn include_null_heatmap(mut self, include: bool) -> Self {
        self.include_null_heatmap = Some(include);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ReportConfig` or an error if validation fails.
    pub fn build(self) -> Result<ReportConfig, ConfigValidationError> {
        let defaults = ReportConfig::default();
        let config = ReportConfig {
            category_column: self.category_column.unwrap_or(defaults.category_column),
            category_label: self.category_label.unwrap_or(defaults.category_label),
            title: self.title.unwrap_or(defaults.title),
            attribution: self.attribution.unwrap_or(defaults.attribution),
            quality_thresholds: self
                .quality_thresholds
                .unwrap_or(defaults.quality_thresholds),
            fill_colors: self.fill_colors.unwrap_or(defaults.fill_colors),
            heatmap_color: self.heatmap_color.unwrap_or(defaults.heatmap_color),
            include_charts: self.include_charts.unwrap_or(true),
            include_null_heatmap: self.include_null_heatmap.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(config.category_column, "COUNTRY");
        assert_eq!(config.category_label, "Country");
        assert_eq!(config.quality_thresholds.pass, 80.0);
        assert_eq!(config.quality_thresholds.warn, 50.0);
        assert!(config.include_charts);
        assert!(config.include_null_heatmap);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = ReportConfig::builder()
            .category_column("  region ")
            .category_label("Region")
            .include_charts(false)
            .quality_thresholds(90.0, 60.0)
            .build()
            .unwrap();

        assert_eq!(config.category_column, "REGION");
        assert_eq!(config.category_label, "Region");
        assert!(!config.include_charts);
        assert_eq!(config.quality_thresholds.pass, 90.0);
    }

    #[test]
    fn test_validation_threshold_out_of_range() {
        let result = ReportConfig::builder().quality_thresholds(120.0, 50.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidThreshold { .. }
        ));
    }

    #[test]
    fn test_validation_threshold_order() {
        let result = ReportConfig::builder().quality_thresholds(40.0, 50.0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::ThresholdOrder { .. }
        ));
    }

    #[test]
    fn test_validation_bad_color() {
        let result = ReportConfig::builder().heatmap_color("#FF0000").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidColor(_)
        ));
    }

    #[test]
    fn test_validation_blank_category() {
        let result = ReportConfig::builder().category_column("   ").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyCategoryColumn
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "category_column": "CITY",
            "category_label": "City",
            "title": "Weekly Export",
            "attribution": "ACME data desk",
            "quality_thresholds": { "pass": 75.0, "warn": 40.0 },
            "fill_colors": { "pass": "00FF00", "warn": "FFFF00", "fail": "FF0000" },
            "heatmap_color": "FF9999",
            "include_charts": false,
            "include_null_heatmap": true
        }"#;

        let config: ReportConfig = serde_json::from_str(json).expect("valid config JSON");
        assert_eq!(config.category_column, "CITY");
        assert_eq!(config.quality_thresholds.warn, 40.0);
        assert_eq!(config.fill_colors.fail, "FF0000");
        assert!(!config.include_charts);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_from_json() {
        let config: ReportConfig =
            serde_json::from_str(r#"{ "title": "Q3", "quality_thresholds": { "pass": 90.0 } }"#)
                .expect("valid config JSON");
        assert_eq!(config.title, "Q3");
        assert_eq!(config.category_column, "COUNTRY");
        assert_eq!(config.quality_thresholds.pass, 90.0);
        assert_eq!(config.quality_thresholds.warn, 50.0);
    }
}
