//! Chart configuration.
//!
//! Supports YAML configuration with precedence: CLI > file > defaults.
//! Every key is optional; an empty document yields the stock chart
//! (800x500 surface, 1000 ms transitions, blue half-transparent markers).

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::geometry::Margin;
use crate::transition::DEFAULT_DURATION;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Drawing surface size and margins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Total SVG width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Total SVG height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Space around the plot area.
    #[serde(default)]
    pub margin: Margin,
}

fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    500
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin: Margin::default(),
        }
    }
}

/// Marker and marker-label appearance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Circle radius in pixels.
    #[serde(default = "default_radius")]
    pub radius: f32,

    /// Circle opacity.
    #[serde(default = "default_opacity")]
    pub opacity: f32,

    /// Circle fill as `#RRGGBB`.
    #[serde(default = "default_color")]
    pub color: String,

    /// Font size of the state code drawn on each marker.
    #[serde(default = "default_label_size")]
    pub label_size: f32,
}

fn default_radius() -> f32 {
    10.0
}
fn default_opacity() -> f32 {
    0.5
}
fn default_color() -> String {
    "#0000ff".to_string()
}
fn default_label_size() -> f32 {
    12.0
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            opacity: default_opacity(),
            color: default_color(),
            label_size: default_label_size(),
        }
    }
}

/// Tooltip placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TooltipConfig {
    /// `[top, left]` offset from the hover anchor, in pixels.
    #[serde(default = "default_offset")]
    pub offset: [f32; 2],
}

fn default_offset() -> [f32; 2] {
    [100.0, -10.0]
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            offset: default_offset(),
        }
    }
}

/// Axis tick settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisConfig {
    /// Target number of ticks per axis.
    #[serde(default = "default_tick_count")]
    pub tick_count: usize,
}

fn default_tick_count() -> usize {
    10
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            tick_count: default_tick_count(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Data file loaded at startup.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Selector of the element the chart is mounted into.
    #[serde(default = "default_container")]
    pub container: String,

    /// Surface size and margins.
    #[serde(default)]
    pub chart: SurfaceConfig,

    /// Duration of every transition in milliseconds.
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,

    /// Marker appearance.
    #[serde(default)]
    pub marker: MarkerConfig,

    /// Tooltip placement.
    #[serde(default)]
    pub tooltip: TooltipConfig,

    /// Axis ticks.
    #[serde(default)]
    pub axis: AxisConfig,
}

fn default_version() -> u32 {
    1
}
fn default_data_path() -> PathBuf {
    PathBuf::from("assets/data/healthRisk.csv")
}
fn default_container() -> String {
    "#scatter".to_string()
}
fn default_transition_ms() -> u64 {
    DEFAULT_DURATION.as_millis() as u64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            data_path: default_data_path(),
            container: default_container(),
            chart: SurfaceConfig::default(),
            transition_ms: default_transition_ms(),
            marker: MarkerConfig::default(),
            tooltip: TooltipConfig::default(),
            axis: AxisConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse {
                line,
                message: e.to_string(),
            }
        })
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "using default configuration");
                Self::default()
            }
        }
    }

    /// Returns the transition duration.
    #[must_use]
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Parsed marker fill color.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] if the configured color is not hex.
    pub fn marker_color(&self) -> Result<Rgba> {
        Rgba::from_hex(&self.marker.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::new();

        assert_eq!(config.version, 1);
        assert_eq!(config.chart.width, 800);
        assert_eq!(config.chart.height, 500);
        assert_eq!(config.container, "#scatter");
        assert_eq!(config.transition_duration(), Duration::from_millis(1000));
        assert_eq!(config.marker_color().unwrap(), Rgba::BLUE);
        assert_eq!(config.tooltip.offset, [100.0, -10.0]);
    }

    #[test]
    fn test_config_parse_empty() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.axis.tick_count, 10);
    }

    #[test]
    fn test_config_parse_partial() {
        let yaml = r##"
version: 1
chart:
  width: 960
  margin:
    top: 10
    right: 10
    bottom: 60
    left: 80
transition_ms: 250
marker:
  color: "#ff0000"
"##;

        let config = Config::parse(yaml).unwrap();

        assert_eq!(config.chart.width, 960);
        assert_eq!(config.chart.height, 500);
        assert!((config.chart.margin.left - 80.0).abs() < f32::EPSILON);
        assert_eq!(config.transition_duration(), Duration::from_millis(250));
        assert_eq!(config.marker_color().unwrap(), Rgba::rgb(255, 0, 0));
        assert!((config.marker.radius - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_config_parse_error_includes_line() {
        let yaml = r#"
version: 1
chart:
  width: not_a_number
"#;

        let result = Config::parse(yaml);
        assert!(result.is_err());

        let err = result.unwrap_err();
        let display = err.to_string();
        assert!(display.contains("4"), "Error should include line number");
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "container: \"#chart\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.container, "#chart");
    }

    #[test]
    fn test_config_load_or_default() {
        let config = Config::load_or_default("/nonexistent/path");
        assert_eq!(config.version, 1);
    }

    #[test]
    fn test_invalid_marker_color() {
        let config = Config::parse("marker:\n  color: blue\n").unwrap();
        assert!(config.marker_color().is_err());
    }
}
