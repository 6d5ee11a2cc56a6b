//! Public types and constants for chart preparation.

use crate::error::ShapeError;
use crate::models::{DataRow, SeriesDescriptor, TimeWindow};
use crate::palette::Palette;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Series cap used by line and area charts when none is configured.
pub const DEFAULT_MAX_SERIES: usize = 6;
/// Category cap used by stacked bar charts when none is configured.
pub const DEFAULT_MAX_CATEGORIES: usize = 6;
/// Row key holding the date.
pub const DEFAULT_DATE_KEY: &str = "date";

/// Chart kinds supported by the preparation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    /// Multi-series line chart (default).
    #[default]
    Line,
    /// Filled area from a zero baseline.
    Area,
    /// Stacked bars, one stack per row, categories grouped with an "Other" bucket.
    StackedBar,
}

impl ChartKind {
    /// True when values of one row are drawn on top of each other.
    pub fn is_stacked(self) -> bool {
        matches!(self, ChartKind::StackedBar)
    }

    /// True when the value axis must include zero.
    pub fn needs_zero_baseline(self) -> bool {
        matches!(self, ChartKind::Area | ChartKind::StackedBar)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChartKind::Line => "line",
            ChartKind::Area => "area",
            ChartKind::StackedBar => "stacked-bar",
        })
    }
}

impl FromStr for ChartKind {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "line" => Ok(ChartKind::Line),
            "area" => Ok(ChartKind::Area),
            "stacked-bar" | "stackedbar" | "bar" => Ok(ChartKind::StackedBar),
            _ => Err(ShapeError::unknown("chart kind", s, "line, area, stacked-bar")),
        }
    }
}

/// How values are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueMode {
    /// Values as given.
    #[default]
    Absolute,
    /// Each row rescaled to percentages of its own total.
    Percentage,
}

impl fmt::Display for ValueMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueMode::Absolute => "absolute",
            ValueMode::Percentage => "percentage",
        })
    }
}

impl FromStr for ValueMode {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absolute" | "abs" | "value" => Ok(ValueMode::Absolute),
            "percentage" | "percent" | "pct" | "%" => Ok(ValueMode::Percentage),
            _ => Err(ShapeError::unknown("value mode", s, "absolute, percentage")),
        }
    }
}

/// Everything the pipeline needs to know about one chart.
///
/// Passed explicitly into [`crate::shape::prepare_chart`]; there is no global
/// chart state. Omitted fields take their defaults when read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub mode: ValueMode,
    pub window: TimeWindow,
    pub date_key: String,
    pub max_series: usize,
    pub max_categories: usize,
    /// Explicit series list; inference/grouping is skipped when set.
    pub series: Option<Vec<SeriesDescriptor>>,
    pub palette: Palette,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            kind: ChartKind::default(),
            mode: ValueMode::default(),
            window: TimeWindow::default(),
            date_key: DEFAULT_DATE_KEY.to_string(),
            max_series: DEFAULT_MAX_SERIES,
            max_categories: DEFAULT_MAX_CATEGORIES,
            series: None,
            palette: Palette::default(),
        }
    }
}

/// Output of the pipeline: exactly what a charting component needs to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedChart {
    pub kind: ChartKind,
    pub mode: ValueMode,
    pub window: TimeWindow,
    pub series: Vec<SeriesDescriptor>,
    pub rows: Vec<DataRow>,
    /// Value axis range `(min, max)`; `None` when there is nothing to plot.
    pub domain: Option<(f64, f64)>,
}

impl PreparedChart {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.series.is_empty()
    }
}
