use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chart::{ChartDescriptor, ChartKind, SeriesRecord};
use crate::core::{BarMode, FigureSize, GridAxis};
use crate::render::Color;

/// Requested value axis for one overlaid chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisRequest {
    Left,
    Right,
    #[default]
    Auto,
}

impl AxisRequest {
    #[must_use]
    pub fn explicit(self) -> Option<AxisSide> {
        match self {
            Self::Left => Some(AxisSide::Left),
            Self::Right => Some(AxisSide::Right),
            Self::Auto => None,
        }
    }
}

/// Value axis a chart ends up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSide {
    Left,
    Right,
}

impl AxisSide {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Legend suffix used when both axes carry charts.
    #[must_use]
    pub fn legend_suffix(self) -> &'static str {
        match self {
            Self::Left => " (L)",
            Self::Right => " (R)",
        }
    }
}

impl fmt::Display for AxisSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Figure-level options of an overlay.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayOptions {
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel_left: Option<String>,
    pub ylabel_right: Option<String>,
    pub figsize: Option<FigureSize>,
    pub show_legend: bool,
    pub show_grid: Option<GridAxis>,
    /// Span ratio at which two charts stop sharing an axis; falls back to
    /// the style's `overlay_auto_threshold`.
    pub auto_secondary_axis: Option<f64>,
    pub xmin: Option<f64>,
    pub xmax: Option<f64>,
    pub ymin: Option<f64>,
    pub ymax: Option<f64>,
    pub ymin_right: Option<f64>,
    pub ymax_right: Option<f64>,
    pub bar_mode: Option<BarMode>,
}

impl OverlayOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_xlabel(mut self, xlabel: impl Into<String>) -> Self {
        self.xlabel = Some(xlabel.into());
        self
    }

    #[must_use]
    pub fn with_ylabels(mut self, left: Option<String>, right: Option<String>) -> Self {
        self.ylabel_left = left;
        self.ylabel_right = right;
        self
    }

    #[must_use]
    pub fn with_figsize(mut self, figsize: FigureSize) -> Self {
        self.figsize = Some(figsize);
        self
    }

    #[must_use]
    pub fn with_legend(mut self) -> Self {
        self.show_legend = true;
        self
    }

    #[must_use]
    pub fn with_grid(mut self, grid: GridAxis) -> Self {
        self.show_grid = Some(grid);
        self
    }

    #[must_use]
    pub fn with_auto_secondary_axis(mut self, threshold: f64) -> Self {
        self.auto_secondary_axis = Some(threshold);
        self
    }

    #[must_use]
    pub fn with_bar_mode(mut self, mode: BarMode) -> Self {
        self.bar_mode = Some(mode);
        self
    }

    #[must_use]
    pub fn with_x_bounds(mut self, xmin: Option<f64>, xmax: Option<f64>) -> Self {
        self.xmin = xmin;
        self.xmax = xmax;
        self
    }

    #[must_use]
    pub fn with_y_bounds(mut self, ymin: Option<f64>, ymax: Option<f64>) -> Self {
        self.ymin = ymin;
        self.ymax = ymax;
        self
    }

    #[must_use]
    pub fn with_right_y_bounds(mut self, ymin: Option<f64>, ymax: Option<f64>) -> Self {
        self.ymin_right = ymin;
        self.ymax_right = ymax;
        self
    }
}

/// One sub-chart of an overlay with its resolved placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBinding {
    pub descriptor: ChartDescriptor,
    pub requested: AxisRequest,
    pub axis: AxisSide,
    pub z_order: Option<i32>,
    pub legend_label: Option<String>,
    pub color: Option<Color>,
}

/// Everything needed to repaint an overlay without the original call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayMetadata {
    pub bindings: Vec<ResolvedBinding>,
    pub options: OverlayOptions,
    pub bar_mode: BarMode,
    pub threshold: f64,
}

impl OverlayMetadata {
    #[must_use]
    pub fn has_right_axis(&self) -> bool {
        self.bindings
            .iter()
            .any(|binding| binding.axis == AxisSide::Right)
    }

    #[must_use]
    pub fn axis_assignments(&self) -> Vec<AxisSide> {
        self.bindings.iter().map(|binding| binding.axis).collect()
    }

    /// Bar series bound to the left and right axes.
    ///
    /// Their sum is the number of group slots sharing one category.
    #[must_use]
    pub fn bar_series_per_axis(&self) -> [usize; 2] {
        let mut counts = [0usize; 2];
        for binding in &self.bindings {
            if binding.descriptor.kind == ChartKind::Bar {
                let slot = match binding.axis {
                    AxisSide::Left => 0,
                    AxisSide::Right => 1,
                };
                counts[slot] += binding.descriptor.series.len();
            }
        }
        counts
    }

    /// Bar series with at least one value, per axis.
    ///
    /// Only these are drawn, so the last of them tops its stack.
    #[must_use]
    pub fn drawn_bar_series_per_axis(&self) -> [usize; 2] {
        let mut counts = [0usize; 2];
        for binding in &self.bindings {
            let slot = match binding.axis {
                AxisSide::Left => 0,
                AxisSide::Right => 1,
            };
            counts[slot] += binding
                .descriptor
                .series
                .iter()
                .filter_map(SeriesRecord::as_bar)
                .filter(|bars| !bars.values.is_empty())
                .count();
        }
        counts
    }
}
