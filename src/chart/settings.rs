use serde::{Deserialize, Serialize};

use crate::chart::ChartKind;
use crate::core::{FigureSize, GridAxis, Orientation};

/// Chart-level options shared by every constructor.
///
/// Figure fields (`title`, labels, `figsize`, subplot layout) apply to any
/// kind; the remaining fields are chart settings, each supported by a subset
/// of kinds (see [`ChartSettings::supported_keys`]).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub figsize: Option<FigureSize>,
    pub subplots: bool,
    pub max_cols: Option<usize>,
    pub sharex: bool,
    pub sharey: bool,

    pub xmin: Option<f64>,
    pub xmax: Option<f64>,
    pub ymin: Option<f64>,
    pub ymax: Option<f64>,
    pub show_legend: bool,
    pub show_grid: Option<GridAxis>,
    pub show_yerr: bool,
    pub show_values: bool,
    pub show_area: bool,
    pub show_density: bool,
    pub show_cumulative: bool,
    pub show_colorbars: bool,
    pub show_heatmap_values: bool,
    pub show_regression: bool,
    pub show_ci: bool,
    pub show_correlation: bool,
    pub show_outliers: Option<bool>,
    pub show_notch: bool,
    pub orientation: Option<Orientation>,
    pub num_bins: Option<usize>,
    pub ci_level: Option<f64>,
    pub size_range: Option<(f64, f64)>,
    pub value_format: Option<String>,
}

const AXIS_BOUNDS: [&str; 4] = ["xmin", "xmax", "ymin", "ymax"];

impl ChartSettings {
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
    pub fn with_labels(mut self, xlabel: impl Into<String>, ylabel: impl Into<String>) -> Self {
        self.xlabel = Some(xlabel.into());
        self.ylabel = Some(ylabel.into());
        self
    }

    #[must_use]
    pub fn with_figsize(mut self, figsize: FigureSize) -> Self {
        self.figsize = Some(figsize);
        self
    }

    /// Draws each series in its own panel, at most `max_cols` per row.
    #[must_use]
    pub fn with_subplots(mut self, max_cols: Option<usize>) -> Self {
        self.subplots = true;
        self.max_cols = max_cols;
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
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    #[must_use]
    pub fn with_num_bins(mut self, bins: usize) -> Self {
        self.num_bins = Some(bins);
        self
    }

    #[must_use]
    pub fn with_value_format(mut self, format: impl Into<String>) -> Self {
        self.value_format = Some(format.into());
        self
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation.unwrap_or_default()
    }

    #[must_use]
    pub fn show_outliers(&self) -> bool {
        self.show_outliers.unwrap_or(true)
    }

    /// Chart settings that are set to an enabling value.
    #[must_use]
    pub fn active_keys(&self) -> Vec<&'static str> {
        let flags = [
            ("xmin", self.xmin.is_some()),
            ("xmax", self.xmax.is_some()),
            ("ymin", self.ymin.is_some()),
            ("ymax", self.ymax.is_some()),
            ("show_legend", self.show_legend),
            ("show_grid", self.show_grid.is_some()),
            ("show_yerr", self.show_yerr),
            ("show_values", self.show_values),
            ("show_area", self.show_area),
            ("show_density", self.show_density),
            ("show_cumulative", self.show_cumulative),
            ("show_colorbars", self.show_colorbars),
            ("show_heatmap_values", self.show_heatmap_values),
            ("show_regression", self.show_regression),
            ("show_ci", self.show_ci),
            ("show_correlation", self.show_correlation),
            ("show_outliers", self.show_outliers == Some(true)),
            ("show_notch", self.show_notch),
            ("orientation", self.orientation.is_some()),
            ("num_bins", self.num_bins.is_some()),
            ("ci_level", self.ci_level.is_some()),
            ("size_range", self.size_range.is_some()),
            ("value_format", self.value_format.is_some()),
        ];
        flags
            .into_iter()
            .filter_map(|(key, active)| active.then_some(key))
            .collect()
    }

    /// Chart settings a kind honours.
    #[must_use]
    pub fn supported_keys(kind: ChartKind) -> Vec<&'static str> {
        let common = ["show_legend", "show_grid"];
        let specific: &[&str] = match kind {
            ChartKind::Line => &["show_yerr", "show_area"],
            ChartKind::Bar => &["show_yerr", "show_values", "value_format", "orientation"],
            ChartKind::Histogram => &["show_density", "show_cumulative", "num_bins", "orientation"],
            ChartKind::Scatter => &[
                "show_regression",
                "show_ci",
                "ci_level",
                "show_correlation",
                "size_range",
            ],
            ChartKind::Box => &["show_outliers", "show_notch", "orientation"],
            ChartKind::Heatmap => return vec!["show_colorbars", "show_heatmap_values"],
            ChartKind::ParallelCoords => return common.to_vec(),
            ChartKind::Overlay => return [AXIS_BOUNDS.as_slice(), common.as_slice()].concat(),
        };
        [AXIS_BOUNDS.as_slice(), common.as_slice(), specific].concat()
    }

    /// Active settings the kind does not honour.
    #[must_use]
    pub fn unsupported_keys(&self, kind: ChartKind) -> Vec<&'static str> {
        let supported = Self::supported_keys(kind);
        self.active_keys()
            .into_iter()
            .filter(|key| !supported.contains(key))
            .collect()
    }
}
