use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::chart::ChartKind;
use crate::core::{DataRange, DrawStyle, datetime_to_unix_seconds, decimals_to_f64};
use crate::error::ChartResult;
use crate::render::{Color, LineStrokeStyle};

/// Per-series style overrides; unset fields fall back to the style config.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStrokeStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_style: Option<DrawStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_size: Option<f64>,
}

impl SeriesStyle {
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    #[must_use]
    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_line_style(mut self, style: LineStrokeStyle) -> Self {
        self.line_style = Some(style);
        self
    }

    #[must_use]
    pub fn with_draw_style(mut self, draw_style: DrawStyle) -> Self {
        self.draw_style = Some(draw_style);
        self
    }

    #[must_use]
    pub fn with_marker_size(mut self, size: f64) -> Self {
        self.marker_size = Some(size);
        self
    }
}

/// A vertical or horizontal reference line drawn across the axes.
///
/// `start`/`end` bound the line along the other axis in data units; unset
/// ends run to the plot edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefLine {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default)]
    pub line_style: LineStrokeStyle,
}

impl RefLine {
    #[must_use]
    pub fn at(value: f64) -> Self {
        Self {
            value,
            start: None,
            end: None,
            label: None,
            color: None,
            width: None,
            line_style: LineStrokeStyle::Dashed,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_extent(mut self, start: Option<f64>, end: Option<f64>) -> Self {
        self.start = start;
        self.end = end;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceLines {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vlines: Vec<RefLine>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hlines: Vec<RefLine>,
}

impl ReferenceLines {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vlines.is_empty() && self.hlines.is_empty()
    }
}

macro_rules! series_builders {
    ($series:ty) => {
        impl $series {
            /// Sets the series label, shown in legends and as subplot title.
            #[must_use]
            pub fn with_label(mut self, label: impl Into<String>) -> Self {
                self.label = Some(label.into());
                self
            }

            #[must_use]
            pub fn with_style(mut self, style: SeriesStyle) -> Self {
                self.style = style;
                self
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yerr: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub style: SeriesStyle,
    #[serde(default)]
    pub reference_lines: ReferenceLines,
}

impl LineSeries {
    #[must_use]
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            x,
            y,
            yerr: None,
            label: None,
            style: SeriesStyle::default(),
            reference_lines: ReferenceLines::default(),
        }
    }

    /// Builds a series from `y` values at x = 0, 1, 2, ...
    #[must_use]
    pub fn from_values(y: Vec<f64>) -> Self {
        let x = (0..y.len()).map(|i| i as f64).collect();
        Self::new(x, y)
    }

    /// Builds a time series; x values are unix seconds.
    pub fn from_timestamps(times: &[DateTime<Utc>], y: &[Decimal]) -> ChartResult<Self> {
        let x = times.iter().copied().map(datetime_to_unix_seconds).collect();
        Ok(Self::new(x, decimals_to_f64(y, "y")?))
    }

    #[must_use]
    pub fn with_yerr(mut self, yerr: Vec<f64>) -> Self {
        self.yerr = Some(yerr);
        self
    }

    #[must_use]
    pub fn with_vline(mut self, line: RefLine) -> Self {
        self.reference_lines.vlines.push(line);
        self
    }

    #[must_use]
    pub fn with_hline(mut self, line: RefLine) -> Self {
        self.reference_lines.hlines.push(line);
        self
    }

    /// Paired points, truncated to the shorter coordinate list.
    #[must_use]
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.y.iter().copied()).collect()
    }
}

series_builders!(LineSeries);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub style: SeriesStyle,
    #[serde(default)]
    pub reference_lines: ReferenceLines,
}

impl BarSeries {
    #[must_use]
    pub fn new<L: Into<String>>(labels: impl IntoIterator<Item = L>, values: Vec<f64>) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            values,
            errors: None,
            label: None,
            style: SeriesStyle::default(),
            reference_lines: ReferenceLines::default(),
        }
    }

    /// Builds a series from exact decimal values.
    pub fn from_decimals<L: Into<String>>(
        labels: impl IntoIterator<Item = L>,
        values: &[Decimal],
    ) -> ChartResult<Self> {
        Ok(Self::new(labels, decimals_to_f64(values, "values")?))
    }

    #[must_use]
    pub fn with_errors(mut self, errors: Vec<f64>) -> Self {
        self.errors = Some(errors);
        self
    }

    #[must_use]
    pub fn with_hline(mut self, line: RefLine) -> Self {
        self.reference_lines.hlines.push(line);
        self
    }

    /// Number of categories the series draws.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.values.len()
    }
}

series_builders!(BarSeries);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hue: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub style: SeriesStyle,
    #[serde(default)]
    pub reference_lines: ReferenceLines,
}

impl ScatterSeries {
    #[must_use]
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            x,
            y,
            sizes: None,
            hue: None,
            label: None,
            style: SeriesStyle::default(),
            reference_lines: ReferenceLines::default(),
        }
    }

    #[must_use]
    pub fn with_sizes(mut self, sizes: Vec<f64>) -> Self {
        self.sizes = Some(sizes);
        self
    }

    #[must_use]
    pub fn with_hue<H: Into<String>>(mut self, hue: impl IntoIterator<Item = H>) -> Self {
        self.hue = Some(hue.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.y.iter().copied()).collect()
    }
}

series_builders!(ScatterSeries);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSeries {
    pub samples: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub style: SeriesStyle,
    #[serde(default)]
    pub reference_lines: ReferenceLines,
}

impl HistogramSeries {
    #[must_use]
    pub fn new(samples: Vec<f64>) -> Self {
        Self {
            samples,
            label: None,
            style: SeriesStyle::default(),
            reference_lines: ReferenceLines::default(),
        }
    }

    #[must_use]
    pub fn with_vline(mut self, line: RefLine) -> Self {
        self.reference_lines.vlines.push(line);
        self
    }
}

series_builders!(HistogramSeries);

/// Row-major grid of cell values; `None` cells are left blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapSeries {
    pub cells: Vec<Vec<Option<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmax: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub style: SeriesStyle,
}

impl HeatmapSeries {
    #[must_use]
    pub fn new(cells: Vec<Vec<Option<f64>>>) -> Self {
        Self {
            cells,
            x_labels: None,
            y_labels: None,
            vmin: None,
            vmax: None,
            value_format: None,
            label: None,
            style: SeriesStyle::default(),
        }
    }

    #[must_use]
    pub fn with_axis_labels(mut self, x_labels: Vec<String>, y_labels: Vec<String>) -> Self {
        self.x_labels = Some(x_labels);
        self.y_labels = Some(y_labels);
        self
    }

    #[must_use]
    pub fn with_value_bounds(mut self, vmin: Option<f64>, vmax: Option<f64>) -> Self {
        self.vmin = vmin;
        self.vmax = vmax;
        self
    }

    #[must_use]
    pub fn with_value_format(mut self, format: impl Into<String>) -> Self {
        self.value_format = Some(format.into());
        self
    }

    /// `(rows, cols)`, where `cols` is the longest row.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        let cols = self.cells.iter().map(Vec::len).max().unwrap_or(0);
        (self.cells.len(), cols)
    }

    /// Color scale bounds: explicit bounds first, then the finite cell extent.
    #[must_use]
    pub fn value_bounds(&self) -> DataRange {
        let extent = DataRange::from_values(self.cells.iter().flatten().filter_map(|cell| *cell))
            .unwrap_or(DataRange::NEUTRAL);
        DataRange {
            min: self.vmin.unwrap_or(extent.min),
            max: self.vmax.unwrap_or(extent.max),
        }
    }
}

series_builders!(HeatmapSeries);

/// One labelled observation of a box plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxObservation {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSeries {
    pub observations: Vec<BoxObservation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub style: SeriesStyle,
}

impl BoxSeries {
    #[must_use]
    pub fn new<L: Into<String>>(observations: impl IntoIterator<Item = (L, f64)>) -> Self {
        Self {
            observations: observations
                .into_iter()
                .map(|(label, value)| BoxObservation {
                    label: label.into(),
                    value,
                })
                .collect(),
            label: None,
            style: SeriesStyle::default(),
        }
    }

    /// Values grouped by label, in first-seen label order.
    #[must_use]
    pub fn groups(&self) -> IndexMap<&str, Vec<f64>> {
        let mut groups: IndexMap<&str, Vec<f64>> = IndexMap::new();
        for observation in &self.observations {
            groups
                .entry(observation.label.as_str())
                .or_default()
                .push(observation.value);
        }
        groups
    }
}

series_builders!(BoxSeries);

/// A parallel-coordinates cell: numeric or categorical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionValue {
    Number(f64),
    Category(String),
}

impl DimensionValue {
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Category(_) => None,
        }
    }

    /// Text form used for categories and hue keys.
    #[must_use]
    pub fn to_key(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Category(text) => text.clone(),
        }
    }
}

impl From<f64> for DimensionValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for DimensionValue {
    fn from(value: &str) -> Self {
        Self::Category(value.to_owned())
    }
}

impl From<String> for DimensionValue {
    fn from(value: String) -> Self {
        Self::Category(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelSeries {
    pub rows: Vec<IndexMap<String, DimensionValue>>,
    /// Dimensions to draw, in order; defaults to the first row's keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Vec<String>>,
    #[serde(default = "default_hue_key")]
    pub hue_key: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub category_orders: IndexMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub style: SeriesStyle,
}

fn default_hue_key() -> String {
    "hue".to_owned()
}

impl ParallelSeries {
    #[must_use]
    pub fn new(rows: Vec<IndexMap<String, DimensionValue>>) -> Self {
        Self {
            rows,
            dimensions: None,
            hue_key: default_hue_key(),
            category_orders: IndexMap::new(),
            label: None,
            style: SeriesStyle::default(),
        }
    }

    #[must_use]
    pub fn with_dimensions<D: Into<String>>(mut self, dimensions: impl IntoIterator<Item = D>) -> Self {
        self.dimensions = Some(dimensions.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_hue_key(mut self, key: impl Into<String>) -> Self {
        self.hue_key = key.into();
        self
    }

    #[must_use]
    pub fn with_category_order(mut self, dimension: impl Into<String>, order: Vec<String>) -> Self {
        self.category_orders.insert(dimension.into(), order);
        self
    }

    /// Explicit dimensions, or every key of the first row except the hue key.
    #[must_use]
    pub fn resolved_dimensions(&self) -> Vec<String> {
        if let Some(dimensions) = &self.dimensions {
            return dimensions.clone();
        }
        self.rows
            .first()
            .map(|row| {
                row.keys()
                    .filter(|key| **key != self.hue_key)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

series_builders!(ParallelSeries);

/// One entry of a descriptor's chart list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesRecord {
    Line(LineSeries),
    Bar(BarSeries),
    Scatter(ScatterSeries),
    Histogram(HistogramSeries),
    Heatmap(HeatmapSeries),
    Box(BoxSeries),
    ParallelCoords(ParallelSeries),
}

impl SeriesRecord {
    #[must_use]
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Line(_) => ChartKind::Line,
            Self::Bar(_) => ChartKind::Bar,
            Self::Scatter(_) => ChartKind::Scatter,
            Self::Histogram(_) => ChartKind::Histogram,
            Self::Heatmap(_) => ChartKind::Heatmap,
            Self::Box(_) => ChartKind::Box,
            Self::ParallelCoords(_) => ChartKind::ParallelCoords,
        }
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Line(series) => series.label.as_deref(),
            Self::Bar(series) => series.label.as_deref(),
            Self::Scatter(series) => series.label.as_deref(),
            Self::Histogram(series) => series.label.as_deref(),
            Self::Heatmap(series) => series.label.as_deref(),
            Self::Box(series) => series.label.as_deref(),
            Self::ParallelCoords(series) => series.label.as_deref(),
        }
    }

    #[must_use]
    pub fn style(&self) -> &SeriesStyle {
        match self {
            Self::Line(series) => &series.style,
            Self::Bar(series) => &series.style,
            Self::Scatter(series) => &series.style,
            Self::Histogram(series) => &series.style,
            Self::Heatmap(series) => &series.style,
            Self::Box(series) => &series.style,
            Self::ParallelCoords(series) => &series.style,
        }
    }

    #[must_use]
    pub fn as_line(&self) -> Option<&LineSeries> {
        match self {
            Self::Line(series) => Some(series),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bar(&self) -> Option<&BarSeries> {
        match self {
            Self::Bar(series) => Some(series),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_scatter(&self) -> Option<&ScatterSeries> {
        match self {
            Self::Scatter(series) => Some(series),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_histogram(&self) -> Option<&HistogramSeries> {
        match self {
            Self::Histogram(series) => Some(series),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_heatmap(&self) -> Option<&HeatmapSeries> {
        match self {
            Self::Heatmap(series) => Some(series),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_box(&self) -> Option<&BoxSeries> {
        match self {
            Self::Box(series) => Some(series),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_parallel(&self) -> Option<&ParallelSeries> {
        match self {
            Self::ParallelCoords(series) => Some(series),
            _ => None,
        }
    }
}

macro_rules! impl_from_series {
    ($series:ty, $variant:ident) => {
        impl From<$series> for SeriesRecord {
            fn from(series: $series) -> Self {
                Self::$variant(series)
            }
        }
    };
}

impl_from_series!(LineSeries, Line);
impl_from_series!(BarSeries, Bar);
impl_from_series!(ScatterSeries, Scatter);
impl_from_series!(HistogramSeries, Histogram);
impl_from_series!(HeatmapSeries, Heatmap);
impl_from_series!(BoxSeries, Box);
impl_from_series!(ParallelSeries, ParallelCoords);
