//! Per-kind painters recording artists onto one axes.
//!
//! Painters never fail on missing optional data: series without values are
//! skipped and the remaining series still draw.

mod bar;
mod box_plot;
mod heatmap;
mod histogram;
mod line;
mod parallel;
mod scatter;

pub use bar::BarLayout;
pub(crate) use bar::paint_bars;
pub(crate) use box_plot::paint_boxes;
pub(crate) use heatmap::paint_heatmap;
pub(crate) use histogram::paint_histograms;
pub(crate) use line::paint_lines;
pub(crate) use parallel::paint_parallel;
pub(crate) use scatter::paint_scatter;

use crate::chart::{ChartSettings, ReferenceLines, SeriesStyle};
use crate::render::{Artist, ArtistKind, Axes, Color, RefLineAxis};
use crate::style::{ColorCycle, StyleConfig};

/// Inputs shared by every painter for one chart.
#[derive(Debug, Clone, Copy)]
pub struct PaintContext<'a> {
    pub style: &'a StyleConfig,
    pub settings: &'a ChartSettings,
    pub z_order: f64,
    /// Replaces every series color of the chart.
    pub color_override: Option<Color>,
    /// Replaces every series label of the chart.
    pub legend_label: Option<&'a str>,
    /// Each series sits in its own panel and uses the singular palette.
    pub multi_panel: bool,
    /// Histograms of one chart stack instead of overlapping.
    pub stack_histograms: bool,
}

impl<'a> PaintContext<'a> {
    #[must_use]
    pub fn new(style: &'a StyleConfig, settings: &'a ChartSettings, z_order: f64) -> Self {
        Self {
            style,
            settings,
            z_order,
            color_override: None,
            legend_label: None,
            multi_panel: false,
            stack_histograms: false,
        }
    }

    #[must_use]
    pub fn with_color_override(mut self, color: Option<Color>) -> Self {
        self.color_override = color;
        self
    }

    #[must_use]
    pub fn with_legend_label(mut self, label: Option<&'a str>) -> Self {
        self.legend_label = label;
        self
    }

    #[must_use]
    pub fn with_multi_panel(mut self, multi_panel: bool) -> Self {
        self.multi_panel = multi_panel;
        self
    }

    #[must_use]
    pub fn with_stacked_histograms(mut self, stacked: bool) -> Self {
        self.stack_histograms = stacked;
        self
    }

    /// Series color cycle: one singular color per panel, or `count` colors
    /// from the multiple palette when series share an axes.
    #[must_use]
    pub fn color_cycle(&self, count: usize) -> ColorCycle {
        if self.multi_panel {
            ColorCycle::new(self.style.color_singular, 1)
        } else {
            ColorCycle::new(self.style.color_multiple, count)
        }
    }

    /// Override first, then the series' own color, then the cycle color.
    #[must_use]
    pub fn series_color(&self, series: &SeriesStyle, cycled: Color) -> Color {
        self.color_override
            .or(series.color)
            .unwrap_or(cycled)
    }

    #[must_use]
    pub fn series_label(&self, label: Option<&str>) -> Option<String> {
        self.legend_label.or(label).map(str::to_owned)
    }
}

/// Records a series' vertical and horizontal reference lines.
pub(crate) fn paint_reference_lines(
    axes: &mut Axes,
    lines: &ReferenceLines,
    series_color: Color,
    ctx: &PaintContext<'_>,
) {
    let vertical = lines
        .vlines
        .iter()
        .map(|line| (RefLineAxis::Vertical { x: line.value }, line));
    let horizontal = lines
        .hlines
        .iter()
        .map(|line| (RefLineAxis::Horizontal { y: line.value }, line));

    for (axis, line) in vertical.chain(horizontal) {
        if !line.value.is_finite() {
            continue;
        }
        let color = line
            .color
            .or(ctx.style.refline_color)
            .unwrap_or(series_color);
        let artist = Artist::new(
            ArtistKind::RefLine {
                axis,
                start: line.start,
                end: line.end,
                width: line.width.unwrap_or(ctx.style.refline_width),
                stroke: line.line_style,
            },
            color,
            ctx.z_order,
        )
        .with_label(line.label.clone());
        axes.add_artist(artist);
    }
}
