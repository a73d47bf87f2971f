use tracing::debug;

use crate::chart::{
    BarSeries, BoxSeries, ChartDescriptor, ChartKind, ChartSettings, HeatmapSeries,
    HistogramSeries, LineSeries, ParallelSeries, RenderedChart, ScatterSeries, SeriesRecord,
};
use crate::compose::{CompositionWarning, Diagnostics, render_descriptor};
use crate::error::{ChartError, ChartResult};
use crate::style::StyleConfig;

/// Bar series drawn side by side in one panel before a warning is raised.
const MAX_GROUPED_BAR_SERIES: usize = 5;

/// A constructed chart plus the warnings raised while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOutput {
    pub chart: RenderedChart,
    pub diagnostics: Diagnostics,
}

impl ChartOutput {
    #[must_use]
    pub fn into_chart(self) -> RenderedChart {
        self.chart
    }
}

fn build_chart(
    kind: ChartKind,
    series: Vec<SeriesRecord>,
    settings: ChartSettings,
    style: &StyleConfig,
    mut diagnostics: Diagnostics,
) -> ChartResult<ChartOutput> {
    style.validate()?;
    if series.is_empty() {
        return Err(ChartError::EmptyChartList);
    }
    for key in settings.unsupported_keys(kind) {
        diagnostics.push(CompositionWarning::UnsupportedSetting {
            kind,
            key: key.to_owned(),
        });
    }

    let descriptor = ChartDescriptor::new(kind, series, settings, style.clone());
    let figure = render_descriptor(&descriptor, &mut diagnostics)?;
    debug!(
        kind = %kind,
        series = descriptor.series.len(),
        warnings = diagnostics.len(),
        "chart constructed"
    );
    Ok(ChartOutput {
        chart: RenderedChart::new(figure, descriptor),
        diagnostics,
    })
}

fn records<T: Into<SeriesRecord>>(series: Vec<T>) -> Vec<SeriesRecord> {
    series.into_iter().map(Into::into).collect()
}

/// Line chart with optional error bands, area fill and step draw styles.
pub fn line_chart(
    series: Vec<LineSeries>,
    settings: ChartSettings,
    style: &StyleConfig,
) -> ChartResult<ChartOutput> {
    let mut diagnostics = Diagnostics::new();
    if settings.show_yerr && settings.show_area {
        diagnostics.push(CompositionWarning::ErrorBandAndArea);
    }
    build_chart(ChartKind::Line, records(series), settings, style, diagnostics)
}

/// Bar chart; several series in one panel are grouped side by side.
pub fn bar_chart(
    series: Vec<BarSeries>,
    settings: ChartSettings,
    style: &StyleConfig,
) -> ChartResult<ChartOutput> {
    let mut diagnostics = Diagnostics::new();
    if !settings.subplots && series.len() > MAX_GROUPED_BAR_SERIES {
        diagnostics.push(CompositionWarning::TooManyBarSeries {
            count: series.len(),
        });
    }
    build_chart(ChartKind::Bar, records(series), settings, style, diagnostics)
}

pub fn scatter_chart(
    series: Vec<ScatterSeries>,
    settings: ChartSettings,
    style: &StyleConfig,
) -> ChartResult<ChartOutput> {
    build_chart(
        ChartKind::Scatter,
        records(series),
        settings,
        style,
        Diagnostics::new(),
    )
}

/// Histogram over bins shared by all series; a single panel stacks them.
pub fn histogram_chart(
    series: Vec<HistogramSeries>,
    settings: ChartSettings,
    style: &StyleConfig,
) -> ChartResult<ChartOutput> {
    build_chart(
        ChartKind::Histogram,
        records(series),
        settings,
        style,
        Diagnostics::new(),
    )
}

/// Heatmap; without subplots only the first grid is drawn.
pub fn heatmap_chart(
    series: Vec<HeatmapSeries>,
    settings: ChartSettings,
    style: &StyleConfig,
) -> ChartResult<ChartOutput> {
    build_chart(
        ChartKind::Heatmap,
        records(series),
        settings,
        style,
        Diagnostics::new(),
    )
}

/// Box plot; several box series need `subplots`.
pub fn box_plot(
    series: Vec<BoxSeries>,
    settings: ChartSettings,
    style: &StyleConfig,
) -> ChartResult<ChartOutput> {
    if !settings.subplots && series.len() > 1 {
        return Err(ChartError::InvalidData(format!(
            "{} box series need subplots",
            series.len()
        )));
    }
    build_chart(ChartKind::Box, records(series), settings, style, Diagnostics::new())
}

/// Parallel coordinates; all series share one panel.
pub fn parallel_coords(
    series: Vec<ParallelSeries>,
    settings: ChartSettings,
    style: &StyleConfig,
) -> ChartResult<ChartOutput> {
    build_chart(
        ChartKind::ParallelCoords,
        records(series),
        settings,
        style,
        Diagnostics::new(),
    )
}
