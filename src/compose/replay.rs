//! Descriptor replay: turns a captured [`ChartDescriptor`] back into artists.
//!
//! Every painter call goes through [`paint_records`], whether the chart is
//! built for the first time, overlaid, or replayed into a grid cell.

use tracing::debug;

use crate::chart::{AxisSide, ChartDescriptor, ChartKind, ChartSettings, SeriesRecord};
use crate::compose::overlay::{paint_overlay, render_overlay};
use crate::compose::paint::{
    BarLayout, PaintContext, paint_bars, paint_boxes, paint_heatmap, paint_histograms,
    paint_lines, paint_parallel, paint_scatter,
};
use crate::compose::{CompositionWarning, Diagnostics, combine_legends};
use crate::core::{BarMode, DataRange};
use crate::error::{ChartError, ChartResult};
use crate::render::{Axes, Figure, Panel, PanelId, PanelRegion};

/// Subplot columns used when a chart does not set `max_cols`.
pub const DEFAULT_MAX_COLS: usize = 4;

fn typed<'a, T, F>(records: &[&'a SeriesRecord], pick: F) -> Vec<&'a T>
where
    F: Fn(&'a SeriesRecord) -> Option<&'a T>,
{
    records.iter().filter_map(|record| pick(*record)).collect()
}

/// Paints series records of one kind onto `axes`, the `side` axis of its
/// panel. Records of another kind are ignored.
pub(crate) fn paint_records(
    axes: &mut Axes,
    side: AxisSide,
    kind: ChartKind,
    records: &[&SeriesRecord],
    ctx: &PaintContext<'_>,
    layout: &mut BarLayout,
    diagnostics: &mut Diagnostics,
) -> ChartResult<()> {
    match kind {
        ChartKind::Line => paint_lines(axes, &typed(records, SeriesRecord::as_line), ctx),
        ChartKind::Bar => paint_bars(
            axes,
            side,
            &typed(records, SeriesRecord::as_bar),
            ctx,
            layout,
            diagnostics,
        ),
        ChartKind::Scatter => paint_scatter(axes, &typed(records, SeriesRecord::as_scatter), ctx),
        ChartKind::Histogram => paint_histograms(
            axes,
            &typed(records, SeriesRecord::as_histogram),
            ctx,
            ctx.stack_histograms,
        ),
        ChartKind::Heatmap => {
            let heatmaps = typed(records, SeriesRecord::as_heatmap);
            if heatmaps.len() > 1 {
                diagnostics.push(CompositionWarning::HeatmapSeriesDropped {
                    count: heatmaps.len(),
                });
            }
            if let Some(heatmap) = heatmaps.first() {
                paint_heatmap(axes, heatmap, ctx);
            }
        }
        ChartKind::Box => {
            let boxes = typed(records, SeriesRecord::as_box);
            if boxes.len() > 1 {
                return Err(ChartError::InvalidData(
                    "box plots with several series must use subplots".to_owned(),
                ));
            }
            if let Some(series) = boxes.first() {
                paint_boxes(axes, series, ctx, diagnostics);
            }
        }
        ChartKind::ParallelCoords => paint_parallel(
            axes,
            &typed(records, SeriesRecord::as_parallel),
            ctx,
            diagnostics,
        )?,
        ChartKind::Overlay => {
            return Err(ChartError::InvalidDescriptor(
                "overlay charts must be replayed through their bindings".to_owned(),
            ));
        }
    }
    Ok(())
}

/// Paints `records` of a single-kind descriptor into `panel`.
fn paint_chart_panel(
    panel: &mut Panel,
    descriptor: &ChartDescriptor,
    records: &[&SeriesRecord],
    multi_panel: bool,
    diagnostics: &mut Diagnostics,
) -> ChartResult<()> {
    let style = &descriptor.style;
    let settings = &descriptor.settings;
    let z_order = f64::from(style.overlay_default_zorder(descriptor.kind));
    let ctx = PaintContext::new(style, settings, z_order)
        .with_multi_panel(multi_panel)
        .with_stacked_histograms(!multi_panel);

    let bar_series = records
        .iter()
        .filter(|record| record.kind() == ChartKind::Bar)
        .count();
    let mut layout = BarLayout::new(BarMode::Group, style.bar_width, bar_series);
    paint_records(
        &mut panel.left,
        AxisSide::Left,
        descriptor.kind,
        records,
        &ctx,
        &mut layout,
        diagnostics,
    )?;
    layout.apply_ticks(&mut panel.left);
    apply_axes_settings(&mut panel.left, descriptor.kind, settings, records);
    Ok(())
}

/// Installs axis bounds and grid; line charts default their x range to the
/// data extent.
fn apply_axes_settings(
    axes: &mut Axes,
    kind: ChartKind,
    settings: &ChartSettings,
    records: &[&SeriesRecord],
) {
    if kind != ChartKind::ParallelCoords {
        let (mut xmin, mut xmax) = (settings.xmin, settings.xmax);
        if kind == ChartKind::Line {
            let extent = DataRange::from_values(
                typed(records, SeriesRecord::as_line)
                    .into_iter()
                    .flat_map(|line| line.x.iter().copied()),
            );
            if let Some(extent) = extent {
                xmin = xmin.or(Some(extent.min));
                xmax = xmax.or(Some(extent.max));
            }
        }
        axes.set_xlim(xmin, xmax);
        axes.set_ylim(settings.ymin, settings.ymax);
    }
    axes.grid = settings.show_grid;
}

/// Renders a descriptor into a new figure.
///
/// With `subplots` every series gets its own panel, laid out row-major with
/// at most `max_cols` columns; parallel coordinates always use one panel.
pub fn render_descriptor(
    descriptor: &ChartDescriptor,
    diagnostics: &mut Diagnostics,
) -> ChartResult<Figure> {
    descriptor.validate()?;
    let style = &descriptor.style;
    if descriptor.kind == ChartKind::Overlay {
        let overlay = descriptor.overlay.as_ref().ok_or_else(|| {
            ChartError::InvalidDescriptor("overlay descriptor has no binding records".to_owned())
        })?;
        return render_overlay(overlay, style, diagnostics);
    }

    let settings = &descriptor.settings;
    let figsize = settings.figsize.unwrap_or(style.figsize);
    let records: Vec<&SeriesRecord> = descriptor.series.iter().collect();
    let split = settings.subplots
        && records.len() > 1
        && descriptor.kind != ChartKind::ParallelCoords;

    let mut figure = if split {
        let max_cols = settings.max_cols.unwrap_or(DEFAULT_MAX_COLS).max(1);
        let ncols = records.len().min(max_cols);
        let nrows = records.len().div_ceil(ncols);
        let mut figure = Figure::grid(figsize, nrows, ncols)?;
        for (index, record) in records.iter().enumerate() {
            let id = figure.add_panel(PanelRegion::cell(index / ncols, index % ncols))?;
            let panel = figure.panel_mut(id)?;
            paint_chart_panel(panel, descriptor, &[*record], true, diagnostics)?;
            panel.left.title = record.label().map(str::to_owned);
        }
        if settings.show_legend {
            diagnostics.push(CompositionWarning::LegendIgnoredForSubplots);
        }
        figure
    } else {
        let mut figure = Figure::single(figsize);
        let panel = figure.panel_mut(PanelId::new(0))?;
        paint_chart_panel(panel, descriptor, &records, false, diagnostics)?;
        if settings.show_legend {
            combine_legends(panel);
        }
        figure
    };

    figure.title = settings.title.clone();
    figure.xlabel = settings.xlabel.clone();
    figure.ylabel = settings.ylabel.clone();
    figure.sharex = settings.sharex;
    figure.sharey = settings.sharey;
    debug!(
        kind = %descriptor.kind,
        panels = figure.panels().len(),
        artists = figure.artist_count(),
        "descriptor rendered"
    );
    Ok(figure)
}

/// Replays a descriptor into one grid cell.
///
/// Overlay descriptors recreate their left/right axes pair from the stored
/// bindings and style snapshots; other kinds draw all their series into the
/// cell's left axes. Chart title and labels move onto the cell's axes.
pub fn replay_into_panel(
    panel: &mut Panel,
    descriptor: &ChartDescriptor,
    diagnostics: &mut Diagnostics,
) -> ChartResult<()> {
    descriptor.validate()?;
    match (&descriptor.overlay, descriptor.kind) {
        (Some(overlay), ChartKind::Overlay) => {
            paint_overlay(panel, overlay, &descriptor.style, diagnostics)?;
            panel.left.title = overlay.options.title.clone();
        }
        _ => {
            let records: Vec<&SeriesRecord> = descriptor.series.iter().collect();
            paint_chart_panel(panel, descriptor, &records, false, diagnostics)?;
            let settings = &descriptor.settings;
            panel.left.title = settings.title.clone();
            panel.left.xlabel = settings.xlabel.clone();
            panel.left.ylabel = settings.ylabel.clone();
            if settings.show_legend {
                combine_legends(panel);
            }
        }
    }
    debug!(
        kind = %descriptor.kind,
        artists = panel.artist_count(),
        "descriptor replayed into cell"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::render_descriptor;
    use crate::chart::{BarSeries, ChartDescriptor, ChartKind, ChartSettings, LineSeries};
    use crate::compose::{CompositionWarning, Diagnostics};
    use crate::style::StyleConfig;

    #[test]
    fn subplots_fill_rows_up_to_max_cols() {
        let series = (0..5)
            .map(|index| {
                LineSeries::from_values(vec![1.0, index as f64])
                    .with_label(format!("s{index}"))
                    .into()
            })
            .collect();
        let settings = ChartSettings::default().with_subplots(Some(2)).with_legend();
        let descriptor =
            ChartDescriptor::new(ChartKind::Line, series, settings, StyleConfig::default());
        let mut diagnostics = Diagnostics::new();
        let figure = render_descriptor(&descriptor, &mut diagnostics).expect("figure");

        assert_eq!(figure.grid_shape(), (3, 2));
        assert_eq!(figure.panels().len(), 5);
        assert_eq!(figure.panels()[4].left.title.as_deref(), Some("s4"));
        assert_eq!(
            diagnostics.warnings(),
            &[CompositionWarning::LegendIgnoredForSubplots]
        );
    }

    #[test]
    fn single_panel_bars_share_group_slots() {
        let descriptor = ChartDescriptor::new(
            ChartKind::Bar,
            vec![
                BarSeries::new(["a", "b"], vec![1.0, 2.0]).into(),
                BarSeries::new(["a", "b"], vec![2.0, 1.0]).into(),
            ],
            ChartSettings::default(),
            StyleConfig::default(),
        );
        let mut diagnostics = Diagnostics::new();
        let figure = render_descriptor(&descriptor, &mut diagnostics).expect("figure");
        let axes = &figure.panels()[0].left;
        let second = axes.artists()[1].bars().expect("bars");
        assert!((second[0].thickness - 0.4).abs() <= 1e-9);
        assert!(axes.x_ticks.is_some());
    }

    #[test]
    fn line_x_range_defaults_to_data_extent() {
        let descriptor = ChartDescriptor::new(
            ChartKind::Line,
            vec![LineSeries::new(vec![2.0, 5.0, 9.0], vec![1.0, 2.0, 3.0]).into()],
            ChartSettings::default(),
            StyleConfig::default(),
        );
        let mut diagnostics = Diagnostics::new();
        let figure = render_descriptor(&descriptor, &mut diagnostics).expect("figure");
        let limits = figure.panels()[0].left.x_limits;
        assert_eq!((limits.min, limits.max), (Some(2.0), Some(9.0)));
    }
}
