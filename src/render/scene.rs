use tracing::{debug, trace};

use crate::core::{DataRange, LinearScale, Orientation};
use crate::error::ChartResult;
use crate::render::{
    Artist, ArtistKind, Axes, CanvasLayerKind, CirclePrimitive, Figure, LayeredRenderFrame,
    LegendSwatch, LinePrimitive, Panel, PanelId, PanelLayerStack, PlotArea, PolygonPrimitive,
    RectPrimitive, RefLineAxis, TextAnchor, TextHAlign, TextPrimitive,
};
use crate::render::LayerPrimitives;
use crate::style::StyleConfig;

const FIGURE_PAD_PT: f64 = 6.0;
const PANEL_PAD_LEFT_PT: f64 = 40.0;
const PANEL_PAD_RIGHT_PT: f64 = 12.0;
const PANEL_PAD_TWIN_PT: f64 = 40.0;
const PANEL_PAD_COLORBAR_PT: f64 = 56.0;
const PANEL_PAD_TOP_PT: f64 = 8.0;
const PANEL_PAD_BOTTOM_PT: f64 = 26.0;
const COLORBAR_GAP_PT: f64 = 8.0;
const COLORBAR_WIDTH_PT: f64 = 10.0;
const COLORBAR_STEPS: usize = 32;
const OUTLIER_RADIUS_PT: f64 = 2.5;
const ERROR_BAR_WIDTH_PT: f64 = 1.0;
const MEDIAN_WIDTH_PT: f64 = 1.5;
const GLYPH_WIDTH_EM: f64 = 0.6;

/// Point-to-pixel conversion for one dpi.
#[derive(Debug, Clone, Copy)]
struct Units {
    dpi: f64,
}

impl Units {
    fn px(self, points: f64) -> f64 {
        points * self.dpi / 72.0
    }
}

#[derive(Debug, Clone, Copy)]
struct PanelRanges {
    x: DataRange,
    y_left: DataRange,
    y_right: Option<DataRange>,
}

/// Data-to-pixel mapping for one axes inside its plot area.
#[derive(Debug, Clone, Copy)]
struct Projection {
    plot: PlotArea,
    x: LinearScale,
    y: LinearScale,
}

impl Projection {
    fn new(plot: PlotArea, x: DataRange, y: DataRange, y_inverted: bool) -> ChartResult<Self> {
        let x = LinearScale::over_range(x, plot.left, plot.right)?;
        let y = if y_inverted {
            LinearScale::over_range(y, plot.top, plot.bottom)?
        } else {
            LinearScale::over_range(y, plot.bottom, plot.top)?
        };
        Ok(Self { plot, x, y })
    }

    fn px(self, x: f64) -> Option<f64> {
        self.x.domain_to_pixel(x).ok()
    }

    fn py(self, y: f64) -> Option<f64> {
        self.y.domain_to_pixel(y).ok()
    }

    fn point(self, (x, y): (f64, f64)) -> Option<(f64, f64)> {
        Some((self.px(x)?, self.py(y)?))
    }

    fn fraction(self, fx: f64, fy: f64) -> (f64, f64) {
        (
            self.plot.left + fx * self.plot.width(),
            self.plot.bottom - fy * self.plot.height(),
        )
    }

    /// Maps a (category, value) pair honoring the bar/box orientation.
    fn oriented(self, orientation: Orientation, category: f64, value: f64) -> Option<(f64, f64)> {
        match orientation {
            Orientation::Vertical => self.point((category, value)),
            Orientation::Horizontal => self.point((value, category)),
        }
    }
}

/// Destination for the primitives of one panel; drops primitives that
/// would fail validation instead of failing the whole frame.
struct PanelSink<'a> {
    layered: &'a mut LayeredRenderFrame,
    panel_id: PanelId,
}

impl PanelSink<'_> {
    fn line(&mut self, layer: CanvasLayerKind, line: LinePrimitive) {
        if line.validate().is_ok() {
            self.layered.push_line(self.panel_id, layer, line);
        }
    }

    fn rect(&mut self, layer: CanvasLayerKind, rect: RectPrimitive) {
        if rect.validate().is_ok() {
            self.layered.push_rect(self.panel_id, layer, rect);
        }
    }

    fn circle(&mut self, layer: CanvasLayerKind, circle: CirclePrimitive) {
        if circle.validate().is_ok() {
            self.layered.push_circle(self.panel_id, layer, circle);
        }
    }

    fn polygon(&mut self, layer: CanvasLayerKind, polygon: PolygonPrimitive) {
        if polygon.validate().is_ok() {
            self.layered.push_polygon(self.panel_id, layer, polygon);
        }
    }

    fn text(&mut self, layer: CanvasLayerKind, text: TextPrimitive) {
        if text.validate().is_ok() {
            self.layered.push_text(self.panel_id, layer, text);
        }
    }

    fn open_batch(&mut self, layer: CanvasLayerKind) {
        self.layered.open_batch(self.panel_id, layer);
    }
}

/// Projects every panel of `figure` into pixel primitives.
pub(crate) fn build_layered_frame(
    figure: &Figure,
    style: &StyleConfig,
) -> ChartResult<LayeredRenderFrame> {
    let viewport = figure.size.to_viewport(style.dpi)?;
    let stacks = (0..figure.panels().len())
        .map(|index| PanelLayerStack::canonical_for_panel(PanelId::new(index)))
        .collect();
    let mut layered = LayeredRenderFrame::from_stacks(viewport, stacks);
    let units = Units { dpi: style.dpi };
    let width = f64::from(viewport.width);
    let height = f64::from(viewport.height);

    layered.background.rects.push(RectPrimitive::new(
        0.0,
        0.0,
        width,
        height,
        style.background_color,
    ));

    let content = figure_content_area(figure, style, units, width, height);
    push_figure_labels(&mut layered.annotations, figure, style, units, content, width);

    let ranges = resolve_ranges(figure);
    let (nrows, ncols) = figure.grid_shape();
    let cell_width = content.width() / ncols as f64;
    let cell_height = content.height() / nrows as f64;

    for (index, (panel, ranges)) in figure.panels().iter().zip(ranges).enumerate() {
        let panel_id = PanelId::new(index);
        let region = panel.region;
        let cell = PlotArea {
            left: content.left + region.col as f64 * cell_width,
            top: content.top + region.row as f64 * cell_height,
            right: content.left + (region.col + region.colspan) as f64 * cell_width,
            bottom: content.top + (region.row + region.rowspan) as f64 * cell_height,
        };
        let plot = plot_area(panel, style, units, cell);
        layered.set_plot_area(panel_id, plot);
        trace!(
            panel = index,
            artists = panel.artist_count(),
            left = plot.left,
            top = plot.top,
            "projecting panel"
        );

        let mut sink = PanelSink {
            layered: &mut layered,
            panel_id,
        };
        let left = Projection::new(plot, ranges.x, ranges.y_left, panel.left.y_inverted)?;
        paint_panel_background(&mut sink, &panel.left, left, style, units);
        paint_artists(&mut sink, &panel.left, left, CanvasLayerKind::Series, style, units);
        paint_frame(&mut sink, &panel.left, left, style, units, AxisSide::Left);

        if let (Some(right_axes), Some(y_right)) = (panel.right.as_ref(), ranges.y_right) {
            let right = Projection::new(plot, ranges.x, y_right, right_axes.y_inverted)?;
            paint_artists(&mut sink, right_axes, right, CanvasLayerKind::TwinSeries, style, units);
            paint_frame(&mut sink, right_axes, right, style, units, AxisSide::Right);
        }

        if let Some(legend) = &panel.left.legend {
            paint_legend(&mut sink, legend, plot, style, units);
        }
    }

    debug!(
        panels = figure.panels().len(),
        width = viewport.width,
        height = viewport.height,
        "figure projected"
    );
    Ok(layered)
}

fn resolve_ranges(figure: &Figure) -> Vec<PanelRanges> {
    let mut ranges: Vec<PanelRanges> = figure.panels().iter().map(panel_ranges).collect();
    if figure.sharex {
        if let Some(shared) = ranges.iter().map(|range| range.x).reduce(DataRange::union) {
            for range in &mut ranges {
                range.x = shared;
            }
        }
    }
    if figure.sharey {
        if let Some(shared) = ranges.iter().map(|range| range.y_left).reduce(DataRange::union) {
            for range in &mut ranges {
                range.y_left = shared;
            }
        }
    }
    ranges
}

fn panel_ranges(panel: &Panel) -> PanelRanges {
    let auto_x = [Some(&panel.left), panel.right.as_ref()]
        .into_iter()
        .flatten()
        .filter(|axes| axes.data_bounds().is_some())
        .map(Axes::auto_x_range)
        .reduce(DataRange::union)
        .unwrap_or(DataRange::NEUTRAL);
    PanelRanges {
        x: panel.left.x_limits.resolve(auto_x),
        y_left: panel.left.view_y_range(),
        y_right: panel.right.as_ref().map(Axes::view_y_range),
    }
}

fn figure_content_area(
    figure: &Figure,
    style: &StyleConfig,
    units: Units,
    width: f64,
    height: f64,
) -> PlotArea {
    let pad = units.px(FIGURE_PAD_PT);
    let mut top = pad;
    if figure.title.is_some() {
        top += units.px(style.title_font_size) * 1.8;
    }
    if figure.ylabel.is_some() {
        top += units.px(style.label_font_size) * 1.6;
    }
    let mut bottom = height - pad;
    if figure.xlabel.is_some() {
        bottom -= units.px(style.label_font_size) * 1.8;
    }
    PlotArea {
        left: pad,
        top,
        right: (width - pad).max(pad + 1.0),
        bottom: bottom.max(top + 1.0),
    }
}

fn push_figure_labels(
    annotations: &mut LayerPrimitives,
    figure: &Figure,
    style: &StyleConfig,
    units: Units,
    content: PlotArea,
    width: f64,
) {
    let pad = units.px(FIGURE_PAD_PT);
    let title_px = units.px(style.title_font_size);
    let label_px = units.px(style.label_font_size);

    let mut cursor = pad;
    if let Some(title) = figure.title.as_deref().filter(|text| !text.is_empty()) {
        annotations.texts.push(TextPrimitive::new(
            title,
            width / 2.0,
            cursor + title_px * 0.9,
            title_px,
            style.font_color,
            TextHAlign::Center,
        ));
        cursor += title_px * 1.8;
    }
    if let Some(ylabel) = figure.ylabel.as_deref().filter(|text| !text.is_empty()) {
        annotations.texts.push(TextPrimitive::new(
            ylabel,
            pad,
            cursor + label_px * 0.8,
            label_px,
            style.font_color,
            TextHAlign::Left,
        ));
    }
    if let Some(xlabel) = figure.xlabel.as_deref().filter(|text| !text.is_empty()) {
        annotations.texts.push(TextPrimitive::new(
            xlabel,
            width / 2.0,
            content.bottom + label_px * 0.9,
            label_px,
            style.font_color,
            TextHAlign::Center,
        ));
    }
}

fn plot_area(panel: &Panel, style: &StyleConfig, units: Units, cell: PlotArea) -> PlotArea {
    let has_colorbar = panel
        .left
        .artists()
        .iter()
        .any(|artist| matches!(artist.kind, ArtistKind::Colorbar { .. }));

    let mut top = PANEL_PAD_TOP_PT;
    if panel.left.title.is_some() {
        top += style.subtitle_font_size * 1.6;
    }
    if panel.left.ylabel.is_some() || panel.right.as_ref().is_some_and(|axes| axes.ylabel.is_some())
    {
        top += style.label_font_size * 1.4;
    }
    let mut bottom = PANEL_PAD_BOTTOM_PT;
    if panel.left.xlabel.is_some() {
        bottom += style.label_font_size * 1.6;
    }
    let right = if has_colorbar {
        PANEL_PAD_COLORBAR_PT
    } else if panel.has_right() {
        PANEL_PAD_TWIN_PT
    } else {
        PANEL_PAD_RIGHT_PT
    };

    let left_px = cell.left + units.px(PANEL_PAD_LEFT_PT);
    let top_px = cell.top + units.px(top);
    PlotArea {
        left: left_px,
        top: top_px,
        right: (cell.right - units.px(right)).max(left_px + 1.0),
        bottom: (cell.bottom - units.px(bottom)).max(top_px + 1.0),
    }
}

fn paint_panel_background(
    sink: &mut PanelSink<'_>,
    axes: &Axes,
    projection: Projection,
    style: &StyleConfig,
    units: Units,
) {
    let Some(grid) = axes.grid else {
        return;
    };
    let plot = projection.plot;
    let width = units.px(style.grid_width);

    if grid.shows_x() {
        for (value, _) in tick_positions(axes.x_ticks.as_ref(), projection.x, style.tick_count) {
            if let Some(x) = projection.px(value) {
                sink.line(
                    CanvasLayerKind::Grid,
                    LinePrimitive::new(x, plot.top, x, plot.bottom, width, style.grid_color),
                );
            }
        }
    }
    if grid.shows_y() {
        for (value, _) in tick_positions(axes.y_ticks.as_ref(), projection.y, style.tick_count) {
            if let Some(y) = projection.py(value) {
                sink.line(
                    CanvasLayerKind::Grid,
                    LinePrimitive::new(plot.left, y, plot.right, y, width, style.grid_color),
                );
            }
        }
    }
}

fn paint_artists(
    sink: &mut PanelSink<'_>,
    axes: &Axes,
    projection: Projection,
    layer: CanvasLayerKind,
    style: &StyleConfig,
    units: Units,
) {
    let mut current_z: Option<f64> = None;
    for artist in axes.paint_order() {
        if current_z.is_some_and(|z| z != artist.z_order) {
            sink.open_batch(layer);
        }
        current_z = Some(artist.z_order);
        paint_artist(sink, artist, projection, layer, style, units);
    }
}

fn paint_artist(
    sink: &mut PanelSink<'_>,
    artist: &Artist,
    projection: Projection,
    layer: CanvasLayerKind,
    style: &StyleConfig,
    units: Units,
) {
    let color = artist.color;
    match &artist.kind {
        ArtistKind::Line {
            points,
            width,
            stroke,
            draw_style,
        } => {
            let points = match draw_style.step() {
                Some(step) => step.expand(points),
                None => points.clone(),
            };
            let width = units.px(*width);
            for pair in points.windows(2) {
                if let (Some(a), Some(b)) = (projection.point(pair[0]), projection.point(pair[1])) {
                    sink.line(
                        layer,
                        LinePrimitive::new(a.0, a.1, b.0, b.1, width, color)
                            .with_stroke_style(*stroke),
                    );
                }
            }
        }
        ArtistKind::Area { upper, lower } => {
            let outline: Vec<(f64, f64)> = upper
                .iter()
                .chain(lower.iter().rev())
                .filter_map(|point| projection.point(*point))
                .collect();
            sink.polygon(layer, PolygonPrimitive::new(outline, color));
        }
        ArtistKind::Bars {
            bars,
            orientation,
            edge_width,
            edge_color,
            error_color,
        } => {
            let error_width = units.px(ERROR_BAR_WIDTH_PT);
            for bar in bars {
                let half = bar.thickness / 2.0;
                let corners = (
                    projection.oriented(*orientation, bar.position - half, bar.base),
                    projection.oriented(*orientation, bar.position + half, bar.top()),
                );
                if let (Some(a), Some(b)) = corners {
                    let mut rect = RectPrimitive::new(
                        a.0.min(b.0),
                        a.1.min(b.1),
                        (a.0 - b.0).abs(),
                        (a.1 - b.1).abs(),
                        color,
                    );
                    if *edge_width > 0.0 {
                        rect = rect.with_border(units.px(*edge_width), *edge_color);
                    }
                    sink.rect(layer, rect);
                }

                let Some(error) = bar.error.filter(|error| error.is_finite() && *error != 0.0)
                else {
                    continue;
                };
                let error = error.abs();
                let cap = half * 0.25;
                let segments = [
                    ((bar.position, bar.top() - error), (bar.position, bar.top() + error)),
                    (
                        (bar.position - cap, bar.top() - error),
                        (bar.position + cap, bar.top() - error),
                    ),
                    (
                        (bar.position - cap, bar.top() + error),
                        (bar.position + cap, bar.top() + error),
                    ),
                ];
                for (start, end) in segments {
                    let projected = (
                        projection.oriented(*orientation, start.0, start.1),
                        projection.oriented(*orientation, end.0, end.1),
                    );
                    if let (Some(a), Some(b)) = projected {
                        sink.line(
                            layer,
                            LinePrimitive::new(a.0, a.1, b.0, b.1, error_width, *error_color),
                        );
                    }
                }
            }
        }
        ArtistKind::Markers { points, sizes } => {
            for (index, point) in points.iter().enumerate() {
                let size = sizes
                    .get(index)
                    .or_else(|| sizes.first())
                    .copied()
                    .unwrap_or(style.scatter_size);
                let Some((cx, cy)) = projection.point(*point) else {
                    continue;
                };
                let radius = units.px(size.max(0.0).sqrt() / 2.0);
                sink.circle(layer, CirclePrimitive::new(cx, cy, radius, color));
            }
        }
        ArtistKind::Heatmap { cells, .. } => {
            for cell in cells {
                let (col, row) = (cell.col as f64, cell.row as f64);
                let corners = (
                    projection.point((col - 0.5, row - 0.5)),
                    projection.point((col + 0.5, row + 0.5)),
                );
                if let (Some(a), Some(b)) = corners {
                    sink.rect(
                        layer,
                        RectPrimitive::new(
                            a.0.min(b.0),
                            a.1.min(b.1),
                            (a.0 - b.0).abs(),
                            (a.1 - b.1).abs(),
                            cell.color,
                        ),
                    );
                }
            }
        }
        ArtistKind::Box {
            position,
            stats,
            width,
            orientation,
            show_outliers,
            notch,
            edge_color,
            median_color,
        } => {
            let half = width / 2.0;
            let at = |category: f64, value: f64| projection.oriented(*orientation, category, value);
            let edge_width = units.px(ERROR_BAR_WIDTH_PT);

            match notch {
                Some(depth) => {
                    let inset = half * 0.5;
                    let outline: Vec<(f64, f64)> = [
                        (position - half, stats.q1),
                        (position + half, stats.q1),
                        (position + half, stats.median - depth),
                        (position + inset, stats.median),
                        (position + half, stats.median + depth),
                        (position + half, stats.q3),
                        (position - half, stats.q3),
                        (position - half, stats.median + depth),
                        (position - inset, stats.median),
                        (position - half, stats.median - depth),
                    ]
                    .into_iter()
                    .filter_map(|(category, value)| at(category, value))
                    .collect();
                    sink.polygon(layer, PolygonPrimitive::new(outline, color));
                }
                None => {
                    if let (Some(a), Some(b)) =
                        (at(position - half, stats.q1), at(position + half, stats.q3))
                    {
                        sink.rect(
                            layer,
                            RectPrimitive::new(
                                a.0.min(b.0),
                                a.1.min(b.1),
                                (a.0 - b.0).abs(),
                                (a.1 - b.1).abs(),
                                color,
                            )
                            .with_border(edge_width, *edge_color),
                        );
                    }
                }
            }

            let cap = half * 0.5;
            let segments = [
                ((*position, stats.q1), (*position, stats.whisker_low), *edge_color, edge_width),
                ((*position, stats.q3), (*position, stats.whisker_high), *edge_color, edge_width),
                (
                    (position - cap, stats.whisker_low),
                    (position + cap, stats.whisker_low),
                    *edge_color,
                    edge_width,
                ),
                (
                    (position - cap, stats.whisker_high),
                    (position + cap, stats.whisker_high),
                    *edge_color,
                    edge_width,
                ),
                (
                    (position - half, stats.median),
                    (position + half, stats.median),
                    *median_color,
                    units.px(MEDIAN_WIDTH_PT),
                ),
            ];
            for (start, end, segment_color, segment_width) in segments {
                if let (Some(a), Some(b)) = (at(start.0, start.1), at(end.0, end.1)) {
                    sink.line(
                        layer,
                        LinePrimitive::new(a.0, a.1, b.0, b.1, segment_width, segment_color),
                    );
                }
            }

            if *show_outliers {
                let radius = units.px(OUTLIER_RADIUS_PT);
                for outlier in &stats.outliers {
                    if let Some((cx, cy)) = at(*position, *outlier) {
                        sink.circle(layer, CirclePrimitive::new(cx, cy, radius, *edge_color));
                    }
                }
            }
        }
        ArtistKind::RefLine {
            axis,
            start,
            end,
            width,
            stroke,
        } => {
            let width = units.px(*width);
            let endpoints = match *axis {
                RefLineAxis::Vertical { x } => {
                    let (low, high) = projection.y.domain();
                    (
                        projection.point((x, start.unwrap_or(low))),
                        projection.point((x, end.unwrap_or(high))),
                    )
                }
                RefLineAxis::Horizontal { y } => {
                    let (low, high) = projection.x.domain();
                    (
                        projection.point((start.unwrap_or(low), y)),
                        projection.point((end.unwrap_or(high), y)),
                    )
                }
            };
            if let (Some(a), Some(b)) = endpoints {
                sink.line(
                    layer,
                    LinePrimitive::new(a.0, a.1, b.0, b.1, width, color).with_stroke_style(*stroke),
                );
            }
        }
        ArtistKind::Text {
            x,
            y,
            text,
            font_size,
            h_align,
            anchor,
        } => {
            let position = match anchor {
                TextAnchor::Data => projection.point((*x, *y)),
                TextAnchor::AxesFraction => Some(projection.fraction(*x, *y)),
            };
            if let Some((px, py)) = position {
                sink.text(
                    layer,
                    TextPrimitive::new(text.clone(), px, py, units.px(*font_size), color, *h_align),
                );
            }
        }
        ArtistKind::Colorbar {
            palette,
            vmin,
            vmax,
        } => {
            let plot = projection.plot;
            let left = plot.right + units.px(COLORBAR_GAP_PT);
            let width = units.px(COLORBAR_WIDTH_PT);
            let step = plot.height() / COLORBAR_STEPS as f64;
            for index in 0..COLORBAR_STEPS {
                let t = (index as f64 + 0.5) / COLORBAR_STEPS as f64;
                sink.rect(
                    CanvasLayerKind::Axis,
                    RectPrimitive::new(
                        left,
                        plot.bottom - (index as f64 + 1.0) * step,
                        width,
                        step,
                        palette.sample(t),
                    ),
                );
            }
            let font_px = units.px(style.tick_label_size);
            let span = vmax - vmin;
            for fraction in [0.0, 0.5, 1.0] {
                let value = vmin + span * fraction;
                sink.text(
                    CanvasLayerKind::Axis,
                    TextPrimitive::new(
                        format_tick(value, span.abs() / 2.0),
                        left + width + units.px(3.0),
                        plot.bottom - fraction * plot.height(),
                        font_px,
                        style.font_color,
                        TextHAlign::Left,
                    ),
                );
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisSide {
    Left,
    Right,
}

fn paint_frame(
    sink: &mut PanelSink<'_>,
    axes: &Axes,
    projection: Projection,
    style: &StyleConfig,
    units: Units,
    side: AxisSide,
) {
    let plot = projection.plot;
    let spine_width = units.px(style.spine_width);
    let tick_length = units.px(style.tick_length);
    let tick_px = units.px(style.tick_label_size);
    let label_px = units.px(style.label_font_size);
    let layer = CanvasLayerKind::Axis;

    if side == AxisSide::Left && !axes.hide_spines {
        let spines = [
            (plot.left, plot.top, plot.right, plot.top),
            (plot.left, plot.bottom, plot.right, plot.bottom),
            (plot.left, plot.top, plot.left, plot.bottom),
            (plot.right, plot.top, plot.right, plot.bottom),
        ];
        for (x1, y1, x2, y2) in spines {
            sink.line(
                layer,
                LinePrimitive::new(x1, y1, x2, y2, spine_width, style.spine_color),
            );
        }
    }

    if side == AxisSide::Left {
        for (value, label) in tick_positions(axes.x_ticks.as_ref(), projection.x, style.tick_count)
        {
            let Some(x) = projection.px(value) else {
                continue;
            };
            sink.line(
                layer,
                LinePrimitive::new(x, plot.bottom, x, plot.bottom + tick_length, spine_width, style.spine_color),
            );
            sink.text(
                layer,
                TextPrimitive::new(
                    label,
                    x,
                    plot.bottom + tick_length + tick_px * 0.9,
                    tick_px,
                    style.font_color,
                    TextHAlign::Center,
                ),
            );
        }
    }

    if !axes.hide_y_ticks {
        let (edge, outward, align) = match side {
            AxisSide::Left => (plot.left, -1.0, TextHAlign::Right),
            AxisSide::Right => (plot.right, 1.0, TextHAlign::Left),
        };
        for (value, label) in tick_positions(axes.y_ticks.as_ref(), projection.y, style.tick_count)
        {
            let Some(y) = projection.py(value) else {
                continue;
            };
            sink.line(
                layer,
                LinePrimitive::new(edge, y, edge + outward * tick_length, y, spine_width, style.spine_color),
            );
            sink.text(
                layer,
                TextPrimitive::new(
                    label,
                    edge + outward * (tick_length + units.px(2.0)),
                    y,
                    tick_px,
                    style.font_color,
                    align,
                ),
            );
        }
    }

    if let Some(ylabel) = axes.ylabel.as_deref() {
        let (x, align) = match side {
            AxisSide::Left => (plot.left, TextHAlign::Left),
            AxisSide::Right => (plot.right, TextHAlign::Right),
        };
        sink.text(
            layer,
            TextPrimitive::new(ylabel, x, plot.top - label_px * 0.9, label_px, style.font_color, align),
        );
    }

    if side == AxisSide::Left {
        if let Some(xlabel) = axes.xlabel.as_deref() {
            sink.text(
                layer,
                TextPrimitive::new(
                    xlabel,
                    (plot.left + plot.right) / 2.0,
                    plot.bottom + tick_length + tick_px * 1.8 + label_px * 0.8,
                    label_px,
                    style.font_color,
                    TextHAlign::Center,
                ),
            );
        }
        if let Some(title) = axes.title.as_deref() {
            let subtitle_px = units.px(style.subtitle_font_size);
            let ylabel_row = if axes.ylabel.is_some() { label_px * 1.4 } else { 0.0 };
            sink.text(
                layer,
                TextPrimitive::new(
                    title,
                    (plot.left + plot.right) / 2.0,
                    plot.top - ylabel_row - subtitle_px * 0.9,
                    subtitle_px,
                    style.font_color,
                    TextHAlign::Center,
                ),
            );
        }
    }
}

fn paint_legend(
    sink: &mut PanelSink<'_>,
    legend: &crate::render::Legend,
    plot: PlotArea,
    style: &StyleConfig,
    units: Units,
) {
    if legend.entries.is_empty() {
        return;
    }
    let layer = CanvasLayerKind::Legend;
    let font_px = units.px(style.legend_font_size);
    let title_px = units.px(style.legend_title_size);
    let pad = font_px * 0.6;
    let row = font_px * 1.5;
    let swatch = font_px * 1.8;

    let widest_label = legend
        .entries
        .iter()
        .map(|entry| entry.label.chars().count())
        .max()
        .unwrap_or(0) as f64;
    let title_width = legend.title.chars().count() as f64 * title_px * GLYPH_WIDTH_EM;
    let width = (swatch + pad + widest_label * font_px * GLYPH_WIDTH_EM).max(title_width) + pad * 2.0;
    let title_row = if legend.title.is_empty() { 0.0 } else { title_px * 1.5 };
    let height = pad * 2.0 + title_row + row * legend.entries.len() as f64;
    let left = plot.right - width - pad;
    let top = plot.top + pad;

    sink.rect(
        layer,
        RectPrimitive::new(left, top, width, height, style.background_color)
            .with_border(units.px(0.8), style.legend_frame_color),
    );
    if !legend.title.is_empty() {
        sink.text(
            layer,
            TextPrimitive::new(
                legend.title.clone(),
                left + width / 2.0,
                top + pad + title_px * 0.75,
                title_px,
                style.font_color,
                TextHAlign::Center,
            ),
        );
    }

    for (index, entry) in legend.entries.iter().enumerate() {
        let center_y = top + pad + title_row + row * (index as f64 + 0.5);
        let swatch_left = left + pad;
        match entry.swatch {
            LegendSwatch::Line => sink.line(
                layer,
                LinePrimitive::new(
                    swatch_left,
                    center_y,
                    swatch_left + swatch,
                    center_y,
                    units.px(style.line_width.max(1.0)),
                    entry.color,
                ),
            ),
            LegendSwatch::Patch => sink.rect(
                layer,
                RectPrimitive::new(
                    swatch_left,
                    center_y - font_px * 0.4,
                    swatch,
                    font_px * 0.8,
                    entry.color,
                ),
            ),
            LegendSwatch::Marker => sink.circle(
                layer,
                CirclePrimitive::new(swatch_left + swatch / 2.0, center_y, font_px * 0.35, entry.color),
            ),
        }
        sink.text(
            layer,
            TextPrimitive::new(
                entry.label.clone(),
                swatch_left + swatch + pad,
                center_y,
                font_px,
                style.font_color,
                TextHAlign::Left,
            ),
        );
    }
}

/// Tick values with labels: fixed category ticks when set, otherwise round
/// numeric ticks over the scale domain.
fn tick_positions(
    fixed: Option<&crate::render::CategoryTicks>,
    scale: LinearScale,
    tick_count: usize,
) -> Vec<(f64, String)> {
    if let Some(ticks) = fixed {
        return ticks
            .positions
            .iter()
            .copied()
            .zip(ticks.labels.iter().cloned())
            .collect();
    }
    let ticks = scale.nice_ticks(tick_count);
    let step = match ticks.as_slice() {
        [first, second, ..] => second - first,
        _ => 1.0,
    };
    ticks
        .into_iter()
        .map(|value| (value, format_tick(value, step)))
        .collect()
}

/// Formats a tick value with just enough decimals for `step`.
pub(crate) fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step.is_finite() && step > 0.0 && step < 1.0 {
        ((-step.log10()).ceil() as usize).min(8)
    } else {
        0
    };
    let value = if value == 0.0 { 0.0 } else { value };
    let formatted = format!("{value:.decimals$}");
    if formatted.starts_with('-') && formatted.trim_start_matches(['-', '0', '.']).is_empty() {
        formatted[1..].to_owned()
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::format_tick;
    use crate::core::{DrawStyle, FigureSize};
    use crate::render::{
        Artist, ArtistKind, CanvasLayerKind, Color, Figure, LineStrokeStyle, PanelId,
    };
    use crate::style::StyleConfig;

    #[test]
    fn tick_labels_use_step_precision() {
        assert_eq!(format_tick(20.0, 10.0), "20");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
        assert_eq!(format_tick(-0.0001, 0.5), "0.0");
    }

    #[test]
    fn z_order_changes_open_new_series_batches() {
        let mut figure = Figure::single(FigureSize::DEFAULT);
        let panel = figure.panel_mut(PanelId::new(0)).expect("panel");
        for z_order in [2.0, 1.0] {
            panel.left.add_artist(Artist::new(
                ArtistKind::Line {
                    points: vec![(0.0, 0.0), (1.0, 1.0)],
                    width: 1.0,
                    stroke: LineStrokeStyle::Solid,
                    draw_style: DrawStyle::Default,
                },
                Color::BLACK,
                z_order,
            ));
        }

        let layered = figure
            .to_layered_frame(&StyleConfig::default())
            .expect("layered frame");
        let series: Vec<_> = layered
            .batches()
            .into_iter()
            .filter(|batch| batch.kind == CanvasLayerKind::Series)
            .collect();
        assert_eq!(series.len(), 2);
        assert!(series.iter().all(|batch| batch.lines.len() == 1));
    }
}
