use tracing::debug;

use crate::chart::{AxisSide, OverlayMetadata, SeriesRecord};
use crate::compose::paint::{BarLayout, PaintContext};
use crate::compose::replay::paint_records;
use crate::compose::{CompositionWarning, Diagnostics, combine_legends};
use crate::error::ChartResult;
use crate::render::{Figure, Panel, PanelId};
use crate::style::StyleConfig;

/// Paints every bound sub-chart onto the axes its binding resolved to.
///
/// Sub-charts are drawn in binding order, each with its own style snapshot
/// and settings, which also provides its default z-order. Bar series of all
/// sub-charts share one [`BarLayout`], so grouped bars get distinct slots and
/// stacks accumulate per axis. `style` is the overlay's own snapshot and
/// provides the shared bar width.
pub fn paint_overlay(
    panel: &mut Panel,
    overlay: &OverlayMetadata,
    style: &StyleConfig,
    diagnostics: &mut Diagnostics,
) -> ChartResult<()> {
    let [left, right] = overlay.bar_series_per_axis();
    let [drawn_left, drawn_right] = overlay.drawn_bar_series_per_axis();
    let mut layout = BarLayout::new(overlay.bar_mode, style.bar_width, left + right)
        .with_stack_sizes(drawn_left, drawn_right);

    for (index, binding) in overlay.bindings.iter().enumerate() {
        let descriptor = &binding.descriptor;
        if !descriptor.kind.is_overlayable() {
            diagnostics.push(CompositionWarning::UnsupportedOverlayKind {
                index,
                kind: descriptor.kind,
            });
            continue;
        }
        let z_order = binding
            .z_order
            .unwrap_or_else(|| descriptor.style.overlay_default_zorder(descriptor.kind));
        let ctx = PaintContext::new(&descriptor.style, &descriptor.settings, f64::from(z_order))
            .with_color_override(binding.color)
            .with_legend_label(binding.legend_label.as_deref());
        let records: Vec<&SeriesRecord> = descriptor.series.iter().collect();
        debug!(
            index,
            kind = %descriptor.kind,
            axis = %binding.axis,
            z_order,
            "overlay sub-chart painted"
        );
        let axes = match binding.axis {
            AxisSide::Left => &mut panel.left,
            AxisSide::Right => panel.twin_right(),
        };
        paint_records(
            axes,
            binding.axis,
            descriptor.kind,
            &records,
            &ctx,
            &mut layout,
            diagnostics,
        )?;
    }
    layout.apply_ticks(&mut panel.left);

    let options = &overlay.options;
    panel.left.xlabel = options.xlabel.clone();
    panel.left.ylabel = options.ylabel_left.clone();
    panel.left.set_xlim(options.xmin, options.xmax);
    panel.left.set_ylim(options.ymin, options.ymax);
    panel.left.grid = options.show_grid;
    if let Some(right) = panel.right.as_mut() {
        right.ylabel = options.ylabel_right.clone();
        right.set_ylim(options.ymin_right, options.ymax_right);
    }
    if options.show_legend {
        combine_legends(panel);
    }
    Ok(())
}

/// Renders an overlay into a fresh single-panel figure.
pub fn render_overlay(
    overlay: &OverlayMetadata,
    style: &StyleConfig,
    diagnostics: &mut Diagnostics,
) -> ChartResult<Figure> {
    let mut figure = Figure::single(overlay.options.figsize.unwrap_or(style.figsize));
    paint_overlay(figure.panel_mut(PanelId::new(0))?, overlay, style, diagnostics)?;
    figure.title = overlay.options.title.clone();
    Ok(figure)
}
