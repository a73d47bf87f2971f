use tracing::trace;

use crate::chart::HeatmapSeries;
use crate::chart::format::{DEFAULT_VALUE_FORMAT, format_value};
use crate::render::{
    Artist, ArtistKind, Axes, CategoryTicks, HeatmapCell, TextAnchor, TextHAlign,
};

use super::PaintContext;

/// Paints one heatmap grid with rows running top to bottom.
pub(crate) fn paint_heatmap(axes: &mut Axes, heatmap: &HeatmapSeries, ctx: &PaintContext<'_>) {
    let (rows, cols) = heatmap.shape();
    if rows == 0 || cols == 0 {
        return;
    }
    let bounds = heatmap.value_bounds();
    let span = bounds.max - bounds.min;
    let palette = ctx.style.heatmap_palette;

    let mut cells = Vec::new();
    let mut annotations = Vec::new();
    for (row, values) in heatmap.cells.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            let Some(value) = value.filter(|value| value.is_finite()) else {
                continue;
            };
            let t = if span > 0.0 {
                (value - bounds.min) / span
            } else {
                0.5
            };
            cells.push(HeatmapCell {
                row,
                col,
                color: palette.sample(t),
            });
            annotations.push((row, col, value));
        }
    }

    axes.add_artist(
        Artist::new(
            ArtistKind::Heatmap { cells, rows, cols },
            ctx.style.font_color,
            ctx.z_order,
        )
        .with_label(heatmap.label.clone()),
    );

    if ctx.settings.show_heatmap_values {
        let template = heatmap
            .value_format
            .as_deref()
            .or(ctx.settings.value_format.as_deref())
            .unwrap_or(DEFAULT_VALUE_FORMAT);
        for (row, col, value) in annotations {
            axes.add_artist(Artist::new(
                ArtistKind::Text {
                    x: col as f64,
                    y: row as f64,
                    text: format_value(template, value),
                    font_size: ctx.style.heatmap_font_size,
                    h_align: TextHAlign::Center,
                    anchor: TextAnchor::Data,
                },
                ctx.style.heatmap_font_color,
                ctx.z_order,
            ));
        }
    }

    if ctx.settings.show_colorbars {
        axes.add_artist(Artist::new(
            ArtistKind::Colorbar {
                palette,
                vmin: bounds.min,
                vmax: bounds.max,
            },
            ctx.style.font_color,
            ctx.z_order,
        ));
    }

    if let Some(labels) = &heatmap.x_labels {
        axes.x_ticks = Some(index_ticks(labels));
    }
    if let Some(labels) = &heatmap.y_labels {
        axes.y_ticks = Some(index_ticks(labels));
    }
    axes.y_inverted = true;
    trace!(rows, cols, vmin = bounds.min, vmax = bounds.max, "heatmap painted");
}

fn index_ticks(labels: &[String]) -> CategoryTicks {
    CategoryTicks {
        positions: (0..labels.len()).map(|index| index as f64).collect(),
        labels: labels.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::paint_heatmap;
    use crate::chart::{ChartSettings, HeatmapSeries};
    use crate::compose::paint::PaintContext;
    use crate::render::{ArtistKind, Axes};
    use crate::style::StyleConfig;

    #[test]
    fn blank_cells_are_skipped_and_values_annotated() {
        let style = StyleConfig::default();
        let settings = ChartSettings {
            show_heatmap_values: true,
            show_colorbars: true,
            ..ChartSettings::default()
        };
        let heatmap = HeatmapSeries::new(vec![vec![Some(1.0), None], vec![Some(3.0), Some(2.5)]])
            .with_value_format("{:.1f}");
        let mut axes = Axes::new();
        paint_heatmap(&mut axes, &heatmap, &PaintContext::new(&style, &settings, 1.0));

        let ArtistKind::Heatmap { cells, rows, cols } = &axes.artists()[0].kind else {
            panic!("expected a heatmap artist");
        };
        assert_eq!((*rows, *cols, cells.len()), (2, 2, 3));
        assert_eq!(cells[0].color, style.heatmap_palette.sample(0.0));
        assert_eq!(cells[1].color, style.heatmap_palette.sample(1.0));

        let texts: Vec<String> = axes
            .artists()
            .iter()
            .filter_map(|artist| match &artist.kind {
                ArtistKind::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["1.0", "3.0", "2.5"]);
        assert!(axes.y_inverted);
        assert!(
            axes.artists()
                .iter()
                .any(|artist| matches!(artist.kind, ArtistKind::Colorbar { .. }))
        );
    }

    #[test]
    fn constant_grid_samples_the_palette_midpoint() {
        let style = StyleConfig::default();
        let settings = ChartSettings::default();
        let heatmap = HeatmapSeries::new(vec![vec![Some(4.0), Some(4.0)]]);
        let mut axes = Axes::new();
        paint_heatmap(&mut axes, &heatmap, &PaintContext::new(&style, &settings, 1.0));

        let ArtistKind::Heatmap { cells, .. } = &axes.artists()[0].kind else {
            panic!("expected a heatmap artist");
        };
        assert!(cells.iter().all(|cell| cell.color == style.heatmap_palette.sample(0.5)));
    }
}
