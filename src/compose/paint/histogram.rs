use tracing::trace;

use crate::chart::HistogramSeries;
use crate::core::{bin_counts, bin_edges, shape_counts};
use crate::render::{Artist, ArtistKind, Axes, BarGeometry};

use super::{PaintContext, paint_reference_lines};

/// Paints histograms over bins shared by every series.
///
/// Edges are computed once from the union of all samples. With `stacked`
/// each series starts on top of the previous ones; otherwise several series
/// are drawn translucent over each other.
pub(crate) fn paint_histograms(
    axes: &mut Axes,
    series: &[&HistogramSeries],
    ctx: &PaintContext<'_>,
    stacked: bool,
) {
    let pooled: Vec<f64> = series
        .iter()
        .flat_map(|hist| hist.samples.iter().copied())
        .filter(|value| value.is_finite())
        .collect();
    if pooled.is_empty() {
        return;
    }
    let bins = ctx.settings.num_bins.unwrap_or(ctx.style.hist_bins).max(1);
    let Ok(edges) = bin_edges(&pooled, bins) else {
        return;
    };

    let orientation = ctx.settings.orientation();
    let translucent = (!stacked && series.len() > 1).then_some(ctx.style.overlay_hist_alpha);
    let mut cycle = ctx.color_cycle(series.len());
    let mut running = vec![0.0; bins];

    for hist in series {
        let cycled = cycle.next_color();
        if hist.samples.is_empty() {
            continue;
        }
        let counts = bin_counts(&hist.samples, &edges);
        let heights = shape_counts(
            &counts,
            &edges,
            ctx.settings.show_density,
            ctx.settings.show_cumulative,
        );

        let bars: Vec<BarGeometry> = edges
            .windows(2)
            .zip(&heights)
            .enumerate()
            .map(|(bin, (pair, height))| BarGeometry {
                position: (pair[0] + pair[1]) / 2.0,
                base: if stacked { running[bin] } else { 0.0 },
                value: *height,
                thickness: pair[1] - pair[0],
                error: None,
            })
            .collect();
        if stacked {
            for (total, height) in running.iter_mut().zip(&heights) {
                *total += height;
            }
        }

        let base_color = ctx.series_color(&hist.style, cycled);
        let alpha = translucent
            .or(hist.style.alpha)
            .unwrap_or(ctx.style.hist_alpha);
        trace!(bins, stacked, "histogram painted");
        axes.add_artist(
            Artist::new(
                ArtistKind::Bars {
                    bars,
                    orientation,
                    edge_width: ctx.style.hist_edge_width,
                    edge_color: ctx.style.hist_edge_color,
                    error_color: ctx.style.bar_error_color,
                },
                base_color.with_alpha(alpha),
                ctx.z_order,
            )
            .with_label(ctx.series_label(hist.label.as_deref())),
        );
        paint_reference_lines(axes, &hist.reference_lines, base_color, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::paint_histograms;
    use crate::chart::{ChartSettings, HistogramSeries};
    use crate::compose::paint::PaintContext;
    use crate::render::Axes;
    use crate::style::StyleConfig;

    #[test]
    fn overlaid_histograms_share_bin_edges() {
        let style = StyleConfig::default();
        let settings = ChartSettings::default().with_num_bins(4);
        let narrow = HistogramSeries::new(vec![0.0, 1.0]);
        let wide = HistogramSeries::new(vec![2.0, 4.0]);
        let mut axes = Axes::new();
        paint_histograms(
            &mut axes,
            &[&narrow, &wide],
            &PaintContext::new(&style, &settings, 1.0),
            false,
        );

        let first = axes.artists()[0].bars().expect("bars");
        let second = axes.artists()[1].bars().expect("bars");
        assert_eq!(first.len(), 4);
        for (a, b) in first.iter().zip(second) {
            assert!((a.position - b.position).abs() <= 1e-12);
        }
        assert!((axes.artists()[0].color.alpha - style.overlay_hist_alpha).abs() <= 1e-12);
    }

    #[test]
    fn stacked_histograms_accumulate_heights() {
        let style = StyleConfig::default();
        let settings = ChartSettings::default().with_num_bins(2);
        let first = HistogramSeries::new(vec![0.0, 0.0, 1.0]);
        let second = HistogramSeries::new(vec![0.0, 1.0]);
        let mut axes = Axes::new();
        paint_histograms(
            &mut axes,
            &[&first, &second],
            &PaintContext::new(&style, &settings, 1.0),
            true,
        );

        let top = axes.artists()[1].bars().expect("bars");
        assert_eq!(top[0].base, 2.0);
        assert_eq!(top[0].top(), 3.0);
    }
}
