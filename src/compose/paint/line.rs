use tracing::trace;

use crate::chart::LineSeries;
use crate::render::{Artist, ArtistKind, Axes, LineStrokeStyle};

use super::{PaintContext, paint_reference_lines};

/// Error bands and area fills sit just below their line.
const FILL_Z_OFFSET: f64 = 0.1;

pub(crate) fn paint_lines(axes: &mut Axes, series: &[&LineSeries], ctx: &PaintContext<'_>) {
    let mut cycle = ctx.color_cycle(series.len());

    for line in series {
        let cycled = cycle.next_color();
        let points = line.points();
        if points.is_empty() {
            continue;
        }

        let base = ctx.series_color(&line.style, cycled);
        let color = base.with_alpha(line.style.alpha.unwrap_or(ctx.style.line_alpha));
        let fill_color = base.with_alpha(ctx.style.area_alpha);
        let draw_style = line.style.draw_style.unwrap_or(ctx.style.line_drawstyle);
        let fill_z = ctx.z_order - FILL_Z_OFFSET;

        if ctx.settings.show_yerr {
            if let Some(yerr) = line.yerr.as_ref().filter(|yerr| yerr.len() == line.y.len()) {
                let upper = points
                    .iter()
                    .zip(yerr)
                    .map(|((x, y), err)| (*x, y + err))
                    .collect();
                let lower = points
                    .iter()
                    .zip(yerr)
                    .map(|((x, y), err)| (*x, y - err))
                    .collect();
                axes.add_artist(Artist::new(
                    ArtistKind::Area { upper, lower },
                    fill_color,
                    fill_z,
                ));
            }
        }

        if ctx.settings.show_area {
            let baseline: Vec<(f64, f64)> = points.iter().map(|(x, _)| (*x, 0.0)).collect();
            let (upper, lower) = match draw_style.step() {
                Some(step) => (step.expand(&points), step.expand(&baseline)),
                None => (points.clone(), baseline),
            };
            axes.add_artist(Artist::new(
                ArtistKind::Area { upper, lower },
                fill_color,
                fill_z,
            ));
        }

        trace!(points = points.len(), z_order = ctx.z_order, "line painted");
        axes.add_artist(
            Artist::new(
                ArtistKind::Line {
                    points,
                    width: line.style.line_width.unwrap_or(ctx.style.line_width),
                    stroke: line.style.line_style.unwrap_or(LineStrokeStyle::Solid),
                    draw_style,
                },
                color,
                ctx.z_order,
            )
            .with_label(ctx.series_label(line.label.as_deref())),
        );
        paint_reference_lines(axes, &line.reference_lines, base, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::paint_lines;
    use crate::chart::{ChartSettings, LineSeries};
    use crate::compose::paint::PaintContext;
    use crate::render::{ArtistKind, Axes};
    use crate::style::StyleConfig;

    #[test]
    fn band_and_area_both_draw_below_the_line() {
        let style = StyleConfig::default();
        let settings = ChartSettings {
            show_yerr: true,
            show_area: true,
            ..ChartSettings::default()
        };
        let series = LineSeries::from_values(vec![1.0, 2.0, 3.0]).with_yerr(vec![0.5; 3]);
        let mut axes = Axes::new();
        paint_lines(&mut axes, &[&series], &PaintContext::new(&style, &settings, 2.0));

        let areas: Vec<f64> = axes
            .artists()
            .iter()
            .filter(|artist| matches!(artist.kind, ArtistKind::Area { .. }))
            .map(|artist| artist.z_order)
            .collect();
        assert_eq!(areas.len(), 2);
        assert!(areas.iter().all(|z| (z - 1.9).abs() <= 1e-9));
    }

    #[test]
    fn mismatched_error_lengths_skip_the_band() {
        let style = StyleConfig::default();
        let settings = ChartSettings {
            show_yerr: true,
            ..ChartSettings::default()
        };
        let series = LineSeries::from_values(vec![1.0, 2.0]).with_yerr(vec![0.5]);
        let mut axes = Axes::new();
        paint_lines(&mut axes, &[&series], &PaintContext::new(&style, &settings, 2.0));
        assert_eq!(axes.artists().len(), 1);
    }
}
