use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use tracing::trace;

use crate::chart::ScatterSeries;
use crate::core::{DrawStyle, LinearFit, normalize_sizes, pearson_correlation};
use crate::render::{Artist, ArtistKind, Axes, Color, LineStrokeStyle, TextAnchor, TextHAlign};
use crate::style::ColorCycle;

use super::{PaintContext, paint_reference_lines};

const REGRESSION_SAMPLES: usize = 100;
const CORRELATION_ANCHOR: (f64, f64) = (0.05, 0.95);

/// Paints scatter series with optional hue groups, size encoding, a fitted
/// regression line with its confidence band, and a correlation annotation.
pub(crate) fn paint_scatter(axes: &mut Axes, series: &[&ScatterSeries], ctx: &PaintContext<'_>) {
    let mut cycle = ctx.color_cycle(series.len());

    for scatter in series {
        let cycled = cycle.next_color();
        let points = scatter.points();
        if points.is_empty() {
            continue;
        }
        let sizes = marker_sizes(scatter, points.len(), ctx);
        let alpha = scatter.style.alpha.unwrap_or(ctx.style.scatter_alpha);

        let fit_color = match &scatter.hue {
            Some(hue) => {
                paint_hue_groups(axes, &points, &sizes, hue, alpha, ctx);
                ctx.color_override.unwrap_or(ctx.style.font_color)
            }
            None => {
                let color = ctx.series_color(&scatter.style, cycled);
                axes.add_artist(
                    Artist::new(
                        ArtistKind::Markers {
                            points: points.clone(),
                            sizes,
                        },
                        color.with_alpha(alpha),
                        ctx.z_order,
                    )
                    .with_label(ctx.series_label(scatter.label.as_deref())),
                );
                color
            }
        };

        if ctx.settings.show_regression {
            paint_regression(axes, scatter, fit_color, ctx);
        }
        if ctx.settings.show_correlation {
            if let Some(r) = pearson_correlation(&scatter.x, &scatter.y) {
                let (x, y) = CORRELATION_ANCHOR;
                axes.add_artist(Artist::new(
                    ArtistKind::Text {
                        x,
                        y,
                        text: format!("r = {r:.3}"),
                        font_size: ctx.style.font_size,
                        h_align: TextHAlign::Left,
                        anchor: TextAnchor::AxesFraction,
                    },
                    fit_color,
                    ctx.z_order,
                ));
            }
        }
        trace!(points = points.len(), hue = scatter.hue.is_some(), "scatter painted");
        paint_reference_lines(axes, &scatter.reference_lines, fit_color, ctx);
    }
}

fn marker_sizes(scatter: &ScatterSeries, count: usize, ctx: &PaintContext<'_>) -> Vec<f64> {
    match &scatter.sizes {
        Some(raw) if raw.len() == scatter.x.len() => {
            let range = ctx.settings.size_range.unwrap_or(ctx.style.scatter_size_range);
            let mut normalized = normalize_sizes(raw, range);
            normalized.truncate(count);
            normalized
        }
        _ => {
            let size = scatter.style.marker_size.unwrap_or(ctx.style.scatter_size);
            vec![size; count]
        }
    }
}

fn paint_hue_groups(
    axes: &mut Axes,
    points: &[(f64, f64)],
    sizes: &[f64],
    hue: &[String],
    alpha: f64,
    ctx: &PaintContext<'_>,
) {
    let mut groups: IndexMap<&str, (Vec<(f64, f64)>, Vec<f64>)> = IndexMap::new();
    for ((point, size), key) in points.iter().zip(sizes).zip(hue) {
        let key = key.as_str();
        let entry = groups.entry(key).or_default();
        entry.0.push(*point);
        entry.1.push(*size);
    }
    groups.sort_keys();

    let mut cycle = ColorCycle::new(ctx.style.color_multiple, groups.len());
    for (key, (points, sizes)) in groups {
        let color = ctx.color_override.unwrap_or_else(|| cycle.next_color());
        axes.add_artist(
            Artist::new(
                ArtistKind::Markers { points, sizes },
                color.with_alpha(alpha),
                ctx.z_order,
            )
            .with_label(Some(key.to_owned())),
        );
    }
}

fn paint_regression(axes: &mut Axes, scatter: &ScatterSeries, color: Color, ctx: &PaintContext<'_>) {
    let Some(fit) = LinearFit::from_points(&scatter.x, &scatter.y) else {
        return;
    };
    let xs: Vec<f64> = scatter.x.iter().copied().filter(|x| x.is_finite()).collect();
    let Some(low) = xs.iter().copied().min_by_key(|x| OrderedFloat(*x)) else {
        return;
    };
    let high = xs
        .iter()
        .copied()
        .max_by_key(|x| OrderedFloat(*x))
        .unwrap_or(low);
    let step = (high - low) / (REGRESSION_SAMPLES - 1) as f64;
    let grid: Vec<f64> = (0..REGRESSION_SAMPLES)
        .map(|index| low + step * index as f64)
        .collect();

    if ctx.settings.show_ci {
        let level = ctx.settings.ci_level.unwrap_or(ctx.style.ci_level);
        let band: Option<Vec<(f64, f64, f64)>> = grid
            .iter()
            .map(|x| {
                fit.confidence_half_width(*x, level)
                    .map(|half| (*x, fit.predict(*x) + half, fit.predict(*x) - half))
            })
            .collect();
        if let Some(band) = band {
            axes.add_artist(Artist::new(
                ArtistKind::Area {
                    upper: band.iter().map(|(x, upper, _)| (*x, *upper)).collect(),
                    lower: band.iter().map(|(x, _, lower)| (*x, *lower)).collect(),
                },
                color.with_alpha(ctx.style.regression_ci_alpha),
                ctx.z_order,
            ));
        }
    }

    axes.add_artist(Artist::new(
        ArtistKind::Line {
            points: grid.iter().map(|x| (*x, fit.predict(*x))).collect(),
            width: ctx.style.regression_width,
            stroke: LineStrokeStyle::Solid,
            draw_style: DrawStyle::Default,
        },
        color,
        ctx.z_order,
    ));
}

#[cfg(test)]
mod tests {
    use super::paint_scatter;
    use crate::chart::{ChartSettings, ScatterSeries};
    use crate::compose::paint::PaintContext;
    use crate::render::{ArtistKind, Axes};
    use crate::style::StyleConfig;

    #[test]
    fn hue_groups_are_sorted_and_labelled() {
        let style = StyleConfig::default();
        let settings = ChartSettings::default();
        let series = ScatterSeries::new(vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0])
            .with_hue(["b", "a", "b"]);
        let mut axes = Axes::new();
        paint_scatter(&mut axes, &[&series], &PaintContext::new(&style, &settings, 2.0));

        let labels: Vec<&str> = axes
            .artists()
            .iter()
            .filter_map(|artist| artist.label.as_deref())
            .collect();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[test]
    fn regression_and_correlation_follow_the_fit() {
        let style = StyleConfig::default();
        let settings = ChartSettings {
            show_regression: true,
            show_ci: true,
            show_correlation: true,
            ..ChartSettings::default()
        };
        let series = ScatterSeries::new(vec![0.0, 1.0, 2.0, 3.0], vec![1.0, 3.1, 4.9, 7.0]);
        let mut axes = Axes::new();
        paint_scatter(&mut axes, &[&series], &PaintContext::new(&style, &settings, 2.0));

        let line = axes
            .artists()
            .iter()
            .find_map(|artist| match &artist.kind {
                ArtistKind::Line { points, .. } => Some(points.clone()),
                _ => None,
            })
            .expect("regression line");
        assert_eq!(line.len(), 100);
        assert!((line[0].0 - 0.0).abs() <= 1e-9);
        assert!((line[99].0 - 3.0).abs() <= 1e-9);
        assert!(
            axes.artists()
                .iter()
                .any(|artist| matches!(artist.kind, ArtistKind::Area { .. }))
        );
        let text = axes
            .artists()
            .iter()
            .find_map(|artist| match &artist.kind {
                ArtistKind::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .expect("correlation text");
        assert!(text.starts_with("r = 0.99"));
    }
}
