use tracing::trace;

use crate::chart::{BoxSeries, ChartKind};
use crate::compose::{CompositionWarning, Diagnostics};
use crate::core::{BoxStats, Orientation};
use crate::render::{Artist, ArtistKind, Axes, CategoryTicks};

use super::PaintContext;

/// Notch half-height factor applied to `iqr / sqrt(n)`.
const NOTCH_FACTOR: f64 = 1.57;

/// Paints one box per label group at positions `1..=n`, in first-seen order.
pub(crate) fn paint_boxes(
    axes: &mut Axes,
    series: &BoxSeries,
    ctx: &PaintContext<'_>,
    diagnostics: &mut Diagnostics,
) {
    let groups = series.groups();
    let summaries: Vec<(&str, BoxStats, usize)> = groups
        .iter()
        .filter_map(|(label, values)| {
            let finite = values.iter().filter(|value| value.is_finite()).count();
            BoxStats::from_values(values).map(|stats| (*label, stats, finite))
        })
        .collect();
    if summaries.is_empty() {
        diagnostics.push(CompositionWarning::NoDataPoints {
            kind: ChartKind::Box,
        });
        return;
    }

    let orientation = ctx.settings.orientation();
    let show_outliers = ctx.settings.show_outliers();
    let mut cycle = ctx.color_cycle(summaries.len());
    let alpha = series.style.alpha.unwrap_or(ctx.style.box_alpha);
    let mut ticks = CategoryTicks::default();

    for (index, (label, stats, count)) in summaries.into_iter().enumerate() {
        let cycled = cycle.next_color();
        let position = (index + 1) as f64;
        let notch = ctx
            .settings
            .show_notch
            .then(|| NOTCH_FACTOR * (stats.q3 - stats.q1) / (count as f64).sqrt());
        let artist = Artist::new(
            ArtistKind::Box {
                position,
                stats,
                width: ctx.style.box_width,
                orientation,
                show_outliers,
                notch,
                edge_color: ctx.style.box_edge_color,
                median_color: ctx.style.box_median_color,
            },
            ctx.series_color(&series.style, cycled).with_alpha(alpha),
            ctx.z_order,
        );
        let artist = if index == 0 {
            artist.with_label(ctx.series_label(series.label.as_deref()))
        } else {
            artist
        };
        axes.add_artist(artist);
        ticks.positions.push(position);
        ticks.labels.push(label.to_owned());
    }

    trace!(boxes = ticks.labels.len(), ?orientation, "boxes painted");
    match orientation {
        Orientation::Vertical => axes.x_ticks = Some(ticks),
        Orientation::Horizontal => axes.y_ticks = Some(ticks),
    }
}

#[cfg(test)]
mod tests {
    use super::paint_boxes;
    use crate::chart::{BoxSeries, ChartKind, ChartSettings};
    use crate::compose::paint::PaintContext;
    use crate::compose::{CompositionWarning, Diagnostics};
    use crate::render::{ArtistKind, Axes};
    use crate::style::StyleConfig;

    #[test]
    fn groups_keep_insertion_order_with_notches() {
        let style = StyleConfig::default();
        let settings = ChartSettings {
            show_notch: true,
            ..ChartSettings::default()
        };
        let series = BoxSeries::new([
            ("late", 4.0),
            ("early", 1.0),
            ("late", 8.0),
            ("early", 3.0),
            ("late", 6.0),
            ("late", 2.0),
        ]);
        let mut axes = Axes::new();
        let mut diagnostics = Diagnostics::new();
        paint_boxes(
            &mut axes,
            &series,
            &PaintContext::new(&style, &settings, 1.0),
            &mut diagnostics,
        );

        let ticks = axes.x_ticks.as_ref().expect("category ticks");
        assert_eq!(ticks.labels, vec!["late", "early"]);
        assert_eq!(ticks.positions, vec![1.0, 2.0]);

        let ArtistKind::Box { stats, notch, .. } = &axes.artists()[0].kind else {
            panic!("expected a box artist");
        };
        let expected = 1.57 * (stats.q3 - stats.q1) / 2.0;
        assert!((notch.expect("notch") - expected).abs() <= 1e-9);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn empty_series_warns_instead_of_failing() {
        let style = StyleConfig::default();
        let settings = ChartSettings::default();
        let series = BoxSeries::new(Vec::<(String, f64)>::new());
        let mut axes = Axes::new();
        let mut diagnostics = Diagnostics::new();
        paint_boxes(
            &mut axes,
            &series,
            &PaintContext::new(&style, &settings, 1.0),
            &mut diagnostics,
        );
        assert!(axes.artists().is_empty());
        assert_eq!(
            diagnostics.warnings(),
            &[CompositionWarning::NoDataPoints {
                kind: ChartKind::Box
            }]
        );
    }
}
