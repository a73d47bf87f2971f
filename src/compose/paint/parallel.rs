use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::chart::format::format_number;
use crate::chart::{ChartKind, DimensionValue, ParallelSeries, SeriesStyle};
use crate::compose::{CompositionWarning, Diagnostics};
use crate::core::DrawStyle;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Artist, ArtistKind, Axes, CategoryTicks, Color, LineStrokeStyle, TextAnchor, TextHAlign,
};
use crate::style::ColorCycle;

use super::PaintContext;

const NUMERIC_TICKS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];
const TICK_LENGTH: f64 = 0.03;
const LABEL_OFFSET: f64 = 0.05;

/// How one dimension maps raw values onto the unit axis.
#[derive(Debug, Clone, PartialEq)]
enum DimensionScale {
    Numeric { min: f64, max: f64 },
    Categorical(IndexMap<String, f64>),
}

impl DimensionScale {
    fn fit(name: &str, rows: &[&IndexMap<String, DimensionValue>], order: Option<&Vec<String>>) -> Self {
        let first = rows.iter().find_map(|row| row.get(name));
        if !matches!(first, Some(DimensionValue::Category(_))) {
            let values = rows
                .iter()
                .filter_map(|row| row.get(name).and_then(DimensionValue::as_number))
                .filter(|value| value.is_finite());
            let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
            return Self::Numeric { min, max };
        }

        let unique: BTreeSet<String> = rows
            .iter()
            .filter_map(|row| row.get(name))
            .map(DimensionValue::to_key)
            .collect();
        let mut categories: Vec<String> = order
            .map(|order| {
                order
                    .iter()
                    .filter(|category| unique.contains(*category))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let remaining: Vec<String> = unique
            .iter()
            .filter(|category| !categories.contains(category))
            .cloned()
            .collect();
        categories.extend(remaining);

        let last = categories.len().saturating_sub(1);
        let positions = categories
            .into_iter()
            .enumerate()
            .map(|(index, category)| {
                let position = if last == 0 {
                    0.5
                } else {
                    index as f64 / last as f64
                };
                (category, position)
            })
            .collect();
        Self::Categorical(positions)
    }

    fn normalize(&self, value: Option<&DimensionValue>) -> Option<f64> {
        match self {
            Self::Numeric { min, max } => {
                let value = value?.as_number().filter(|value| value.is_finite())?;
                let range = max - min;
                Some(if range == 0.0 { 0.0 } else { (value - min) / range })
            }
            Self::Categorical(positions) => positions.get(&value?.to_key()).copied(),
        }
    }

    fn tick_labels(&self) -> Vec<(f64, String)> {
        match self {
            Self::Numeric { min, .. } if !min.is_finite() => Vec::new(),
            Self::Numeric { min, max } => NUMERIC_TICKS
                .iter()
                .map(|tick| {
                    let range = max - min;
                    let value = if range != 0.0 { min + tick * range } else { *min };
                    (*tick, format_number(value))
                })
                .collect(),
            Self::Categorical(positions) => positions
                .iter()
                .map(|(category, position)| (*position, category.clone()))
                .collect(),
        }
    }
}

/// Paints every row of every series as one polyline across shared
/// dimension axes, each normalized to `[0, 1]`.
///
/// Dimensions, hue key and category orders come from the first series.
pub(crate) fn paint_parallel(
    axes: &mut Axes,
    series: &[&ParallelSeries],
    ctx: &PaintContext<'_>,
    diagnostics: &mut Diagnostics,
) -> ChartResult<()> {
    let Some(first) = series.first() else {
        return Ok(());
    };
    let rows: Vec<(&IndexMap<String, DimensionValue>, &SeriesStyle)> = series
        .iter()
        .flat_map(|parallel| parallel.rows.iter().map(|row| (row, &parallel.style)))
        .collect();
    if rows.is_empty() {
        diagnostics.push(CompositionWarning::NoDataPoints {
            kind: ChartKind::ParallelCoords,
        });
        return Ok(());
    }

    let dimensions = first.resolved_dimensions();
    if dimensions.len() < 2 {
        return Err(ChartError::InvalidData(
            "parallel coordinates requires at least 2 dimensions".to_owned(),
        ));
    }
    let data: Vec<&IndexMap<String, DimensionValue>> = rows.iter().map(|(row, _)| *row).collect();
    let scales: Vec<DimensionScale> = dimensions
        .iter()
        .map(|name| DimensionScale::fit(name, &data, first.category_orders.get(name)))
        .collect();

    let hues: BTreeSet<String> = data
        .iter()
        .filter_map(|row| row.get(&first.hue_key))
        .map(DimensionValue::to_key)
        .collect();
    let mut cycle = ColorCycle::new(ctx.style.color_parallel_hue, hues.len().max(1));
    let hue_colors: IndexMap<String, Color> = hues
        .into_iter()
        .map(|hue| (hue, cycle.next_color()))
        .collect();
    let default_color = hue_colors
        .values()
        .next()
        .copied()
        .unwrap_or_else(|| cycle.next_color());
    debug!(
        dimensions = dimensions.len(),
        rows = rows.len(),
        hues = hue_colors.len(),
        "parallel coordinates resolved"
    );

    let mut labelled: BTreeSet<String> = BTreeSet::new();
    for (row, style) in &rows {
        let points: Vec<(f64, f64)> = scales
            .iter()
            .zip(&dimensions)
            .enumerate()
            .filter_map(|(index, (scale, name))| {
                scale.normalize(row.get(name)).map(|y| (index as f64, y))
            })
            .collect();
        if points.is_empty() {
            continue;
        }
        let hue = row.get(&first.hue_key).map(DimensionValue::to_key);
        let cycled = hue
            .as_ref()
            .and_then(|hue| hue_colors.get(hue))
            .copied()
            .unwrap_or(default_color);
        let label = hue.filter(|hue| labelled.insert(hue.clone()));
        axes.add_artist(
            Artist::new(
                ArtistKind::Line {
                    points,
                    width: style.line_width.unwrap_or(ctx.style.parallel_line_width),
                    stroke: style.line_style.unwrap_or(LineStrokeStyle::Solid),
                    draw_style: DrawStyle::Default,
                },
                ctx.series_color(style, cycled)
                    .with_alpha(style.alpha.unwrap_or(ctx.style.parallel_line_alpha)),
                ctx.z_order,
            )
            .with_label(label),
        );
    }

    paint_dimension_axes(axes, &scales, ctx);
    axes.x_ticks = Some(CategoryTicks {
        positions: (0..dimensions.len()).map(|index| index as f64).collect(),
        labels: dimensions.clone(),
    });
    axes.set_xlim(Some(-0.1), Some(dimensions.len() as f64 - 0.9));
    axes.set_ylim(Some(-0.02), Some(1.02));
    axes.hide_y_ticks = true;
    axes.hide_spines = true;
    trace!(dimensions = dimensions.len(), "parallel coordinates painted");
    Ok(())
}

fn paint_dimension_axes(axes: &mut Axes, scales: &[DimensionScale], ctx: &PaintContext<'_>) {
    let axis_color = ctx.style.parallel_axis_color;
    let axis_z = ctx.z_order + 1.0;
    let line = |points: Vec<(f64, f64)>| ArtistKind::Line {
        points,
        width: ctx.style.spine_width,
        stroke: LineStrokeStyle::Solid,
        draw_style: DrawStyle::Default,
    };

    for (index, scale) in scales.iter().enumerate() {
        let x = index as f64;
        axes.add_artist(Artist::new(line(vec![(x, 0.0), (x, 1.0)]), axis_color, axis_z));

        let (tick_start, tick_end, label_x, h_align) = if index == 0 {
            (x - TICK_LENGTH, x, x - LABEL_OFFSET, TextHAlign::Right)
        } else {
            (x, x + TICK_LENGTH, x + LABEL_OFFSET, TextHAlign::Left)
        };
        for (position, text) in scale.tick_labels() {
            axes.add_artist(Artist::new(
                line(vec![(tick_start, position), (tick_end, position)]),
                axis_color,
                axis_z + 1.0,
            ));
            axes.add_artist(Artist::new(
                ArtistKind::Text {
                    x: label_x,
                    y: position,
                    text,
                    font_size: ctx.style.tick_label_size,
                    h_align,
                    anchor: TextAnchor::Data,
                },
                ctx.style.font_color,
                axis_z + 2.0,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::paint_parallel;
    use crate::chart::{ChartSettings, DimensionValue, ParallelSeries};
    use crate::compose::Diagnostics;
    use crate::compose::paint::PaintContext;
    use crate::render::{ArtistKind, Axes};
    use crate::style::StyleConfig;

    fn row(entries: &[(&str, DimensionValue)]) -> IndexMap<String, DimensionValue> {
        entries
            .iter()
            .map(|(key, value)| ((*key).to_owned(), value.clone()))
            .collect()
    }

    fn data_lines(axes: &Axes) -> Vec<Vec<(f64, f64)>> {
        axes.artists()
            .iter()
            .filter(|artist| artist.z_order <= 1.0)
            .filter_map(|artist| match &artist.kind {
                ArtistKind::Line { points, .. } => Some(points.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn numeric_and_categorical_dimensions_normalize_to_unit_axes() {
        let style = StyleConfig::default();
        let settings = ChartSettings::default();
        let series = ParallelSeries::new(vec![
            row(&[("size", 10.0.into()), ("grade", "b".into()), ("hue", "x".into())]),
            row(&[("size", 30.0.into()), ("grade", "a".into()), ("hue", "y".into())]),
            row(&[("size", 20.0.into()), ("grade", "c".into()), ("hue", "x".into())]),
        ]);
        let mut axes = Axes::new();
        let mut diagnostics = Diagnostics::new();
        paint_parallel(
            &mut axes,
            &[&series],
            &PaintContext::new(&style, &settings, 1.0),
            &mut diagnostics,
        )
        .expect("paint");

        let lines = data_lines(&axes);
        assert_eq!(lines[0], vec![(0.0, 0.0), (1.0, 0.5)]);
        assert_eq!(lines[1], vec![(0.0, 1.0), (1.0, 0.0)]);
        assert_eq!(lines[2], vec![(0.0, 0.5), (1.0, 1.0)]);

        let labels: Vec<&str> = axes
            .artists()
            .iter()
            .filter_map(|artist| artist.label.as_deref())
            .collect();
        assert_eq!(labels, vec!["x", "y"]);
        assert!(axes.hide_spines && axes.hide_y_ticks);
        let x_max = axes.x_limits.max.expect("x limit");
        assert!((x_max - 1.1).abs() <= 1e-9);
    }

    #[test]
    fn single_dimension_is_rejected() {
        let style = StyleConfig::default();
        let settings = ChartSettings::default();
        let series = ParallelSeries::new(vec![row(&[("only", 1.0.into())])]);
        let mut axes = Axes::new();
        let mut diagnostics = Diagnostics::new();
        let result = paint_parallel(
            &mut axes,
            &[&series],
            &PaintContext::new(&style, &settings, 1.0),
            &mut diagnostics,
        );
        assert!(result.is_err());
    }

    #[test]
    fn constant_numeric_dimension_maps_to_zero() {
        let style = StyleConfig::default();
        let settings = ChartSettings::default();
        let series = ParallelSeries::new(vec![
            row(&[("a", 5.0.into()), ("b", 1.0.into())]),
            row(&[("a", 5.0.into()), ("b", 2.0.into())]),
        ]);
        let mut axes = Axes::new();
        let mut diagnostics = Diagnostics::new();
        paint_parallel(
            &mut axes,
            &[&series],
            &PaintContext::new(&style, &settings, 1.0),
            &mut diagnostics,
        )
        .expect("paint");
        let lines = data_lines(&axes);
        assert!(lines.iter().all(|line| line[0].1 == 0.0));
    }
}
