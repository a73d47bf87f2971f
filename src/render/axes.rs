use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{DataRange, GridAxis};
use crate::render::{Artist, Color, LegendSwatch};

/// Fraction of the data span added on each side when autoscaling.
const AUTOSCALE_MARGIN: f64 = 0.05;

/// Explicit bounds for one axis; a missing side is autoscaled.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisLimits {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AxisLimits {
    #[must_use]
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn is_unset(self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Resolves against an autoscaled range.
    #[must_use]
    pub fn resolve(self, auto: DataRange) -> DataRange {
        let min = self.min.unwrap_or(auto.min);
        let max = self.max.unwrap_or(auto.max);
        DataRange { min, max }
    }
}

/// One labelled entry in a legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub swatch: LegendSwatch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

/// Fixed tick positions with text, used for categorical axes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryTicks {
    pub positions: Vec<f64>,
    pub labels: Vec<String>,
}

/// A single coordinate system recording artists in data space.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Axes {
    artists: Vec<Artist>,
    pub x_limits: AxisLimits,
    pub y_limits: AxisLimits,
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub grid: Option<GridAxis>,
    pub legend: Option<Legend>,
    pub x_ticks: Option<CategoryTicks>,
    pub y_ticks: Option<CategoryTicks>,
    pub y_inverted: bool,
    pub hide_spines: bool,
    pub hide_y_ticks: bool,
}

impl Axes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_artist(&mut self, artist: Artist) {
        trace!(
            z_order = artist.z_order,
            label = artist.label.as_deref().unwrap_or(""),
            "artist added"
        );
        self.artists.push(artist);
    }

    #[must_use]
    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    /// Artists in paint order: ascending z-order, insertion order on ties.
    #[must_use]
    pub fn paint_order(&self) -> Vec<&Artist> {
        let mut ordered: Vec<&Artist> = self.artists.iter().collect();
        ordered.sort_by(|left, right| left.z_order.total_cmp(&right.z_order));
        ordered
    }

    pub fn set_xlim(&mut self, min: Option<f64>, max: Option<f64>) {
        self.x_limits = AxisLimits::new(min, max);
    }

    pub fn set_ylim(&mut self, min: Option<f64>, max: Option<f64>) {
        self.y_limits = AxisLimits::new(min, max);
    }

    /// Labelled artists as legend entries, in insertion order.
    #[must_use]
    pub fn legend_handles(&self) -> Vec<LegendEntry> {
        self.artists
            .iter()
            .filter_map(|artist| {
                let label = artist.label.clone()?;
                let swatch = artist.legend_swatch()?;
                Some(LegendEntry {
                    label,
                    color: artist.color,
                    swatch,
                })
            })
            .collect()
    }

    pub fn set_legend(&mut self, title: impl Into<String>, entries: Vec<LegendEntry>) {
        self.legend = Some(Legend {
            title: title.into(),
            entries,
        });
    }

    /// Union of artist extents, `None` when nothing autoscales.
    #[must_use]
    pub fn data_bounds(&self) -> Option<(DataRange, DataRange)> {
        self.artists
            .iter()
            .filter_map(Artist::data_bounds)
            .reduce(|(ax, ay), (bx, by)| (ax.union(bx), ay.union(by)))
    }

    /// Autoscaled x range with margins, before explicit limits apply.
    #[must_use]
    pub fn auto_x_range(&self) -> DataRange {
        self.data_bounds()
            .map_or(DataRange::NEUTRAL, |(x, _)| with_margin(x))
    }

    #[must_use]
    pub fn auto_y_range(&self) -> DataRange {
        self.data_bounds()
            .map_or(DataRange::NEUTRAL, |(_, y)| with_margin(y))
    }

    /// Visible x range: explicit limits over the autoscaled range.
    #[must_use]
    pub fn view_x_range(&self) -> DataRange {
        self.x_limits.resolve(self.auto_x_range())
    }

    #[must_use]
    pub fn view_y_range(&self) -> DataRange {
        self.y_limits.resolve(self.auto_y_range())
    }
}

fn with_margin(range: DataRange) -> DataRange {
    let span = range.span();
    if span == 0.0 {
        return DataRange {
            min: range.min - 0.5,
            max: range.max + 0.5,
        };
    }
    DataRange {
        min: range.min - span * AUTOSCALE_MARGIN,
        max: range.max + span * AUTOSCALE_MARGIN,
    }
}

#[cfg(test)]
mod tests {
    use super::Axes;
    use crate::core::DrawStyle;
    use crate::render::{Artist, ArtistKind, Color, LineStrokeStyle};

    fn line(points: Vec<(f64, f64)>, z_order: f64, label: &str) -> Artist {
        Artist::new(
            ArtistKind::Line {
                points,
                width: 1.0,
                stroke: LineStrokeStyle::Solid,
                draw_style: DrawStyle::Default,
            },
            Color::BLACK,
            z_order,
        )
        .with_label(Some(label.to_owned()))
    }

    #[test]
    fn paint_order_is_stable_by_z_order() {
        let mut axes = Axes::new();
        axes.add_artist(line(vec![(0.0, 0.0)], 2.0, "a"));
        axes.add_artist(line(vec![(0.0, 0.0)], 1.0, "b"));
        axes.add_artist(line(vec![(0.0, 0.0)], 2.0, "c"));
        let labels: Vec<&str> = axes
            .paint_order()
            .into_iter()
            .filter_map(|artist| artist.label.as_deref())
            .collect();
        assert_eq!(labels, vec!["b", "a", "c"]);
    }

    #[test]
    fn explicit_limits_override_autoscale() {
        let mut axes = Axes::new();
        axes.add_artist(line(vec![(0.0, 0.0), (10.0, 100.0)], 1.0, "a"));
        let auto = axes.view_y_range();
        assert!((auto.min + 5.0).abs() <= 1e-9);
        assert!((auto.max - 105.0).abs() <= 1e-9);

        axes.set_ylim(Some(0.0), None);
        let view = axes.view_y_range();
        assert_eq!(view.min, 0.0);
        assert!((view.max - 105.0).abs() <= 1e-9);
    }
}
