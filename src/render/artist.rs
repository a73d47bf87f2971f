use serde::{Deserialize, Serialize};

use crate::core::{BoxStats, DataRange, DrawStyle, Orientation};
use crate::render::{Color, LineStrokeStyle, TextHAlign};
use crate::style::Palette;

/// One bar in data coordinates.
///
/// `position` is the bar centre on the category axis; the bar spans
/// `base..base + value` on the value axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    pub position: f64,
    pub base: f64,
    pub value: f64,
    pub thickness: f64,
    pub error: Option<f64>,
}

impl BarGeometry {
    #[must_use]
    pub fn top(self) -> f64 {
        self.base + self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub row: usize,
    pub col: usize,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAnchor {
    /// Coordinates are data values of the owning axes.
    Data,
    /// Coordinates are fractions of the plot area, origin bottom-left.
    AxesFraction,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefLineAxis {
    Vertical { x: f64 },
    Horizontal { y: f64 },
}

/// Drawable content recorded on an axes in data coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtistKind {
    Line {
        points: Vec<(f64, f64)>,
        width: f64,
        stroke: LineStrokeStyle,
        draw_style: DrawStyle,
    },
    /// Filled region between two polylines sharing their x values.
    Area {
        upper: Vec<(f64, f64)>,
        lower: Vec<(f64, f64)>,
    },
    Bars {
        bars: Vec<BarGeometry>,
        orientation: Orientation,
        edge_width: f64,
        edge_color: Color,
        error_color: Color,
    },
    /// Scatter markers; sizes are marker areas in points squared.
    Markers {
        points: Vec<(f64, f64)>,
        sizes: Vec<f64>,
    },
    Heatmap {
        cells: Vec<HeatmapCell>,
        rows: usize,
        cols: usize,
    },
    Box {
        position: f64,
        stats: BoxStats,
        width: f64,
        orientation: Orientation,
        show_outliers: bool,
        notch: Option<f64>,
        edge_color: Color,
        median_color: Color,
    },
    RefLine {
        axis: RefLineAxis,
        start: Option<f64>,
        end: Option<f64>,
        width: f64,
        stroke: LineStrokeStyle,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        h_align: TextHAlign,
        anchor: TextAnchor,
    },
    Colorbar {
        palette: Palette,
        vmin: f64,
        vmax: f64,
    },
}

/// Legend swatch shape for one labelled artist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendSwatch {
    Line,
    Patch,
    Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub kind: ArtistKind,
    pub color: Color,
    pub z_order: f64,
    pub label: Option<String>,
}

impl Artist {
    #[must_use]
    pub fn new(kind: ArtistKind, color: Color, z_order: f64) -> Self {
        Self {
            kind,
            color,
            z_order,
            label: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label.filter(|label| !label.is_empty());
        self
    }

    /// Swatch used when the artist contributes a legend entry.
    #[must_use]
    pub fn legend_swatch(&self) -> Option<LegendSwatch> {
        match self.kind {
            ArtistKind::Line { .. } | ArtistKind::RefLine { .. } => Some(LegendSwatch::Line),
            ArtistKind::Area { .. } | ArtistKind::Bars { .. } | ArtistKind::Box { .. } => {
                Some(LegendSwatch::Patch)
            }
            ArtistKind::Markers { .. } => Some(LegendSwatch::Marker),
            ArtistKind::Heatmap { .. } | ArtistKind::Text { .. } | ArtistKind::Colorbar { .. } => {
                None
            }
        }
    }

    /// Data extent as `(x, y)` ranges; `None` for artists that do not
    /// participate in autoscaling.
    #[must_use]
    pub fn data_bounds(&self) -> Option<(DataRange, DataRange)> {
        match &self.kind {
            ArtistKind::Line { points, .. } | ArtistKind::Markers { points, .. } => {
                points_bounds(points.iter().copied())
            }
            ArtistKind::Area { upper, lower } => {
                points_bounds(upper.iter().chain(lower.iter()).copied())
            }
            ArtistKind::Bars {
                bars, orientation, ..
            } => {
                let mut category: Option<DataRange> = None;
                let mut value: Option<DataRange> = None;
                for bar in bars {
                    let half = bar.thickness / 2.0;
                    let span = DataRange::new(bar.position - half, bar.position + half);
                    category = Some(category.map_or(span, |range| range.union(span)));

                    let error = bar.error.unwrap_or(0.0).abs();
                    let extent = DataRange::new(bar.base, bar.top())
                        .include(bar.top() + error)
                        .include(bar.top() - error);
                    value = Some(value.map_or(extent, |range| range.union(extent)));
                }
                let (category, value) = (category?, value?);
                Some(match orientation {
                    Orientation::Vertical => (category, value),
                    Orientation::Horizontal => (value, category),
                })
            }
            ArtistKind::Heatmap { rows, cols, .. } => Some((
                DataRange::new(-0.5, *cols as f64 - 0.5),
                DataRange::new(-0.5, *rows as f64 - 0.5),
            )),
            ArtistKind::Box {
                position,
                stats,
                width,
                orientation,
                show_outliers,
                ..
            } => {
                let half = width / 2.0;
                let category = DataRange::new(position - half, position + half);
                let mut value = DataRange::new(stats.whisker_low, stats.whisker_high);
                if *show_outliers {
                    for outlier in &stats.outliers {
                        value = value.include(*outlier);
                    }
                }
                Some(match orientation {
                    Orientation::Vertical => (category, value),
                    Orientation::Horizontal => (value, category),
                })
            }
            ArtistKind::RefLine { .. } | ArtistKind::Text { .. } | ArtistKind::Colorbar { .. } => {
                None
            }
        }
    }

    /// Bars of this artist, if it is a bar artist.
    #[must_use]
    pub fn bars(&self) -> Option<&[BarGeometry]> {
        match &self.kind {
            ArtistKind::Bars { bars, .. } => Some(bars),
            _ => None,
        }
    }
}

fn points_bounds<I>(points: I) -> Option<(DataRange, DataRange)>
where
    I: Iterator<Item = (f64, f64)> + Clone,
{
    let x = DataRange::from_values(points.clone().map(|(x, _)| x))?;
    let y = DataRange::from_values(points.map(|(_, y)| y))?;
    Some((x, y))
}

#[cfg(test)]
mod tests {
    use super::{Artist, ArtistKind, BarGeometry};
    use crate::core::Orientation;
    use crate::render::Color;

    #[test]
    fn horizontal_bars_swap_bounds() {
        let artist = Artist::new(
            ArtistKind::Bars {
                bars: vec![BarGeometry {
                    position: 0.0,
                    base: 0.0,
                    value: 5.0,
                    thickness: 0.8,
                    error: Some(1.0),
                }],
                orientation: Orientation::Horizontal,
                edge_width: 0.0,
                edge_color: Color::BLACK,
                error_color: Color::BLACK,
            },
            Color::BLACK,
            1.0,
        );
        let (x, y) = artist.data_bounds().expect("bounds");
        assert_eq!((x.min, x.max), (0.0, 6.0));
        assert!((y.min + 0.4).abs() <= 1e-12);
        assert!((y.max - 0.4).abs() <= 1e-12);
    }

    #[test]
    fn empty_label_is_dropped() {
        let artist = Artist::new(
            ArtistKind::Markers {
                points: vec![(1.0, 1.0)],
                sizes: vec![10.0],
            },
            Color::BLACK,
            2.0,
        )
        .with_label(Some(String::new()));
        assert!(artist.label.is_none());
    }
}
