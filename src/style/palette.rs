use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Named color scales (ColorBrewer stops).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Blue,
    Green,
    Orange,
    Purple,
    Grey,
    YlGnBu,
    YlGn,
    BuGn,
    GnBu,
    PuBu,
    RdBu,
    RdYlBu,
    BrBg,
    PrGn,
    PuOr,
    RdGy,
    RdYlGn,
    Spectral,
    #[serde(rename = "mixed_light")]
    MixedLight,
    #[serde(rename = "mixed_dark")]
    MixedDark,
}

impl Palette {
    pub const ALL: [Self; 20] = [
        Self::Blue,
        Self::Green,
        Self::Orange,
        Self::Purple,
        Self::Grey,
        Self::YlGnBu,
        Self::YlGn,
        Self::BuGn,
        Self::GnBu,
        Self::PuBu,
        Self::RdBu,
        Self::RdYlBu,
        Self::BrBg,
        Self::PrGn,
        Self::PuOr,
        Self::RdGy,
        Self::RdYlGn,
        Self::Spectral,
        Self::MixedLight,
        Self::MixedDark,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Orange => "orange",
            Self::Purple => "purple",
            Self::Grey => "grey",
            Self::YlGnBu => "ylgnbu",
            Self::YlGn => "ylgn",
            Self::BuGn => "bugn",
            Self::GnBu => "gnbu",
            Self::PuBu => "pubu",
            Self::RdBu => "rdbu",
            Self::RdYlBu => "rdylbu",
            Self::BrBg => "brbg",
            Self::PrGn => "prgn",
            Self::PuOr => "puor",
            Self::RdGy => "rdgy",
            Self::RdYlGn => "rdylgn",
            Self::Spectral => "spectral",
            Self::MixedLight => "mixed_light",
            Self::MixedDark => "mixed_dark",
        }
    }

    #[must_use]
    pub fn hex_stops(self) -> &'static [&'static str] {
        match self {
            Self::Blue => &["#eff3ff", "#bdd7e7", "#6baed6", "#3182bd", "#08519c"],
            Self::Green => &["#edf8e9", "#bae4b3", "#74c476", "#31a354", "#006d2c"],
            Self::Orange => &["#feedde", "#fdbe85", "#fd8d3c", "#e6550d", "#a63603"],
            Self::Purple => &["#f2f0f7", "#cbc9e2", "#9e9ac8", "#756bb1", "#54278f"],
            Self::Grey => &["#f7f7f7", "#cccccc", "#969696", "#636363", "#252525"],
            Self::YlGnBu => &["#ffffcc", "#a1dab4", "#41b6c4", "#2c7fb8", "#253494"],
            Self::YlGn => &["#ffffcc", "#c2e699", "#78c679", "#31a354", "#006837"],
            Self::BuGn => &["#edf8fb", "#b2e2e2", "#66c2a4", "#2ca25f", "#006d2c"],
            Self::GnBu => &["#f0f9e8", "#bae4bc", "#7bccc4", "#43a2ca", "#0868ac"],
            Self::PuBu => &["#f1eef6", "#bdc9e1", "#74a9cf", "#2b8cbe", "#045a8d"],
            Self::RdBu => &["#ca0020", "#f4a582", "#f7f7f7", "#92c5de", "#0571b0"],
            Self::RdYlBu => &["#d7191c", "#fdae61", "#ffffbf", "#abd9e9", "#2c7bb6"],
            Self::BrBg => &["#a6611a", "#dfc27d", "#f5f5f5", "#80cdc1", "#018571"],
            Self::PrGn => &["#7b3294", "#c2a5cf", "#f7f7f7", "#a6dba0", "#008837"],
            Self::PuOr => &["#e66101", "#fdb863", "#f7f7f7", "#b2abd2", "#5e3c99"],
            Self::RdGy => &["#ca0020", "#f4a582", "#ffffff", "#bababa", "#404040"],
            Self::RdYlGn => &["#d7191c", "#fdae61", "#ffffbf", "#a6d96a", "#1a9641"],
            Self::Spectral => &["#d7191c", "#fdae61", "#ffffbf", "#abdda4", "#2b83ba"],
            Self::MixedLight => &[
                "#a6cee3", "#1f78b4", "#b2df8a", "#33a02c", "#fb9a99", "#e31a1c", "#fdbf6f",
                "#ff7f00", "#cab2d6", "#6a3d9a",
            ],
            Self::MixedDark => &[
                "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00", "#ffff33", "#a65628",
                "#f781bf", "#999999",
            ],
        }
    }

    #[must_use]
    pub fn stops(self) -> Vec<Color> {
        self.hex_stops()
            .iter()
            .filter_map(|hex| Color::from_hex(hex).ok())
            .collect()
    }

    /// Continuous colormap lookup, `t` clamped to `[0, 1]`.
    #[must_use]
    pub fn sample(self, t: f64) -> Color {
        let stops = self.stops();
        match stops.len() {
            0 => Color::BLACK,
            1 => stops[0],
            len => {
                let position = t.clamp(0.0, 1.0) * (len - 1) as f64;
                let lower = (position.floor() as usize).min(len - 2);
                stops[lower].lerp(stops[lower + 1], position - lower as f64)
            }
        }
    }

    /// `count` evenly spaced colors; a single color is the darkest stop.
    #[must_use]
    pub fn discrete(self, count: usize) -> Vec<Color> {
        match count {
            0 => Vec::new(),
            1 => self.stops().last().copied().into_iter().collect(),
            _ => (0..count)
                .map(|i| self.sample(i as f64 / (count - 1) as f64))
                .collect(),
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Palette {
    type Err = ChartError;

    fn from_str(name: &str) -> ChartResult<Self> {
        let lowered = name.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|palette| palette.name() == lowered)
            .ok_or_else(|| ChartError::InvalidData(format!("unknown palette `{name}`")))
    }
}

/// Endless color source handing out one color per series.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorCycle {
    colors: Vec<Color>,
    cursor: usize,
}

impl ColorCycle {
    #[must_use]
    pub fn new(palette: Palette, count: usize) -> Self {
        Self::from_colors(palette.discrete(count.max(1)))
    }

    #[must_use]
    pub fn from_colors(colors: Vec<Color>) -> Self {
        Self { colors, cursor: 0 }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn next_color(&mut self) -> Color {
        if self.colors.is_empty() {
            return Color::BLACK;
        }
        let color = self.colors[self.cursor % self.colors.len()];
        self.cursor += 1;
        color
    }
}

#[cfg(test)]
mod tests {
    use super::{ColorCycle, Palette};

    #[test]
    fn single_discrete_color_is_last_stop() {
        let colors = Palette::Blue.discrete(1);
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].to_hex(), "#08519C");
    }

    #[test]
    fn discrete_colors_span_the_scale() {
        let colors = Palette::Spectral.discrete(5);
        let hexes: Vec<String> = colors.iter().map(|color| color.to_hex()).collect();
        assert_eq!(
            hexes,
            vec!["#D7191C", "#FDAE61", "#FFFFBF", "#ABDDA4", "#2B83BA"]
        );
    }

    #[test]
    fn cycle_wraps_around() {
        let mut cycle = ColorCycle::new(Palette::Grey, 2);
        let first = cycle.next_color();
        let _second = cycle.next_color();
        assert_eq!(cycle.next_color(), first);
    }

    #[test]
    fn palette_names_parse_case_insensitively() {
        assert_eq!("Spectral".parse::<Palette>().expect("palette"), Palette::Spectral);
        assert_eq!("mixed_dark".parse::<Palette>().expect("palette"), Palette::MixedDark);
        assert!("neon".parse::<Palette>().is_err());
    }
}
