use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Pixel size of one render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Figure size in inches, converted to pixels with the style dpi.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FigureSize {
    pub width: f64,
    pub height: f64,
}

impl FigureSize {
    pub const DEFAULT: Self = Self::new(6.4, 4.8);
    pub const A4: Self = Self::new(8.2, 11.6);
    pub const A4_NARROW: Self = Self::new(8.2, 2.4);
    pub const A4_REGULAR: Self = Self::new(8.2, 4.8);
    pub const A4_WIDE: Self = Self::new(8.2, 7.2);
    pub const SQUARE: Self = Self::new(6.4, 6.4);
    pub const SQUARE_SMALL: Self = Self::new(4.8, 4.8);
    pub const SQUARE_LARGE: Self = Self::new(8.2, 8.2);

    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(ChartError::InvalidData(
                "figure size must be finite".to_owned(),
            ));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ChartError::InvalidData(
                "figure size must be > 0".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Converts inches to a pixel viewport, never collapsing below 1x1.
    pub fn to_viewport(self, dpi: f64) -> ChartResult<Viewport> {
        let size = self.validate()?;
        if !dpi.is_finite() || dpi <= 0.0 {
            return Err(ChartError::InvalidData("dpi must be finite and > 0".to_owned()));
        }
        let width = (size.width * dpi).round().max(1.0) as u32;
        let height = (size.height * dpi).round().max(1.0) as u32;
        Ok(Viewport::new(width, height))
    }
}

impl Default for FigureSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Closed numeric interval a chart occupies on its value axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataRange {
    pub min: f64,
    pub max: f64,
}

impl DataRange {
    /// Range used when a chart carries no usable values.
    pub const NEUTRAL: Self = Self { min: 0.0, max: 1.0 };

    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Min/max over the finite values, or `None` when there are none.
    #[must_use]
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut bounds: Option<(f64, f64)> = None;
        for value in values.into_iter().filter(|value| value.is_finite()) {
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(value), max.max(value)),
                None => (value, value),
            });
        }
        bounds.map(|(min, max)| Self { min, max })
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    pub fn include(self, value: f64) -> Self {
        if !value.is_finite() {
            return self;
        }
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }
}

impl Default for DataRange {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Which grid lines an axes draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridAxis {
    X,
    Y,
    Both,
}

impl GridAxis {
    #[must_use]
    pub fn shows_x(self) -> bool {
        matches!(self, Self::X | Self::Both)
    }

    #[must_use]
    pub fn shows_y(self) -> bool {
        matches!(self, Self::Y | Self::Both)
    }
}

/// How several bar series share one category slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    /// Side by side, splitting the bar width evenly.
    #[default]
    Group,
    /// On top of each other, each starting at the running total.
    Stack,
    /// Superimposed at the same position with reduced opacity.
    Overlay,
}

/// Line interpolation between consecutive points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DrawStyle {
    #[default]
    Default,
    StepsPre,
    StepsMid,
    StepsPost,
}

impl DrawStyle {
    /// Step placement used when filling under the curve.
    #[must_use]
    pub fn step(self) -> Option<StepPosition> {
        match self {
            Self::Default => None,
            Self::StepsPre => Some(StepPosition::Pre),
            Self::StepsMid => Some(StepPosition::Mid),
            Self::StepsPost => Some(StepPosition::Post),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    Pre,
    Mid,
    Post,
}

impl StepPosition {
    /// Expands a polyline into its step-wise vertices.
    #[must_use]
    pub fn expand(self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        if points.len() < 2 {
            return points.to_vec();
        }
        let mut stepped = Vec::with_capacity(points.len() * 2);
        stepped.push(points[0]);
        for pair in points.windows(2) {
            let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
            match self {
                Self::Pre => stepped.push((x0, y1)),
                Self::Post => stepped.push((x1, y0)),
                Self::Mid => {
                    let mid = (x0 + x1) / 2.0;
                    stepped.push((mid, y0));
                    stepped.push((mid, y1));
                }
            }
            stepped.push((x1, y1));
        }
        stepped
    }
}
