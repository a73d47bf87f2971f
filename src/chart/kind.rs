use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Chart type recorded in every descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
    Histogram,
    Heatmap,
    Box,
    ParallelCoords,
    Overlay,
}

impl ChartKind {
    pub const ALL: [Self; 8] = [
        Self::Line,
        Self::Bar,
        Self::Scatter,
        Self::Histogram,
        Self::Heatmap,
        Self::Box,
        Self::ParallelCoords,
        Self::Overlay,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Scatter => "scatter",
            Self::Histogram => "histogram",
            Self::Heatmap => "heatmap",
            Self::Box => "box",
            Self::ParallelCoords => "parallel_coords",
            Self::Overlay => "overlay",
        }
    }

    /// Kinds that can be painted onto a shared overlay axes.
    #[must_use]
    pub fn is_overlayable(self) -> bool {
        matches!(
            self,
            Self::Line | Self::Bar | Self::Scatter | Self::Histogram
        )
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(name: &str) -> ChartResult<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        let kind = match normalized.as_str() {
            "line" | "linechart" => Self::Line,
            "bar" | "barchart" => Self::Bar,
            "scatter" | "scatterchart" => Self::Scatter,
            "histogram" | "hist" => Self::Histogram,
            "heatmap" => Self::Heatmap,
            "box" | "boxplot" | "box_plot" => Self::Box,
            "parallel_coords" | "parallel_coordinates" | "parallel" => Self::ParallelCoords,
            "overlay" => Self::Overlay,
            _ => return Err(ChartError::UnknownChartType(name.to_owned())),
        };
        Ok(kind)
    }
}
