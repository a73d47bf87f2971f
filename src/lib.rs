//! chart-compose: chart composition engine.
//!
//! Charts are built per kind into a [`RenderedChart`], a figure of panels
//! plus the descriptor that produced it. Rendered charts can then be
//! overlaid onto one panel with automatic dual-axis arbitration, or replayed
//! into the cells of a grid figure. Figures project into backend-agnostic
//! render frames; drawing happens behind the [`render::Renderer`] trait.

pub mod api;
pub mod chart;
pub mod compose;
pub mod core;
pub mod error;
pub mod render;
pub mod style;
pub mod telemetry;

pub use api::{
    ChartOutput, GridEntry, GridOptions, GridOutput, LayoutSpec, OverlayEntry, bar_chart,
    box_plot, figure_grid_layout, heatmap_chart, histogram_chart, line_chart, overlay_chart,
    parallel_coords, scatter_chart,
};
pub use chart::{ChartDescriptor, ChartKind, ChartSettings, OverlayOptions, RenderedChart};
pub use compose::{CompositionWarning, Diagnostics};
pub use error::{ChartError, ChartResult};
pub use style::StyleConfig;
