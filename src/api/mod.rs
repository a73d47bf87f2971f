//! Public entry points: per-kind chart constructors, overlay composition and
//! grid layout.

mod charts;
mod grid_layout;
mod overlay;

pub use charts::{
    ChartOutput, bar_chart, box_plot, heatmap_chart, histogram_chart, line_chart,
    parallel_coords, scatter_chart,
};
pub use grid_layout::{GridEntry, GridOptions, GridOutput, LayoutSpec, figure_grid_layout};
pub use overlay::{OverlayEntry, overlay_chart};
