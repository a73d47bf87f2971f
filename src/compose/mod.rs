//! Composition engine: scale arbitration, per-kind painting, legend merging
//! and descriptor replay.

mod cluster;
mod diagnostics;
mod legend;
mod overlay;
pub mod paint;
mod range;
mod replay;

pub use cluster::{ScaleGroup, assign_axes, cluster_by_compatibility, scale_compatible};
pub use diagnostics::{CompositionWarning, Diagnostics};
pub use legend::{LEGEND_TITLE, combine_legends};
pub use overlay::{paint_overlay, render_overlay};
pub use paint::{BarLayout, PaintContext};
pub use range::value_range;
pub use replay::{DEFAULT_MAX_COLS, render_descriptor, replay_into_panel};
