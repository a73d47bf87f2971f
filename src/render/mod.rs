mod artist;
mod axes;
mod figure;
mod frame;
mod layer_stack;
mod layered_frame;
mod null_renderer;
mod primitives;
mod scene;

pub use artist::{
    Artist, ArtistKind, BarGeometry, HeatmapCell, LegendSwatch, RefLineAxis, TextAnchor,
};
pub use axes::{Axes, AxisLimits, CategoryTicks, Legend, LegendEntry};
pub use figure::{Figure, Panel, PanelId, PanelRegion};
pub use frame::RenderFrame;
pub use layer_stack::{CanvasLayerKind, PanelLayerStack};
pub use layered_frame::{LayerPrimitives, LayeredRenderFrame, PanelLayerFrame, PlotArea};
pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, LineStrokeStyle, PolygonPrimitive, RectPrimitive,
    TextHAlign, TextPrimitive,
};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from chart composition logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;

    /// Draws a layered frame. Backends that paint batch by batch override
    /// this; the default flattens the frame first.
    fn render_layered(&mut self, frame: &LayeredRenderFrame) -> ChartResult<()> {
        self.render(&frame.flatten())
    }
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
