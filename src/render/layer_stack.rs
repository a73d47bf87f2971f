use serde::{Deserialize, Serialize};

use crate::render::PanelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    Background,
    Grid,
    /// Artists of the left axes.
    Series,
    /// Artists of the right twin axes, drawn above the left ones.
    TwinSeries,
    Axis,
    Legend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelLayerStack {
    pub panel_id: PanelId,
    pub layers: Vec<CanvasLayerKind>,
}

impl PanelLayerStack {
    #[must_use]
    pub fn canonical_for_panel(panel_id: PanelId) -> Self {
        Self {
            panel_id,
            layers: vec![
                CanvasLayerKind::Background,
                CanvasLayerKind::Grid,
                CanvasLayerKind::Series,
                CanvasLayerKind::TwinSeries,
                CanvasLayerKind::Axis,
                CanvasLayerKind::Legend,
            ],
        }
    }
}
