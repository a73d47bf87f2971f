use crate::core::Viewport;

use super::{
    CanvasLayerKind, CirclePrimitive, LinePrimitive, PanelId, PanelLayerStack, PolygonPrimitive,
    RectPrimitive, RenderFrame, TextPrimitive,
};

/// Primitives of one draw batch.
///
/// A layer kind may hold several consecutive batches; each batch is painted
/// completely before the next, which is how z-order survives across
/// primitive types.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPrimitives {
    pub kind: CanvasLayerKind,
    pub polygons: Vec<PolygonPrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl LayerPrimitives {
    #[must_use]
    pub fn empty(kind: CanvasLayerKind) -> Self {
        Self {
            kind,
            polygons: Vec::new(),
            rects: Vec::new(),
            circles: Vec::new(),
            lines: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
            && self.rects.is_empty()
            && self.circles.is_empty()
            && self.lines.is_empty()
            && self.texts.is_empty()
    }

    fn append_to(&self, frame: &mut RenderFrame) {
        frame.polygons.extend(self.polygons.iter().cloned());
        frame.rects.extend(self.rects.iter().copied());
        frame.circles.extend(self.circles.iter().copied());
        frame.lines.extend(self.lines.iter().copied());
        frame.texts.extend(self.texts.iter().cloned());
    }

    /// This batch alone as a frame.
    #[must_use]
    pub fn to_frame(&self, viewport: Viewport) -> RenderFrame {
        let mut frame = RenderFrame::new(viewport);
        self.append_to(&mut frame);
        frame
    }
}

/// Pixel rectangle of a panel's plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayerFrame {
    pub panel_id: PanelId,
    pub plot_area: PlotArea,
    pub layers: Vec<LayerPrimitives>,
}

/// Figure frame split into figure-level primitives and per-panel layers.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredRenderFrame {
    pub viewport: Viewport,
    pub background: LayerPrimitives,
    pub panels: Vec<PanelLayerFrame>,
    pub annotations: LayerPrimitives,
}

impl LayeredRenderFrame {
    #[must_use]
    pub fn from_stacks(viewport: Viewport, stacks: Vec<PanelLayerStack>) -> Self {
        let full = PlotArea {
            left: 0.0,
            top: 0.0,
            right: f64::from(viewport.width),
            bottom: f64::from(viewport.height),
        };
        let panels = stacks
            .into_iter()
            .map(|stack| PanelLayerFrame {
                panel_id: stack.panel_id,
                plot_area: full,
                layers: stack
                    .layers
                    .into_iter()
                    .map(LayerPrimitives::empty)
                    .collect(),
            })
            .collect();
        Self {
            viewport,
            background: LayerPrimitives::empty(CanvasLayerKind::Background),
            panels,
            annotations: LayerPrimitives::empty(CanvasLayerKind::Axis),
        }
    }

    pub fn set_plot_area(&mut self, panel_id: PanelId, plot_area: PlotArea) {
        if let Some(panel) = self.panels.iter_mut().find(|panel| panel.panel_id == panel_id) {
            panel.plot_area = plot_area;
        }
    }

    /// Starts a new batch of `kind` right after the existing batches of that kind.
    pub fn open_batch(&mut self, panel_id: PanelId, kind: CanvasLayerKind) {
        let Some(panel) = self.panels.iter_mut().find(|panel| panel.panel_id == panel_id) else {
            return;
        };
        let Some(last) = panel.layers.iter().rposition(|layer| layer.kind == kind) else {
            return;
        };
        if panel.layers[last].is_empty() {
            return;
        }
        panel.layers.insert(last + 1, LayerPrimitives::empty(kind));
    }

    pub fn push_polygon(&mut self, panel_id: PanelId, kind: CanvasLayerKind, polygon: PolygonPrimitive) {
        if let Some(layer) = self.layer_mut(panel_id, kind) {
            layer.polygons.push(polygon);
        }
    }

    pub fn push_rect(&mut self, panel_id: PanelId, kind: CanvasLayerKind, rect: RectPrimitive) {
        if let Some(layer) = self.layer_mut(panel_id, kind) {
            layer.rects.push(rect);
        }
    }

    pub fn push_circle(&mut self, panel_id: PanelId, kind: CanvasLayerKind, circle: CirclePrimitive) {
        if let Some(layer) = self.layer_mut(panel_id, kind) {
            layer.circles.push(circle);
        }
    }

    pub fn push_line(&mut self, panel_id: PanelId, kind: CanvasLayerKind, line: LinePrimitive) {
        if let Some(layer) = self.layer_mut(panel_id, kind) {
            layer.lines.push(line);
        }
    }

    pub fn push_text(&mut self, panel_id: PanelId, kind: CanvasLayerKind, text: TextPrimitive) {
        if let Some(layer) = self.layer_mut(panel_id, kind) {
            layer.texts.push(text);
        }
    }

    /// Batches in paint order: background, each panel, figure annotations.
    #[must_use]
    pub fn batches(&self) -> Vec<&LayerPrimitives> {
        let mut batches = vec![&self.background];
        for panel in &self.panels {
            batches.extend(panel.layers.iter());
        }
        batches.push(&self.annotations);
        batches
    }

    #[must_use]
    pub fn flatten(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport);
        for batch in self.batches() {
            batch.append_to(&mut frame);
        }
        frame
    }

    #[must_use]
    pub fn flatten_panel(&self, panel_id: PanelId) -> Option<RenderFrame> {
        let panel = self.panels.iter().find(|panel| panel.panel_id == panel_id)?;
        let mut frame = RenderFrame::new(self.viewport);
        for layer in &panel.layers {
            layer.append_to(&mut frame);
        }
        Some(frame)
    }

    #[must_use]
    pub fn flatten_panel_layers(
        &self,
        panel_id: PanelId,
        include_layers: &[CanvasLayerKind],
    ) -> Option<RenderFrame> {
        let panel = self.panels.iter().find(|panel| panel.panel_id == panel_id)?;
        let mut frame = RenderFrame::new(self.viewport);
        for layer in panel
            .layers
            .iter()
            .filter(|layer| include_layers.contains(&layer.kind))
        {
            layer.append_to(&mut frame);
        }
        Some(frame)
    }

    fn layer_mut(&mut self, panel_id: PanelId, kind: CanvasLayerKind) -> Option<&mut LayerPrimitives> {
        let panel = self.panels.iter_mut().find(|panel| panel.panel_id == panel_id)?;
        panel.layers.iter_mut().rev().find(|layer| layer.kind == kind)
    }
}
