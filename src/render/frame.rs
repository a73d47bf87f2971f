use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{CirclePrimitive, LinePrimitive, PolygonPrimitive, RectPrimitive, TextPrimitive};

/// Backend-agnostic scene for one figure draw pass.
///
/// Primitive lists are already in paint order: backends draw polygons, rects,
/// circles and lines in the order they appear, then texts on top.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub polygons: Vec<PolygonPrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            polygons: Vec::new(),
            rects: Vec::new(),
            circles: Vec::new(),
            lines: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for polygon in &self.polygons {
            polygon.validate()?;
        }
        for rect in &self.rects {
            rect.validate()?;
        }
        for circle in &self.circles {
            circle.validate()?;
        }
        for line in &self.lines {
            line.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
            && self.rects.is_empty()
            && self.circles.is_empty()
            && self.lines.is_empty()
            && self.texts.is_empty()
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.polygons.len() + self.rects.len() + self.circles.len() + self.lines.len() + self.texts.len()
    }
}
