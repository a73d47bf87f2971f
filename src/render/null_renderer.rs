use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless composition.
///
/// It still validates frame content so tests can catch invalid geometry before
/// a real backend is involved.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_line_count: usize,
    pub last_rect_count: usize,
    pub last_circle_count: usize,
    pub last_polygon_count: usize,
    pub last_text_count: usize,
    pub frames_rendered: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.last_line_count = frame.lines.len();
        self.last_rect_count = frame.rects.len();
        self.last_circle_count = frame.circles.len();
        self.last_polygon_count = frame.polygons.len();
        self.last_text_count = frame.texts.len();
        self.frames_rendered += 1;
        Ok(())
    }
}
