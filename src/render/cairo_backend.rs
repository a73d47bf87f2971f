use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use std::f64::consts::TAU;
use std::io::Write;

use crate::chart::RenderedChart;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, LayerPrimitives, LayeredRenderFrame, LineStrokeStyle, RenderFrame, Renderer,
    TextHAlign,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub polygons_drawn: usize,
    pub rects_drawn: usize,
    pub circles_drawn: usize,
    pub lines_drawn: usize,
    pub texts_drawn: usize,
}

/// Optional extension trait for renderers that can draw into an external Cairo
/// context (for example a GTK `DrawingArea` callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()>;
}

/// Cairo + Pango + PangoCairo renderer backend.
///
/// Layered frames are painted batch by batch without clearing in between, so
/// z-order across primitive types is preserved.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::WHITE,
            last_stats: CairoRenderStats::default(),
        })
    }

    /// Renderer whose surface matches the pixel size of `chart`'s figure.
    pub fn for_chart(chart: &RenderedChart) -> ChartResult<Self> {
        let style = chart.style();
        let viewport = chart.figure.size.to_viewport(style.dpi)?;
        let too_large = |_| ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        };
        let width = i32::try_from(viewport.width).map_err(too_large)?;
        let height = i32::try_from(viewport.height).map_err(too_large)?;
        let mut renderer = Self::new(width, height)?;
        renderer.set_clear_color(style.background_color)?;
        Ok(renderer)
    }

    /// Encodes the current surface as PNG.
    pub fn write_png<W: Write>(&self, writer: &mut W) -> ChartResult<()> {
        self.surface
            .write_to_png(writer)
            .map_err(|err| ChartError::InvalidData(format!("failed to encode png: {err}")))
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn clear(&self, context: &Context) -> ChartResult<()> {
        self.clear_color.validate()?;
        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.clear(context)?;
        let mut stats = CairoRenderStats::default();
        draw_frame(context, frame, &mut stats)?;
        self.last_stats = stats;
        Ok(())
    }

    fn render_layered_with_context(
        &mut self,
        context: &Context,
        layered: &LayeredRenderFrame,
    ) -> ChartResult<()> {
        layered.flatten().validate()?;
        self.clear(context)?;
        let mut stats = CairoRenderStats::default();
        for batch in layered.batches() {
            draw_batch(context, layered, batch, &mut stats)?;
        }
        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }

    fn render_layered(&mut self, frame: &LayeredRenderFrame) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_layered_with_context(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()> {
        self.render_with_context(context, frame)
    }
}

fn draw_batch(
    context: &Context,
    layered: &LayeredRenderFrame,
    batch: &LayerPrimitives,
    stats: &mut CairoRenderStats,
) -> ChartResult<()> {
    if batch.is_empty() {
        return Ok(());
    }
    draw_frame(context, &batch.to_frame(layered.viewport), stats)
}

fn draw_frame(
    context: &Context,
    frame: &RenderFrame,
    stats: &mut CairoRenderStats,
) -> ChartResult<()> {
    for polygon in &frame.polygons {
        let Some((first, rest)) = polygon.points.split_first() else {
            continue;
        };
        context.move_to(first.0, first.1);
        for (x, y) in rest {
            context.line_to(*x, *y);
        }
        context.close_path();
        apply_color(context, polygon.fill_color);
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill polygon", err))?;
        stats.polygons_drawn += 1;
    }

    for rect in &frame.rects {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        apply_color(context, rect.fill_color);
        if rect.border_width > 0.0 {
            context
                .fill_preserve()
                .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            apply_color(context, rect.border_color);
            context.set_line_width(rect.border_width);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke rectangle border", err))?;
        } else {
            context
                .fill()
                .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
        }
        stats.rects_drawn += 1;
    }

    for circle in &frame.circles {
        context.new_sub_path();
        context.arc(circle.cx, circle.cy, circle.radius, 0.0, TAU);
        apply_color(context, circle.fill_color);
        context
            .fill()
            .map_err(|err| map_backend_error("failed to fill marker", err))?;
        stats.circles_drawn += 1;
    }

    for line in &frame.lines {
        apply_color(context, line.color);
        context.set_line_width(line.stroke_width);
        apply_dash(context, line.stroke_style, line.stroke_width);
        context.move_to(line.x1, line.y1);
        context.line_to(line.x2, line.y2);
        context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke line", err))?;
        stats.lines_drawn += 1;
    }
    context.set_dash(&[], 0.0);

    for text in &frame.texts {
        let layout = pangocairo::functions::create_layout(context);
        let font_description =
            FontDescription::from_string(&format!("Sans {}px", text.font_size_px));
        layout.set_font_description(Some(&font_description));
        layout.set_text(&text.text);

        let (text_width, text_height) = layout.pixel_size();
        let x = match text.h_align {
            TextHAlign::Left => text.x,
            TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
            TextHAlign::Right => text.x - f64::from(text_width),
        };

        apply_color(context, text.color);
        context.move_to(x, text.y - f64::from(text_height) / 2.0);
        pangocairo::functions::show_layout(context, &layout);
        stats.texts_drawn += 1;
    }
    Ok(())
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn apply_dash(context: &Context, style: LineStrokeStyle, width: f64) {
    match style {
        LineStrokeStyle::Solid => context.set_dash(&[], 0.0),
        LineStrokeStyle::Dashed => context.set_dash(&[width * 4.0, width * 2.0], 0.0),
        LineStrokeStyle::Dotted => context.set_dash(&[width, width * 2.0], 0.0),
    }
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::InvalidData(format!("{prefix}: {err}"))
}
