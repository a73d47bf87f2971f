use crate::chart::ChartDescriptor;
use crate::error::ChartResult;
use crate::render::{Figure, RenderFrame, Renderer};
use crate::style::StyleConfig;

/// A painted figure plus the descriptor it was produced from.
///
/// Figures assembled by hand carry no descriptor and cannot be composed.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub figure: Figure,
    pub descriptor: Option<ChartDescriptor>,
}

impl RenderedChart {
    #[must_use]
    pub fn new(figure: Figure, descriptor: ChartDescriptor) -> Self {
        Self {
            figure,
            descriptor: Some(descriptor),
        }
    }

    /// Wraps a figure that was not produced by a chart constructor.
    #[must_use]
    pub fn bare(figure: Figure) -> Self {
        Self {
            figure,
            descriptor: None,
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> Option<&ChartDescriptor> {
        self.descriptor.as_ref()
    }

    /// Style the figure is drawn with: the descriptor snapshot, or the
    /// default style for bare figures.
    #[must_use]
    pub fn style(&self) -> StyleConfig {
        self.descriptor
            .as_ref()
            .map(|descriptor| descriptor.style.clone())
            .unwrap_or_default()
    }

    pub fn to_frame(&self) -> ChartResult<RenderFrame> {
        self.figure.to_frame(&self.style())
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> ChartResult<()> {
        self.figure.render(renderer, &self.style())
    }
}
