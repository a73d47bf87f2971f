use serde::{Deserialize, Serialize};

use crate::core::FigureSize;
use crate::error::{ChartError, ChartResult};
use crate::render::{Axes, LayeredRenderFrame, RenderFrame, Renderer, scene};
use crate::style::StyleConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PanelId(pub usize);

impl PanelId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }
}

/// Cells a panel covers in the figure grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelRegion {
    pub row: usize,
    pub col: usize,
    pub rowspan: usize,
    pub colspan: usize,
}

impl PanelRegion {
    #[must_use]
    pub const fn cell(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            rowspan: 1,
            colspan: 1,
        }
    }

    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        self.row < other.row + other.rowspan
            && other.row < self.row + self.rowspan
            && self.col < other.col + other.colspan
            && other.col < self.col + self.colspan
    }
}

/// One plotting area: a left axes and an optional right twin sharing x.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub region: PanelRegion,
    pub left: Axes,
    pub right: Option<Axes>,
}

impl Panel {
    #[must_use]
    pub fn new(region: PanelRegion) -> Self {
        Self {
            region,
            left: Axes::new(),
            right: None,
        }
    }

    /// Right axes, created on first access.
    pub fn twin_right(&mut self) -> &mut Axes {
        self.right.get_or_insert_with(Axes::new)
    }

    #[must_use]
    pub fn has_right(&self) -> bool {
        self.right.is_some()
    }

    /// Number of artists over both axes.
    #[must_use]
    pub fn artist_count(&self) -> usize {
        self.left.artists().len() + self.right.as_ref().map_or(0, |axes| axes.artists().len())
    }
}

/// Canvas holding a grid of panels plus figure-level labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub size: FigureSize,
    nrows: usize,
    ncols: usize,
    panels: Vec<Panel>,
    pub title: Option<String>,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub sharex: bool,
    pub sharey: bool,
}

impl Figure {
    /// Figure with one panel covering the whole canvas.
    #[must_use]
    pub fn single(size: FigureSize) -> Self {
        Self {
            size,
            nrows: 1,
            ncols: 1,
            panels: vec![Panel::new(PanelRegion::cell(0, 0))],
            title: None,
            xlabel: None,
            ylabel: None,
            sharex: false,
            sharey: false,
        }
    }

    /// Empty figure with an `nrows` x `ncols` cell grid.
    pub fn grid(size: FigureSize, nrows: usize, ncols: usize) -> ChartResult<Self> {
        if nrows == 0 || ncols == 0 {
            return Err(ChartError::InvalidLayout(format!(
                "figure grid must be at least 1x1, got {nrows}x{ncols}"
            )));
        }
        Ok(Self {
            size,
            nrows,
            ncols,
            panels: Vec::new(),
            title: None,
            xlabel: None,
            ylabel: None,
            sharex: false,
            sharey: false,
        })
    }

    /// Adds a panel spanning `region`, which must fit in the grid.
    pub fn add_panel(&mut self, region: PanelRegion) -> ChartResult<PanelId> {
        if region.rowspan == 0 || region.colspan == 0 {
            return Err(ChartError::InvalidLayout(
                "panel spans must be >= 1".to_owned(),
            ));
        }
        if region.row + region.rowspan > self.nrows || region.col + region.colspan > self.ncols {
            return Err(ChartError::InvalidLayout(format!(
                "panel at row {}, col {} with span {}x{} exceeds the {}x{} grid",
                region.row, region.col, region.rowspan, region.colspan, self.nrows, self.ncols
            )));
        }
        self.panels.push(Panel::new(region));
        Ok(PanelId::new(self.panels.len() - 1))
    }

    #[must_use]
    pub fn grid_shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    #[must_use]
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    #[must_use]
    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.panels.get(id.0)
    }

    pub fn panel_mut(&mut self, id: PanelId) -> ChartResult<&mut Panel> {
        self.panels
            .get_mut(id.0)
            .ok_or_else(|| ChartError::InvalidData(format!("unknown panel id {}", id.0)))
    }

    #[must_use]
    pub fn has_multiple_panels(&self) -> bool {
        self.panels.len() > 1
    }

    /// Total artists over every panel and axes.
    #[must_use]
    pub fn artist_count(&self) -> usize {
        self.panels.iter().map(Panel::artist_count).sum()
    }

    /// Projects the figure into per-panel layers of pixel primitives.
    pub fn to_layered_frame(&self, style: &StyleConfig) -> ChartResult<LayeredRenderFrame> {
        scene::build_layered_frame(self, style)
    }

    /// Projects the figure into one flat frame.
    pub fn to_frame(&self, style: &StyleConfig) -> ChartResult<RenderFrame> {
        Ok(self.to_layered_frame(style)?.flatten())
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R, style: &StyleConfig) -> ChartResult<()> {
        let layered = self.to_layered_frame(style)?;
        renderer.render_layered(&layered)
    }
}
