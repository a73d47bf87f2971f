use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chart::{ChartDescriptor, RenderedChart};
use crate::compose::{CompositionWarning, DEFAULT_MAX_COLS, Diagnostics, replay_into_panel};
use crate::core::FigureSize;
use crate::error::{ChartError, ChartResult};
use crate::render::{Figure, PanelRegion};

/// Grid cell a chart occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub row: usize,
    pub col: usize,
    pub rowspan: usize,
    pub colspan: usize,
}

impl LayoutSpec {
    #[must_use]
    pub const fn new(row: usize, col: usize, rowspan: usize, colspan: usize) -> Self {
        Self {
            row,
            col,
            rowspan,
            colspan,
        }
    }

    #[must_use]
    pub const fn cell(row: usize, col: usize) -> Self {
        Self::new(row, col, 1, 1)
    }

    #[must_use]
    pub fn region(self) -> PanelRegion {
        PanelRegion {
            row: self.row,
            col: self.col,
            rowspan: self.rowspan,
            colspan: self.colspan,
        }
    }
}

impl TryFrom<&IndexMap<String, usize>> for LayoutSpec {
    type Error = ChartError;

    fn try_from(map: &IndexMap<String, usize>) -> ChartResult<Self> {
        let key = |name: &str| {
            map.get(name).copied().ok_or_else(|| {
                ChartError::InvalidLayout(format!("layout_spec is missing required key `{name}`"))
            })
        };
        Ok(Self {
            row: key("row")?,
            col: key("col")?,
            rowspan: key("rowspan")?,
            colspan: key("colspan")?,
        })
    }
}

/// One chart placed by [`figure_grid_layout`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GridEntry<'a> {
    pub chart: Option<&'a RenderedChart>,
    pub layout: Option<LayoutSpec>,
}

impl<'a> GridEntry<'a> {
    #[must_use]
    pub fn new(chart: &'a RenderedChart) -> Self {
        Self {
            chart: Some(chart),
            layout: None,
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutSpec) -> Self {
        self.layout = Some(layout);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridOptions {
    pub title: Option<String>,
    /// Columns used for automatic row-major placement.
    pub max_cols: Option<usize>,
    pub figsize: Option<FigureSize>,
    pub sharex: bool,
    pub sharey: bool,
    /// Cells for every entry, in entry order; an alternative to per-entry
    /// layouts.
    pub layout_specs: Option<Vec<LayoutSpec>>,
}

impl GridOptions {
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_max_cols(mut self, max_cols: usize) -> Self {
        self.max_cols = Some(max_cols);
        self
    }

    #[must_use]
    pub fn with_layout_specs(mut self, specs: Vec<LayoutSpec>) -> Self {
        self.layout_specs = Some(specs);
        self
    }

    #[must_use]
    pub fn with_shared_axes(mut self, sharex: bool, sharey: bool) -> Self {
        self.sharex = sharex;
        self.sharey = sharey;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridOutput {
    pub figure: Figure,
    pub diagnostics: Diagnostics,
}

/// Places already built charts into the cells of one figure by replaying
/// their descriptors.
///
/// Either every chart has a layout spec or none does; without specs charts
/// fill the grid row-major, at most `max_cols` per row.
pub fn figure_grid_layout(entries: &[GridEntry<'_>], options: GridOptions) -> ChartResult<GridOutput> {
    if entries.is_empty() {
        return Err(ChartError::EmptyChartList);
    }
    let max_cols = options.max_cols.unwrap_or(DEFAULT_MAX_COLS);
    if max_cols == 0 {
        return Err(ChartError::InvalidLayout("max_cols must be >= 1".to_owned()));
    }

    let mut descriptors: Vec<&ChartDescriptor> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let chart = entry.chart.ok_or(ChartError::MissingFigure { index })?;
        descriptors.push(
            chart
                .descriptor()
                .ok_or(ChartError::MissingDescriptor { index })?,
        );
    }

    let specs = resolve_specs(entries, &options, max_cols)?;
    let mut diagnostics = Diagnostics::new();
    for (first, a) in specs.iter().enumerate() {
        for (offset, b) in specs[first + 1..].iter().enumerate() {
            if a.region().overlaps(b.region()) {
                diagnostics.push(CompositionWarning::OverlappingCells {
                    first,
                    second: first + 1 + offset,
                });
            }
        }
    }

    let nrows = specs.iter().map(|spec| spec.row + spec.rowspan).max().unwrap_or(1);
    let ncols = specs.iter().map(|spec| spec.col + spec.colspan).max().unwrap_or(1);
    let figsize = options
        .figsize
        .or_else(|| descriptors.first().map(|descriptor| descriptor.style.figsize))
        .unwrap_or(FigureSize::DEFAULT);
    let mut figure = Figure::grid(figsize, nrows, ncols)?;
    figure.title = options.title.clone();
    figure.sharex = options.sharex;
    figure.sharey = options.sharey;

    for (descriptor, spec) in descriptors.iter().zip(&specs) {
        let id = figure.add_panel(spec.region())?;
        replay_into_panel(figure.panel_mut(id)?, descriptor, &mut diagnostics)?;
        debug!(
            kind = %descriptor.kind,
            row = spec.row,
            col = spec.col,
            "chart placed in grid"
        );
    }
    info!(
        charts = entries.len(),
        rows = nrows,
        cols = ncols,
        warnings = diagnostics.len(),
        "grid layout composed"
    );
    Ok(GridOutput {
        figure,
        diagnostics,
    })
}

fn resolve_specs(
    entries: &[GridEntry<'_>],
    options: &GridOptions,
    max_cols: usize,
) -> ChartResult<Vec<LayoutSpec>> {
    let with_layout = entries.iter().filter(|entry| entry.layout.is_some()).count();
    let specs: Vec<LayoutSpec> = match &options.layout_specs {
        Some(_) if with_layout > 0 => {
            return Err(ChartError::InvalidLayout(
                "layout specs were given both per chart and in the grid options".to_owned(),
            ));
        }
        Some(specs) if specs.len() != entries.len() => {
            return Err(ChartError::InvalidLayout(format!(
                "{} layout specs were given for {} charts",
                specs.len(),
                entries.len()
            )));
        }
        Some(specs) => specs.clone(),
        None if with_layout == entries.len() => {
            entries.iter().filter_map(|entry| entry.layout).collect()
        }
        None if with_layout > 0 => {
            return Err(ChartError::InvalidLayout(format!(
                "{with_layout} of {} charts have a layout spec; give one to every chart or to none",
                entries.len()
            )));
        }
        None => {
            let ncols = entries.len().min(max_cols);
            (0..entries.len())
                .map(|index| LayoutSpec::cell(index / ncols, index % ncols))
                .collect()
        }
    };

    if let Some(spec) = specs.iter().find(|spec| spec.rowspan == 0 || spec.colspan == 0) {
        return Err(ChartError::InvalidLayout(format!(
            "layout spec at row {}, col {} has a zero span",
            spec.row, spec.col
        )));
    }
    Ok(specs)
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::LayoutSpec;
    use crate::error::ChartError;

    #[test]
    fn layout_spec_requires_all_four_keys() {
        let mut map: IndexMap<String, usize> = IndexMap::new();
        map.insert("row".to_owned(), 0);
        map.insert("col".to_owned(), 1);
        map.insert("rowspan".to_owned(), 1);
        assert_eq!(
            LayoutSpec::try_from(&map),
            Err(ChartError::InvalidLayout(
                "layout_spec is missing required key `colspan`".to_owned()
            ))
        );

        map.insert("colspan".to_owned(), 2);
        assert_eq!(LayoutSpec::try_from(&map), Ok(LayoutSpec::new(0, 1, 1, 2)));
    }
}
