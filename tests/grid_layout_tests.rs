use chart_compose::chart::{BarSeries, ChartSettings, LineSeries, OverlayOptions, RenderedChart};
use chart_compose::compose::CompositionWarning;
use chart_compose::core::FigureSize;
use chart_compose::render::{Figure, PanelRegion};
use chart_compose::{
    ChartError, GridEntry, GridOptions, LayoutSpec, OverlayEntry, StyleConfig, bar_chart,
    figure_grid_layout, line_chart, overlay_chart,
};

fn labelled_bars() -> RenderedChart {
    bar_chart(
        vec![
            BarSeries::new(["q1", "q2"], vec![3.0, 4.0]).with_label("north"),
            BarSeries::new(["q1", "q2"], vec![5.0, 2.0]).with_label("south"),
        ],
        ChartSettings::default().with_title("Regions").with_legend(),
        &StyleConfig::default(),
    )
    .expect("bar chart")
    .into_chart()
}

fn simple_line(label: &str) -> RenderedChart {
    line_chart(
        vec![LineSeries::from_values(vec![1.0, 3.0, 2.0]).with_label(label)],
        ChartSettings::default(),
        &StyleConfig::default(),
    )
    .expect("line chart")
    .into_chart()
}

fn legend_labels(figure: &Figure, panel: usize) -> Vec<String> {
    figure.panels()[panel]
        .left
        .legend
        .as_ref()
        .map(|legend| legend.entries.iter().map(|entry| entry.label.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn empty_grid_is_rejected() {
    let error = figure_grid_layout(&[], GridOptions::default()).expect_err("empty");
    assert_eq!(error, ChartError::EmptyChartList);
}

#[test]
fn automatic_placement_fills_rows_first() {
    let charts: Vec<RenderedChart> = (0..5).map(|index| simple_line(&format!("l{index}"))).collect();
    let entries: Vec<GridEntry<'_>> = charts.iter().map(GridEntry::new).collect();

    let output = figure_grid_layout(&entries, GridOptions::default().with_max_cols(2))
        .expect("grid");
    assert_eq!(output.figure.grid_shape(), (3, 2));
    let regions: Vec<PanelRegion> = output.figure.panels().iter().map(|panel| panel.region).collect();
    assert_eq!(
        regions,
        vec![
            PanelRegion::cell(0, 0),
            PanelRegion::cell(0, 1),
            PanelRegion::cell(1, 0),
            PanelRegion::cell(1, 1),
            PanelRegion::cell(2, 0),
        ]
    );
    assert!(output.diagnostics.is_empty());
}

#[test]
fn default_column_cap_is_four() {
    let charts: Vec<RenderedChart> = (0..6).map(|index| simple_line(&format!("l{index}"))).collect();
    let entries: Vec<GridEntry<'_>> = charts.iter().map(GridEntry::new).collect();
    let output = figure_grid_layout(&entries, GridOptions::default()).expect("grid");
    assert_eq!(output.figure.grid_shape(), (2, 4));
}

#[test]
fn replay_reproduces_series_and_legend_labels() {
    let chart = labelled_bars();
    let output = figure_grid_layout(
        &[GridEntry::new(&chart)],
        GridOptions::default().with_title("Dashboard"),
    )
    .expect("grid");

    let panel = &output.figure.panels()[0];
    let original = &chart.figure.panels()[0];
    assert_eq!(panel.left.artists().len(), original.left.artists().len());
    assert_eq!(panel.left.title.as_deref(), Some("Regions"));
    assert_eq!(legend_labels(&output.figure, 0), vec!["north", "south"]);
    assert_eq!(legend_labels(&output.figure, 0), legend_labels(&chart.figure, 0));
    assert_eq!(output.figure.title.as_deref(), Some("Dashboard"));
}

#[test]
fn overlays_replay_with_both_axes() {
    let sales = bar_chart(
        vec![BarSeries::new(["a", "b", "c"], vec![10.0, 20.0, 30.0]).with_label("sales")],
        ChartSettings::default(),
        &StyleConfig::default(),
    )
    .expect("bars")
    .into_chart();
    let traffic = simple_line("traffic");
    let big = line_chart(
        vec![LineSeries::from_values(vec![1_000.0, 2_000.0, 4_000.0]).with_label("visits")],
        ChartSettings::default(),
        &StyleConfig::default(),
    )
    .expect("line")
    .into_chart();
    let overlay = overlay_chart(
        &[OverlayEntry::new(&sales), OverlayEntry::new(&big)],
        OverlayOptions::new().with_title("Combined").with_legend(),
        &StyleConfig::default(),
    )
    .expect("overlay")
    .into_chart();

    let output = figure_grid_layout(
        &[GridEntry::new(&overlay), GridEntry::new(&traffic)],
        GridOptions::default(),
    )
    .expect("grid");

    assert_eq!(output.figure.grid_shape(), (1, 2));
    let cell = &output.figure.panels()[0];
    assert!(cell.has_right());
    assert_eq!(cell.left.title.as_deref(), Some("Combined"));
    assert_eq!(legend_labels(&output.figure, 0), vec!["sales (L)", "visits (R)"]);
    assert!(!output.figure.panels()[1].has_right());
}

#[test]
fn explicit_specs_size_the_grid() {
    let wide = labelled_bars();
    let left = simple_line("left");
    let right = simple_line("right");

    let output = figure_grid_layout(
        &[
            GridEntry::new(&wide).with_layout(LayoutSpec::new(0, 0, 1, 2)),
            GridEntry::new(&left).with_layout(LayoutSpec::cell(1, 0)),
            GridEntry::new(&right).with_layout(LayoutSpec::cell(1, 1)),
        ],
        GridOptions {
            figsize: Some(FigureSize::new(12.0, 8.0)),
            ..GridOptions::default()
        },
    )
    .expect("grid");

    assert_eq!(output.figure.grid_shape(), (2, 2));
    assert_eq!(output.figure.panels()[0].region, LayoutSpec::new(0, 0, 1, 2).region());
    assert_eq!(output.figure.size, FigureSize::new(12.0, 8.0));
    assert!(output.diagnostics.is_empty());
}

#[test]
fn option_level_specs_apply_in_entry_order() {
    let first = simple_line("first");
    let second = simple_line("second");
    let output = figure_grid_layout(
        &[GridEntry::new(&first), GridEntry::new(&second)],
        GridOptions::default()
            .with_layout_specs(vec![LayoutSpec::cell(1, 0), LayoutSpec::cell(0, 0)]),
    )
    .expect("grid");
    assert_eq!(output.figure.grid_shape(), (2, 1));
    assert_eq!(output.figure.panels()[0].region, PanelRegion::cell(1, 0));
}

#[test]
fn overlapping_cells_warn_but_still_render() {
    let first = simple_line("first");
    let second = simple_line("second");
    let output = figure_grid_layout(
        &[
            GridEntry::new(&first).with_layout(LayoutSpec::new(0, 0, 2, 2)),
            GridEntry::new(&second).with_layout(LayoutSpec::cell(1, 1)),
        ],
        GridOptions::default(),
    )
    .expect("grid");
    assert_eq!(
        output.diagnostics.warnings(),
        &[CompositionWarning::OverlappingCells {
            first: 0,
            second: 1
        }]
    );
    assert_eq!(output.figure.panels().len(), 2);
}

#[test]
fn layout_errors_are_reported() {
    let first = simple_line("first");
    let second = simple_line("second");

    let mixed = figure_grid_layout(
        &[
            GridEntry::new(&first).with_layout(LayoutSpec::cell(0, 0)),
            GridEntry::new(&second),
        ],
        GridOptions::default(),
    );
    assert!(matches!(mixed, Err(ChartError::InvalidLayout(_))));

    let zero_span = figure_grid_layout(
        &[GridEntry::new(&first).with_layout(LayoutSpec::new(0, 0, 0, 1))],
        GridOptions::default(),
    );
    assert!(matches!(zero_span, Err(ChartError::InvalidLayout(_))));

    let count_mismatch = figure_grid_layout(
        &[GridEntry::new(&first), GridEntry::new(&second)],
        GridOptions::default().with_layout_specs(vec![LayoutSpec::cell(0, 0)]),
    );
    assert!(matches!(count_mismatch, Err(ChartError::InvalidLayout(_))));

    let both = figure_grid_layout(
        &[GridEntry::new(&first).with_layout(LayoutSpec::cell(0, 0))],
        GridOptions::default().with_layout_specs(vec![LayoutSpec::cell(0, 0)]),
    );
    assert!(matches!(both, Err(ChartError::InvalidLayout(_))));

    let no_columns = figure_grid_layout(
        &[GridEntry::new(&first)],
        GridOptions::default().with_max_cols(0),
    );
    assert!(matches!(no_columns, Err(ChartError::InvalidLayout(_))));
}

#[test]
fn charts_without_descriptors_cannot_be_placed() {
    let chart = simple_line("line");
    let bare = RenderedChart::bare(Figure::single(FigureSize::DEFAULT));
    let error = figure_grid_layout(
        &[GridEntry::new(&chart), GridEntry::new(&bare)],
        GridOptions::default(),
    )
    .expect_err("bare figure");
    assert_eq!(error, ChartError::MissingDescriptor { index: 1 });

    let error = figure_grid_layout(&[GridEntry::default()], GridOptions::default())
        .expect_err("missing figure");
    assert_eq!(error, ChartError::MissingFigure { index: 0 });
}
