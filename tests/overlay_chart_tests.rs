use chart_compose::chart::{
    AxisRequest, BarSeries, ChartKind, ChartSettings, HeatmapSeries, LineSeries, OverlayOptions,
    RenderedChart,
};
use chart_compose::compose::{CompositionWarning, LEGEND_TITLE};
use chart_compose::core::BarMode;
use chart_compose::render::{BarGeometry, Color};
use chart_compose::{
    ChartError, OverlayEntry, StyleConfig, bar_chart, heatmap_chart, line_chart, overlay_chart,
};

fn bars(label: &str, values: Vec<f64>) -> RenderedChart {
    bar_chart(
        vec![BarSeries::new(["a", "b", "c"], values).with_label(label)],
        ChartSettings::default(),
        &StyleConfig::default(),
    )
    .expect("bar chart")
    .into_chart()
}

fn line(label: &str, y: Vec<f64>) -> RenderedChart {
    line_chart(
        vec![LineSeries::new(vec![0.0, 1.0, 2.0], y).with_label(label)],
        ChartSettings::default(),
        &StyleConfig::default(),
    )
    .expect("line chart")
    .into_chart()
}

fn bar_geometry(chart: &RenderedChart) -> Vec<Vec<BarGeometry>> {
    chart.figure.panels()[0]
        .left
        .artists()
        .iter()
        .filter_map(|artist| artist.bars().map(<[BarGeometry]>::to_vec))
        .collect()
}

#[test]
fn empty_overlay_is_rejected() {
    let error = overlay_chart(&[], OverlayOptions::default(), &StyleConfig::default())
        .expect_err("empty list");
    assert_eq!(error, ChartError::EmptyChartList);
}

#[test]
fn bar_and_line_with_divergent_scales_get_two_axes() {
    let sales = bars("sales", vec![10.0, 20.0, 30.0]);
    let traffic = line("traffic", vec![1_000.0, 2_000.0, 4_000.0]);

    let output = overlay_chart(
        &[OverlayEntry::new(&sales), OverlayEntry::new(&traffic)],
        OverlayOptions::new().with_title("Sales vs traffic").with_legend(),
        &StyleConfig::default(),
    )
    .expect("overlay");

    let panel = &output.chart.figure.panels()[0];
    assert!(panel.has_right());
    let right = panel.right.as_ref().expect("right axes");
    assert_eq!(right.artists().len(), 1);

    let legend = panel.left.legend.as_ref().expect("combined legend");
    assert_eq!(legend.title, LEGEND_TITLE);
    let labels: Vec<&str> = legend.entries.iter().map(|entry| entry.label.as_str()).collect();
    assert_eq!(labels, vec!["sales (L)", "traffic (R)"]);
    assert!(right.legend.is_none());
    assert_eq!(output.chart.figure.title.as_deref(), Some("Sales vs traffic"));
}

#[test]
fn compatible_charts_share_the_left_axis_without_suffixes() {
    let first = bars("first", vec![10.0, 20.0, 30.0]);
    let second = line("second", vec![50.0, 60.0, 70.0]);

    let output = overlay_chart(
        &[OverlayEntry::new(&first), OverlayEntry::new(&second)],
        OverlayOptions::new().with_legend(),
        &StyleConfig::default(),
    )
    .expect("overlay");

    let panel = &output.chart.figure.panels()[0];
    assert!(!panel.has_right());
    let legend = panel.left.legend.as_ref().expect("legend");
    let labels: Vec<&str> = legend.entries.iter().map(|entry| entry.label.as_str()).collect();
    assert_eq!(labels, vec!["first", "second"]);
}

#[test]
fn explicit_right_binding_wins_over_compatibility() {
    let first = line("first", vec![1.0, 2.0, 3.0]);
    let second = line("second", vec![1.5, 2.5, 3.5]);

    let output = overlay_chart(
        &[
            OverlayEntry::new(&first),
            OverlayEntry::new(&second).with_axis(AxisRequest::Right),
        ],
        OverlayOptions::default(),
        &StyleConfig::default(),
    )
    .expect("overlay");
    let overlay = output
        .chart
        .descriptor()
        .and_then(|descriptor| descriptor.overlay.as_ref())
        .expect("overlay metadata");
    assert!(overlay.has_right_axis());
    assert_eq!(overlay.bindings[1].requested, AxisRequest::Right);
}

#[test]
fn grouped_bars_partition_the_bar_width() {
    let first = bars("first", vec![1.0, 2.0, 3.0]);
    let second = bars("second", vec![2.0, 3.0, 4.0]);

    let output = overlay_chart(
        &[OverlayEntry::new(&first), OverlayEntry::new(&second)],
        OverlayOptions::new().with_bar_mode(BarMode::Group),
        &StyleConfig::default(),
    )
    .expect("overlay");

    let geometry = bar_geometry(&output.chart);
    assert_eq!(geometry.len(), 2);
    for bar in geometry.iter().flatten() {
        assert!((bar.thickness - 0.4).abs() <= 1e-9);
    }
    assert!((geometry[0][1].position - 1.0).abs() <= 1e-9);
    assert!((geometry[1][1].position - 1.4).abs() <= 1e-9);

    let ticks = output.chart.figure.panels()[0]
        .left
        .x_ticks
        .as_ref()
        .expect("category ticks");
    assert_eq!(ticks.labels, vec!["a", "b", "c"]);
    assert!((ticks.positions[0] - 0.2).abs() <= 1e-9);
}

#[test]
fn stacked_bars_start_at_the_running_total() {
    let first = bars("first", vec![1.0, 2.0, 3.0]);
    let second = bars("second", vec![2.0, 3.0, 4.0]);

    let output = overlay_chart(
        &[OverlayEntry::new(&first), OverlayEntry::new(&second)],
        OverlayOptions::new().with_bar_mode(BarMode::Stack),
        &StyleConfig::default(),
    )
    .expect("overlay");

    let geometry = bar_geometry(&output.chart);
    let tops: Vec<f64> = geometry[1].iter().map(|bar| bar.top()).collect();
    assert_eq!(tops, vec![3.0, 5.0, 7.0]);
    let bases: Vec<f64> = geometry[1].iter().map(|bar| bar.base).collect();
    assert_eq!(bases, vec![1.0, 2.0, 3.0]);
    for bar in geometry.iter().flatten() {
        assert!((bar.thickness - 0.8).abs() <= 1e-9);
    }
}

#[test]
fn many_grouped_bar_charts_warn_about_thin_bars() {
    let charts: Vec<RenderedChart> = (0..6)
        .map(|index| bars(&format!("s{index}"), vec![1.0, 2.0, 3.0]))
        .collect();
    let entries: Vec<OverlayEntry<'_>> = charts.iter().map(OverlayEntry::new).collect();

    let output = overlay_chart(&entries, OverlayOptions::default(), &StyleConfig::default())
        .expect("overlay");
    assert_eq!(
        output.diagnostics.count_where(|warning| matches!(
            warning,
            CompositionWarning::ThinBars { bar_series: 6, .. }
        )),
        1
    );
}

#[test]
fn thin_bar_warning_counts_every_grouped_series() {
    let four_series = |prefix: &str| {
        let series = (0..4)
            .map(|index| {
                BarSeries::new(["a", "b", "c"], vec![1.0, 2.0, 3.0])
                    .with_label(format!("{prefix}{index}"))
            })
            .collect();
        bar_chart(series, ChartSettings::default(), &StyleConfig::default())
            .expect("bar chart")
            .into_chart()
    };
    let first = four_series("a");
    let second = four_series("b");
    let style = StyleConfig::default();

    let output = overlay_chart(
        &[
            OverlayEntry::new(&first).with_axis(AxisRequest::Left),
            OverlayEntry::new(&second).with_axis(AxisRequest::Left),
        ],
        OverlayOptions::new().with_bar_mode(BarMode::Group),
        &style,
    )
    .expect("overlay");

    let geometry = bar_geometry(&output.chart);
    assert_eq!(geometry.len(), 8);
    let drawn = style.bar_width / 8.0;
    assert!(drawn < style.overlay_thin_bar_threshold);
    for bar in geometry.iter().flatten() {
        assert!((bar.thickness - drawn).abs() <= 1e-9);
    }
    let warnings: Vec<&CompositionWarning> = output
        .diagnostics
        .iter()
        .filter(|warning| matches!(warning, CompositionWarning::ThinBars { .. }))
        .collect();
    assert_eq!(warnings.len(), 1);
    match warnings[0] {
        CompositionWarning::ThinBars { width, bar_series } => {
            assert_eq!(*bar_series, 8);
            assert!((width - drawn).abs() <= 1e-9);
        }
        other => panic!("unexpected warning {other:?}"),
    }
}

#[test]
fn default_z_order_follows_the_sub_chart_style() {
    let sub_style = StyleConfig {
        overlay_zorder_bar: 5,
        ..StyleConfig::default()
    };
    let sales = bar_chart(
        vec![BarSeries::new(["a", "b"], vec![1.0, 2.0])],
        ChartSettings::default(),
        &sub_style,
    )
    .expect("bar chart")
    .into_chart();

    let output = overlay_chart(
        &[OverlayEntry::new(&sales)],
        OverlayOptions::default(),
        &StyleConfig::default(),
    )
    .expect("overlay");
    let artist = &output.chart.figure.panels()[0].left.artists()[0];
    assert!((artist.z_order - 5.0).abs() <= 1e-9);
}

#[test]
fn empty_top_series_leaves_error_bars_on_the_last_drawn_stack() {
    let with_errors = ChartSettings {
        show_yerr: true,
        ..ChartSettings::default()
    };
    let base = bar_chart(
        vec![BarSeries::new(["a", "b"], vec![1.0, 2.0]).with_errors(vec![0.1, 0.2])],
        with_errors.clone(),
        &StyleConfig::default(),
    )
    .expect("bar chart")
    .into_chart();
    let empty = bar_chart(
        vec![BarSeries::new(Vec::<String>::new(), Vec::new())],
        with_errors,
        &StyleConfig::default(),
    )
    .expect("bar chart")
    .into_chart();

    let output = overlay_chart(
        &[
            OverlayEntry::new(&base).with_axis(AxisRequest::Left),
            OverlayEntry::new(&empty).with_axis(AxisRequest::Left),
        ],
        OverlayOptions::new().with_bar_mode(BarMode::Stack),
        &StyleConfig::default(),
    )
    .expect("overlay");

    let geometry = bar_geometry(&output.chart);
    assert_eq!(geometry.len(), 1);
    let errors: Vec<Option<f64>> = geometry[0].iter().map(|bar| bar.error).collect();
    assert_eq!(errors, vec![Some(0.1), Some(0.2)]);
}

#[test]
fn non_overlayable_charts_are_skipped_with_a_warning() {
    let sales = bars("sales", vec![1.0, 2.0, 3.0]);
    let grid = heatmap_chart(
        vec![HeatmapSeries::new(vec![vec![Some(1.0), Some(2.0)]])],
        ChartSettings::default(),
        &StyleConfig::default(),
    )
    .expect("heatmap")
    .into_chart();

    let output = overlay_chart(
        &[OverlayEntry::new(&sales), OverlayEntry::new(&grid)],
        OverlayOptions::default(),
        &StyleConfig::default(),
    )
    .expect("overlay");
    assert!(output.diagnostics.iter().any(|warning| {
        *warning
            == CompositionWarning::UnsupportedOverlayKind {
                index: 1,
                kind: ChartKind::Heatmap,
            }
    }));
    assert_eq!(output.chart.figure.panels()[0].left.artists().len(), 1);
}

#[test]
fn binding_overrides_reach_the_painted_artists() {
    let sales = bars("sales", vec![1.0, 2.0, 3.0]);
    let red = Color::rgb(1.0, 0.0, 0.0);

    let output = overlay_chart(
        &[OverlayEntry::new(&sales)
            .with_color(red)
            .with_legend_label("Revenue")
            .with_z_order(7)],
        OverlayOptions::default(),
        &StyleConfig::default(),
    )
    .expect("overlay");

    let artist = &output.chart.figure.panels()[0].left.artists()[0];
    assert_eq!(artist.color, red);
    assert_eq!(artist.label.as_deref(), Some("Revenue"));
    assert!((artist.z_order - 7.0).abs() <= 1e-9);
}

#[test]
fn invalid_threshold_is_rejected() {
    let sales = bars("sales", vec![1.0, 2.0, 3.0]);
    let error = overlay_chart(
        &[OverlayEntry::new(&sales)],
        OverlayOptions::new().with_auto_secondary_axis(0.0),
        &StyleConfig::default(),
    )
    .expect_err("threshold");
    assert!(matches!(error, ChartError::InvalidData(_)));
}

#[test]
fn overlay_descriptor_flattens_sub_chart_series() {
    let sales = bars("sales", vec![1.0, 2.0, 3.0]);
    let traffic = line("traffic", vec![100.0, 900.0, 400.0]);

    let output = overlay_chart(
        &[OverlayEntry::new(&sales), OverlayEntry::new(&traffic)],
        OverlayOptions::default(),
        &StyleConfig::default(),
    )
    .expect("overlay");
    let descriptor = output.chart.descriptor().expect("descriptor");
    assert_eq!(descriptor.kind, ChartKind::Overlay);
    assert_eq!(
        descriptor.series_labels(),
        vec![Some("sales"), Some("traffic")]
    );
    descriptor.validate().expect("valid overlay descriptor");
}
