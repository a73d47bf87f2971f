use chart_compose::chart::{BarSeries, ChartSettings, LineSeries, OverlayOptions, RenderedChart};
use chart_compose::compose::cluster_by_compatibility;
use chart_compose::core::DataRange;
use chart_compose::{
    GridEntry, GridOptions, OverlayEntry, StyleConfig, bar_chart, figure_grid_layout, line_chart,
    overlay_chart,
};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn line_2k(label: &str, scale: f64) -> RenderedChart {
    let x: Vec<f64> = (0..2_000).map(f64::from).collect();
    let y: Vec<f64> = x.iter().map(|t| (t * 0.01).sin() * scale + scale).collect();
    line_chart(
        vec![LineSeries::new(x, y).with_label(label)],
        ChartSettings::default(),
        &StyleConfig::default(),
    )
    .expect("line chart")
    .into_chart()
}

fn bars_50(label: &str) -> RenderedChart {
    let labels: Vec<String> = (0..50).map(|index| format!("c{index}")).collect();
    let values: Vec<f64> = (0..50).map(|index| f64::from(index % 7) + 1.0).collect();
    bar_chart(
        vec![BarSeries::new(labels, values).with_label(label)],
        ChartSettings::default(),
        &StyleConfig::default(),
    )
    .expect("bar chart")
    .into_chart()
}

fn bench_cluster_64_ranges(c: &mut Criterion) {
    let ranges: Vec<DataRange> = (0..64)
        .map(|index| DataRange::new(0.0, 10f64.powi(index % 5) * (1.0 + f64::from(index) * 0.01)))
        .collect();

    c.bench_function("cluster_64_ranges", |b| {
        b.iter(|| {
            let _ = cluster_by_compatibility(black_box(&ranges), black_box(3.0));
        })
    });
}

fn bench_overlay_dual_axis(c: &mut Criterion) {
    let bars = bars_50("bars");
    let line = line_2k("line", 5_000.0);
    let style = StyleConfig::default();

    c.bench_function("overlay_bar_line_dual_axis", |b| {
        b.iter(|| {
            let _ = overlay_chart(
                black_box(&[OverlayEntry::new(&bars), OverlayEntry::new(&line)]),
                OverlayOptions::new().with_legend(),
                &style,
            )
            .expect("overlay");
        })
    });
}

fn bench_grid_replay_and_frame(c: &mut Criterion) {
    let charts: Vec<RenderedChart> = (0..8)
        .map(|index| line_2k(&format!("l{index}"), f64::from(index + 1)))
        .collect();
    let entries: Vec<GridEntry<'_>> = charts.iter().map(GridEntry::new).collect();
    let style = StyleConfig::default();

    c.bench_function("grid_8_replay_to_frame", |b| {
        b.iter(|| {
            let grid = figure_grid_layout(black_box(&entries), GridOptions::default())
                .expect("grid");
            let _ = grid.figure.to_frame(&style).expect("frame");
        })
    });
}

criterion_group!(
    benches,
    bench_cluster_64_ranges,
    bench_overlay_dual_axis,
    bench_grid_replay_and_frame
);
criterion_main!(benches);
