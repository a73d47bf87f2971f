use approx::assert_abs_diff_eq;
use chart_compose::chart::{AxisRequest, BarSeries, ChartSettings, OverlayOptions, RenderedChart};
use chart_compose::core::BarMode;
use chart_compose::render::BarGeometry;
use chart_compose::{OverlayEntry, StyleConfig, bar_chart, overlay_chart};
use proptest::prelude::*;

const CATEGORIES: [&str; 3] = ["a", "b", "c"];

fn series_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(prop::collection::vec(0.0f64..1.0e4, CATEGORIES.len()), 1..8)
}

fn charts(values: &[Vec<f64>]) -> Vec<RenderedChart> {
    values
        .iter()
        .map(|values| {
            bar_chart(
                vec![BarSeries::new(CATEGORIES, values.clone())],
                ChartSettings::default(),
                &StyleConfig::default(),
            )
            .expect("bar chart")
            .into_chart()
        })
        .collect()
}

fn overlaid_bars(charts: &[RenderedChart], mode: BarMode) -> Vec<Vec<BarGeometry>> {
    let entries: Vec<OverlayEntry<'_>> = charts
        .iter()
        .map(|chart| OverlayEntry::new(chart).with_axis(AxisRequest::Left))
        .collect();
    let output = overlay_chart(
        &entries,
        OverlayOptions::new().with_bar_mode(mode),
        &StyleConfig::default(),
    )
    .expect("overlay");
    output.chart.figure.panels()[0]
        .left
        .artists()
        .iter()
        .filter_map(|artist| artist.bars().map(<[BarGeometry]>::to_vec))
        .collect()
}

proptest! {
    #[test]
    fn grouped_slots_fill_the_configured_width(values in series_strategy()) {
        let charts = charts(&values);
        let bars = overlaid_bars(&charts, BarMode::Group);
        let count = values.len();
        let bar_width = StyleConfig::default().bar_width;

        prop_assert_eq!(bars.len(), count);
        for (slot, series) in bars.iter().enumerate() {
            for (category, bar) in series.iter().enumerate() {
                assert_abs_diff_eq!(bar.thickness * count as f64, bar_width, epsilon = 1e-9);
                assert_abs_diff_eq!(
                    bar.position,
                    category as f64 + slot as f64 * bar.thickness,
                    epsilon = 1e-9
                );
            }
        }
    }

    #[test]
    fn stack_top_is_the_sum_of_every_series(values in series_strategy()) {
        let charts = charts(&values);
        let bars = overlaid_bars(&charts, BarMode::Stack);

        prop_assert_eq!(bars.len(), values.len());
        let top = bars.last().expect("top series");
        for (category, bar) in top.iter().enumerate() {
            let sum: f64 = values.iter().map(|series| series[category]).sum();
            assert_abs_diff_eq!(bar.top(), sum, epsilon = 1e-6);
        }
    }
}
