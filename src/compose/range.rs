use tracing::trace;

use crate::chart::{ChartDescriptor, SeriesRecord};
use crate::core::{DataRange, histogram};

/// Value-axis range a chart occupies.
///
/// Histograms occupy their bin heights, so their samples are binned with the
/// chart's own bin count first. Charts without value data, and kinds that
/// have no single value axis, report the neutral `(0, 1)` range.
#[must_use]
pub fn value_range(descriptor: &ChartDescriptor) -> DataRange {
    let bins = descriptor
        .settings
        .num_bins
        .unwrap_or(descriptor.style.hist_bins)
        .max(1);

    let mut values: Vec<f64> = Vec::new();
    for series in &descriptor.series {
        match series {
            SeriesRecord::Line(line) => values.extend_from_slice(&line.y),
            SeriesRecord::Bar(bar) => values.extend_from_slice(&bar.values),
            SeriesRecord::Scatter(scatter) => values.extend_from_slice(&scatter.y),
            SeriesRecord::Histogram(hist) => {
                if hist.samples.iter().any(|value| value.is_finite()) {
                    if let Ok((counts, _)) = histogram(&hist.samples, bins) {
                        values.extend(counts);
                    }
                }
            }
            SeriesRecord::Heatmap(_) | SeriesRecord::Box(_) | SeriesRecord::ParallelCoords(_) => {}
        }
    }

    let range = DataRange::from_values(values.iter().copied()).unwrap_or(DataRange::NEUTRAL);
    trace!(
        kind = %descriptor.kind,
        min = range.min,
        max = range.max,
        "value range extracted"
    );
    range
}

#[cfg(test)]
mod tests {
    use super::value_range;
    use crate::chart::{ChartDescriptor, ChartKind, ChartSettings, HistogramSeries, LineSeries};
    use crate::style::StyleConfig;

    #[test]
    fn histogram_range_covers_bin_heights() {
        let descriptor = ChartDescriptor::new(
            ChartKind::Histogram,
            vec![HistogramSeries::new(vec![1.0, 1.0, 1.0, 2.0]).into()],
            ChartSettings::default().with_num_bins(2),
            StyleConfig::default(),
        );
        let range = value_range(&descriptor);
        assert_eq!((range.min, range.max), (1.0, 3.0));
    }

    #[test]
    fn empty_series_fall_back_to_unit_range() {
        let descriptor = ChartDescriptor::new(
            ChartKind::Line,
            vec![LineSeries::new(Vec::new(), Vec::new()).into()],
            ChartSettings::default(),
            StyleConfig::default(),
        );
        let range = value_range(&descriptor);
        assert_eq!((range.min, range.max), (0.0, 1.0));
    }
}
