use thiserror::Error;
use tracing::warn;

use crate::chart::{AxisSide, ChartKind};

/// Non-fatal condition met while building or composing a chart.
///
/// The figure is still produced; the warning explains what was degraded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompositionWarning {
    #[error("the `show_legend` flag will be ignored for multi-subplots")]
    LegendIgnoredForSubplots,

    #[error(
        "found {groups} scale-incompatible groups but only 2 axes available (group sizes {sizes:?}); \
         the extra groups were merged onto the left axis, consider explicit y_axis bindings or a grid layout"
    )]
    ScaleGroupOverflow { groups: usize, sizes: Vec<usize> },

    #[error(
        "charts at indices {first} and {second} are both on the {side} axis but have incompatible scales; \
         consider explicit y_axis bindings or a grid layout"
    )]
    IncompatibleScalesOnAxis {
        side: AxisSide,
        first: usize,
        second: usize,
    },

    #[error("both `show_yerr` and `show_area` will be used; only one of them should be set")]
    ErrorBandAndArea,

    #[error(
        "bar width ({width:.2}) is very small with {bar_series} grouped bar series; \
         consider the stack or overlay bar mode, or a grid layout"
    )]
    ThinBars { width: f64, bar_series: usize },

    #[error("setting `{key}` is present but is not supported by {kind} charts; ignoring it")]
    UnsupportedSetting { kind: ChartKind, key: String },

    #[error(
        "stacked bar series {series} has {found} categories but the stack holds {expected}; \
         missing categories count as zero"
    )]
    StackLengthMismatch {
        series: usize,
        expected: usize,
        found: usize,
    },

    #[error("{kind} charts cannot be overlaid; chart at index {index} was skipped")]
    UnsupportedOverlayKind { index: usize, kind: ChartKind },

    #[error("{count} bar series share one axes; consider subplots")]
    TooManyBarSeries { count: usize },

    #[error("no data points found for {kind} chart")]
    NoDataPoints { kind: ChartKind },

    #[error("grid cells of charts {first} and {second} overlap")]
    OverlappingCells { first: usize, second: usize },

    #[error("only the first of {count} heatmap series fits in one panel; enable subplots to show all")]
    HeatmapSeriesDropped { count: usize },
}

/// Warnings collected during one call, in emission order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Diagnostics {
    warnings: Vec<CompositionWarning>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning and logs it.
    pub fn push(&mut self, warning: CompositionWarning) {
        warn!(warning = %warning, "chart composition warning");
        self.warnings.push(warning);
    }

    #[must_use]
    pub fn warnings(&self) -> &[CompositionWarning] {
        &self.warnings
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Number of warnings matching `predicate`.
    #[must_use]
    pub fn count_where(&self, predicate: impl Fn(&CompositionWarning) -> bool) -> usize {
        self.warnings.iter().filter(|warning| predicate(warning)).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompositionWarning> {
        self.warnings.iter()
    }

    #[must_use]
    pub fn into_warnings(self) -> Vec<CompositionWarning> {
        self.warnings
    }
}

impl Extend<CompositionWarning> for Diagnostics {
    fn extend<T: IntoIterator<Item = CompositionWarning>>(&mut self, iter: T) {
        for warning in iter {
            self.push(warning);
        }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a CompositionWarning;
    type IntoIter = std::slice::Iter<'a, CompositionWarning>;

    fn into_iter(self) -> Self::IntoIter {
        self.warnings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{CompositionWarning, Diagnostics};
    use crate::chart::AxisSide;

    #[test]
    fn warnings_keep_emission_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(CompositionWarning::ErrorBandAndArea);
        diagnostics.push(CompositionWarning::IncompatibleScalesOnAxis {
            side: AxisSide::Right,
            first: 1,
            second: 2,
        });
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.warnings()[0], CompositionWarning::ErrorBandAndArea);
        assert!(
            diagnostics.warnings()[1]
                .to_string()
                .contains("both on the right axis")
        );
    }

    #[test]
    fn thin_bar_message_rounds_width() {
        let warning = CompositionWarning::ThinBars {
            width: 0.8 / 6.0,
            bar_series: 6,
        };
        assert!(warning.to_string().starts_with("bar width (0.13)"));
    }
}
