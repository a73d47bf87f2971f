use tracing::{debug, info};

use crate::api::ChartOutput;
use crate::chart::{
    AxisRequest, ChartDescriptor, ChartKind, ChartSettings, OverlayMetadata, OverlayOptions,
    RenderedChart, ResolvedBinding,
};
use crate::compose::{CompositionWarning, Diagnostics, assign_axes, render_overlay, value_range};
use crate::core::{BarMode, DataRange};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;
use crate::style::StyleConfig;

/// One chart handed to [`overlay_chart`] with its axis binding.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverlayEntry<'a> {
    pub chart: Option<&'a RenderedChart>,
    pub y_axis: AxisRequest,
    pub z_order: Option<i32>,
    pub legend_label: Option<&'a str>,
    pub color: Option<Color>,
}

impl<'a> OverlayEntry<'a> {
    #[must_use]
    pub fn new(chart: &'a RenderedChart) -> Self {
        Self {
            chart: Some(chart),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_axis(mut self, y_axis: AxisRequest) -> Self {
        self.y_axis = y_axis;
        self
    }

    #[must_use]
    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = Some(z_order);
        self
    }

    #[must_use]
    pub fn with_legend_label(mut self, label: &'a str) -> Self {
        self.legend_label = Some(label);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Combines several charts onto one panel with up to two value axes.
///
/// Axis bindings are resolved from scale compatibility of each chart's value
/// range unless given explicitly. The returned chart carries an overlay
/// descriptor holding every sub-chart descriptor, the resolved bindings, the
/// bar mode and `style`, so it can be replayed into a grid cell later.
pub fn overlay_chart(
    entries: &[OverlayEntry<'_>],
    options: OverlayOptions,
    style: &StyleConfig,
) -> ChartResult<ChartOutput> {
    style.validate()?;
    if entries.is_empty() {
        return Err(ChartError::EmptyChartList);
    }

    let mut descriptors: Vec<&ChartDescriptor> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let chart = entry.chart.ok_or(ChartError::MissingFigure { index })?;
        let descriptor = chart
            .descriptor()
            .ok_or(ChartError::MissingDescriptor { index })?;
        descriptor.validate()?;
        descriptors.push(descriptor);
    }

    let threshold = options
        .auto_secondary_axis
        .unwrap_or(style.overlay_auto_threshold);
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(ChartError::InvalidData(format!(
            "auto_secondary_axis must be finite and > 0, got {threshold}"
        )));
    }

    let mut diagnostics = Diagnostics::new();
    let ranges: Vec<DataRange> = descriptors
        .iter()
        .map(|descriptor| {
            if descriptor.kind.is_overlayable() {
                value_range(descriptor)
            } else {
                DataRange::NEUTRAL
            }
        })
        .collect();
    let requests: Vec<AxisRequest> = entries.iter().map(|entry| entry.y_axis).collect();
    let sides = assign_axes(
        &requests,
        &ranges,
        threshold,
        style.overlay_warn_scale_groups,
        &mut diagnostics,
    );

    let bar_mode = options.bar_mode.unwrap_or(style.overlay_bar_mode);
    let bindings: Vec<ResolvedBinding> = entries
        .iter()
        .zip(&descriptors)
        .zip(&sides)
        .map(|((entry, descriptor), side)| ResolvedBinding {
            descriptor: (*descriptor).clone(),
            requested: entry.y_axis,
            axis: *side,
            z_order: entry.z_order,
            legend_label: entry.legend_label.map(str::to_owned),
            color: entry.color,
        })
        .collect();
    let settings = overlay_settings(&options);
    let overlay = OverlayMetadata {
        bindings,
        options,
        bar_mode,
        threshold,
    };
    warn_thin_bars(&overlay, style, &mut diagnostics);

    let figure = render_overlay(&overlay, style, &mut diagnostics)?;
    let series = descriptors
        .iter()
        .flat_map(|descriptor| descriptor.series.iter().cloned())
        .collect();
    let mut descriptor =
        ChartDescriptor::new(ChartKind::Overlay, series, settings, style.clone());
    debug!(
        charts = overlay.bindings.len(),
        right_axis = overlay.has_right_axis(),
        bar_mode = ?overlay.bar_mode,
        "overlay bindings resolved"
    );
    descriptor.overlay = Some(overlay);
    info!(
        charts = entries.len(),
        warnings = diagnostics.len(),
        "overlay chart composed"
    );

    Ok(ChartOutput {
        chart: RenderedChart::new(figure, descriptor),
        diagnostics,
    })
}

fn warn_thin_bars(overlay: &OverlayMetadata, style: &StyleConfig, diagnostics: &mut Diagnostics) {
    let [left, right] = overlay.bar_series_per_axis();
    let bar_series = left + right;
    if overlay.bar_mode != BarMode::Group || !style.overlay_warn_thin_bars || bar_series < 2 {
        return;
    }
    let width = style.bar_width / bar_series as f64;
    if width < style.overlay_thin_bar_threshold {
        diagnostics.push(CompositionWarning::ThinBars { width, bar_series });
    }
}

fn overlay_settings(options: &OverlayOptions) -> ChartSettings {
    ChartSettings {
        title: options.title.clone(),
        xlabel: options.xlabel.clone(),
        ylabel: options.ylabel_left.clone(),
        figsize: options.figsize,
        xmin: options.xmin,
        xmax: options.xmax,
        ymin: options.ymin,
        ymax: options.ymax,
        show_legend: options.show_legend,
        show_grid: options.show_grid,
        ..ChartSettings::default()
    }
}

#[cfg(test)]
mod tests {
    use super::{OverlayEntry, overlay_chart};
    use crate::chart::{BarSeries, ChartSettings, OverlayOptions, RenderedChart};
    use crate::error::ChartError;
    use crate::render::Figure;
    use crate::style::StyleConfig;

    #[test]
    fn bare_figures_are_rejected_with_their_index() {
        let style = StyleConfig::default();
        let bars = crate::api::bar_chart(
            vec![BarSeries::new(["a"], vec![1.0])],
            ChartSettings::default(),
            &style,
        )
        .expect("bar chart")
        .chart;
        let bare = RenderedChart::bare(Figure::single(style.figsize));

        let error = overlay_chart(
            &[OverlayEntry::new(&bars), OverlayEntry::new(&bare)],
            OverlayOptions::default(),
            &style,
        )
        .expect_err("missing descriptor");
        assert_eq!(error, ChartError::MissingDescriptor { index: 1 });

        let error = overlay_chart(
            &[OverlayEntry::default()],
            OverlayOptions::default(),
            &style,
        )
        .expect_err("missing figure");
        assert_eq!(error, ChartError::MissingFigure { index: 0 });
    }
}
