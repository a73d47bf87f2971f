use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::{BarMode, DrawStyle, FigureSize};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

use super::{Palette, Theme};

/// Explicit style configuration threaded through every render call.
///
/// Descriptors keep a copy of the config they were rendered with, so replaying
/// a chart later reproduces the same colors and sizes regardless of what the
/// caller uses for new charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub theme: Theme,

    pub color_singular: Palette,
    pub color_multiple: Palette,
    pub color_parallel_hue: Palette,
    pub heatmap_palette: Palette,

    pub figsize: FigureSize,
    pub dpi: f64,
    pub background_color: Color,

    pub font_color: Color,
    pub font_size: f64,
    pub title_font_size: f64,
    pub subtitle_font_size: f64,
    pub label_font_size: f64,
    pub tick_label_size: f64,
    pub tick_length: f64,
    pub tick_count: usize,
    pub spine_width: f64,
    pub spine_color: Color,

    pub legend_font_size: f64,
    pub legend_title_size: f64,
    pub legend_frame_color: Color,

    pub grid_color: Color,
    pub grid_width: f64,

    pub line_width: f64,
    pub line_alpha: f64,
    pub line_drawstyle: DrawStyle,
    pub area_alpha: f64,

    pub bar_width: f64,
    pub bar_alpha: f64,
    pub bar_edge_width: f64,
    pub bar_edge_color: Color,
    pub bar_error_color: Color,
    pub bar_value_font_size: f64,
    pub bar_value_color: Color,

    pub hist_alpha: f64,
    pub hist_edge_width: f64,
    pub hist_edge_color: Color,
    pub hist_bins: usize,

    pub scatter_size: f64,
    pub scatter_alpha: f64,
    pub scatter_size_range: (f64, f64),
    pub regression_width: f64,
    pub regression_ci_alpha: f64,
    pub ci_level: f64,

    pub refline_color: Option<Color>,
    pub refline_width: f64,

    pub heatmap_font_size: f64,
    pub heatmap_font_color: Color,

    pub box_width: f64,
    pub box_alpha: f64,
    pub box_edge_color: Color,
    pub box_median_color: Color,

    pub parallel_line_width: f64,
    pub parallel_line_alpha: f64,
    pub parallel_axis_color: Color,

    pub overlay_auto_threshold: f64,
    pub overlay_bar_mode: BarMode,
    pub overlay_bar_alpha: f64,
    pub overlay_hist_alpha: f64,
    pub overlay_zorder_bar: i32,
    pub overlay_zorder_hist: i32,
    pub overlay_zorder_line: i32,
    pub overlay_zorder_scatter: i32,
    pub overlay_warn_scale_groups: bool,
    pub overlay_warn_thin_bars: bool,
    pub overlay_thin_bar_threshold: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::for_theme(Theme::Default)
    }
}

impl StyleConfig {
    #[must_use]
    pub fn for_theme(theme: Theme) -> Self {
        let black = Color::BLACK;
        let base = Self {
            theme,
            color_singular: Palette::Blue,
            color_multiple: Palette::Spectral,
            color_parallel_hue: Palette::Spectral,
            heatmap_palette: Palette::Blue,
            figsize: FigureSize::DEFAULT,
            dpi: 100.0,
            background_color: Color::WHITE,
            font_color: black,
            font_size: 11.0,
            title_font_size: 12.0,
            subtitle_font_size: 11.0,
            label_font_size: 10.0,
            tick_label_size: 9.0,
            tick_length: 2.0,
            tick_count: 5,
            spine_width: 0.5,
            spine_color: black,
            legend_font_size: 9.0,
            legend_title_size: 10.0,
            legend_frame_color: Color::rgb(204.0 / 255.0, 204.0 / 255.0, 204.0 / 255.0),
            grid_color: Color::rgb(230.0 / 255.0, 230.0 / 255.0, 230.0 / 255.0),
            grid_width: 0.5,
            line_width: 1.0,
            line_alpha: 1.0,
            line_drawstyle: DrawStyle::Default,
            area_alpha: 0.3,
            bar_width: 0.8,
            bar_alpha: 1.0,
            bar_edge_width: 0.5,
            bar_edge_color: black,
            bar_error_color: black,
            bar_value_font_size: 9.0,
            bar_value_color: black,
            hist_alpha: 1.0,
            hist_edge_width: 0.5,
            hist_edge_color: black,
            hist_bins: 20,
            scatter_size: 36.0,
            scatter_alpha: 1.0,
            scatter_size_range: (20.0, 200.0),
            regression_width: 1.5,
            regression_ci_alpha: 0.2,
            ci_level: 0.95,
            refline_color: None,
            refline_width: 1.0,
            heatmap_font_size: 9.0,
            heatmap_font_color: black,
            box_width: 0.5,
            box_alpha: 1.0,
            box_edge_color: black,
            box_median_color: black,
            parallel_line_width: 1.0,
            parallel_line_alpha: 0.6,
            parallel_axis_color: black,
            overlay_auto_threshold: 3.0,
            overlay_bar_mode: BarMode::Group,
            overlay_bar_alpha: 0.7,
            overlay_hist_alpha: 0.6,
            overlay_zorder_bar: 1,
            overlay_zorder_hist: 1,
            overlay_zorder_line: 2,
            overlay_zorder_scatter: 2,
            overlay_warn_scale_groups: true,
            overlay_warn_thin_bars: true,
            overlay_thin_bar_threshold: 0.15,
        };

        match theme {
            Theme::Default => base,
            Theme::Greyscale => Self {
                color_singular: Palette::Grey,
                color_multiple: Palette::Grey,
                color_parallel_hue: Palette::Grey,
                heatmap_palette: Palette::Grey,
                refline_color: Some(black),
                ..base
            },
        }
    }

    /// Sets figure size in inches.
    #[must_use]
    pub fn with_figsize(mut self, figsize: FigureSize) -> Self {
        self.figsize = figsize;
        self
    }

    #[must_use]
    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }

    /// Sets the palette used when a chart holds several series.
    #[must_use]
    pub fn with_color_multiple(mut self, palette: Palette) -> Self {
        self.color_multiple = palette;
        self
    }

    #[must_use]
    pub fn with_color_singular(mut self, palette: Palette) -> Self {
        self.color_singular = palette;
        self
    }

    #[must_use]
    pub fn with_bar_width(mut self, bar_width: f64) -> Self {
        self.bar_width = bar_width;
        self
    }

    /// Sets the span ratio above which two charts get separate axes.
    #[must_use]
    pub fn with_overlay_auto_threshold(mut self, threshold: f64) -> Self {
        self.overlay_auto_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_overlay_bar_mode(mut self, mode: BarMode) -> Self {
        self.overlay_bar_mode = mode;
        self
    }

    #[must_use]
    pub fn with_hist_bins(mut self, bins: usize) -> Self {
        self.hist_bins = bins;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.figsize.validate()?;
        ensure_positive("dpi", self.dpi)?;
        for (name, value) in [
            ("font_size", self.font_size),
            ("title_font_size", self.title_font_size),
            ("subtitle_font_size", self.subtitle_font_size),
            ("label_font_size", self.label_font_size),
            ("tick_label_size", self.tick_label_size),
            ("legend_font_size", self.legend_font_size),
            ("legend_title_size", self.legend_title_size),
            ("heatmap_font_size", self.heatmap_font_size),
            ("bar_value_font_size", self.bar_value_font_size),
            ("line_width", self.line_width),
            ("scatter_size", self.scatter_size),
            ("overlay_auto_threshold", self.overlay_auto_threshold),
        ] {
            ensure_positive(name, value)?;
        }
        for (name, value) in [
            ("line_alpha", self.line_alpha),
            ("area_alpha", self.area_alpha),
            ("bar_alpha", self.bar_alpha),
            ("hist_alpha", self.hist_alpha),
            ("scatter_alpha", self.scatter_alpha),
            ("box_alpha", self.box_alpha),
            ("parallel_line_alpha", self.parallel_line_alpha),
            ("regression_ci_alpha", self.regression_ci_alpha),
            ("overlay_bar_alpha", self.overlay_bar_alpha),
            ("overlay_hist_alpha", self.overlay_hist_alpha),
        ] {
            ensure_unit_interval(name, value)?;
        }
        if !self.bar_width.is_finite() || self.bar_width <= 0.0 || self.bar_width > 1.0 {
            return Err(ChartError::InvalidData(
                "bar_width must be in (0, 1]".to_owned(),
            ));
        }
        if !self.box_width.is_finite() || self.box_width <= 0.0 || self.box_width > 1.0 {
            return Err(ChartError::InvalidData(
                "box_width must be in (0, 1]".to_owned(),
            ));
        }
        if self.hist_bins == 0 {
            return Err(ChartError::InvalidData("hist_bins must be > 0".to_owned()));
        }
        if self.tick_count < 2 {
            return Err(ChartError::InvalidData("tick_count must be >= 2".to_owned()));
        }
        if !(self.ci_level > 0.0 && self.ci_level < 1.0) {
            return Err(ChartError::InvalidData(
                "ci_level must be in (0, 1)".to_owned(),
            ));
        }
        let (min_size, max_size) = self.scatter_size_range;
        if !min_size.is_finite() || !max_size.is_finite() || min_size <= 0.0 || min_size > max_size
        {
            return Err(ChartError::InvalidData(
                "scatter_size_range must be finite with 0 < min <= max".to_owned(),
            ));
        }
        Ok(())
    }

    /// Applies a partial JSON object on top of this config.
    ///
    /// Returns the keys that do not name a config field; they are ignored.
    /// The config is left untouched when any known value has the wrong shape
    /// or the result fails validation.
    pub fn update(&mut self, patch: &Value) -> ChartResult<Vec<String>> {
        let Value::Object(entries) = patch else {
            return Err(ChartError::InvalidData(
                "style update must be a JSON object".to_owned(),
            ));
        };

        let mut current = serde_json::to_value(&*self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize style: {e}")))?;
        let Value::Object(fields) = &mut current else {
            return Err(ChartError::InvalidData(
                "style config did not serialize to an object".to_owned(),
            ));
        };

        let mut unknown = Vec::new();
        for (key, value) in entries {
            match fields.get_mut(key) {
                Some(slot) => *slot = value.clone(),
                None => {
                    warn!(key = %key, "ignoring unknown style key");
                    unknown.push(key.clone());
                }
            }
        }

        let updated: Self = serde_json::from_value(current)
            .map_err(|e| ChartError::InvalidData(format!("failed to apply style update: {e}")))?;
        updated.validate()?;
        debug!(keys = entries.len(), unknown = unknown.len(), "style config updated");
        *self = updated;
        Ok(unknown)
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize style: {e}")))
    }

    /// Deserializes config from JSON; missing fields take default values.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse style: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Default z-order for a chart type painted onto an overlay axes.
    #[must_use]
    pub fn overlay_default_zorder(&self, kind: crate::chart::ChartKind) -> i32 {
        use crate::chart::ChartKind;
        match kind {
            ChartKind::Bar => self.overlay_zorder_bar,
            ChartKind::Histogram => self.overlay_zorder_hist,
            ChartKind::Line => self.overlay_zorder_line,
            ChartKind::Scatter => self.overlay_zorder_scatter,
            _ => 1,
        }
    }
}

fn ensure_positive(name: &str, value: f64) -> ChartResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ChartError::InvalidData(format!(
            "{name} must be finite and > 0"
        )));
    }
    Ok(())
}

fn ensure_unit_interval(name: &str, value: f64) -> ChartResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ChartError::InvalidData(format!("{name} must be in [0, 1]")));
    }
    Ok(())
}
