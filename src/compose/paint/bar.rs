use tracing::trace;

use crate::chart::format::format_value;
use crate::chart::{AxisSide, BarSeries};
use crate::compose::{CompositionWarning, Diagnostics};
use crate::core::{BarMode, Orientation};
use crate::render::{
    Artist, ArtistKind, Axes, BarGeometry, CategoryTicks, TextAnchor, TextHAlign,
};

use super::{PaintContext, paint_reference_lines};

const BAR_VALUE_FORMAT: &str = "{:.1f}";

#[derive(Debug, Clone, Default, PartialEq)]
struct StackState {
    bottoms: Option<Vec<f64>>,
    remaining: usize,
}

/// Shared slot arithmetic for every bar series drawn on one panel.
///
/// In group mode the configured width is split evenly between `slots`
/// series; each painted series takes the next slot. In stack mode each axis
/// keeps a running baseline per category. Overlay mode draws every series at
/// full width in the same place.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    mode: BarMode,
    width: f64,
    slots: usize,
    next_slot: usize,
    stacks: [StackState; 2],
    categories: Vec<String>,
    orientation: Orientation,
}

impl BarLayout {
    #[must_use]
    pub fn new(mode: BarMode, width: f64, slots: usize) -> Self {
        Self {
            mode,
            width,
            slots: slots.max(1),
            next_slot: 0,
            stacks: [StackState::default(), StackState::default()],
            categories: Vec::new(),
            orientation: Orientation::Vertical,
        }
    }

    /// Declares how many non-empty stacked series each axis will receive, so
    /// error bars are kept for the last drawn one only.
    #[must_use]
    pub fn with_stack_sizes(mut self, left: usize, right: usize) -> Self {
        self.stacks[0].remaining = left;
        self.stacks[1].remaining = right;
        self
    }

    #[must_use]
    pub fn mode(&self) -> BarMode {
        self.mode
    }

    /// Thickness of one bar.
    #[must_use]
    pub fn bar_width(&self) -> f64 {
        match self.mode {
            BarMode::Group => self.width / self.slots as f64,
            BarMode::Stack | BarMode::Overlay => self.width,
        }
    }

    /// Running stack totals of one axis, if any series was stacked there.
    #[must_use]
    pub fn stack_tops(&self, side: AxisSide) -> Option<&[f64]> {
        self.stacks[side_index(side)].bottoms.as_deref()
    }

    /// Category labels centred under each group of bars.
    #[must_use]
    pub fn category_ticks(&self) -> Option<CategoryTicks> {
        if self.categories.is_empty() {
            return None;
        }
        let centre = match self.mode {
            BarMode::Group => (self.slots - 1) as f64 / 2.0 * self.bar_width(),
            BarMode::Stack | BarMode::Overlay => 0.0,
        };
        Some(CategoryTicks {
            positions: (0..self.categories.len())
                .map(|index| index as f64 + centre)
                .collect(),
            labels: self.categories.clone(),
        })
    }

    /// Installs the category ticks on the category axis of `axes`.
    pub fn apply_ticks(&self, axes: &mut Axes) {
        let Some(ticks) = self.category_ticks() else {
            return;
        };
        match self.orientation {
            Orientation::Vertical => axes.x_ticks = Some(ticks),
            Orientation::Horizontal => axes.y_ticks = Some(ticks),
        }
    }

    fn take_offset(&mut self) -> f64 {
        let slot = self.next_slot;
        self.next_slot += 1;
        match self.mode {
            BarMode::Group => (slot % self.slots) as f64 * self.bar_width(),
            BarMode::Stack | BarMode::Overlay => 0.0,
        }
    }

    fn record_categories(&mut self, labels: &[String]) {
        if labels.len() > self.categories.len() {
            self.categories = labels.to_vec();
        }
    }
}

fn side_index(side: AxisSide) -> usize {
    match side {
        AxisSide::Left => 0,
        AxisSide::Right => 1,
    }
}

/// Paints bar series on `axes`, which is the `side` axis of its panel.
pub(crate) fn paint_bars(
    axes: &mut Axes,
    side: AxisSide,
    series: &[&BarSeries],
    ctx: &PaintContext<'_>,
    layout: &mut BarLayout,
    diagnostics: &mut Diagnostics,
) {
    let orientation = ctx.settings.orientation();
    layout.orientation = orientation;
    let mut cycle = ctx.color_cycle(series.len());
    let thickness = layout.bar_width();
    let overlaid_alpha = (layout.mode == BarMode::Overlay && layout.slots > 1)
        .then_some(ctx.style.overlay_bar_alpha);

    for bars in series {
        let cycled = cycle.next_color();
        let series_index = layout.next_slot;
        let offset = layout.take_offset();
        if bars.values.is_empty() {
            continue;
        }
        layout.record_categories(&bars.labels);

        let stacking = layout.mode == BarMode::Stack;
        let mut is_last_stacked = false;
        let bases = if stacking {
            let stack = &mut layout.stacks[side_index(side)];
            stack.remaining = stack.remaining.saturating_sub(1);
            is_last_stacked = stack.remaining == 0;
            let bottoms = stack
                .bottoms
                .get_or_insert_with(|| vec![0.0; bars.values.len()]);
            if bottoms.len() != bars.values.len() {
                diagnostics.push(CompositionWarning::StackLengthMismatch {
                    series: series_index,
                    expected: bottoms.len(),
                    found: bars.values.len(),
                });
                if bottoms.len() < bars.values.len() {
                    bottoms.resize(bars.values.len(), 0.0);
                }
            }
            let bases: Vec<f64> = bottoms[..bars.values.len()].to_vec();
            for (bottom, value) in bottoms.iter_mut().zip(&bars.values) {
                if value.is_finite() {
                    *bottom += value;
                }
            }
            bases
        } else {
            vec![0.0; bars.values.len()]
        };

        let show_errors = ctx.settings.show_yerr && (!stacking || is_last_stacked);
        let errors = bars.errors.as_ref().filter(|_| show_errors);

        let geometry: Vec<BarGeometry> = bars
            .values
            .iter()
            .enumerate()
            .map(|(category, value)| BarGeometry {
                position: category as f64 + offset,
                base: bases[category],
                value: *value,
                thickness,
                error: errors.and_then(|errors| errors.get(category).copied()),
            })
            .collect();

        let base_color = ctx.series_color(&bars.style, cycled);
        let alpha = overlaid_alpha
            .or(bars.style.alpha)
            .unwrap_or(ctx.style.bar_alpha);

        if ctx.settings.show_values {
            let template = ctx
                .settings
                .value_format
                .as_deref()
                .unwrap_or(BAR_VALUE_FORMAT);
            for bar in &geometry {
                if !bar.value.is_finite() {
                    continue;
                }
                let (x, y, h_align) = match orientation {
                    Orientation::Vertical => (bar.position, bar.top(), TextHAlign::Center),
                    Orientation::Horizontal => (bar.top(), bar.position, TextHAlign::Left),
                };
                axes.add_artist(Artist::new(
                    ArtistKind::Text {
                        x,
                        y,
                        text: format_value(template, bar.value),
                        font_size: ctx.style.bar_value_font_size,
                        h_align,
                        anchor: TextAnchor::Data,
                    },
                    ctx.style.bar_value_color,
                    ctx.z_order,
                ));
            }
        }

        trace!(
            bars = geometry.len(),
            offset,
            mode = ?layout.mode,
            side = %side,
            "bar series painted"
        );
        axes.add_artist(
            Artist::new(
                ArtistKind::Bars {
                    bars: geometry,
                    orientation,
                    edge_width: ctx.style.bar_edge_width,
                    edge_color: ctx.style.bar_edge_color,
                    error_color: ctx.style.bar_error_color,
                },
                base_color.with_alpha(alpha),
                ctx.z_order,
            )
            .with_label(ctx.series_label(bars.label.as_deref())),
        );
        paint_reference_lines(axes, &bars.reference_lines, base_color, ctx);
    }
}
