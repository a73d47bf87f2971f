use tracing::debug;

use crate::chart::AxisSide;
use crate::render::{LegendEntry, Panel};

pub const LEGEND_TITLE: &str = "Legend";

/// Merges the legend handles of both axes of `panel` into one legend on the
/// left axes.
///
/// When the panel has a right axes every label is suffixed with the side it
/// belongs to. A panel without labelled artists is left untouched.
pub fn combine_legends(panel: &mut Panel) {
    let left = panel.left.legend_handles();
    let entries: Vec<LegendEntry> = match &panel.right {
        Some(right) => suffixed(left, AxisSide::Left)
            .chain(suffixed(right.legend_handles(), AxisSide::Right))
            .collect(),
        None => left,
    };
    if entries.is_empty() {
        return;
    }
    debug!(
        entries = entries.len(),
        dual_axis = panel.has_right(),
        "legends combined"
    );
    if let Some(right) = panel.right.as_mut() {
        right.legend = None;
    }
    panel.left.set_legend(LEGEND_TITLE, entries);
}

fn suffixed(entries: Vec<LegendEntry>, side: AxisSide) -> impl Iterator<Item = LegendEntry> {
    entries.into_iter().map(move |mut entry| {
        entry.label.push_str(side.legend_suffix());
        entry
    })
}
