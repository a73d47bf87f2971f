use smallvec::SmallVec;
use tracing::debug;

use crate::chart::{AxisRequest, AxisSide};
use crate::compose::{CompositionWarning, Diagnostics};
use crate::core::DataRange;

/// Chart indices judged mutually scale-compatible.
pub type ScaleGroup = SmallVec<[usize; 4]>;

/// Whether two ranges are close enough in magnitude to share one axis.
///
/// Degenerate ranges are compatible with everything; otherwise the larger
/// span must be less than `threshold` times the smaller one.
#[must_use]
pub fn scale_compatible(first: DataRange, second: DataRange, threshold: f64) -> bool {
    let first_span = first.span().abs();
    let second_span = second.span().abs();
    if first_span == 0.0 || second_span == 0.0 {
        return true;
    }
    first_span.max(second_span) / first_span.min(second_span) < threshold
}

/// Greedy partition into groups whose members are pairwise compatible.
///
/// Charts are visited in index order; each joins the first open group
/// compatible with every member, or starts a new one.
#[must_use]
pub fn cluster_by_compatibility(ranges: &[DataRange], threshold: f64) -> Vec<ScaleGroup> {
    let mut groups: Vec<ScaleGroup> = Vec::new();
    let mut assigned = vec![false; ranges.len()];

    for seed in 0..ranges.len() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut group: ScaleGroup = SmallVec::new();
        group.push(seed);

        for candidate in seed + 1..ranges.len() {
            if assigned[candidate] {
                continue;
            }
            let fits = group
                .iter()
                .all(|member| scale_compatible(ranges[*member], ranges[candidate], threshold));
            if fits {
                group.push(candidate);
                assigned[candidate] = true;
            }
        }
        groups.push(group);
    }
    groups
}

/// Resolves the value axis of every chart.
///
/// When every request is `Auto` and `clustering` is enabled, the largest
/// compatibility group goes left, the second largest right, and any further
/// groups are merged onto the left with a warning. Otherwise charts are
/// placed in order: explicit requests are honoured, the first chart defaults
/// to the left axis, and later `Auto` charts join the left axis only when
/// compatible with a chart already placed there.
pub fn assign_axes(
    requests: &[AxisRequest],
    ranges: &[DataRange],
    threshold: f64,
    clustering: bool,
    diagnostics: &mut Diagnostics,
) -> Vec<AxisSide> {
    let count = requests.len().min(ranges.len());
    if count == 0 {
        return Vec::new();
    }
    let ranges = &ranges[..count];
    let requests = &requests[..count];

    let all_auto = requests.iter().all(|request| *request == AxisRequest::Auto);
    if all_auto && clustering {
        return assign_by_clusters(ranges, threshold, diagnostics);
    }

    let mut assignments: Vec<AxisSide> = Vec::with_capacity(count);
    for (index, request) in requests.iter().enumerate() {
        let side = match request.explicit() {
            Some(side) => side,
            None if index == 0 => AxisSide::Left,
            None => {
                let fits_left = assignments.iter().enumerate().any(|(placed, side)| {
                    *side == AxisSide::Left
                        && scale_compatible(ranges[index], ranges[placed], threshold)
                });
                if fits_left {
                    AxisSide::Left
                } else {
                    AxisSide::Right
                }
            }
        };
        debug!(index, side = %side, requested = ?request, "axis assigned");
        assignments.push(side);
    }

    for side in [AxisSide::Right, AxisSide::Left] {
        if let Some((first, second)) = first_incompatible_pair(&assignments, ranges, side, threshold)
        {
            diagnostics.push(CompositionWarning::IncompatibleScalesOnAxis {
                side,
                first,
                second,
            });
        }
    }
    assignments
}

fn assign_by_clusters(
    ranges: &[DataRange],
    threshold: f64,
    diagnostics: &mut Diagnostics,
) -> Vec<AxisSide> {
    let mut groups = cluster_by_compatibility(ranges, threshold);
    groups.sort_by(|left, right| right.len().cmp(&left.len()));

    let mut assignments = vec![AxisSide::Left; ranges.len()];
    if let Some(second) = groups.get(1) {
        for index in second {
            assignments[*index] = AxisSide::Right;
        }
    }
    debug!(
        groups = groups.len(),
        right = assignments.iter().filter(|side| **side == AxisSide::Right).count(),
        "axes assigned by scale clustering"
    );

    if groups.len() > 2 {
        diagnostics.push(CompositionWarning::ScaleGroupOverflow {
            groups: groups.len(),
            sizes: groups.iter().map(|group| group.len()).collect(),
        });
    }
    assignments
}

fn first_incompatible_pair(
    assignments: &[AxisSide],
    ranges: &[DataRange],
    side: AxisSide,
    threshold: f64,
) -> Option<(usize, usize)> {
    let members: SmallVec<[usize; 8]> = assignments
        .iter()
        .enumerate()
        .filter_map(|(index, assigned)| (*assigned == side).then_some(index))
        .collect();
    members.iter().enumerate().find_map(|(position, first)| {
        members[position + 1..]
            .iter()
            .find(|second| !scale_compatible(ranges[*first], ranges[**second], threshold))
            .map(|second| (*first, *second))
    })
}

#[cfg(test)]
mod tests {
    use super::{assign_axes, cluster_by_compatibility, scale_compatible};
    use crate::chart::{AxisRequest, AxisSide};
    use crate::compose::{CompositionWarning, Diagnostics};
    use crate::core::DataRange;

    #[test]
    fn degenerate_ranges_are_always_compatible() {
        let flat = DataRange::new(5.0, 5.0);
        assert!(scale_compatible(flat, DataRange::new(0.0, 1e9), 3.0));
        assert!(scale_compatible(DataRange::new(0.0, 1e9), flat, 3.0));
    }

    #[test]
    fn ratio_equal_to_threshold_is_incompatible() {
        assert!(!scale_compatible(
            DataRange::new(0.0, 10.0),
            DataRange::new(0.0, 30.0),
            3.0
        ));
        assert!(scale_compatible(
            DataRange::new(0.0, 10.0),
            DataRange::new(0.0, 29.0),
            3.0
        ));
    }

    #[test]
    fn greedy_clusters_require_compatibility_with_every_member() {
        let ranges = [
            DataRange::new(0.0, 10.0),
            DataRange::new(0.0, 25.0),
            DataRange::new(0.0, 50.0),
        ];
        let groups = cluster_by_compatibility(&ranges, 3.0);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].as_slice(), &[0, 1]);
        assert_eq!(groups[1].as_slice(), &[2]);
    }

    #[test]
    fn overflow_groups_merge_left_with_a_warning() {
        let ranges = [
            DataRange::new(0.0, 1.0),
            DataRange::new(0.0, 100.0),
            DataRange::new(0.0, 10_000.0),
            DataRange::new(0.0, 1.5),
        ];
        let mut diagnostics = Diagnostics::new();
        let sides = assign_axes(&[AxisRequest::Auto; 4], &ranges, 3.0, true, &mut diagnostics);
        assert_eq!(
            sides,
            vec![AxisSide::Left, AxisSide::Right, AxisSide::Left, AxisSide::Left]
        );
        assert_eq!(
            diagnostics.warnings(),
            &[CompositionWarning::ScaleGroupOverflow {
                groups: 3,
                sizes: vec![2, 1, 1],
            }]
        );
    }

    #[test]
    fn explicit_policy_checks_only_left_predecessors() {
        let ranges = [
            DataRange::new(0.0, 10.0),
            DataRange::new(0.0, 1000.0),
            DataRange::new(0.0, 900.0),
        ];
        let requests = [AxisRequest::Left, AxisRequest::Right, AxisRequest::Auto];
        let mut diagnostics = Diagnostics::new();
        let sides = assign_axes(&requests, &ranges, 3.0, true, &mut diagnostics);
        assert_eq!(sides, vec![AxisSide::Left, AxisSide::Right, AxisSide::Right]);
        assert!(diagnostics.is_empty());
    }
}
