use chart_compose::chart::{AxisRequest, AxisSide};
use chart_compose::compose::{Diagnostics, assign_axes, cluster_by_compatibility, scale_compatible};
use chart_compose::core::DataRange;
use proptest::prelude::*;

fn range_strategy() -> impl Strategy<Value = DataRange> {
    (-1.0e6f64..1.0e6, 0.0f64..1.0e6).prop_map(|(min, span)| DataRange::new(min, min + span))
}

proptest! {
    #[test]
    fn compatibility_is_symmetric(
        first in range_strategy(),
        second in range_strategy(),
        threshold in 1.0f64..100.0
    ) {
        prop_assert_eq!(
            scale_compatible(first, second, threshold),
            scale_compatible(second, first, threshold)
        );
    }

    #[test]
    fn degenerate_range_is_compatible_with_any_range(
        value in -1.0e6f64..1.0e6,
        other in range_strategy(),
        threshold in 1.0f64..100.0
    ) {
        let flat = DataRange::new(value, value);
        prop_assert!(scale_compatible(flat, other, threshold));
        prop_assert!(scale_compatible(other, flat, threshold));
    }

    #[test]
    fn clusters_partition_every_index_once(
        ranges in prop::collection::vec(range_strategy(), 0..12),
        threshold in 1.5f64..20.0
    ) {
        let groups = cluster_by_compatibility(&ranges, threshold);
        let mut seen: Vec<usize> = groups.iter().flat_map(|group| group.iter().copied()).collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..ranges.len()).collect::<Vec<_>>());

        for group in &groups {
            for (position, first) in group.iter().enumerate() {
                for second in &group[position + 1..] {
                    prop_assert!(scale_compatible(ranges[*first], ranges[*second], threshold));
                }
            }
        }
    }

    #[test]
    fn clustering_is_deterministic(
        ranges in prop::collection::vec(range_strategy(), 0..12),
        threshold in 1.5f64..20.0
    ) {
        prop_assert_eq!(
            cluster_by_compatibility(&ranges, threshold),
            cluster_by_compatibility(&ranges, threshold)
        );
    }

    #[test]
    fn mutually_compatible_ranges_never_use_the_right_axis(
        base in 1.0f64..1_000.0,
        factors in prop::collection::vec(1.0f64..1.9, 1..8),
        offsets in prop::collection::vec(-1.0e4f64..1.0e4, 8)
    ) {
        let ranges: Vec<DataRange> = factors
            .iter()
            .zip(&offsets)
            .map(|(factor, offset)| DataRange::new(*offset, offset + base * factor))
            .collect();
        let requests = vec![AxisRequest::Auto; ranges.len()];
        let mut diagnostics = Diagnostics::new();
        let sides = assign_axes(&requests, &ranges, 2.0, true, &mut diagnostics);
        prop_assert!(sides.iter().all(|side| *side == AxisSide::Left));
        prop_assert!(diagnostics.is_empty());
    }
}
