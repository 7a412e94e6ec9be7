//! Property-based tests for the healing pass.
//!
//! These tests generate roads with scrambled profile lists and verify the
//! healing invariants: strict monotonicity after healing, idempotence, and
//! input immutability.
//!
//! Run with: cargo test -p opendrive-eval -- proptest

use opendrive_eval::{evaluate_non_fatal, EvalConfig, MessageCode};
use opendrive_types::{
    ElevationProfile, GeometryKind, LaneSection, Lanes, LateralProfile, Link, OpendriveModel,
    PlanViewGeometry, Poly3Entry, Road, TrafficRule,
};
use proptest::prelude::*;

// =============================================================================
// Strategies for generating roads with messy profile data
// =============================================================================

/// Generate an arbitrary s-value within a 100 m road.
fn arb_s() -> impl Strategy<Value = f64> {
    0.0..100.0f64
}

/// Generate a poly3 entry at an arbitrary position.
fn arb_poly_entry() -> impl Strategy<Value = Poly3Entry> {
    (arb_s(), -10.0..10.0f64, -1.0..1.0f64).prop_map(|(s, a, b)| Poly3Entry {
        s,
        a,
        b,
        c: 0.0,
        d: 0.0,
    })
}

/// A road with arbitrary (possibly unsorted, duplicated) profile lists.
fn arb_road() -> impl Strategy<Value = Road> {
    (
        prop::collection::vec(arb_poly_entry(), 0..12),
        prop::collection::vec(arb_poly_entry(), 0..12),
        prop::collection::vec(arb_poly_entry(), 0..8),
        prop::collection::vec(arb_s(), 1..6),
    )
        .prop_map(|(elevations, superelevations, offsets, section_positions)| Road {
            id: "p".into(),
            name: String::new(),
            length: 100.0,
            junction: None,
            rule: TrafficRule::Rht,
            plan_view: vec![PlanViewGeometry {
                s: 0.0,
                x: 0.0,
                y: 0.0,
                hdg: 0.0,
                length: 100.0,
                kind: GeometryKind::Line,
            }],
            elevation_profile: Some(ElevationProfile {
                entries: elevations,
            }),
            lateral_profile: LateralProfile {
                superelevation: superelevations,
                shape: Vec::new(),
            },
            lanes: Lanes {
                lane_offset: offsets,
                sections: section_positions
                    .into_iter()
                    .map(|s| LaneSection {
                        s,
                        ..LaneSection::default()
                    })
                    .collect(),
            },
            objects: Vec::new(),
            signals: Vec::new(),
            link: Link::default(),
        })
}

fn strictly_increasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}

proptest! {
    /// After healing, every s-keyed list is strictly increasing.
    #[test]
    fn healed_lists_are_strictly_sorted(road in arb_road()) {
        let model = OpendriveModel {
            roads: vec![road],
            ..OpendriveModel::default()
        };
        let (healed, _) = evaluate_non_fatal(&model, &EvalConfig::default());
        let road = &healed.roads[0];

        if let Some(profile) = &road.elevation_profile {
            let s: Vec<f64> = profile.entries.iter().map(|e| e.s).collect();
            prop_assert!(strictly_increasing(&s));
        }
        let s: Vec<f64> = road.lateral_profile.superelevation.iter().map(|e| e.s).collect();
        prop_assert!(strictly_increasing(&s));
        let s: Vec<f64> = road.lanes.lane_offset.iter().map(|e| e.s).collect();
        prop_assert!(strictly_increasing(&s));
        let s: Vec<f64> = road.lanes.sections.iter().map(|e| e.s).collect();
        prop_assert!(strictly_increasing(&s));
    }

    /// Healing a healed model is a no-op with an empty report.
    #[test]
    fn healing_is_idempotent(road in arb_road()) {
        let model = OpendriveModel {
            roads: vec![road],
            ..OpendriveModel::default()
        };
        let (healed, _) = evaluate_non_fatal(&model, &EvalConfig::default());
        let (rehealed, report) = evaluate_non_fatal(&healed, &EvalConfig::default());
        prop_assert!(report.is_empty(), "second pass reported: {:?}", report.messages());
        prop_assert_eq!(healed, rehealed);
    }

    /// The input model is never mutated.
    #[test]
    fn input_is_untouched(road in arb_road()) {
        let model = OpendriveModel {
            roads: vec![road],
            ..OpendriveModel::default()
        };
        let before = model.clone();
        let _ = evaluate_non_fatal(&model, &EvalConfig::default());
        prop_assert_eq!(model, before);
    }

    /// Dropped-entry counts in the report match the list shrinkage.
    #[test]
    fn drop_counts_match(road in arb_road()) {
        let input_total = road.elevation_profile.as_ref().map_or(0, |p| p.entries.len())
            + road.lateral_profile.superelevation.len()
            + road.lanes.lane_offset.len()
            + road.lanes.sections.len();

        let model = OpendriveModel {
            roads: vec![road],
            ..OpendriveModel::default()
        };
        let (healed, report) = evaluate_non_fatal(&model, &EvalConfig::default());
        let healed_road = &healed.roads[0];
        let healed_total = healed_road.elevation_profile.as_ref().map_or(0, |p| p.entries.len())
            + healed_road.lateral_profile.superelevation.len()
            + healed_road.lanes.lane_offset.len()
            + healed_road.lanes.sections.len();

        let reported: usize = report
            .messages()
            .iter()
            .filter(|m| {
                m.code == MessageCode::NonStrictlySortedList
                    || m.code == MessageCode::UnexpectedValue
            })
            .filter_map(|m| m.location.as_ref())
            .filter_map(|loc| loc.get("dropped_count"))
            .filter_map(|v| v.parse::<usize>().ok())
            .sum();

        prop_assert_eq!(input_total - healed_total, reported);
    }
}
