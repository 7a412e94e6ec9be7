//! Non-fatal evaluation: deterministic repairs over a cloned model.
//!
//! Repairs are organised as ordered plans of [`Rule`] values, each coupling a
//! stable diagnostic code to one repair function. The *basic-data-type* plan
//! fixes per-entity defects; the *modeling-rules* plan fixes cross-entity
//! inconsistencies. Healing is idempotent: running it on an already-healed
//! model reports nothing.

use opendrive_types::{OpendriveModel, Poly3Entry, ShapeEntry};

use crate::message::{DataQualityMessage, MessageCode, MessageList, Severity, SourceId};

/// Configuration of the non-fatal evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
    /// Keep lateral-profile shape records even when a non-zero lane offset
    /// exists.
    pub skip_road_shape_removal: bool,
    /// Tolerance for range clamping.
    pub tolerance: f64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            skip_road_shape_removal: false,
            tolerance: 1e-9,
        }
    }
}

/// One repair rule: a stable code plus the function applying it.
pub struct Rule {
    /// The code every message of this rule carries.
    pub code: MessageCode,
    /// Short rule name for logging.
    pub name: &'static str,
    /// The repair function.
    pub apply: fn(&mut OpendriveModel, &EvalConfig, &mut MessageList),
}

/// Per-entity repairs, run first.
#[must_use]
pub fn basic_data_type_plan() -> Vec<Rule> {
    vec![
        Rule {
            code: MessageCode::EmptyValueForOptionalAttribute,
            name: "clear-empty-optional-attributes",
            apply: clear_empty_optional_attributes,
        },
        Rule {
            code: MessageCode::NoElevationProfileElements,
            name: "clear-empty-elevation-profiles",
            apply: clear_empty_elevation_profiles,
        },
        Rule {
            code: MessageCode::NonStrictlySortedList,
            name: "drop-unsorted-profile-entries",
            apply: drop_unsorted_profile_entries,
        },
        Rule {
            code: MessageCode::NonSortedList,
            name: "sort-lane-sections",
            apply: sort_lane_sections,
        },
        Rule {
            code: MessageCode::NonStrictlySortedList,
            name: "drop-duplicate-lane-sections",
            apply: drop_duplicate_lane_sections,
        },
    ]
}

/// Cross-entity repairs, run after the basic plan.
#[must_use]
pub fn modeling_rules_plan() -> Vec<Rule> {
    vec![
        Rule {
            code: MessageCode::UnexpectedValue,
            name: "drop-out-of-range-entries",
            apply: drop_out_of_range_entries,
        },
        Rule {
            code: MessageCode::UnexpectedValue,
            name: "remove-shape-with-lane-offset",
            apply: remove_shape_with_lane_offset,
        },
        Rule {
            code: MessageCode::UnexpectedValue,
            name: "dedupe-junction-lane-links",
            apply: dedupe_junction_lane_links,
        },
    ]
}

/// Run both plans over a deep clone of the model.
///
/// Returns the healed model and every repair that was applied. The input is
/// never mutated.
#[must_use]
pub fn evaluate_non_fatal(
    model: &OpendriveModel,
    config: &EvalConfig,
) -> (OpendriveModel, MessageList) {
    let mut healed = model.clone();
    let mut messages = MessageList::new();

    for plan in [basic_data_type_plan(), modeling_rules_plan()] {
        for rule in &plan {
            let before = messages.len();
            (rule.apply)(&mut healed, config, &mut messages);
            let emitted = messages.len() - before;
            if emitted > 0 {
                tracing::debug!(rule = rule.name, code = %rule.code, emitted, "applied repair rule");
            }
        }
    }

    (healed, messages)
}

// ---------------------------------------------------------------------------
// basic-data-type rules
// ---------------------------------------------------------------------------

/// Replace a `Some(non-finite)` optional by `None`, reporting once per field.
fn clear_optional(
    value: &mut Option<f64>,
    field: &'static str,
    source: &SourceId,
    messages: &mut MessageList,
) {
    if let Some(v) = value {
        if !v.is_finite() {
            *value = None;
            messages.push(DataQualityMessage::fixed(
                MessageCode::EmptyValueForOptionalAttribute,
                source.clone(),
                Severity::Info,
                format!("cleared blank or non-finite optional attribute '{field}'"),
            ));
        }
    }
}

fn clear_empty_optional_attributes(
    model: &mut OpendriveModel,
    _config: &EvalConfig,
    messages: &mut MessageList,
) {
    if let Some(header) = &mut model.header {
        let source = SourceId::dataset().element("header");
        clear_optional(&mut header.north, "north", &source, messages);
        clear_optional(&mut header.south, "south", &source, messages);
        clear_optional(&mut header.east, "east", &source, messages);
        clear_optional(&mut header.west, "west", &source, messages);
    }

    for road in &mut model.roads {
        for (section_index, section) in road.lanes.sections.iter_mut().enumerate() {
            let lanes = section.left.iter_mut().chain(section.right.iter_mut());
            for lane in lanes {
                let source = SourceId::road(&road.id)
                    .lane_section(section_index)
                    .lane(lane.id);
                clear_optional(&mut lane.speed, "speed", &source, messages);
                for mark in &mut lane.road_marks {
                    clear_optional(&mut mark.width, "roadMark.width", &source, messages);
                }
                if let Some(material) = &mut lane.material {
                    clear_optional(&mut material.friction, "material.friction", &source, messages);
                    clear_optional(
                        &mut material.roughness,
                        "material.roughness",
                        &source,
                        messages,
                    );
                }
            }
        }
        for object in &mut road.objects {
            let source = SourceId::road(&road.id).element("object");
            clear_optional(&mut object.length, "length", &source, messages);
            clear_optional(&mut object.width, "width", &source, messages);
            clear_optional(&mut object.height, "height", &source, messages);
            clear_optional(&mut object.radius, "radius", &source, messages);
        }
    }
}

fn clear_empty_elevation_profiles(
    model: &mut OpendriveModel,
    _config: &EvalConfig,
    messages: &mut MessageList,
) {
    for road in &mut model.roads {
        let is_empty = road
            .elevation_profile
            .as_ref()
            .is_some_and(|p| p.entries.is_empty());
        if is_empty {
            road.elevation_profile = None;
            messages.push(DataQualityMessage::fixed(
                MessageCode::NoElevationProfileElements,
                SourceId::road(&road.id).element("elevationProfile"),
                Severity::Warning,
                "cleared elevation profile without elevation entries",
            ));
        }
    }
}

/// Keep the longest strictly-increasing run from the front; earliest survivor
/// wins. Returns the number of dropped entries.
fn drop_non_strict<T>(entries: &mut Vec<T>, key: impl Fn(&T) -> f64) -> usize {
    let mut kept: Vec<T> = Vec::with_capacity(entries.len());
    let mut dropped = 0usize;
    for entry in entries.drain(..) {
        let keep = kept.last().map_or(true, |last| key(&entry) > key(last));
        if keep {
            kept.push(entry);
        } else {
            dropped += 1;
        }
    }
    *entries = kept;
    dropped
}

/// Shape records: `s` groups must ascend; `t` must strictly ascend within a
/// group. Returns the number of dropped entries.
fn drop_non_strict_shape(entries: &mut Vec<ShapeEntry>) -> usize {
    let mut kept: Vec<ShapeEntry> = Vec::with_capacity(entries.len());
    let mut dropped = 0usize;
    for entry in entries.drain(..) {
        let keep = match kept.last() {
            None => true,
            Some(last) => entry.s > last.s || (entry.s == last.s && entry.t > last.t),
        };
        if keep {
            kept.push(entry);
        } else {
            dropped += 1;
        }
    }
    *entries = kept;
    dropped
}

fn report_dropped(
    dropped: usize,
    list_name: &str,
    source: SourceId,
    messages: &mut MessageList,
) {
    if dropped > 0 {
        messages.push(
            DataQualityMessage::fixed(
                MessageCode::NonStrictlySortedList,
                source,
                Severity::Warning,
                format!("dropped {dropped} entries of non-strictly-sorted list '{list_name}'"),
            )
            .with_location("dropped_count", dropped),
        );
    }
}

fn drop_unsorted_profile_entries(
    model: &mut OpendriveModel,
    _config: &EvalConfig,
    messages: &mut MessageList,
) {
    for road in &mut model.roads {
        if let Some(profile) = &mut road.elevation_profile {
            let dropped = drop_non_strict(&mut profile.entries, |e: &Poly3Entry| e.s);
            report_dropped(
                dropped,
                "elevation",
                SourceId::road(&road.id).element("elevationProfile"),
                messages,
            );
        }

        let dropped = drop_non_strict(&mut road.lateral_profile.superelevation, |e| e.s);
        report_dropped(
            dropped,
            "superelevation",
            SourceId::road(&road.id).element("lateralProfile"),
            messages,
        );

        let dropped = drop_non_strict_shape(&mut road.lateral_profile.shape);
        report_dropped(
            dropped,
            "shape",
            SourceId::road(&road.id).element("lateralProfile"),
            messages,
        );

        let dropped = drop_non_strict(&mut road.lanes.lane_offset, |e| e.s);
        report_dropped(
            dropped,
            "laneOffset",
            SourceId::road(&road.id).element("lanes"),
            messages,
        );
    }
}

fn sort_lane_sections(model: &mut OpendriveModel, _config: &EvalConfig, messages: &mut MessageList) {
    for road in &mut model.roads {
        let sections = &mut road.lanes.sections;
        let sorted = sections.windows(2).all(|w| w[0].s <= w[1].s);
        if !sorted {
            sections.sort_by(|a, b| a.s.partial_cmp(&b.s).unwrap_or(std::cmp::Ordering::Equal));
            messages.push(DataQualityMessage::fixed(
                MessageCode::NonSortedList,
                SourceId::road(&road.id).element("lanes"),
                Severity::Warning,
                "sorted lane sections by s",
            ));
        }
    }
}

fn drop_duplicate_lane_sections(
    model: &mut OpendriveModel,
    _config: &EvalConfig,
    messages: &mut MessageList,
) {
    for road in &mut model.roads {
        let dropped = drop_non_strict(&mut road.lanes.sections, |section| section.s);
        report_dropped(
            dropped,
            "laneSection",
            SourceId::road(&road.id).element("lanes"),
            messages,
        );
    }
}

// ---------------------------------------------------------------------------
// modeling rules
// ---------------------------------------------------------------------------

fn drop_out_of_range_entries(
    model: &mut OpendriveModel,
    config: &EvalConfig,
    messages: &mut MessageList,
) {
    for road in &mut model.roads {
        if !road.length.is_finite() || road.length <= 0.0 {
            continue;
        }
        let in_range = |s: f64| s >= -config.tolerance && s <= road.length + config.tolerance;

        let before = road.lanes.lane_offset.len();
        road.lanes.lane_offset.retain(|entry| in_range(entry.s));
        let dropped_offsets = before - road.lanes.lane_offset.len();

        let before = road.lanes.sections.len();
        road.lanes.sections.retain(|section| in_range(section.s));
        let dropped_sections = before - road.lanes.sections.len();

        if dropped_offsets + dropped_sections > 0 {
            messages.push(
                DataQualityMessage::fixed(
                    MessageCode::UnexpectedValue,
                    SourceId::road(&road.id).element("lanes"),
                    Severity::Warning,
                    format!(
                        "dropped {} entries outside [0, {}]",
                        dropped_offsets + dropped_sections,
                        road.length
                    ),
                )
                .with_location("dropped_count", dropped_offsets + dropped_sections),
            );
        }
    }
}

fn remove_shape_with_lane_offset(
    model: &mut OpendriveModel,
    config: &EvalConfig,
    messages: &mut MessageList,
) {
    if config.skip_road_shape_removal {
        return;
    }
    for road in &mut model.roads {
        if !road.lateral_profile.shape.is_empty() && road.has_nonzero_lane_offset() {
            road.lateral_profile.shape.clear();
            messages.push(DataQualityMessage::fixed(
                MessageCode::UnexpectedValue,
                SourceId::road(&road.id).element("lateralProfile"),
                Severity::Warning,
                "cleared road shape coexisting with a non-zero lane offset",
            ));
        }
    }
}

fn dedupe_junction_lane_links(
    model: &mut OpendriveModel,
    _config: &EvalConfig,
    messages: &mut MessageList,
) {
    for junction in &mut model.junctions {
        let mut seen: Vec<(String, String, i32)> = Vec::new();
        let mut dropped = 0usize;
        for connection in &mut junction.connections {
            connection.lane_links.retain(|link| {
                let entry = (
                    connection.incoming_road.clone(),
                    connection.connecting_road.clone(),
                    link.from,
                );
                if seen.contains(&entry) {
                    dropped += 1;
                    false
                } else {
                    seen.push(entry);
                    true
                }
            });
        }
        if dropped > 0 {
            messages.push(
                DataQualityMessage::fixed(
                    MessageCode::UnexpectedValue,
                    SourceId::junction(&junction.id),
                    Severity::Warning,
                    format!("dropped {dropped} duplicate lane links"),
                )
                .with_location("dropped_count", dropped),
            );
        }
    }
}
