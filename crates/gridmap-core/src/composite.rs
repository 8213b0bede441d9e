//! Per-voltage-class line grouping and the derived drawing annotations.
//!
//! Lines sharing both endpoint substations form a corridor and must fan out
//! instead of overdrawing each other. [`build_composite_data`] groups each
//! voltage class's lines by unordered substation pair, hands every group
//! member a signed parallel slot, and precomputes the per-line angles and
//! fork factors the draw passes consume.

use std::f64::consts::{PI, TAU};

use indexmap::IndexMap;
use loxodrome::{LonLat, blended_bearing, distance, normalize_bearing};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::geodata::{GeoData, LineDisplayGeometry, line_distances};
use crate::model::{Line, Network};
use crate::options::MapOptions;

/// Slots stop advancing here; an oversized group piles up at the edge
/// instead of fanning out indefinitely.
const MAX_PARALLEL_SLOT: f64 = 15.0;

/// Groups beyond this size keep their first members spread and pin the rest
/// to slot 0.
const MAX_SPREAD_LINES: usize = 32;

/// Unordered pair of substation ids: both orientations of a corridor map to
/// the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubstationPairKey(String, String);

impl SubstationPairKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self(a.to_string(), b.to_string())
        } else {
            Self(b.to_string(), a.to_string())
        }
    }
}

/// Everything the draw passes need to know about one line's geometry.
///
/// Angles use the display convention: blended bearing plus pi, wrapped into
/// [0, 2*pi). Non-routable lines (endpoint unresolved, or zero-length path)
/// carry neutral values and are skipped by every pass.
#[derive(Debug, Clone)]
pub struct LineAnnotations {
    pub line_id: String,
    /// Path ordered side 1 to side 2.
    pub positions: Vec<LonLat>,
    /// Cumulative meters along `positions`; `None` when not routable.
    pub cumulative_distances: Option<Vec<f64>>,
    /// Signed parallel slot within the corridor, 0 when alone.
    pub parallel_index: f64,
    /// Overall origin-to-end display angle, radians.
    pub angle: f64,
    /// Display angle of the first path segment, radians.
    pub angle_start: f64,
    /// Display angle of the last path segment, radians.
    pub angle_end: f64,
    /// Fork shortening factor at side 1, group-aggregated.
    pub proximity_factor_start: f64,
    /// Fork shortening factor at side 2, group-aggregated.
    pub proximity_factor_end: f64,
    /// Voltage-level rank within the side-1 substation.
    pub substation_index_start: usize,
    /// Voltage-level rank within the side-2 substation.
    pub substation_index_end: usize,
    pub routable: bool,
}

impl LineAnnotations {
    /// Bundles the placement inputs for an anchor at `fraction`.
    ///
    /// The boundary angle and proximity factor come from the end the
    /// fraction is nearest. All passes build their geometry here so the
    /// lateral-offset math can never diverge between layers.
    pub fn display_geometry(
        &self,
        fraction: f64,
        distance_between_lines: f64,
        label_offset_px: f64,
    ) -> LineDisplayGeometry {
        let (endpoint_angle, proximity_factor) = if fraction <= 0.5 {
            (self.angle_start, self.proximity_factor_start)
        } else {
            (self.angle_end, self.proximity_factor_end)
        };
        LineDisplayGeometry {
            parallel_index: self.parallel_index,
            line_angle_deg: display_angle_degrees(self.angle),
            endpoint_angle_deg: display_angle_degrees(endpoint_angle),
            distance_between_lines,
            proximity_factor,
            label_offset_px,
        }
    }
}

/// One voltage class's lines, corridor groups and annotations. Iteration
/// order everywhere follows equipment insertion order.
#[derive(Debug, Clone)]
pub struct CompositeData {
    /// Nominal voltage shared by every line in this composite, kV.
    pub nominal_v: f64,
    /// Line ids per unordered substation pair.
    pub pair_groups: IndexMap<SubstationPairKey, Vec<String>>,
    pub annotations: IndexMap<String, LineAnnotations>,
}

/// Builds one [`CompositeData`] per nominal voltage class, highest first.
///
/// The voltage class of a line is the nominal voltage of its side-1 voltage
/// level. Unknown voltage-level references fail fast; unresolved positions
/// degrade to non-routable annotations instead.
pub fn build_composite_data(
    network: &Network,
    geodata: &GeoData,
    options: &MapOptions,
) -> Result<Vec<CompositeData>> {
    let mut classes: Vec<f64> = Vec::new();
    for line in network.lines() {
        let nominal_v = network.voltage_level(&line.voltage_level_id1)?.nominal_v;
        if !classes.contains(&nominal_v) {
            classes.push(nominal_v);
        }
    }
    classes.sort_by(|a, b| b.total_cmp(a));

    let mut composites = Vec::with_capacity(classes.len());
    for class in classes {
        let mut annotations = IndexMap::new();
        let mut pair_groups: IndexMap<SubstationPairKey, Vec<String>> = IndexMap::new();

        for line in network.lines() {
            let nominal_v = network.voltage_level(&line.voltage_level_id1)?.nominal_v;
            if nominal_v != class {
                continue;
            }

            let substation1 = network.substation_of(&line.voltage_level_id1)?;
            let substation2 = network.substation_of(&line.voltage_level_id2)?;
            pair_groups
                .entry(SubstationPairKey::new(&substation1.id, &substation2.id))
                .or_default()
                .push(line.id.clone());

            let positions = geodata.line_positions(network, line, options.use_detailed_paths)?;
            annotations.insert(line.id.clone(), annotate_line(network, line, positions, options));
        }

        assign_parallel_indices(&mut annotations, &pair_groups, options.disable_parallel_paths);
        apply_group_proximity(&mut annotations, &pair_groups);

        composites.push(CompositeData { nominal_v: class, pair_groups, annotations });
    }
    Ok(composites)
}

fn annotate_line(
    network: &Network,
    line: &Line,
    positions: Vec<LonLat>,
    options: &MapOptions,
) -> LineAnnotations {
    let cumulative = line_distances(&positions);
    let total = cumulative.as_ref().and_then(|c| c.last().copied()).unwrap_or(0.0);
    let substation_index_start = network.voltage_level_rank(&line.voltage_level_id1);
    let substation_index_end = network.voltage_level_rank(&line.voltage_level_id2);

    if total <= 0.0 {
        return LineAnnotations {
            line_id: line.id.clone(),
            positions,
            cumulative_distances: None,
            parallel_index: 0.0,
            angle: 0.0,
            angle_start: 0.0,
            angle_end: 0.0,
            proximity_factor_start: 1.0,
            proximity_factor_end: 1.0,
            substation_index_start,
            substation_index_end,
            routable: false,
        };
    }

    let last = positions.len() - 1;
    let fork_span = 3.0 * options.distance_between_lines;
    LineAnnotations {
        line_id: line.id.clone(),
        angle: display_angle(positions[0], positions[last]),
        angle_start: display_angle(positions[0], positions[1]),
        angle_end: display_angle(positions[last - 1], positions[last]),
        proximity_factor_start: proximity_factor(
            distance(positions[0], positions[1]),
            fork_span,
        ),
        proximity_factor_end: proximity_factor(
            distance(positions[last - 1], positions[last]),
            fork_span,
        ),
        positions,
        cumulative_distances: cumulative,
        parallel_index: 0.0,
        substation_index_start,
        substation_index_end,
        routable: true,
    }
}

/// How much a fork may shorten a line: 1 for long boundary segments, shrinking
/// linearly once the segment is under three line spacings.
fn proximity_factor(segment_m: f64, fork_span_m: f64) -> f64 {
    if fork_span_m <= 0.0 {
        return 1.0;
    }
    (segment_m / fork_span_m).min(1.0)
}

/// Hands each corridor member a slot symmetric around zero, in insertion
/// order: a group of n spreads over -(n-1)/2 ..= (n-1)/2 in steps of 1.
/// Slots freeze at [`MAX_PARALLEL_SLOT`], and members past
/// [`MAX_SPREAD_LINES`] fall back to slot 0 with a warning.
fn assign_parallel_indices(
    annotations: &mut IndexMap<String, LineAnnotations>,
    pair_groups: &IndexMap<SubstationPairKey, Vec<String>>,
    disabled: bool,
) {
    if disabled {
        return;
    }
    for (key, group) in pair_groups {
        let spread = group.len().min(MAX_SPREAD_LINES);
        if group.len() > MAX_SPREAD_LINES {
            warn!(
                corridor = ?key,
                lines = group.len(),
                "corridor exceeds {MAX_SPREAD_LINES} parallel lines; extra lines render at offset 0"
            );
        }
        let mut slot = -((spread as f64 - 1.0) / 2.0);
        for (position, line_id) in group.iter().enumerate() {
            let Some(annotation) = annotations.get_mut(line_id) else {
                continue;
            };
            if position < MAX_SPREAD_LINES {
                annotation.parallel_index = slot;
                if slot < MAX_PARALLEL_SLOT {
                    slot += 1.0;
                }
            } else {
                annotation.parallel_index = 0.0;
            }
        }
    }
}

/// Replaces every routable member's proximity factors with the group minimum
/// over both ends, so a corridor's forks fan out symmetrically.
fn apply_group_proximity(
    annotations: &mut IndexMap<String, LineAnnotations>,
    pair_groups: &IndexMap<SubstationPairKey, Vec<String>>,
) {
    for group in pair_groups.values() {
        let mut group_min = 1.0f64;
        for line_id in group {
            if let Some(annotation) = annotations.get(line_id) {
                if annotation.routable {
                    group_min = group_min
                        .min(annotation.proximity_factor_start)
                        .min(annotation.proximity_factor_end);
                }
            }
        }
        for line_id in group {
            if let Some(annotation) = annotations.get_mut(line_id) {
                if annotation.routable {
                    annotation.proximity_factor_start = group_min;
                    annotation.proximity_factor_end = group_min;
                }
            }
        }
    }
}

/// Display angle between two points: blended bearing shifted by pi, wrapped
/// into [0, 2*pi).
fn display_angle(from: LonLat, to: LonLat) -> f64 {
    (blended_bearing(from, to).to_radians() + PI).rem_euclid(TAU)
}

/// Back from a display angle to degrees, still carrying the pi shift.
fn display_angle_degrees(angle: f64) -> f64 {
    normalize_bearing(angle.to_degrees())
}
