//! Coordinate stores and anchor placement along line paths.
//!
//! [`GeoData`] owns the two position tables (substations, detailed line
//! paths) and resolves the path a line is drawn along. The free functions
//! below then walk those paths: cumulative distances, segment lookup by
//! distance, and [`label_display_position`], the single placement formula
//! every draw pass shares. Arrows, labels and fork stubs all call the same
//! function with the same [`LineDisplayGeometry`], which is what keeps
//! independently drawn layers pixel-coincident on screen.

use indexmap::IndexMap;
use loxodrome::{
    CheapRuler, LonLat, blended_bearing, destination_point, distance, wrap_degrees,
};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::flow::FlowDirection;
use crate::model::{Line, Network};

/// One substation coordinate record from the position service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstationPosition {
    pub id: String,
    pub coordinate: LonLat,
}

/// One detailed line path record from the position service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePosition {
    pub id: String,
    pub coordinates: Vec<LonLat>,
}

/// Geographic position tables, keyed by equipment id.
///
/// Tables can be replaced wholesale or patched incrementally. The patch
/// protocol mirrors the upstream position service: every id that was asked
/// for but is absent from the response has been deleted server-side and is
/// dropped here too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoData {
    substation_positions: IndexMap<String, LonLat>,
    line_positions: IndexMap<String, Vec<LonLat>>,
}

impl GeoData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored coordinate for a substation, if any.
    pub fn substation_position(&self, id: &str) -> Option<LonLat> {
        self.substation_positions.get(id).copied()
    }

    /// Stored detailed path for a line, if any.
    pub fn line_path(&self, id: &str) -> Option<&[LonLat]> {
        self.line_positions.get(id).map(Vec::as_slice)
    }

    /// Replaces the whole substation table.
    pub fn set_substation_positions(&mut self, positions: Vec<SubstationPosition>) {
        self.substation_positions = positions
            .into_iter()
            .map(|record| (record.id, record.coordinate))
            .collect();
    }

    /// Replaces the whole line-path table.
    pub fn set_line_positions(&mut self, positions: Vec<LinePosition>) {
        self.line_positions = positions
            .into_iter()
            .map(|record| (record.id, record.coordinates))
            .collect();
    }

    /// Applies a partial substation update: fetched records are upserted,
    /// and any requested id missing from the response is deleted.
    pub fn update_substation_positions(
        &mut self,
        ids_to_update: &[String],
        fetched: Vec<SubstationPosition>,
    ) {
        let mut fetched_ids = FxHashSet::default();
        for record in fetched {
            fetched_ids.insert(record.id.clone());
            self.substation_positions.insert(record.id, record.coordinate);
        }
        for id in ids_to_update {
            if !fetched_ids.contains(id) {
                self.substation_positions.shift_remove(id);
            }
        }
    }

    /// Applies a partial line-path update with the same delete semantics as
    /// [`GeoData::update_substation_positions`].
    pub fn update_line_positions(&mut self, ids_to_update: &[String], fetched: Vec<LinePosition>) {
        let mut fetched_ids = FxHashSet::default();
        for record in fetched {
            fetched_ids.insert(record.id.clone());
            self.line_positions.insert(record.id, record.coordinates);
        }
        for id in ids_to_update {
            if !fetched_ids.contains(id) {
                self.line_positions.shift_remove(id);
            }
        }
    }

    /// The path a line is drawn along, ordered from side 1 to side 2.
    ///
    /// Unknown voltage-level references fail fast. A line whose endpoint
    /// substations cannot be located does not fail: it degrades to the
    /// two-point sentinel at (0, 0), which downstream passes recognize as
    /// non-routable and skip.
    ///
    /// With `detailed` set and a stored path of at least two points, the
    /// stored path wins; it is reversed when its tail sits nearer side 1
    /// than its head. Otherwise the path is the straight pair of endpoint
    /// substation coordinates.
    pub fn line_positions(&self, network: &Network, line: &Line, detailed: bool) -> Result<Vec<LonLat>> {
        let substation1 = network.substation_of(&line.voltage_level_id1)?;
        let substation2 = network.substation_of(&line.voltage_level_id2)?;

        let (Some(position1), Some(position2)) = (
            self.resolved_position(&substation1.id),
            self.resolved_position(&substation2.id),
        ) else {
            return Ok(vec![LonLat::ORIGIN, LonLat::ORIGIN]);
        };

        if detailed {
            if let Some(path) = self.line_positions.get(&line.id).filter(|path| path.len() >= 2) {
                let head_gap = distance(path[0], position1);
                let tail_gap = distance(path[path.len() - 1], position1);
                let mut path = path.clone();
                if tail_gap < head_gap {
                    path.reverse();
                }
                return Ok(path);
            }
        }

        Ok(vec![position1, position2])
    }

    /// A stored (0, 0) is the position service's own placeholder for
    /// unlocated equipment and counts as unresolved.
    fn resolved_position(&self, substation_id: &str) -> Option<LonLat> {
        self.substation_positions
            .get(substation_id)
            .copied()
            .filter(|position| *position != LonLat::ORIGIN)
    }
}

/// Cumulative distances along a path, meters, starting at 0.
///
/// Returns `None` for paths of fewer than two points. Segment lengths come
/// from a flat-earth ruler re-anchored at each segment's start latitude.
pub fn line_distances(positions: &[LonLat]) -> Option<Vec<f64>> {
    if positions.len() < 2 {
        return None;
    }
    let mut cumulative = Vec::with_capacity(positions.len());
    cumulative.push(0.0);
    let mut total = 0.0;
    for pair in positions.windows(2) {
        let ruler = CheapRuler::new(pair[0].lat);
        total += ruler.distance(pair[0], pair[1]);
        cumulative.push(total);
    }
    Some(cumulative)
}

/// Result of locating a distance along a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    /// Index of the containing segment, clamped to the polyline.
    pub index: usize,
    pub segment: [LonLat; 2],
    /// Distance still to walk from the segment start. May be negative or
    /// exceed the segment length when `wanted` lay outside the polyline.
    pub remaining: f64,
}

/// Binary-searches the segment containing `wanted` meters along the path.
///
/// Out-of-range distances clamp to the first or last segment instead of
/// failing; callers get a usable bound for any input. Returns `None` only
/// when the path has fewer than two points.
pub fn find_segment(positions: &[LonLat], cumulative_distances: &[f64], wanted: f64) -> Option<SegmentHit> {
    if cumulative_distances.len() < 2 || positions.len() != cumulative_distances.len() {
        return None;
    }
    let mut low = 0;
    let mut high = cumulative_distances.len() - 2;
    while low < high {
        let mid = low + (high - low) / 2;
        if cumulative_distances[mid + 1] <= wanted {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    Some(SegmentHit {
        index: low,
        segment: [positions[low], positions[low + 1]],
        remaining: wanted - cumulative_distances[low],
    })
}

/// Per-line inputs of the shared placement formula.
///
/// Angles follow the display convention carried by line annotations: the
/// bearing rotated by 180 degrees. [`crate::LineAnnotations::display_geometry`]
/// builds this struct from annotations, and every pass must go through it;
/// two passes fed different values here will visibly drift apart on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineDisplayGeometry {
    /// Signed parallel slot, 0 for a line alone on its corridor.
    pub parallel_index: f64,
    /// Overall origin-to-end display angle, degrees.
    pub line_angle_deg: f64,
    /// Display angle of the boundary segment at the end the anchor is
    /// nearest, degrees.
    pub endpoint_angle_deg: f64,
    /// Lateral spacing between adjacent parallel lines, meters.
    pub distance_between_lines: f64,
    /// Fork shortening factor in (0, 1], already group-aggregated.
    pub proximity_factor: f64,
    /// Fixed label offset distance, pixels.
    pub label_offset_px: f64,
}

/// Placement of a label or arrow glyph on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelPosition {
    /// Geographic anchor.
    pub position: LonLat,
    /// Bearing of the local path segment, degrees.
    pub angle: f64,
    /// Screen-space nudge away from the line, pixels, y growing downward.
    pub offset: [f64; 2],
}

/// Anchors a glyph `fraction` of the way along a line's visible body.
///
/// This is the one placement formula shared by arrows, labels and fork
/// stubs. The walk:
///
/// 1. fractions outside [0, 1] are an error;
/// 2. degenerate paths (under two points, or zero total length, which is
///    what the sentinel produces) place nothing;
/// 3. on a direct two-point line the target distance shrinks by
///    `2 * distance_between_lines * fraction * proximity_factor` so anchors
///    stay on the body between the fork stubs;
/// 4. the containing segment comes from [`find_segment`];
/// 5. the remaining distance stretches by 1.005 (side 2 to side 1) or 0.995
///    (side 1 to side 2), the tuning that keeps a label clear of its arrow;
/// 6. the anchor walks from the segment start along the segment bearing,
///    then fans out laterally by `distance_between_lines * parallel_index`;
///    on a first or last segment the fan direction blends toward the
///    endpoint segment's perpendicular as the anchor nears the substation,
///    bending anchors into the fork;
/// 7. two-point lines shift by `distance_between_lines * proximity_factor`
///    back along the display angle, undoing step 3 at the anchor itself;
/// 8. the returned angle is the local segment bearing and the pixel offset
///    comes from [`label_pixel_offset`].
pub fn label_display_position(
    positions: &[LonLat],
    cumulative_distances: &[f64],
    fraction: f64,
    direction: FlowDirection,
    geometry: &LineDisplayGeometry,
) -> Result<Option<LabelPosition>> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(Error::FractionOutOfRange { fraction });
    }
    if cumulative_distances.len() < 2 {
        return Ok(None);
    }
    let total = cumulative_distances[cumulative_distances.len() - 1];
    if total == 0.0 {
        return Ok(None);
    }

    let two_point = cumulative_distances.len() == 2;
    let mut wanted = total * fraction;
    if two_point {
        wanted -= 2.0 * geometry.distance_between_lines * fraction * geometry.proximity_factor;
    }

    let Some(hit) = find_segment(positions, cumulative_distances, wanted) else {
        return Ok(None);
    };

    let multiplier = match direction {
        FlowDirection::FromSide2ToSide1 => 1.005,
        FlowDirection::FromSide1ToSide2 => 0.995,
        FlowDirection::None => 1.0,
    };
    let remaining = hit.remaining * multiplier;

    let segment_angle = map_angle(hit.segment[0], hit.segment[1]);
    let mut position = destination_point(hit.segment[0], remaining, segment_angle);

    let mut offset_angle = geometry.line_angle_deg + 90.0;
    if !two_point {
        let last_segment = cumulative_distances.len() - 2;
        if hit.index == 0 || hit.index == last_segment {
            let segment_length =
                cumulative_distances[hit.index + 1] - cumulative_distances[hit.index];
            if segment_length > 0.0 {
                let toward_endpoint = if hit.index == 0 {
                    1.0 - remaining / segment_length
                } else {
                    remaining / segment_length
                };
                let weight = toward_endpoint.clamp(0.0, 1.0) * geometry.proximity_factor;
                offset_angle +=
                    weight * wrap_degrees(geometry.endpoint_angle_deg - geometry.line_angle_deg);
            }
        }
    }
    position = destination_point(
        position,
        geometry.distance_between_lines * geometry.parallel_index,
        offset_angle,
    );

    if two_point {
        position = destination_point(
            position,
            -geometry.distance_between_lines * geometry.proximity_factor,
            geometry.line_angle_deg,
        );
    }

    Ok(Some(LabelPosition {
        position,
        angle: segment_angle,
        offset: label_pixel_offset(segment_angle, geometry.label_offset_px, direction),
    }))
}

/// Screen-space offset that pushes a label perpendicular to its line.
///
/// Coordinates are top-left based with y growing downward. The flow
/// direction picks the side: side 2 to side 1 offsets positive, side 1 to
/// side 2 negative, and no flow keeps the label centered.
pub fn label_pixel_offset(angle_deg: f64, offset_px: f64, direction: FlowDirection) -> [f64; 2] {
    let side = match direction {
        FlowDirection::FromSide2ToSide1 => 1.0,
        FlowDirection::FromSide1ToSide2 => -1.0,
        FlowDirection::None => 0.0,
    };
    let radians = angle_deg.to_radians();
    [radians.cos() * offset_px * side, radians.sin() * offset_px * side]
}

/// Bearing used for every on-map angle: the great-circle bearing blended
/// with a small rhumb component, degrees in [0, 360).
pub fn map_angle(from: LonLat, to: LonLat) -> f64 {
    blended_bearing(from, to)
}
