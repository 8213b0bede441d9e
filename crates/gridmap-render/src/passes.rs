//! Draw passes: from line annotations to flat render instances.
//!
//! Each pass turns one line's annotations into plain instance structs the
//! host rasterizes however it likes: a canvas, a GPU instanced layer, an
//! SVG export. All placement goes through the core formula via
//! [`LineAnnotations::display_geometry`], so bodies, forks, arrows and
//! labels stay coincident. Non-routable lines produce no instances in any
//! pass.

use gridmap_core::{
    ArrowSpeed, FlowDirection, FlowOptions, GeoData, Line, LineAnnotations, MapOptions, Network,
    Rgb, label_display_position, line_arrow_speed, line_loading_zone, schedule_arrows,
};
use loxodrome::{LonLat, distance, normalize_bearing, wrap_degrees};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::animate::FlowAnimator;
use crate::geom::{PixelVector, pixel_vector};
use crate::style::{LineFacts, LineStyleProvider};

/// Which substation end of a line an instance belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineEnd {
    Side1,
    Side2,
}

/// Shared read-only inputs of one rebuild.
#[derive(Debug, Clone, Copy)]
pub struct PassContext<'a> {
    pub network: &'a Network,
    pub geodata: &'a GeoData,
    pub map: &'a MapOptions,
    pub flow: &'a FlowOptions,
}

/// One layer's worth of instance building for a single line.
pub trait DrawPass {
    type Instance;

    fn build(
        &self,
        ctx: &PassContext<'_>,
        line: &Line,
        annotation: &LineAnnotations,
    ) -> Result<Vec<Self::Instance>>;
}

/// A styled line body: the raw path plus everything a lateral-offset shader
/// needs to fan the corridor out on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineBodyInstance {
    pub line_id: String,
    /// Path ordered side 1 to side 2.
    pub positions: Vec<LonLat>,
    /// Cumulative meters along `positions`.
    pub cumulative_distances: Vec<f64>,
    pub parallel_index: f64,
    /// Overall display angle, radians.
    pub angle: f64,
    /// Display angle of the first segment, radians.
    pub angle_start: f64,
    /// Display angle of the last segment, radians.
    pub angle_end: f64,
    pub proximity_factor_start: f64,
    pub proximity_factor_end: f64,
    pub color: Rgb,
    pub width_px: f64,
    pub dashed: bool,
}

/// Builds one [`LineBodyInstance`] per routable line.
pub struct LineBodyPass<'a> {
    pub style: &'a dyn LineStyleProvider,
}

impl DrawPass for LineBodyPass<'_> {
    type Instance = LineBodyInstance;

    fn build(
        &self,
        ctx: &PassContext<'_>,
        line: &Line,
        annotation: &LineAnnotations,
    ) -> Result<Vec<LineBodyInstance>> {
        if !annotation.routable {
            return Ok(Vec::new());
        }
        let Some(cumulative) = annotation.cumulative_distances.as_ref() else {
            return Ok(Vec::new());
        };
        let nominal_v = ctx.network.voltage_level(&line.voltage_level_id1)?.nominal_v;
        let zone = line_loading_zone(line, ctx.flow.alert_threshold_pct);
        let facts = LineFacts { line, nominal_v, zone };
        Ok(vec![LineBodyInstance {
            line_id: annotation.line_id.clone(),
            positions: annotation.positions.clone(),
            cumulative_distances: cumulative.clone(),
            parallel_index: annotation.parallel_index,
            angle: annotation.angle,
            angle_start: annotation.angle_start,
            angle_end: annotation.angle_end,
            proximity_factor_start: annotation.proximity_factor_start,
            proximity_factor_end: annotation.proximity_factor_end,
            color: self.style.color_for(&facts),
            width_px: self.style.width_for(&facts),
            dashed: self.style.dashed_for(&facts),
        }])
    }
}

/// A fork stub joining a substation to one end of a line body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForkInstance {
    pub line_id: String,
    pub end: LineEnd,
    /// The substation-side end of the raw path.
    pub substation_anchor: LonLat,
    /// Where the visible line body starts, already fanned out laterally.
    pub tip: LonLat,
    /// Display angle of the boundary segment, radians.
    pub angle: f64,
    /// Voltage-level rank within the substation.
    pub substation_index: usize,
    pub parallel_index: f64,
    pub proximity_factor: f64,
}

/// Builds the two fork stubs of a routable line by anchoring fractions 0
/// and 1 with the shared placement formula.
pub struct ForkPass;

impl DrawPass for ForkPass {
    type Instance = ForkInstance;

    fn build(
        &self,
        ctx: &PassContext<'_>,
        _line: &Line,
        annotation: &LineAnnotations,
    ) -> Result<Vec<ForkInstance>> {
        if !annotation.routable {
            return Ok(Vec::new());
        }
        let Some(cumulative) = annotation.cumulative_distances.as_ref() else {
            return Ok(Vec::new());
        };
        let last = annotation.positions.len() - 1;
        let mut instances = Vec::with_capacity(2);
        for (end, fraction) in [(LineEnd::Side1, 0.0), (LineEnd::Side2, 1.0)] {
            let geometry = annotation.display_geometry(
                fraction,
                ctx.map.distance_between_lines,
                ctx.map.label_pixel_offset,
            );
            let placed = label_display_position(
                &annotation.positions,
                cumulative,
                fraction,
                FlowDirection::None,
                &geometry,
            )?;
            let Some(placed) = placed else {
                continue;
            };
            let (substation_anchor, angle, substation_index, proximity_factor) = match end {
                LineEnd::Side1 => (
                    annotation.positions[0],
                    annotation.angle_start,
                    annotation.substation_index_start,
                    annotation.proximity_factor_start,
                ),
                LineEnd::Side2 => (
                    annotation.positions[last],
                    annotation.angle_end,
                    annotation.substation_index_end,
                    annotation.proximity_factor_end,
                ),
            };
            instances.push(ForkInstance {
                line_id: annotation.line_id.clone(),
                end,
                substation_anchor,
                tip: placed.position,
                angle,
                substation_index,
                parallel_index: annotation.parallel_index,
                proximity_factor,
            });
        }
        Ok(instances)
    }
}

/// A directed flow arrow somewhere along a line body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowInstance {
    pub line_id: String,
    /// Animated fraction the arrow sits at, in [0, 1).
    pub fraction: f64,
    pub anchor: LonLat,
    /// Glyph rotation pointing along the flow, bearing degrees.
    pub rotation_deg: f64,
    pub speed: ArrowSpeed,
    pub direction: FlowDirection,
}

/// Schedules and places flow arrows. Lines without a flow direction get
/// none.
pub struct ArrowPass<'a> {
    pub animator: &'a FlowAnimator,
}

impl DrawPass for ArrowPass<'_> {
    type Instance = ArrowInstance;

    fn build(
        &self,
        ctx: &PassContext<'_>,
        line: &Line,
        annotation: &LineAnnotations,
    ) -> Result<Vec<ArrowInstance>> {
        if !annotation.routable {
            return Ok(Vec::new());
        }
        let Some(cumulative) = annotation.cumulative_distances.as_ref() else {
            return Ok(Vec::new());
        };
        let direction = FlowDirection::for_line(line);
        if direction == FlowDirection::None {
            return Ok(Vec::new());
        }
        let speed = line_arrow_speed(line);

        // Arrow spacing is defined over the direct substation distance, not
        // the detailed path length, so counts stay stable when a path is
        // swapped in.
        let direct_m = match ctx.geodata.line_positions(ctx.network, line, false)?.as_slice() {
            [from, to] => distance(*from, *to),
            _ => 0.0,
        };
        let schedule =
            schedule_arrows(&line.id, ctx.flow.mode, direct_m, ctx.flow.distance_between_arrows);

        let mut instances = Vec::with_capacity(schedule.len());
        for arrow in schedule {
            let fraction = self.animator.animated_fraction(arrow.fraction, direction, speed);
            let geometry = annotation.display_geometry(
                fraction,
                ctx.map.distance_between_lines,
                ctx.map.label_pixel_offset,
            );
            let placed = label_display_position(
                &annotation.positions,
                cumulative,
                fraction,
                direction,
                &geometry,
            )?;
            let Some(placed) = placed else {
                continue;
            };
            let rotation_deg = match direction {
                FlowDirection::FromSide2ToSide1 => normalize_bearing(placed.angle + 180.0),
                _ => placed.angle,
            };
            instances.push(ArrowInstance {
                line_id: annotation.line_id.clone(),
                fraction,
                anchor: placed.position,
                rotation_deg,
                speed,
                direction,
            });
        }
        Ok(instances)
    }
}

/// A text label anchored to a line, nudged off the body in screen space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelInstance {
    pub line_id: String,
    pub anchor: LonLat,
    /// Screen-space nudge away from the line, pixels, y growing downward.
    pub offset_px: [f64; 2],
    /// Text rotation folded into (-90, 90] so labels never read upside
    /// down.
    pub angle_deg: f64,
}

impl LabelInstance {
    pub fn offset_vector(&self) -> PixelVector {
        pixel_vector(self.offset_px[0], self.offset_px[1])
    }
}

/// Places one label per routable line at the configured fraction.
pub struct LabelPass;

impl DrawPass for LabelPass {
    type Instance = LabelInstance;

    fn build(
        &self,
        ctx: &PassContext<'_>,
        line: &Line,
        annotation: &LineAnnotations,
    ) -> Result<Vec<LabelInstance>> {
        if !annotation.routable {
            return Ok(Vec::new());
        }
        let Some(cumulative) = annotation.cumulative_distances.as_ref() else {
            return Ok(Vec::new());
        };
        let direction = FlowDirection::for_line(line);
        let geometry = annotation.display_geometry(
            ctx.map.label_fraction,
            ctx.map.distance_between_lines,
            ctx.map.label_pixel_offset,
        );
        let placed = label_display_position(
            &annotation.positions,
            cumulative,
            ctx.map.label_fraction,
            direction,
            &geometry,
        )?;
        let Some(placed) = placed else {
            return Ok(Vec::new());
        };
        Ok(vec![LabelInstance {
            line_id: annotation.line_id.clone(),
            anchor: placed.position,
            offset_px: placed.offset,
            angle_deg: readable_text_angle(placed.angle),
        }])
    }
}

/// Screen rotation for text following a line bearing, degrees in (-90, 90].
///
/// A bearing is clockwise from north; screen rotation is measured from the
/// horizontal, and text running leftward is flipped half a turn so it stays
/// readable.
pub fn readable_text_angle(bearing_deg: f64) -> f64 {
    let angle = wrap_degrees(bearing_deg - 90.0);
    if angle <= -90.0 {
        angle + 180.0
    } else if angle > 90.0 {
        angle - 180.0
    } else {
        angle
    }
}
