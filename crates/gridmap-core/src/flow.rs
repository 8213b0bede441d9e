//! Flow arrows: how many to draw per line, where, and how fast they move.

use serde::{Deserialize, Serialize};

use crate::model::Line;

/// Flow-rendering mode for a whole map view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlowMode {
    /// Two fixed arrows per line, one near each end.
    Feeders,
    /// Evenly spaced arrows frozen at their base fractions.
    #[default]
    StaticArrows,
    /// Evenly spaced arrows advanced by the animation clock.
    AnimatedArrows,
}

/// Direction current flows through a line, from the sign of the side-1
/// active power. Missing or zero power means no displayed direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlowDirection {
    #[default]
    None,
    FromSide1ToSide2,
    FromSide2ToSide1,
}

impl FlowDirection {
    pub fn for_line(line: &Line) -> Self {
        match line.p1 {
            Some(p) if p > 0.0 => FlowDirection::FromSide1ToSide2,
            Some(p) if p < 0.0 => FlowDirection::FromSide2ToSide1,
            _ => FlowDirection::None,
        }
    }
}

/// Arrow speed class. Variants are ordered, worst last, so the worse of two
/// sides is their `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArrowSpeed {
    Stopped,
    Slow,
    Medium,
    Fast,
    Overload,
}

impl ArrowSpeed {
    /// Animation speed multiplier applied on top of the base rate.
    pub fn factor(self) -> f64 {
        match self {
            ArrowSpeed::Stopped => 0.0,
            ArrowSpeed::Slow => 0.5,
            ArrowSpeed::Medium => 2.0,
            ArrowSpeed::Fast => 4.0,
            ArrowSpeed::Overload => 10.0,
        }
    }

    /// Step function over one side's |current| / permanent-limit ratio.
    /// Missing data and zero current both read as stopped.
    pub fn from_loading_ratio(ratio: Option<f64>) -> Self {
        match ratio {
            None => ArrowSpeed::Stopped,
            Some(r) if r == 0.0 => ArrowSpeed::Stopped,
            Some(r) if r < 1.0 / 3.0 => ArrowSpeed::Slow,
            Some(r) if r < 2.0 / 3.0 => ArrowSpeed::Medium,
            Some(r) if r < 1.0 => ArrowSpeed::Fast,
            Some(_) => ArrowSpeed::Overload,
        }
    }
}

/// Worse-side speed class for a line.
pub fn line_arrow_speed(line: &Line) -> ArrowSpeed {
    let side1 = ArrowSpeed::from_loading_ratio(line.loading_ratio1());
    let side2 = ArrowSpeed::from_loading_ratio(line.loading_ratio2());
    side1.max(side2)
}

/// One flow arrow: a line and a base fraction of the way along it.
///
/// Arrows are ephemeral; they are rescheduled whenever line geometry or the
/// flow mode changes, and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub line_id: String,
    pub fraction: f64,
}

/// Base arrow fractions for one line.
///
/// Feeder mode pins exactly two arrows near the ends. The other modes space
/// arrows every `distance_between_arrows_m` of the direct substation
/// distance: `ceil(direct / spacing)` arrows at fractions `k / count`. A
/// zero direct distance (the sentinel case) schedules nothing.
pub fn schedule_arrows(
    line_id: &str,
    mode: FlowMode,
    direct_distance_m: f64,
    distance_between_arrows_m: f64,
) -> Vec<Arrow> {
    match mode {
        FlowMode::Feeders => [0.1, 0.9]
            .iter()
            .map(|fraction| Arrow { line_id: line_id.to_string(), fraction: *fraction })
            .collect(),
        FlowMode::StaticArrows | FlowMode::AnimatedArrows => {
            if direct_distance_m <= 0.0 || distance_between_arrows_m <= 0.0 {
                return Vec::new();
            }
            let count = (direct_distance_m / distance_between_arrows_m).ceil() as usize;
            (0..count)
                .map(|k| Arrow {
                    line_id: line_id.to_string(),
                    fraction: k as f64 / count as f64,
                })
                .collect()
        }
    }
}
