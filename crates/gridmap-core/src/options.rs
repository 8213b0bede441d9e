//! Host-facing knobs. Plain data, owned by the caller and passed by
//! reference into every rebuild.

use serde::{Deserialize, Serialize};

use crate::flow::FlowMode;

/// Geometry options for one map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    /// Lateral spacing between adjacent parallel lines, meters.
    pub distance_between_lines: f64,
    /// Route along stored detailed paths when available.
    pub use_detailed_paths: bool,
    /// Collapse every parallel slot to 0.
    pub disable_parallel_paths: bool,
    /// Normalized label anchor position along each line.
    pub label_fraction: f64,
    /// Screen-space distance between a label and its anchor, pixels.
    pub label_pixel_offset: f64,
    /// Upper bound for the on-screen parallel spacing, pixels.
    pub max_parallel_offset_px: f64,
    /// Lower bound for the on-screen parallel spacing, pixels.
    pub min_parallel_offset_px: f64,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            distance_between_lines: 1_000.0,
            use_detailed_paths: true,
            disable_parallel_paths: false,
            label_fraction: 0.5,
            label_pixel_offset: 20.0,
            max_parallel_offset_px: 100.0,
            min_parallel_offset_px: 3.0,
        }
    }
}

/// Flow-arrow options for one map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowOptions {
    pub mode: FlowMode,
    /// Spacing between evenly placed arrows, meters of direct substation
    /// distance.
    pub distance_between_arrows: f64,
    /// Loading percentage where the warning zone starts.
    pub alert_threshold_pct: f64,
    /// Animation speed, line fractions per second per unit speed factor.
    pub animation_rate: f64,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            mode: FlowMode::StaticArrows,
            distance_between_arrows: 10_000.0,
            alert_threshold_pct: 100.0,
            animation_rate: 0.05,
        }
    }
}
