//! Pluggable line styling.
//!
//! Passes never pick colors themselves; they hand each line's facts to a
//! [`LineStyleProvider`] and draw whatever comes back. Two providers cover
//! the usual map modes, hosts can bring their own.

use gridmap_core::{Line, LoadingZone, Rgb, loading_zone_color, nominal_voltage_color};

/// Everything a style provider may key on for one line.
#[derive(Debug, Clone, Copy)]
pub struct LineFacts<'a> {
    pub line: &'a Line,
    /// Nominal voltage of the side-1 voltage level, kV.
    pub nominal_v: f64,
    /// Worse-side loading zone at the current alert threshold.
    pub zone: LoadingZone,
}

impl LineFacts<'_> {
    fn disconnected(&self) -> bool {
        !self.line.connected1 || !self.line.connected2
    }
}

/// Visual treatment of line bodies and fork stubs.
pub trait LineStyleProvider {
    fn color_for(&self, facts: &LineFacts<'_>) -> Rgb;
    fn width_for(&self, facts: &LineFacts<'_>) -> f64;
    /// Dashed stroke, used for lines disconnected on either side.
    fn dashed_for(&self, facts: &LineFacts<'_>) -> bool;
}

/// Fixed palette keyed by nominal voltage class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NominalVoltageStyle {
    pub width_px: f64,
}

impl Default for NominalVoltageStyle {
    fn default() -> Self {
        Self { width_px: 2.0 }
    }
}

impl LineStyleProvider for NominalVoltageStyle {
    fn color_for(&self, facts: &LineFacts<'_>) -> Rgb {
        nominal_voltage_color(facts.nominal_v)
    }

    fn width_for(&self, _facts: &LineFacts<'_>) -> f64 {
        self.width_px
    }

    fn dashed_for(&self, facts: &LineFacts<'_>) -> bool {
        facts.disconnected()
    }
}

/// Traffic-light palette keyed by the worse-side loading zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadingZoneStyle {
    pub width_px: f64,
}

impl Default for LoadingZoneStyle {
    fn default() -> Self {
        Self { width_px: 2.0 }
    }
}

impl LineStyleProvider for LoadingZoneStyle {
    fn color_for(&self, facts: &LineFacts<'_>) -> Rgb {
        loading_zone_color(facts.zone)
    }

    fn width_for(&self, _facts: &LineFacts<'_>) -> f64 {
        self.width_px
    }

    fn dashed_for(&self, facts: &LineFacts<'_>) -> bool {
        facts.disconnected()
    }
}
