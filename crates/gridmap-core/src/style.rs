//! Color and status classification for lines.
//!
//! Two orthogonal schemes: a fixed palette keyed by nominal voltage class,
//! and a loading-zone scheme keyed by how close each side's current sits to
//! its permanent limit. Both return plain RGB triples; mapping them onto an
//! actual canvas or GPU pipeline is the render crate's business.

use serde::{Deserialize, Serialize};

use crate::model::{Line, OperatingStatus};

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The classic single-line-diagram voltage palette, red for the highest
/// classes down to olive below 30 kV.
pub fn nominal_voltage_color(nominal_v: f64) -> Rgb {
    if nominal_v >= 300.0 {
        Rgb::new(255, 0, 0)
    } else if nominal_v >= 170.0 {
        Rgb::new(34, 139, 34)
    } else if nominal_v >= 120.0 {
        Rgb::new(1, 175, 175)
    } else if nominal_v >= 70.0 {
        Rgb::new(204, 85, 0)
    } else if nominal_v >= 50.0 {
        Rgb::new(160, 32, 240)
    } else if nominal_v >= 30.0 {
        Rgb::new(255, 130, 144)
    } else {
        Rgb::new(171, 175, 40)
    }
}

/// Loading zone of a line side. Variants are ordered, worst last, so the
/// worse of two sides is their `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadingZone {
    /// Current or limit missing on that side.
    Unknown,
    Safe,
    /// At or above the alert threshold but still under the limit.
    Warning,
    /// At or above the permanent limit.
    Overload,
}

impl LoadingZone {
    /// Classifies one side's loading ratio against an alert threshold given
    /// in percent.
    pub fn from_loading_ratio(ratio: Option<f64>, alert_threshold_pct: f64) -> Self {
        let Some(ratio) = ratio else {
            return LoadingZone::Unknown;
        };
        let pct = ratio * 100.0;
        if pct >= 100.0 {
            LoadingZone::Overload
        } else if pct >= alert_threshold_pct {
            LoadingZone::Warning
        } else {
            LoadingZone::Safe
        }
    }
}

/// Worse-side loading zone for a line.
pub fn line_loading_zone(line: &Line, alert_threshold_pct: f64) -> LoadingZone {
    let side1 = LoadingZone::from_loading_ratio(line.loading_ratio1(), alert_threshold_pct);
    let side2 = LoadingZone::from_loading_ratio(line.loading_ratio2(), alert_threshold_pct);
    side1.max(side2)
}

/// Fill color for a loading zone.
pub fn loading_zone_color(zone: LoadingZone) -> Rgb {
    match zone {
        LoadingZone::Unknown => Rgb::new(128, 128, 128),
        LoadingZone::Safe => Rgb::new(107, 178, 40),
        LoadingZone::Warning => Rgb::new(210, 179, 63),
        LoadingZone::Overload => Rgb::new(255, 0, 0),
    }
}

/// Glyph drawn next to a line that is out of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusIcon {
    /// Planned outage.
    Lock,
    /// Forced outage.
    Flash,
}

/// Status icon for an operating status; lines in operation get none.
pub fn status_icon(status: OperatingStatus) -> Option<StatusIcon> {
    match status {
        OperatingStatus::InOperation => None,
        OperatingStatus::PlannedOutage => Some(StatusIcon::Lock),
        OperatingStatus::ForcedOutage => Some(StatusIcon::Flash),
    }
}
