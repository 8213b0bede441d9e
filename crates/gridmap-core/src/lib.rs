#![forbid(unsafe_code)]

//! Headless geometry for geographic electrical-network maps.
//!
//! Feed it the equipment model ([`Network`]) and coordinate tables
//! ([`GeoData`]); it answers the questions a map renderer asks per frame:
//! which path a line follows, how parallel lines on the same corridor fan
//! out, where fork stubs leave their substations, where flow arrows and
//! labels sit, and what color or status a line should display.
//!
//! The crate draws nothing. It produces positions, angles and factors as
//! plain values, and every consumer is expected to go through the same
//! placement formula ([`label_display_position`]) so independently drawn
//! layers land on the same pixels. Missing coordinates never fail a build:
//! affected lines degrade to a sentinel path and are skipped by draw passes,
//! while dangling equipment references are treated as host bugs and error
//! immediately.

pub mod composite;
pub mod error;
pub mod flow;
pub mod geodata;
pub mod model;
pub mod options;
pub mod style;

pub use composite::{CompositeData, LineAnnotations, SubstationPairKey, build_composite_data};
pub use error::{Error, Result};
pub use flow::{
    Arrow, ArrowSpeed, FlowDirection, FlowMode, line_arrow_speed, schedule_arrows,
};
pub use geodata::{
    GeoData, LabelPosition, LineDisplayGeometry, LinePosition, SegmentHit, SubstationPosition,
    find_segment, label_display_position, label_pixel_offset, line_distances, map_angle,
};
pub use loxodrome::LonLat;
pub use model::{Line, Network, OperatingStatus, Substation, VoltageLevel};
pub use options::{FlowOptions, MapOptions};
pub use style::{
    LoadingZone, Rgb, StatusIcon, line_loading_zone, loading_zone_color, nominal_voltage_color,
    status_icon,
};

#[cfg(test)]
mod tests;
