//! Zoom-stable sizing of world-space offsets.
//!
//! Parallel-line spacing is a world-space distance, but what matters
//! visually is its on-screen size: a 1 km spacing is invisible zoomed out
//! and absurd zoomed in. [`OffsetModel`] clamps the spacing so its pixel
//! size stays inside fixed bounds at the current viewport resolution.

use std::f64::consts::TAU;

use gridmap_core::MapOptions;
use loxodrome::EARTH_RADIUS_M;

use crate::{Error, Result};

/// Web-Mercator tile size the zoom scale is defined against.
const TILE_SIZE_PX: f64 = 256.0;

/// Ground resolution of a Web-Mercator viewport, meters per pixel.
///
/// Halves with every zoom level; about 156_543 m/px at the equator at zoom
/// 0. Fractional zooms are fine.
pub fn meters_per_pixel(latitude_deg: f64, zoom: f64) -> f64 {
    TAU * EARTH_RADIUS_M * latitude_deg.to_radians().cos() / (TILE_SIZE_PX * 2f64.powf(zoom))
}

/// Pixel bounds for the on-screen spacing between parallel lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetModel {
    min_px: f64,
    max_px: f64,
}

impl OffsetModel {
    /// Bounds must be finite, non-negative and ordered.
    pub fn new(min_px: f64, max_px: f64) -> Result<Self> {
        if !(min_px >= 0.0 && max_px >= min_px && max_px.is_finite()) {
            return Err(Error::InvalidOffsetBounds { min_px, max_px });
        }
        Ok(Self { min_px, max_px })
    }

    pub fn from_options(options: &MapOptions) -> Result<Self> {
        Self::new(options.min_parallel_offset_px, options.max_parallel_offset_px)
    }

    /// World-space spacing whose on-screen size is `spacing_m`, clamped into
    /// the pixel bounds at the given viewport resolution.
    pub fn clamped_spacing(&self, spacing_m: f64, meters_per_pixel: f64) -> f64 {
        if meters_per_pixel <= 0.0 {
            return spacing_m;
        }
        (spacing_m / meters_per_pixel).clamp(self.min_px, self.max_px) * meters_per_pixel
    }
}
