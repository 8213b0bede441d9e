#![forbid(unsafe_code)]

//! Geodesy primitives tuned for map display rather than navigation.
//!
//! All functions take WGS84 degree coordinates and return meters or degree
//! bearings. The distance/destination pair share one earth radius so that
//! `distance(a, destination_point(a, d, b)) ≈ d`; [`CheapRuler`] trades that
//! spherical model for a local flat-earth approximation when many short
//! segments near the same latitude must be measured quickly.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_4, PI};

/// WGS84 equatorial radius, meters. Shared by [`distance`] and
/// [`destination_point`] so the two stay mutually consistent.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// WGS84 flattening, used by [`CheapRuler`] for the curvature radii.
const FLATTENING: f64 = 1.0 / 298.257_223_563;

/// A longitude/latitude pair in degrees.
///
/// Longitude wraps at ±180°; every delta computation in this crate goes
/// through [`wrap_degrees`] so callers may hand in coordinates from either
/// side of the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    /// The `[0, 0]` placeholder used when a position is not yet resolved.
    pub const ORIGIN: LonLat = LonLat { lon: 0.0, lat: 0.0 };

    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<(f64, f64)> for LonLat {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

impl From<[f64; 2]> for LonLat {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

/// Normalizes a longitude delta into `(-180, 180]`. Idempotent.
pub fn wrap_degrees(delta: f64) -> f64 {
    let mut d = delta % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Normalizes a bearing into `[0, 360)`.
pub fn normalize_bearing(degrees: f64) -> f64 {
    let d = degrees % 360.0;
    if d < 0.0 { d + 360.0 } else { d }
}

/// Great-circle distance in meters, via the spherical law of cosines.
///
/// The cosine argument is clamped to `[-1, 1]`: for identical or antipodal
/// points, f64 rounding can push it fractionally out of range and `acos`
/// would return NaN.
pub fn distance(a: LonLat, b: LonLat) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_lambda = (b.lon - a.lon).to_radians();

    let cos_arc = phi1.sin() * phi2.sin() + phi1.cos() * phi2.cos() * delta_lambda.cos();
    EARTH_RADIUS_M * cos_arc.clamp(-1.0, 1.0).acos()
}

/// Initial great-circle bearing from `a` to `b`, degrees in `[0, 360)`.
pub fn great_circle_bearing(a: LonLat, b: LonLat) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_lambda = (b.lon - a.lon).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();
    normalize_bearing(y.atan2(x).to_degrees())
}

/// Constant (rhumb-line) bearing from `a` to `b`, degrees in `[0, 360)`.
///
/// The longitude delta is folded across the antimeridian when |Δλ| exceeds
/// 180° so the bearing follows the short way around.
pub fn rhumb_line_bearing(a: LonLat, b: LonLat) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();

    let mut delta_lon = b.lon - a.lon;
    if delta_lon.abs() > 180.0 {
        delta_lon = if delta_lon > 0.0 {
            delta_lon - 360.0
        } else {
            delta_lon + 360.0
        };
    }

    let delta_psi = ((FRAC_PI_4 + phi2 / 2.0).tan() / (FRAC_PI_4 + phi1 / 2.0).tan()).ln();
    normalize_bearing(delta_lon.to_radians().atan2(delta_psi).to_degrees())
}

/// Display bearing from `a` to `b`: 0.9 great-circle + 0.1 rhumb, degrees in
/// `[0, 360)`.
///
/// A deliberate visual-smoothing compromise for orienting labels, fork stubs
/// and flow arrows; it is not a navigation bearing. The rhumb share is
/// blended along the shortest arc so the result stays sane when the two
/// bearings straddle north.
pub fn blended_bearing(a: LonLat, b: LonLat) -> f64 {
    const RHUMB_WEIGHT: f64 = 0.1;

    let gc = great_circle_bearing(a, b);
    let rh = rhumb_line_bearing(a, b);
    normalize_bearing(gc + RHUMB_WEIGHT * wrap_degrees(rh - gc))
}

/// Spherical destination point: from `origin`, travel `distance_m` meters on
/// the initial bearing `bearing_deg`.
///
/// A negative distance travels the opposite way; the resulting longitude is
/// re-wrapped into `[-180, 180]`.
pub fn destination_point(origin: LonLat, distance_m: f64, bearing_deg: f64) -> LonLat {
    let delta = distance_m / EARTH_RADIUS_M;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.lat.to_radians();
    let lambda1 = origin.lon.to_radians();

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

    LonLat {
        lon: wrap_degrees(lambda2.to_degrees()),
        lat: phi2.to_degrees(),
    }
}

/// Local flat-earth ruler, valid near a fixed latitude.
///
/// Precomputes meters-per-degree scale factors from the WGS84 curvature radii
/// at that latitude (normal radius for longitude, meridional for latitude), so
/// repeated short-span measurements reduce to scaled planar arithmetic. Error
/// against the spherical model is negligible for spans of a few hundred
/// kilometers away from the poles.
#[derive(Debug, Clone, Copy)]
pub struct CheapRuler {
    kx: f64,
    ky: f64,
}

impl CheapRuler {
    pub fn new(latitude_deg: f64) -> Self {
        let e2 = FLATTENING * (2.0 - FLATTENING);
        let meters_per_degree = EARTH_RADIUS_M * PI / 180.0;

        let cos_lat = latitude_deg.to_radians().cos();
        let w2 = 1.0 / (1.0 - e2 * (1.0 - cos_lat * cos_lat));
        let w = w2.sqrt();

        Self {
            kx: meters_per_degree * w * cos_lat,
            ky: meters_per_degree * w * w2 * (1.0 - e2),
        }
    }

    /// Planar distance in meters between two points near the ruler latitude.
    pub fn distance(&self, a: LonLat, b: LonLat) -> f64 {
        let dx = wrap_degrees(b.lon - a.lon) * self.kx;
        let dy = (b.lat - a.lat) * self.ky;
        dx.hypot(dy)
    }

    /// Planar bearing from `a` to `b`, degrees in `(-180, 180]`.
    pub fn bearing(&self, a: LonLat, b: LonLat) -> f64 {
        let dx = wrap_degrees(b.lon - a.lon) * self.kx;
        let dy = (b.lat - a.lat) * self.ky;
        dx.atan2(dy).to_degrees()
    }

    /// Sum of consecutive-point planar distances along `points`.
    pub fn line_distance(&self, points: &[LonLat]) -> f64 {
        points
            .windows(2)
            .map(|pair| self.distance(pair[0], pair[1]))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_degrees_stays_in_half_open_range() {
        for d in [-720.0, -540.0, -180.0, -179.999, 0.0, 179.999, 180.0, 540.0] {
            let w = wrap_degrees(d);
            assert!(w > -180.0 && w <= 180.0, "wrap({d}) = {w}");
            assert_eq!(wrap_degrees(w), w, "wrap not idempotent for {d}");
        }
        assert_eq!(wrap_degrees(-180.0), 180.0);
        assert_eq!(wrap_degrees(190.0), -170.0);
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let paris = LonLat::new(2.3522, 48.8566);
        let lyon = LonLat::new(4.8357, 45.764);
        let d1 = distance(paris, lyon);
        let d2 = distance(lyon, paris);
        assert!((d1 - d2).abs() < 1e-6);
        // Paris to Lyon is a bit under 400 km.
        assert!((d1 - 392_000.0).abs() < 5_000.0, "got {d1}");
        assert_eq!(distance(paris, paris), 0.0);
    }

    #[test]
    fn distance_survives_antipodal_rounding() {
        let a = LonLat::new(0.0, 0.0);
        let b = LonLat::new(180.0, 0.0);
        let half_circumference = EARTH_RADIUS_M * PI;
        let d = distance(a, b);
        assert!(d.is_finite());
        assert!((d - half_circumference).abs() < 1.0);
    }

    #[test]
    fn cardinal_bearings() {
        let origin = LonLat::new(0.0, 0.0);
        assert!((great_circle_bearing(origin, LonLat::new(0.0, 1.0)) - 0.0).abs() < 1e-9);
        assert!((great_circle_bearing(origin, LonLat::new(1.0, 0.0)) - 90.0).abs() < 1e-9);
        assert!((great_circle_bearing(origin, LonLat::new(0.0, -1.0)) - 180.0).abs() < 1e-9);
        assert!((great_circle_bearing(origin, LonLat::new(-1.0, 0.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn rhumb_bearing_folds_across_antimeridian() {
        let east = LonLat::new(179.5, 10.0);
        let west = LonLat::new(-179.5, 10.0);
        // Short way is eastward across the date line, not 359° back around.
        let b = rhumb_line_bearing(east, west);
        assert!((b - 90.0).abs() < 1.0, "got {b}");
        let back = rhumb_line_bearing(west, east);
        assert!((back - 270.0).abs() < 1.0, "got {back}");
    }

    #[test]
    fn destination_round_trips_distance_and_bearing() {
        let origin = LonLat::new(2.0, 48.0);
        for bearing in [0.0, 37.0, 90.0, 180.0, 255.5] {
            let p = destination_point(origin, 25_000.0, bearing);
            assert!((distance(origin, p) - 25_000.0).abs() < 1.0);
            assert!((great_circle_bearing(origin, p) - bearing).abs() < 0.01);
        }
    }

    #[test]
    fn destination_wraps_longitude() {
        let origin = LonLat::new(179.9, 0.0);
        let p = destination_point(origin, 50_000.0, 90.0);
        assert!(p.lon < -179.0, "expected wrap past the date line, got {}", p.lon);
    }

    #[test]
    fn negative_distance_travels_backwards() {
        let origin = LonLat::new(2.0, 48.0);
        let fwd = destination_point(origin, 10_000.0, 45.0);
        let back = destination_point(fwd, -10_000.0, 45.0);
        assert!(distance(origin, back) < 1.0);
    }

    #[test]
    fn blended_bearing_sits_between_inputs() {
        let a = LonLat::new(-40.0, 30.0);
        let b = LonLat::new(10.0, 55.0);
        let gc = great_circle_bearing(a, b);
        let rh = rhumb_line_bearing(a, b);
        let blend = blended_bearing(a, b);
        let lo = gc.min(rh);
        let hi = gc.max(rh);
        assert!(blend >= lo && blend <= hi, "{lo} <= {blend} <= {hi}");
        // 9:1 weighting leans heavily toward the great circle.
        assert!((blend - gc).abs() < (blend - rh).abs());
    }

    #[test]
    fn cheap_ruler_tracks_great_circle_on_short_spans() {
        let a = LonLat::new(2.0, 48.0);
        let b = LonLat::new(2.5, 48.3);
        let ruler = CheapRuler::new(a.lat);
        let planar = ruler.distance(a, b);
        let spherical = distance(a, b);
        let rel = (planar - spherical).abs() / spherical;
        assert!(rel < 0.005, "relative error {rel}");
    }

    #[test]
    fn lonlat_serde_shape() {
        let p: LonLat = serde_json::from_str(r#"{"lon":2.35,"lat":48.85}"#).unwrap();
        assert_eq!(p, LonLat::new(2.35, 48.85));
        let json = serde_json::to_value(p).unwrap();
        assert_eq!(json["lon"], 2.35);
        assert_eq!(json["lat"], 48.85);
    }

    #[test]
    fn cheap_ruler_line_distance_sums_segments() {
        let pts = [
            LonLat::new(2.0, 48.0),
            LonLat::new(2.1, 48.05),
            LonLat::new(2.3, 48.2),
        ];
        let ruler = CheapRuler::new(48.0);
        let summed = ruler.distance(pts[0], pts[1]) + ruler.distance(pts[1], pts[2]);
        assert!((ruler.line_distance(&pts) - summed).abs() < 1e-9);
    }
}
