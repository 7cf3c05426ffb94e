//! Geographic coordinate type and point-level geodesy.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Geometry strings must
//! round-trip exactly (`polyline` module), and headings are differentiated
//! over distances of a few metres, so single precision is not an option
//! here.

use crate::compass::normalize_degrees;

/// Mean Earth radius in metres, shared by all great-circle math.
pub const EARTH_RADIUS_M: f64 = 6_372_800.0;

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let d_phi = (other.lat - self.lat).to_radians();
        let d_lambda = (other.lon - self.lon).to_radians();

        let a = (d_phi * 0.5).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda * 0.5).sin().powi(2);

        2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
    }

    /// Heading of the directed line from `self` to `other`, in degrees in
    /// `(-180, 180]`.
    ///
    /// Uses a local planar approximation (cosine-scaled longitude), which is
    /// accurate for the road-segment distances this library works with.
    /// 0° points east, 90° north, ±180° west, −90° south.
    pub fn heading_to(self, other: GeoPoint) -> f64 {
        let delta_y = other.lat - self.lat;
        let mean_lat = (self.lat + other.lat) * 0.5;
        let lon_scale = (mean_lat.to_radians()).cos();
        let delta_x = (other.lon - self.lon) * lon_scale;

        if delta_x == 0.0 {
            return if delta_y > 0.0 { 90.0 } else { -90.0 };
        }

        let mut degrees = (delta_y / delta_x).atan().to_degrees();
        if delta_x < 0.0 {
            if delta_y < 0.0 {
                degrees -= 180.0;
            } else if delta_y > 0.0 {
                degrees += 180.0;
            } else {
                degrees = 180.0;
            }
        }
        degrees
    }

    /// Destination point after travelling `distance_m` metres on the
    /// great-circle bearing `bearing_deg` (compass bearing, 0 = north).
    pub fn offset_by(self, bearing_deg: f64, distance_m: f64) -> GeoPoint {
        let phi1 = self.lat.to_radians();
        let lambda1 = self.lon.to_radians();
        let delta = distance_m / EARTH_RADIUS_M;
        let theta = bearing_deg.to_radians();

        let phi2 = (phi1.sin() * delta.cos()
            + phi1.cos() * delta.sin() * theta.cos())
        .asin();
        let lambda2 = lambda1
            + (theta.sin() * delta.sin() * phi1.sin())
                .atan2(delta.cos() - phi1.sin() * phi2.sin());

        GeoPoint::new(phi2.to_degrees(), lambda2.to_degrees())
    }

    /// Great-circle interpolation: the point `fraction` (0..=1) of the way
    /// from `self` to `other`.
    pub fn intermediate(self, other: GeoPoint, fraction: f64) -> GeoPoint {
        let delta = self.distance_m(other) / EARTH_RADIUS_M;
        if delta == 0.0 {
            return self;
        }
        let a = ((1.0 - fraction) * delta).sin() / delta.sin();
        let b = (fraction * delta).sin() / delta.sin();

        let (phi1, phi2) = (self.lat.to_radians(), other.lat.to_radians());
        let (lambda1, lambda2) = (self.lon.to_radians(), other.lon.to_radians());

        let x = a * phi1.cos() * lambda1.cos() + b * phi2.cos() * lambda2.cos();
        let y = a * phi1.cos() * lambda1.sin() + b * phi2.cos() * lambda2.sin();
        let z = a * phi1.sin() + b * phi2.sin();

        GeoPoint::new(
            z.atan2((x * x + y * y).sqrt()).to_degrees(),
            y.atan2(x).to_degrees(),
        )
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── Heading arithmetic ────────────────────────────────────────────────────────

/// Reverse a heading by 180°, staying in `(-180, 180]`.
#[inline]
pub fn reverse_heading(degrees: f64) -> f64 {
    if degrees > 0.0 {
        degrees - 180.0
    } else {
        degrees + 180.0
    }
}

/// Absolute difference between two headings, always in `[0, 180]`.
pub fn heading_difference(a: f64, b: f64) -> f64 {
    normalize_degrees(a - b).abs()
}
