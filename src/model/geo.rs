//! Geographic positions and the distance primitive.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Mean Earth radius in kilometres (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A `(longitude, latitude)` pair in degrees.
///
/// Serialized as a two-element array, longitude first.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<[f64; 2]> for LonLat {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<LonLat> for [f64; 2] {
    fn from(p: LonLat) -> Self {
        [p.lon, p.lat]
    }
}

/// Distance between two positions.
///
/// Implementations must be total and deterministic, return a non-negative
/// value, and grow monotonically with true geographic separation.
pub trait Distance: Send + Sync {
    fn distance(&self, a: LonLat, b: LonLat) -> f64;
}

impl<F> Distance for F
where
    F: Fn(LonLat, LonLat) -> f64 + Send + Sync,
{
    fn distance(&self, a: LonLat, b: LonLat) -> f64 {
        self(a, b)
    }
}

/// Great-circle distance in kilometres.
///
/// Latitudes beyond ±90 are not rejected: the formula treats them as a
/// reflection over the pole, so `(0, 100)` is the point `(180, 80)`.
/// Any non-finite coordinate (`nan`, `inf`) yields the antipodal maximum,
/// `π · EARTH_RADIUS_KM`, which ranks the router behind every finite one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Haversine;

impl Distance for Haversine {
    fn distance(&self, a: LonLat, b: LonLat) -> f64 {
        let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (b.lon - a.lon).to_radians();

        let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        if h.is_nan() {
            return PI * EARTH_RADIUS_KM;
        }
        // Rounding can push h just outside [0, 1].
        2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
    }
}
