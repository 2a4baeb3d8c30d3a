//! Fixed-point geographic coordinates.
//!
//! Coordinates are `i64` micro-degrees: degrees scaled by [`COORD_SCALE`]
//! (1,000,000), giving six decimal places of precision. All deterministic
//! core logic operates on these integers — floating point never enters a
//! state transition, so every replica derives bit-identical state from the
//! same operation sequence.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Scale factor between degrees and the stored integer representation.
pub const COORD_SCALE: i64 = 1_000_000;

/// A fixed-point WGS-84 coordinate pair in micro-degrees.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct GeoPoint {
    /// Latitude in micro-degrees.
    pub lat: i64,
    /// Longitude in micro-degrees.
    pub lon: i64,
}

impl GeoPoint {
    /// Build a point from already-scaled micro-degree values.
    pub const fn new(lat: i64, lon: i64) -> Self {
        Self { lat, lon }
    }

    /// Convert floating-point degrees to the fixed-point representation.
    ///
    /// Convenience for callers sitting outside the deterministic boundary;
    /// core state transitions only ever receive already-scaled integers.
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self {
            lat: (lat * COORD_SCALE as f64).round() as i64,
            lon: (lon * COORD_SCALE as f64).round() as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_degrees_scales_to_micro_degrees() {
        let p = GeoPoint::from_degrees(10.0, 20.0);
        assert_eq!(p, GeoPoint::new(10_000_000, 20_000_000));
    }

    #[test]
    fn from_degrees_keeps_six_decimal_places() {
        let p = GeoPoint::from_degrees(48.858844, 2.294351);
        assert_eq!(p, GeoPoint::new(48_858_844, 2_294_351));
    }

    #[test]
    fn from_degrees_handles_negative_coordinates() {
        let p = GeoPoint::from_degrees(-33.868820, 151.209296);
        assert_eq!(p, GeoPoint::new(-33_868_820, 151_209_296));
    }

    #[test]
    fn serde_roundtrip() {
        let p = GeoPoint::new(10_000_000, -20_500_000);
        let json = serde_json::to_string(&p).unwrap();
        let back: GeoPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
