//! `geovault-geo` – Fixed-point planar geometry.
//!
//! Distance and region math over [`GeoPoint`] values, entirely in scaled
//! integer space. Used by the query engine to decide which memories fall
//! inside a caller's search radius.
//!
//! # Approximation model
//!
//! Distances are **squared planar** distances: coordinate deltas in
//! micro-degrees, squared and summed. This is not haversine-accurate — there
//! is no correction for latitude-dependent longitude scaling — and is
//! acceptable only for small radii. Radii in kilometres are converted with a
//! fixed [`KM_PER_DEGREE`] divisor of 111.
//!
//! Intermediates are widened to `i128` so squaring planet-scale deltas
//! cannot overflow.
//!
//! # Example
//!
//! ```rust
//! use geovault_geo::{BoundingBox, radius_km_to_scaled, within_radius};
//! use geovault_types::GeoPoint;
//!
//! let center = GeoPoint::new(10_000_000, 20_000_000);
//! let near = GeoPoint::new(10_000_500, 20_000_000);
//!
//! let radius = radius_km_to_scaled(1);
//! assert!(within_radius(center, near, radius));
//!
//! // Candidate pre-filter: every in-radius point is inside the box.
//! let bbox = BoundingBox::around(center, radius);
//! assert!(bbox.contains(near));
//! ```

use geovault_types::{COORD_SCALE, GeoPoint};

/// Approximate kilometres per degree of latitude (and of longitude at the
/// equator); the fixed divisor for radius conversion.
pub const KM_PER_DEGREE: i64 = 111;

/// Squared planar distance between two points, in squared micro-degrees.
pub fn squared_distance(a: GeoPoint, b: GeoPoint) -> i128 {
    let dlat = (a.lat - b.lat) as i128;
    let dlon = (a.lon - b.lon) as i128;
    dlat * dlat + dlon * dlon
}

/// Convert a radius in kilometres to micro-degrees.
///
/// Integer division, matching the ledger's replay-safe arithmetic:
/// `radius_km * 1_000_000 / 111`.
pub fn radius_km_to_scaled(radius_km: u32) -> i64 {
    radius_km as i64 * COORD_SCALE / KM_PER_DEGREE
}

/// True when `p` lies within `radius_scaled` micro-degrees of `center`
/// (inclusive), compared in squared space.
pub fn within_radius(center: GeoPoint, p: GeoPoint, radius_scaled: i64) -> bool {
    let r = radius_scaled as i128;
    squared_distance(center, p) <= r * r
}

/// Inclusive axis-aligned coordinate window.
///
/// [`BoundingBox::around`] builds the tightest box containing the search
/// circle, so a range lookup over indexed coordinates yields a candidate
/// superset of the true result; [`within_radius`] then applies the exact
/// circular filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_lat: i64,
    pub max_lat: i64,
    pub min_lon: i64,
    pub max_lon: i64,
}

impl BoundingBox {
    /// The box circumscribing the circle of `radius_scaled` micro-degrees
    /// around `center`. Saturates at the i64 range ends.
    pub fn around(center: GeoPoint, radius_scaled: i64) -> Self {
        Self {
            min_lat: center.lat.saturating_sub(radius_scaled),
            max_lat: center.lat.saturating_add(radius_scaled),
            min_lon: center.lon.saturating_sub(radius_scaled),
            max_lon: center.lon.saturating_add(radius_scaled),
        }
    }

    /// True when the point lies inside or on the boundary of the box.
    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat >= self.min_lat && p.lat <= self.max_lat && p.lon >= self.min_lon && p.lon <= self.max_lon
    }
}
