//! Deterministic identifier derivation.
//!
//! Both identifier kinds are SHA-256 digests over a domain-separated,
//! fixed-width encoding of their inputs, hex-encoded (64 lowercase hex
//! characters). Derivation is a pure function of explicit arguments — no
//! clock reads, no randomness — so every replica that applies the same
//! operation sequence derives the same identifiers.
//!
//! - [`MemoryId`] binds owner, coordinates, submission time, and the global
//!   creation ordinal. The ordinal makes two submissions in the same logical
//!   instant by the same owner at the same coordinates distinct.
//! - [`LocationId`] binds the exact coordinate pair only, latitude first
//!   (the encoding is order-sensitive, not commutative), so identical
//!   coordinates from any caller collide into the same bucket.

use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{GeoPoint, Identity};

const MEMORY_DOMAIN: &[u8] = b"geovault:memory:v1";
const LOCATION_DOMAIN: &[u8] = b"geovault:location:v1";

/// Unique identifier of a stored memory.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct MemoryId(String);

impl MemoryId {
    /// Derive the identifier for a memory submitted by `owner` at `point`.
    ///
    /// `sequence` is the number of memories ever created before this one
    /// (the global creation ordinal), supplied explicitly by the ledger.
    pub fn derive(
        owner: &Identity,
        point: GeoPoint,
        created_at: DateTime<Utc>,
        sequence: u64,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(MEMORY_DOMAIN);
        hasher.update((owner.as_str().len() as u64).to_be_bytes());
        hasher.update(owner.as_str().as_bytes());
        hasher.update(point.lat.to_be_bytes());
        hasher.update(point.lon.to_be_bytes());
        hasher.update(created_at.timestamp_micros().to_be_bytes());
        hasher.update(sequence.to_be_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Rewrap an identifier previously produced by [`MemoryId::derive`]
    /// (e.g. read back from storage or received from a caller).
    pub fn from_hex(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The hex digest string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a coordinate bucket.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    /// Derive the bucket identifier for an exact coordinate pair.
    ///
    /// Independent of owner and time: every memory stored at `point` maps to
    /// the same bucket, from any caller, at any step.
    pub fn derive(point: GeoPoint) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(LOCATION_DOMAIN);
        hasher.update(point.lat.to_be_bytes());
        hasher.update(point.lon.to_be_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Rewrap an identifier previously produced by [`LocationId::derive`].
    pub fn from_hex(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The hex digest string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    // ── MemoryId ────────────────────────────────────────────────────────────

    #[test]
    fn memory_id_is_deterministic() {
        let owner = Identity::new("alice");
        let p = GeoPoint::new(10_000_000, 20_000_000);
        let a = MemoryId::derive(&owner, p, t0(), 0);
        let b = MemoryId::derive(&owner, p, t0(), 0);
        assert_eq!(a, b);
    }

    #[test]
    fn memory_id_is_64_hex_chars() {
        let id = MemoryId::derive(&Identity::new("alice"), GeoPoint::new(0, 0), t0(), 0);
        assert_eq!(id.as_str().len(), 64);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn sequence_distinguishes_same_instant_submissions() {
        // Same owner, same coordinates, same logical instant – only the
        // creation ordinal differs.
        let owner = Identity::new("alice");
        let p = GeoPoint::new(10_000_000, 20_000_000);
        let first = MemoryId::derive(&owner, p, t0(), 7);
        let second = MemoryId::derive(&owner, p, t0(), 8);
        assert_ne!(first, second);
    }

    #[test]
    fn owner_is_bound_into_the_id() {
        let p = GeoPoint::new(1, 2);
        let a = MemoryId::derive(&Identity::new("alice"), p, t0(), 0);
        let b = MemoryId::derive(&Identity::new("bob"), p, t0(), 0);
        assert_ne!(a, b);
    }

    #[test]
    fn coordinates_are_bound_into_the_id() {
        let owner = Identity::new("alice");
        let a = MemoryId::derive(&owner, GeoPoint::new(1, 2), t0(), 0);
        let b = MemoryId::derive(&owner, GeoPoint::new(2, 1), t0(), 0);
        assert_ne!(a, b);
    }

    // ── LocationId ──────────────────────────────────────────────────────────

    #[test]
    fn location_id_collides_for_identical_coordinates() {
        let a = LocationId::derive(GeoPoint::new(10_000_000, 20_000_000));
        let b = LocationId::derive(GeoPoint::new(10_000_000, 20_000_000));
        assert_eq!(a, b);
    }

    #[test]
    fn location_id_is_order_sensitive() {
        // (lat, lon) and (lon, lat) are different buckets.
        let a = LocationId::derive(GeoPoint::new(10_000_000, 20_000_000));
        let b = LocationId::derive(GeoPoint::new(20_000_000, 10_000_000));
        assert_ne!(a, b);
    }

    #[test]
    fn location_id_ignores_owner_and_time() {
        // Only the coordinates feed the digest; the same pair derived twice
        // is the same bucket regardless of who asks or when.
        let p = GeoPoint::new(-5_000_000, 3_250_000);
        assert_eq!(LocationId::derive(p), LocationId::derive(p));
    }

    #[test]
    fn memory_and_location_domains_are_separated() {
        // A location digest can never alias a memory digest for the same
        // coordinate inputs.
        let p = GeoPoint::new(0, 0);
        let loc = LocationId::derive(p);
        let mem = MemoryId::derive(&Identity::new(""), p, t0(), 0);
        assert_ne!(loc.as_str(), mem.as_str());
    }

    #[test]
    fn serde_is_transparent() {
        let id = LocationId::derive(GeoPoint::new(1, 1));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_str()));
        let back: LocationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
