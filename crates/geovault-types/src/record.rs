//! Memory and location records.
//!
//! [`Memory`] is the canonical stored record; [`MemoryDraft`] is the
//! caller-supplied creation request before the ledger assigns identity and
//! ordering; [`MemoryView`] is the read-only projection returned to
//! retrievers; [`LocationStat`] is the per-bucket density aggregate.
//!
//! The fixed reputation credits and the landmark threshold live here too:
//! they are protocol constants, identical on every replica, never
//! configuration.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{GeoPoint, Identity, LocationId, MemoryId};

/// Number of memories at one coordinate bucket that latches landmark status.
pub const LANDMARK_THRESHOLD: u64 = 5;

/// Reputation credited to the owner when a memory is created.
pub const CREDIT_CREATE: i64 = 10;

/// Reputation credited to the owner when another identity retrieves their
/// memory.
pub const CREDIT_RETRIEVE: i64 = 1;

/// Reputation credited to the owner when their memory is liked.
pub const CREDIT_LIKE: i64 = 5;

/// A single stored memory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    /// Content-derived identifier; unique, never reassigned.
    pub id: MemoryId,
    /// Creator; immutable after creation.
    pub owner: Identity,
    /// Opaque payload, encrypted by the caller before submission. The core
    /// never interprets it.
    pub encrypted_content: String,
    /// Ledger time at submission.
    pub created_at: DateTime<Utc>,
    /// Anchoring coordinates.
    pub point: GeoPoint,
    /// Once `now >= unlock_time`, read access opens to everyone.
    pub unlock_time: DateTime<Utc>,
    /// Identities granted access ahead of the unlock time. Ordered,
    /// duplicates allowed, fixed at creation (no amend/revoke operation
    /// exists).
    pub inheritance: Vec<Identity>,
    /// Whether any identity may read and like this memory.
    pub is_public: bool,
    /// Monotone counter, incremented only by the like operation.
    pub likes: u64,
    /// Free-form classification tag (e.g. "personal", "community",
    /// "historical"); not validated against an enum.
    pub memory_type: String,
    /// Global creation ordinal (0-based). Drives query ordering.
    pub sequence: u64,
}

/// A caller-supplied creation request.
///
/// The ledger validates it, assigns the [`MemoryId`] and creation ordinal,
/// and stamps the submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryDraft {
    /// Already-encrypted payload; must be non-empty.
    pub encrypted_content: String,
    /// Anchoring coordinates.
    pub point: GeoPoint,
    /// Must be strictly after the submission time.
    pub unlock_time: DateTime<Utc>,
    /// Identities granted access ahead of the unlock time.
    pub inheritance: Vec<Identity>,
    /// Whether any identity may read and like this memory.
    pub is_public: bool,
    /// Free-form classification tag.
    pub memory_type: String,
}

/// Read-only projection of a memory returned by retrieval.
///
/// Deliberately excludes the inheritance list and all internal ordering
/// state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MemoryView {
    /// Creator of the memory.
    pub owner: Identity,
    /// The opaque encrypted payload.
    pub encrypted_content: String,
    /// Ledger time at submission.
    pub created_at: DateTime<Utc>,
    /// Anchoring coordinates.
    pub point: GeoPoint,
    /// Free-form classification tag.
    pub memory_type: String,
    /// Current like total.
    pub likes: u64,
}

impl MemoryView {
    /// Project a stored record onto the retrieval surface.
    pub fn of(memory: &Memory) -> Self {
        Self {
            owner: memory.owner.clone(),
            encrypted_content: memory.encrypted_content.clone(),
            created_at: memory.created_at,
            point: memory.point,
            memory_type: memory.memory_type.clone(),
            likes: memory.likes,
        }
    }
}

/// Density aggregate for one coordinate bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LocationStat {
    /// Bucket identifier derived from the coordinates.
    pub id: LocationId,
    /// Coordinates of the bucket, set on first write.
    pub point: GeoPoint,
    /// Memories ever stored at this exact coordinate pair.
    pub memory_count: u64,
    /// One-way latch: flips to true exactly when `memory_count` first
    /// reaches [`LANDMARK_THRESHOLD`]; never reverts.
    pub is_landmark: bool,
    /// Reserved aggregate; no mutating operation is defined in this core.
    pub community_rating: i64,
}
