//! Notification payloads.
//!
//! Every committed state change emits exactly one [`Notification`] (plus a
//! [`Notification::LocationBecameLandmark`] the single time a bucket crosses
//! the threshold). The host platform subscribes to these to build its own
//! indexes; the core never reads them back.
//!
//! Payloads derive `JsonSchema` so the host can generate indexing schemas
//! without hand-maintaining them.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{GeoPoint, Identity, LocationId, MemoryId};

/// Routing lane of a notification, one per event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    /// A memory was created.
    Stored,
    /// A memory was retrieved by an authorized identity.
    Unlocked,
    /// A public memory was liked.
    Liked,
    /// A location crossed the landmark threshold.
    Landmark,
}

/// An event emitted after a state change commits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "event", content = "payload")]
pub enum Notification {
    /// A memory was persisted.
    MemoryStored {
        id: MemoryId,
        owner: Identity,
        point: GeoPoint,
        unlock_time: DateTime<Utc>,
    },
    /// A memory was retrieved by `accessor` at ledger time `time`.
    MemoryUnlocked {
        id: MemoryId,
        accessor: Identity,
        time: DateTime<Utc>,
    },
    /// A public memory was liked; `total_likes` is the counter after the
    /// increment.
    MemoryLiked {
        id: MemoryId,
        liker: Identity,
        total_likes: u64,
    },
    /// A coordinate bucket latched landmark status. Emitted at most once per
    /// location, ever.
    LocationBecameLandmark {
        location_id: LocationId,
        point: GeoPoint,
        memory_count: u64,
    },
}

impl Notification {
    /// The routing lane this notification belongs to.
    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::MemoryStored { .. } => NotificationKind::Stored,
            Notification::MemoryUnlocked { .. } => NotificationKind::Unlocked,
            Notification::MemoryLiked { .. } => NotificationKind::Liked,
            Notification::LocationBecameLandmark { .. } => NotificationKind::Landmark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn kind_maps_every_variant() {
        let point = GeoPoint::new(1, 2);
        let owner = Identity::new("alice");
        let id = MemoryId::derive(&owner, point, Utc.timestamp_opt(0, 0).unwrap(), 0);

        let stored = Notification::MemoryStored {
            id: id.clone(),
            owner: owner.clone(),
            point,
            unlock_time: Utc.timestamp_opt(100, 0).unwrap(),
        };
        assert_eq!(stored.kind(), NotificationKind::Stored);

        let unlocked = Notification::MemoryUnlocked {
            id: id.clone(),
            accessor: Identity::new("bob"),
            time: Utc.timestamp_opt(50, 0).unwrap(),
        };
        assert_eq!(unlocked.kind(), NotificationKind::Unlocked);

        let liked = Notification::MemoryLiked {
            id,
            liker: Identity::new("bob"),
            total_likes: 1,
        };
        assert_eq!(liked.kind(), NotificationKind::Liked);

        let landmark = Notification::LocationBecameLandmark {
            location_id: LocationId::derive(point),
            point,
            memory_count: 5,
        };
        assert_eq!(landmark.kind(), NotificationKind::Landmark);
    }

    #[test]
    fn tagged_serialization_roundtrip() {
        let n = Notification::MemoryLiked {
            id: MemoryId::from_hex("ab".repeat(32)),
            liker: Identity::new("bob"),
            total_likes: 2,
        };
        let json = serde_json::to_string(&n).unwrap();
        assert!(json.contains("\"event\":\"MemoryLiked\""));
        let back: Notification = serde_json::from_str(&json).unwrap();
        assert_eq!(back, n);
    }
}
