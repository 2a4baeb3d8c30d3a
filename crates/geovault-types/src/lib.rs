//! `geovault-types` – Shared data model.
//!
//! The vocabulary every GeoVault crate speaks: participant identities,
//! fixed-point coordinates, memory and location records, deterministic
//! identifier derivation, and the notification payloads the host platform
//! indexes after each committed state change.
//!
//! # Modules
//!
//! - [`identity`] – [`Identity`]: opaque authenticated participant handle.
//! - [`point`] – [`GeoPoint`]: micro-degree fixed-point coordinates.
//! - [`id`] – [`MemoryId`] / [`LocationId`]: domain-separated SHA-256
//!   identifiers, derived as pure functions of explicit inputs.
//! - [`record`] – [`Memory`], [`MemoryDraft`], [`MemoryView`],
//!   [`LocationStat`], and the ledger's fixed credit/threshold constants.
//! - [`event`] – [`Notification`]: the four event kinds emitted after each
//!   committed state change.

pub mod event;
pub mod id;
pub mod identity;
pub mod point;
pub mod record;

pub use event::{Notification, NotificationKind};
pub use id::{LocationId, MemoryId};
pub use identity::Identity;
pub use point::{COORD_SCALE, GeoPoint};
pub use record::{
    CREDIT_CREATE, CREDIT_LIKE, CREDIT_RETRIEVE, LANDMARK_THRESHOLD, LocationStat, Memory,
    MemoryDraft, MemoryView,
};
