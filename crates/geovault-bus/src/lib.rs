//! `geovault-bus` – Typed notification fan-out.
//!
//! Delivers [`Notification`]s from the ledger to host-platform indexers over
//! [`tokio::sync::broadcast`] channels, so every subscriber receives every
//! event without any single subscriber blocking the others.
//!
//! # Lanes
//!
//! Traffic is partitioned into one lane per [`NotificationKind`] plus a
//! firehose lane carrying everything:
//!
//! | Lane | Traffic |
//! |---|---|
//! | [`NotificationKind::Stored`] | memory creations |
//! | [`NotificationKind::Unlocked`] | authorized retrievals |
//! | [`NotificationKind::Liked`] | likes on public memories |
//! | [`NotificationKind::Landmark`] | landmark promotions (at most one per location, ever) |
//! | firehose ([`NotificationBus::subscribe_all`]) | every notification |
//!
//! Delivery is best-effort from the ledger's point of view: publishing with
//! zero subscribers returns a delivered-count of 0 and is a normal
//! condition, never an error — the ledger's state transition has already
//! committed by the time the event goes out.

use geovault_types::{Notification, NotificationKind};
use tokio::sync::broadcast;
use tracing::debug;

/// Default per-lane buffer capacity (events buffered before slow
/// subscribers start observing `Lagged`).
pub const DEFAULT_CAPACITY: usize = 256;

/// Shared notification bus. Clone it cheaply – all clones share the same
/// underlying broadcast channels.
#[derive(Clone, Debug)]
pub struct NotificationBus {
    all: broadcast::Sender<Notification>,
    stored: broadcast::Sender<Notification>,
    unlocked: broadcast::Sender<Notification>,
    liked: broadcast::Sender<Notification>,
    landmark: broadcast::Sender<Notification>,
}

impl NotificationBus {
    /// Create a bus with the given buffer capacity, applied to every lane
    /// independently.
    pub fn new(capacity: usize) -> Self {
        let (all, _) = broadcast::channel(capacity);
        let (stored, _) = broadcast::channel(capacity);
        let (unlocked, _) = broadcast::channel(capacity);
        let (liked, _) = broadcast::channel(capacity);
        let (landmark, _) = broadcast::channel(capacity);
        Self {
            all,
            stored,
            unlocked,
            liked,
            landmark,
        }
    }

    /// Publish a notification to its kind lane and the firehose lane.
    ///
    /// Returns the total number of receivers the event was handed to; 0 when
    /// nothing is currently subscribed.
    pub fn publish(&self, notification: Notification) -> usize {
        let kind = notification.kind();
        debug!(?kind, "publishing notification");
        let lane_count = self
            .lane(kind)
            .send(notification.clone())
            .unwrap_or_default();
        let all_count = self.all.send(notification).unwrap_or_default();
        lane_count + all_count
    }

    /// Subscribe to a single [`NotificationKind`] lane.
    ///
    /// The receiver yields `Err(Lagged(n))` when it falls more than the lane
    /// capacity behind; the subscriber decides whether to continue.
    pub fn subscribe(&self, kind: NotificationKind) -> broadcast::Receiver<Notification> {
        self.lane(kind).subscribe()
    }

    /// Subscribe to every notification, in publish order.
    pub fn subscribe_all(&self) -> broadcast::Receiver<Notification> {
        self.all.subscribe()
    }

    fn lane(&self, kind: NotificationKind) -> &broadcast::Sender<Notification> {
        match kind {
            NotificationKind::Stored => &self.stored,
            NotificationKind::Unlocked => &self.unlocked,
            NotificationKind::Liked => &self.liked,
            NotificationKind::Landmark => &self.landmark,
        }
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
