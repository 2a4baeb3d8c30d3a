//! The GeoVault ledger: creation, retrieval, likes, geographic queries, and
//! the read surface.
//!
//! Every state-mutating operation runs inside a single SQLite transaction:
//! either all of its effects (memory row, location aggregate, landmark
//! latch, reputation credit) commit together, or the operation fails and
//! leaves state untouched. Notifications go out on the bus only after the
//! commit, so an indexer can never observe an event for state that was
//! rolled back.
//!
//! Mutations take `&mut self` and reads take `&self`: the borrow checker
//! enforces the single-writer total order the replicated execution model
//! requires, while read accessors observe the snapshot as of the last
//! committed mutation.
//!
//! # Storage layout
//!
//! Four tables are created (if they do not already exist) on open:
//!
//! | table | contents |
//! |-------|----------|
//! | `memories`   | one row per memory; `seq` is the global creation ordinal, `(lat, lon)` are indexed for bounded-region queries |
//! | `locations`  | one row per coordinate bucket: density count, landmark latch, reserved rating |
//! | `landmarks`  | append-only latch order of landmark promotions |
//! | `reputation` | default-zero monotone score per identity |
//!
//! Timestamps are stored as RFC-3339 text (UTC); the inheritance list as a
//! JSON array of identity strings.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info, warn};

use geovault_bus::NotificationBus;
use geovault_geo::{BoundingBox, radius_km_to_scaled, within_radius};
use geovault_types::{
    CREDIT_CREATE, CREDIT_LIKE, CREDIT_RETRIEVE, GeoPoint, Identity, LANDMARK_THRESHOLD,
    LocationId, LocationStat, Memory, MemoryDraft, MemoryId, MemoryView, Notification,
};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::reputation;

const MEMORY_COLUMNS: &str =
    "id, owner, content, created_at, lat, lon, unlock_time, inheritance, is_public, likes, memory_type, seq";

/// The canonical, SQLite-backed GeoVault state.
pub struct Ledger {
    conn: Connection,
    bus: NotificationBus,
}

impl Ledger {
    /// Open (or create) a persistent ledger at `path`.
    pub fn open(path: &str) -> Result<Self> {
        Self::with_connection(Connection::open(path)?, NotificationBus::default())
    }

    /// Open a temporary in-memory ledger (useful for testing and ephemeral
    /// replicas).
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, NotificationBus::default())
    }

    /// Open a ledger according to `config`.
    pub fn with_config(config: &LedgerConfig) -> Result<Self> {
        let conn = match &config.db_path {
            Some(path) => Connection::open(path)?,
            None => Connection::open_in_memory()?,
        };
        Self::with_connection(conn, NotificationBus::new(config.bus_capacity))
    }

    fn with_connection(conn: Connection, bus: NotificationBus) -> Result<Self> {
        let ledger = Self { conn, bus };
        ledger.init_schema()?;
        Ok(ledger)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS memories (
                id          TEXT NOT NULL PRIMARY KEY,
                owner       TEXT NOT NULL,
                content     TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                lat         INTEGER NOT NULL,
                lon         INTEGER NOT NULL,
                unlock_time TEXT NOT NULL,
                inheritance TEXT NOT NULL,
                is_public   INTEGER NOT NULL,
                likes       INTEGER NOT NULL DEFAULT 0,
                memory_type TEXT NOT NULL,
                seq         INTEGER NOT NULL UNIQUE
            );
            CREATE INDEX IF NOT EXISTS idx_memories_owner ON memories(owner, seq);
            CREATE INDEX IF NOT EXISTS idx_memories_region ON memories(lat, lon);
            CREATE TABLE IF NOT EXISTS locations (
                id               TEXT NOT NULL PRIMARY KEY,
                lat              INTEGER NOT NULL,
                lon              INTEGER NOT NULL,
                memory_count     INTEGER NOT NULL DEFAULT 0,
                is_landmark      INTEGER NOT NULL DEFAULT 0,
                community_rating INTEGER NOT NULL DEFAULT 0
            );
            CREATE TABLE IF NOT EXISTS landmarks (
                position    INTEGER PRIMARY KEY AUTOINCREMENT,
                location_id TEXT NOT NULL UNIQUE
            );
            CREATE TABLE IF NOT EXISTS reputation (
                identity TEXT NOT NULL PRIMARY KEY,
                score    INTEGER NOT NULL DEFAULT 0
            );",
        )?;
        Ok(())
    }

    /// Handle to the notification bus, for host-platform indexers to
    /// subscribe on.
    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    // ── mutations ───────────────────────────────────────────────────────────

    /// Register a new memory owned by `owner`, submitted at ledger time
    /// `now`.
    ///
    /// Persists the record, bumps the location aggregate (latching landmark
    /// status exactly when the bucket's count reaches
    /// [`LANDMARK_THRESHOLD`]), and credits the owner [`CREDIT_CREATE`]
    /// reputation — all in one transaction.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidInput`] – `encrypted_content` is empty.
    /// - [`LedgerError::InvalidSchedule`] – `unlock_time <= now`.
    pub fn create_memory(
        &mut self,
        owner: &Identity,
        draft: MemoryDraft,
        now: DateTime<Utc>,
    ) -> Result<MemoryId> {
        if draft.encrypted_content.is_empty() {
            warn!(%owner, "rejected creation with empty content");
            return Err(LedgerError::InvalidInput);
        }
        if draft.unlock_time <= now {
            warn!(%owner, %draft.unlock_time, "rejected creation with non-future unlock time");
            return Err(LedgerError::InvalidSchedule {
                unlock_time: draft.unlock_time,
                now,
            });
        }

        let tx = self.conn.transaction()?;

        // Global creation ordinal: memories are never deleted, so the row
        // count is the number of memories ever created.
        let sequence =
            tx.query_row("SELECT COUNT(*) FROM memories", [], |row| row.get::<_, i64>(0))? as u64;
        let id = MemoryId::derive(owner, draft.point, now, sequence);
        let location_id = LocationId::derive(draft.point);

        let inheritance = serde_json::to_string(&draft.inheritance)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        tx.execute(
            "INSERT INTO memories
                 (id, owner, content, created_at, lat, lon, unlock_time, inheritance, is_public, likes, memory_type, seq)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10, ?11)",
            params![
                id.as_str(),
                owner.as_str(),
                draft.encrypted_content,
                now.to_rfc3339(),
                draft.point.lat,
                draft.point.lon,
                draft.unlock_time.to_rfc3339(),
                inheritance,
                draft.is_public,
                draft.memory_type,
                sequence as i64,
            ],
        )?;

        tx.execute(
            "INSERT INTO locations (id, lat, lon, memory_count) VALUES (?1, ?2, ?3, 1)
             ON CONFLICT(id) DO UPDATE SET memory_count = memory_count + 1",
            params![location_id.as_str(), draft.point.lat, draft.point.lon],
        )?;
        let memory_count = tx.query_row(
            "SELECT memory_count FROM locations WHERE id = ?1",
            params![location_id.as_str()],
            |row| row.get::<_, i64>(0),
        )? as u64;

        // One-way latch: only the exact 4 -> 5 transition promotes, so the
        // landmark append and its notification happen at most once per
        // location, ever.
        let became_landmark = memory_count == LANDMARK_THRESHOLD;
        if became_landmark {
            tx.execute(
                "UPDATE locations SET is_landmark = 1 WHERE id = ?1",
                params![location_id.as_str()],
            )?;
            tx.execute(
                "INSERT INTO landmarks (location_id) VALUES (?1)",
                params![location_id.as_str()],
            )?;
        }

        reputation::credit(&tx, owner, CREDIT_CREATE)?;
        tx.commit()?;

        info!(%id, %owner, lat = draft.point.lat, lon = draft.point.lon, "memory created");
        self.bus.publish(Notification::MemoryStored {
            id: id.clone(),
            owner: owner.clone(),
            point: draft.point,
            unlock_time: draft.unlock_time,
        });
        if became_landmark {
            info!(%location_id, memory_count, "location became a landmark");
            self.bus.publish(Notification::LocationBecameLandmark {
                location_id,
                point: draft.point,
                memory_count,
            });
        }
        Ok(id)
    }

    /// Retrieve a memory on behalf of `requester` at ledger time `now`.
    ///
    /// Credits the owner [`CREDIT_RETRIEVE`] reputation when the requester
    /// is not the owner, and returns the read-only projection (never the
    /// inheritance list).
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] – no memory with that id.
    /// - [`LedgerError::AccessDenied`] – the access rules deny `requester`
    ///   at `now`.
    pub fn retrieve_memory(
        &mut self,
        id: &MemoryId,
        requester: &Identity,
        now: DateTime<Utc>,
    ) -> Result<MemoryView> {
        let tx = self.conn.transaction()?;

        let memory = load_memory(&tx, id)?.ok_or_else(|| LedgerError::NotFound(id.clone()))?;
        let grant = geovault_access::evaluate(&memory, requester, now).ok_or_else(|| {
            warn!(%id, %requester, "access denied");
            LedgerError::AccessDenied {
                id: id.clone(),
                requester: requester.clone(),
            }
        })?;

        if *requester != memory.owner {
            reputation::credit(&tx, &memory.owner, CREDIT_RETRIEVE)?;
        }
        tx.commit()?;

        debug!(%id, %requester, ?grant, "memory retrieved");
        self.bus.publish(Notification::MemoryUnlocked {
            id: id.clone(),
            accessor: requester.clone(),
            time: now,
        });
        Ok(MemoryView::of(&memory))
    }

    /// Like a public memory on behalf of `liker`.
    ///
    /// Increments the like counter, credits the owner [`CREDIT_LIKE`]
    /// reputation, and returns the new total. There is no per-(memory,
    /// liker) uniqueness guard: repeated likes by the same identity each
    /// count.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] – no memory with that id.
    /// - [`LedgerError::InvalidOperation`] – the memory is private, or the
    ///   liker owns it.
    pub fn like_memory(&mut self, id: &MemoryId, liker: &Identity) -> Result<u64> {
        let tx = self.conn.transaction()?;

        let memory = load_memory(&tx, id)?.ok_or_else(|| LedgerError::NotFound(id.clone()))?;
        if !memory.is_public {
            warn!(%id, %liker, "rejected like on private memory");
            return Err(LedgerError::InvalidOperation {
                id: id.clone(),
                reason: "memory is not public".to_string(),
            });
        }
        if *liker == memory.owner {
            warn!(%id, %liker, "rejected self-like");
            return Err(LedgerError::InvalidOperation {
                id: id.clone(),
                reason: "owners cannot like their own memory".to_string(),
            });
        }

        let total = memory.likes + 1;
        tx.execute(
            "UPDATE memories SET likes = ?1 WHERE id = ?2",
            params![total as i64, id.as_str()],
        )?;
        reputation::credit(&tx, &memory.owner, CREDIT_LIKE)?;
        tx.commit()?;

        debug!(%id, %liker, total, "memory liked");
        self.bus.publish(Notification::MemoryLiked {
            id: id.clone(),
            liker: liker.clone(),
            total_likes: total,
        });
        Ok(total)
    }

    // ── queries ─────────────────────────────────────────────────────────────

    /// All memories within `radius_km` of `center` that `requester` may
    /// access at ledger time `now`, in global creation order.
    ///
    /// A fresh computation on every call (no stored cursor), with no
    /// pagination or limit — callers needing bounded results apply their
    /// own. Candidates come from a bounded-region lookup over the indexed
    /// coordinates; the exact squared planar distance and the access
    /// predicate then filter them.
    pub fn explore_location(
        &self,
        center: GeoPoint,
        radius_km: u32,
        requester: &Identity,
        now: DateTime<Utc>,
    ) -> Result<Vec<MemoryId>> {
        let radius = radius_km_to_scaled(radius_km);
        let bbox = BoundingBox::around(center, radius);

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {MEMORY_COLUMNS} FROM memories
             WHERE lat BETWEEN ?1 AND ?2 AND lon BETWEEN ?3 AND ?4
             ORDER BY seq ASC"
        ))?;
        let rows = stmt.query_map(
            params![bbox.min_lat, bbox.max_lat, bbox.min_lon, bbox.max_lon],
            row_to_memory,
        )?;

        let mut matches = Vec::new();
        for row in rows {
            let memory = row?;
            if !within_radius(center, memory.point, radius) {
                continue;
            }
            if !geovault_access::can_access(&memory, requester, now) {
                continue;
            }
            matches.push(memory.id);
        }
        debug!(radius_km, count = matches.len(), "explore complete");
        Ok(matches)
    }

    // ── read accessors ──────────────────────────────────────────────────────

    /// Number of memories created by `identity`.
    pub fn user_memory_count(&self, identity: &Identity) -> Result<u64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM memories WHERE owner = ?1",
            params![identity.as_str()],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(count as u64)
    }

    /// Identifiers of `identity`'s memories, in creation order.
    pub fn memories_of(&self, identity: &Identity) -> Result<Vec<MemoryId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM memories WHERE owner = ?1 ORDER BY seq ASC")?;
        let rows = stmt.query_map(params![identity.as_str()], |row| {
            row.get::<_, String>(0).map(MemoryId::from_hex)
        })?;
        rows.collect::<rusqlite::Result<_>>().map_err(Into::into)
    }

    /// Total number of memories ever created.
    pub fn total_memory_count(&self) -> Result<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM memories", [], |row| {
                row.get::<_, i64>(0)
            })?;
        Ok(count as u64)
    }

    /// Number of locations that have latched landmark status.
    pub fn landmark_count(&self) -> Result<u64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM landmarks", [], |row| {
                row.get::<_, i64>(0)
            })?;
        Ok(count as u64)
    }

    /// Landmark locations in the order they latched.
    pub fn landmarks(&self) -> Result<Vec<LocationId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT location_id FROM landmarks ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0).map(LocationId::from_hex))?;
        rows.collect::<rusqlite::Result<_>>().map_err(Into::into)
    }

    /// The aggregate for the bucket at `point`, or `None` when no memory
    /// has ever been stored there.
    pub fn location_stat(&self, point: GeoPoint) -> Result<Option<LocationStat>> {
        let location_id = LocationId::derive(point);
        let stat = self
            .conn
            .query_row(
                "SELECT lat, lon, memory_count, is_landmark, community_rating
                 FROM locations WHERE id = ?1",
                params![location_id.as_str()],
                |row| {
                    Ok(LocationStat {
                        id: location_id.clone(),
                        point: GeoPoint::new(row.get(0)?, row.get(1)?),
                        memory_count: row.get::<_, i64>(2)? as u64,
                        is_landmark: row.get(3)?,
                        community_rating: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(stat)
    }

    /// Number of memories stored at the exact coordinate pair `point`; zero
    /// when the bucket is absent.
    pub fn location_memory_count(&self, point: GeoPoint) -> Result<u64> {
        Ok(self
            .location_stat(point)?
            .map(|stat| stat.memory_count)
            .unwrap_or(0))
    }

    /// Current reputation score of `identity`; zero for unknown identities.
    pub fn reputation_of(&self, identity: &Identity) -> Result<i64> {
        reputation::score_of(&self.conn, identity).map_err(Into::into)
    }
}

fn load_memory(conn: &Connection, id: &MemoryId) -> rusqlite::Result<Option<Memory>> {
    conn.query_row(
        &format!("SELECT {MEMORY_COLUMNS} FROM memories WHERE id = ?1"),
        params![id.as_str()],
        row_to_memory,
    )
    .optional()
}

fn row_to_memory(row: &rusqlite::Row<'_>) -> rusqlite::Result<Memory> {
    let created_at_raw: String = row.get(3)?;
    let created_at = created_at_raw
        .parse::<DateTime<Utc>>()
        .map_err(|e| rusqlite::Error::InvalidColumnType(3, e.to_string(), Type::Text))?;
    let unlock_raw: String = row.get(6)?;
    let unlock_time = unlock_raw
        .parse::<DateTime<Utc>>()
        .map_err(|e| rusqlite::Error::InvalidColumnType(6, e.to_string(), Type::Text))?;
    let inheritance_raw: String = row.get(7)?;
    let inheritance: Vec<Identity> = serde_json::from_str(&inheritance_raw)
        .map_err(|e| rusqlite::Error::InvalidColumnType(7, e.to_string(), Type::Text))?;

    Ok(Memory {
        id: MemoryId::from_hex(row.get::<_, String>(0)?),
        owner: Identity::from(row.get::<_, String>(1)?),
        encrypted_content: row.get(2)?,
        created_at,
        point: GeoPoint::new(row.get(4)?, row.get(5)?),
        unlock_time,
        inheritance,
        is_public: row.get(8)?,
        likes: row.get::<_, i64>(9)? as u64,
        memory_type: row.get(10)?,
        sequence: row.get::<_, i64>(11)? as u64,
    })
}
