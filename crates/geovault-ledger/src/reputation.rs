//! Identity reputation bookkeeping.
//!
//! A default-zero mapping from identity to a monotone non-decreasing score.
//! Only the ledger's operations credit it (creation, foreign retrieval,
//! like); no decrement exists in this core, and unknown identities read as
//! zero rather than being materialized.

use geovault_types::Identity;
use rusqlite::{Connection, OptionalExtension, params};

/// Add `amount` to `identity`'s score, initializing at zero if absent.
pub(crate) fn credit(conn: &Connection, identity: &Identity, amount: i64) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO reputation (identity, score) VALUES (?1, ?2)
         ON CONFLICT(identity) DO UPDATE SET score = score + excluded.score",
        params![identity.as_str(), amount],
    )?;
    Ok(())
}

/// Current score for `identity`; zero when the identity has never been
/// credited.
pub(crate) fn score_of(conn: &Connection, identity: &Identity) -> rusqlite::Result<i64> {
    let score = conn
        .query_row(
            "SELECT score FROM reputation WHERE identity = ?1",
            params![identity.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(score.unwrap_or(0))
}
