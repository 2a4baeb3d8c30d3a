//! Ledger error taxonomy.

use chrono::{DateTime, Utc};
use geovault_types::{Identity, MemoryId};
use thiserror::Error;

/// Errors that can arise from ledger operations.
///
/// Every variant except [`Sqlite`](LedgerError::Sqlite) is caller-input
/// driven and non-retryable: the caller must correct the input and
/// resubmit. A rejected operation leaves no partial state behind.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Creation with an empty encrypted payload.
    #[error("encrypted content must not be empty")]
    InvalidInput,

    /// Creation whose unlock time is not strictly in the future.
    #[error("unlock time {unlock_time} is not after submission time {now}")]
    InvalidSchedule {
        unlock_time: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    /// No memory with the given id exists.
    #[error("no memory with id {0}")]
    NotFound(MemoryId),

    /// The access rules deny the requester.
    #[error("access to memory {id} denied for {requester}")]
    AccessDenied { id: MemoryId, requester: Identity },

    /// A like on a private memory, or a self-like.
    #[error("invalid operation on memory {id}: {reason}")]
    InvalidOperation { id: MemoryId, reason: String },

    /// SQLite substrate fault.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
