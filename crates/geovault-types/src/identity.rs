//! Participant identities.
//!
//! An [`Identity`] is the opaque, authenticated caller handle the host
//! platform supplies with every operation. The core never interprets it
//! beyond equality; provenance (signature verification, session auth) is the
//! host's job.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Opaque participant identity.
///
/// Wraps the host-supplied identity string (an account address, a key
/// fingerprint, …). Two operations are attributed to the same participant
/// exactly when their identities compare equal.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap a host-supplied identity string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The underlying identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for Identity {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}
