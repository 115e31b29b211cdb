//! Identifier and credential newtypes.
//!
//! Meetup identifiers are opaque strings. Fresh ones are generated as
//! UUID v7 text so their lexical order follows creation order, but any
//! string may be presented for lookup; unknown strings simply miss.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a meetup in the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetupId(String);

impl MeetupId {
    /// Generate a fresh identifier (UUID v7, time-ordered).
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeetupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MeetupId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MeetupId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Bearer secret that grants one participant access to a meetup.
///
/// Comparison is byte-exact. The [`Debug`] output is redacted so tokens
/// never end up in logs.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserToken(String);

impl UserToken {
    /// Wrap a token presented by a client.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token is empty. Empty tokens never authenticate.
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for UserToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserToken(<redacted>)")
    }
}

impl From<&str> for UserToken {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

impl From<String> for UserToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}
