//! Error types for the meetup store.
//!
//! [`StoreError`] covers snapshot I/O and decoding. [`AccessError`] is the
//! outcome of a lookup that found nothing or found something the caller
//! may not see.

use whenfree_types::MeetupId;

/// Errors that can occur while loading or persisting a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the snapshot stream failed.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot is not valid JSON of the expected shape.
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The snapshot parsed but contradicts itself.
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),
}

/// Why a meetup could not be handed to a caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// No meetup is stored under this identifier.
    #[error("meetup {0} not found")]
    NotFound(MeetupId),

    /// The meetup exists but the caller's token is not on its invite list.
    #[error("access to meetup {0} denied")]
    Forbidden(MeetupId),
}
