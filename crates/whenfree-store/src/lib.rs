//! In-memory meetup store with whole-snapshot persistence.
//!
//! # Architecture
//!
//! ```text
//! request handlers
//!     |
//!     +-- with_shared / read()     --+
//!     +-- with_exclusive / write() --+--> Storage (RwLock<Meetups>)
//!                                         |
//!     startup: Storage::open  ------------+--> SnapshotFile::load
//!     shutdown: Storage::close -----------+--> SnapshotFile::save
//! ```
//!
//! The store lives entirely in memory. The snapshot is read once when the
//! store is opened and written once when it is closed; anything changed
//! after the last close is lost if the process dies.
//!
//! # Modules
//!
//! - [`storage`] -- The lock-guarded coordinator and its access windows
//! - [`snapshot`] -- JSON snapshot codec and the on-disk snapshot file
//! - [`meetups`] -- Meetup creation and access-checked retrieval
//! - [`error`] -- Shared error types

pub mod error;
pub mod meetups;
pub mod snapshot;
pub mod storage;

// Re-export primary types for convenience.
pub use error::{AccessError, StoreError};
pub use snapshot::SnapshotFile;
pub use storage::{Meetups, ReadTxn, Storage, WriteTxn};
