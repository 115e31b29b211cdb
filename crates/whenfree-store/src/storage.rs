//! The storage coordinator: one lock-guarded map of every meetup.
//!
//! Access happens inside *access windows*. A shared window lets any
//! number of readers look at the map at once; an exclusive window lets
//! exactly one writer read and mutate it while everyone else waits.
//! Windows come in two forms:
//!
//! - closures, via [`Storage::with_shared`] and [`Storage::with_exclusive`]
//! - scoped handles, via [`Storage::read`] and [`Storage::write`], which
//!   release the lock when dropped on any exit path
//!
//! Acquiring a window is `async` so a waiting request yields its task
//! instead of parking a runtime thread. The accessor itself is synchronous
//! and must stay short: there is no timeout, and an accessor that blocks
//! holds the lock for as long as it blocks. Accessors must not try to
//! open a second window; the lock is not re-entrant.
//!
//! Two windows are never atomic with respect to each other, even when
//! opened back to back by the same caller.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::ops::{Deref, DerefMut};

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};
use whenfree_types::{Meetup, MeetupId};

use crate::error::StoreError;
use crate::snapshot::{self, SnapshotFile};

/// Every stored meetup keyed by identifier, in identifier order.
pub type Meetups = BTreeMap<MeetupId, Meetup>;

/// Owner of the meetup map and, optionally, of the snapshot it is
/// loaded from and persisted to.
#[derive(Debug, Default)]
pub struct Storage {
    meetups: RwLock<Meetups>,
    snapshot: Option<SnapshotFile>,
}

impl Storage {
    /// An empty store with no snapshot behind it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by a snapshot file.
    ///
    /// A missing file yields an empty store. The same file is written
    /// again by [`close`](Self::close).
    ///
    /// # Errors
    ///
    /// Returns the load failure; no partially loaded store is produced.
    pub fn open(snapshot: SnapshotFile) -> Result<Self, StoreError> {
        let meetups = snapshot.load()?;
        Ok(Self {
            meetups: RwLock::new(meetups),
            snapshot: Some(snapshot),
        })
    }

    /// The backing snapshot file, if any.
    pub const fn snapshot_file(&self) -> Option<&SnapshotFile> {
        self.snapshot.as_ref()
    }

    /// Open a shared window as a scoped handle.
    pub async fn read(&self) -> ReadTxn<'_> {
        ReadTxn {
            guard: self.meetups.read().await,
        }
    }

    /// Open an exclusive window as a scoped handle.
    pub async fn write(&self) -> WriteTxn<'_> {
        WriteTxn {
            guard: self.meetups.write().await,
        }
    }

    /// Run `accessor` inside a shared window and return its result.
    ///
    /// Other shared accessors may run at the same time; exclusive ones
    /// may not.
    pub async fn with_shared<T>(&self, accessor: impl FnOnce(&Meetups) -> T) -> T {
        let txn = self.read().await;
        accessor(&*txn)
    }

    /// Run `accessor` inside an exclusive window and return its result.
    ///
    /// No other accessor of either kind runs until it returns.
    pub async fn with_exclusive<T>(&self, accessor: impl FnOnce(&mut Meetups) -> T) -> T {
        let mut txn = self.write().await;
        accessor(&mut *txn)
    }

    /// Number of stored meetups.
    pub async fn len(&self) -> usize {
        self.with_shared(BTreeMap::len).await
    }

    /// Whether the store holds no meetups.
    pub async fn is_empty(&self) -> bool {
        self.with_shared(BTreeMap::is_empty).await
    }

    /// Replace the whole map with the snapshot decoded from `source`.
    ///
    /// Decoding finishes before the exclusive window opens, so readers are
    /// not held up by I/O and a failed decode leaves the map untouched.
    /// Returns the number of meetups now stored.
    ///
    /// # Errors
    ///
    /// Returns the decode failure from [`snapshot::load`].
    pub async fn load_from<R: Read>(&self, source: R) -> Result<usize, StoreError> {
        let loaded = snapshot::load(source)?;
        let count = loaded.len();
        self.with_exclusive(|meetups| *meetups = loaded).await;
        debug!(meetups = count, "Store replaced from snapshot");
        Ok(count)
    }

    /// Encode the whole map into `target` from inside a shared window.
    ///
    /// # Errors
    ///
    /// Returns the encode or write failure from [`snapshot::persist`].
    pub async fn persist_to<W: Write>(&self, target: W) -> Result<(), StoreError> {
        self.with_shared(|meetups| snapshot::persist(target, meetups)).await
    }

    /// Write the current state to the backing snapshot file.
    ///
    /// Does nothing for a store without a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns the save failure; the caller decides whether it is fatal.
    pub async fn close(&self) -> Result<(), StoreError> {
        let Some(file) = &self.snapshot else {
            info!("Store has no snapshot file, nothing to persist");
            return Ok(());
        };
        self.with_shared(|meetups| file.save(meetups)).await
    }
}

/// Scoped shared window. The lock is released on drop.
#[derive(Debug)]
pub struct ReadTxn<'a> {
    guard: RwLockReadGuard<'a, Meetups>,
}

impl Deref for ReadTxn<'_> {
    type Target = Meetups;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Scoped exclusive window. The lock is released on drop.
#[derive(Debug)]
pub struct WriteTxn<'a> {
    guard: RwLockWriteGuard<'a, Meetups>,
}

impl Deref for WriteTxn<'_> {
    type Target = Meetups;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl DerefMut for WriteTxn<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use whenfree_types::CalendarDate;

    use super::*;

    fn meetup(description: &str) -> Meetup {
        Meetup::new(description, CalendarDate::default())
    }

    #[tokio::test]
    async fn exclusive_window_mutations_are_visible_afterwards() {
        let storage = Storage::new();
        assert!(storage.is_empty().await);

        storage
            .with_exclusive(|meetups| meetups.insert(MeetupId::from("a"), meetup("A")))
            .await;

        let description = storage
            .with_shared(|meetups| meetups[&MeetupId::from("a")].description.clone())
            .await;
        assert_eq!(description, "A");
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn scoped_handles_release_on_drop() {
        let storage = Storage::new();
        {
            let mut txn = storage.write().await;
            txn.insert(MeetupId::from("a"), meetup("A"));
        }
        let first = storage.read().await;
        let second = storage.read().await;
        assert_eq!(first.len(), second.len());
        drop((first, second));

        let mut txn = storage.write().await;
        txn.clear();
        drop(txn);
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn load_from_replaces_everything() {
        let storage = Storage::new();
        storage
            .with_exclusive(|meetups| meetups.insert(MeetupId::from("old"), meetup("Old")))
            .await;

        let json = r#"{"meetups": {"new": {"description": "New", "from": "2024-01-01", "invited_person": [], "locked": false}}}"#;
        let count = storage.load_from(json.as_bytes()).await.unwrap();
        assert_eq!(count, 1);

        let keys: Vec<MeetupId> = storage.with_shared(|m| m.keys().cloned().collect()).await;
        assert_eq!(keys, [MeetupId::from("new")]);
    }

    #[tokio::test]
    async fn failed_load_leaves_the_store_untouched() {
        let storage = Storage::new();
        storage
            .with_exclusive(|meetups| meetups.insert(MeetupId::from("keep"), meetup("Keep")))
            .await;

        assert!(storage.load_from(&b"{\"meetups\": 7}"[..]).await.is_err());
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn persist_then_load_round_trips() {
        let source = Storage::new();
        source
            .with_exclusive(|meetups| {
                meetups.insert(MeetupId::from("b"), meetup("B"));
                meetups.insert(MeetupId::from("a"), meetup("A"));
            })
            .await;

        let mut bytes = Vec::new();
        source.persist_to(&mut bytes).await.unwrap();

        let target = Storage::new();
        target.load_from(bytes.as_slice()).await.unwrap();
        let copied = target.with_shared(Clone::clone).await;
        let original = source.with_shared(Clone::clone).await;
        assert_eq!(copied, original);
    }

    #[tokio::test]
    async fn close_without_snapshot_is_a_no_op() {
        let storage = Storage::new();
        assert!(storage.snapshot_file().is_none());
        assert!(storage.close().await.is_ok());
    }
}
