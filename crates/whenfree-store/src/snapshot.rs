//! Whole-store snapshot codec.
//!
//! A snapshot is one JSON document holding every meetup:
//!
//! ```text
//! {
//!   "meetups":     { "<id>": { ...meetup... }, ... },
//!   "user_tokens": { "<id>": ["<token>", ...], ... }
//! }
//! ```
//!
//! Participant objects never carry tokens. The `user_tokens` section
//! lists each meetup's tokens in participant order so access survives a
//! restart. Snapshots written without that section still load; their
//! participants end up with empty tokens, which no request can match.
//!
//! There are no partial or incremental writes. [`SnapshotFile::save`]
//! writes a sibling temporary file and renames it into place.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use whenfree_types::{MeetupId, UserToken};

use crate::error::StoreError;
use crate::storage::Meetups;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    meetups: &'a Meetups,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    user_tokens: BTreeMap<&'a MeetupId, Vec<&'a UserToken>>,
}

#[derive(Deserialize)]
struct SnapshotOwned {
    #[serde(default)]
    meetups: Meetups,
    #[serde(default)]
    user_tokens: BTreeMap<MeetupId, Vec<UserToken>>,
}

/// Decode one complete snapshot from `source`.
///
/// The source is consumed and dropped (closed) before this returns,
/// whether decoding succeeds or not.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] for malformed JSON or invalid
/// field values, and [`StoreError::Corrupt`] when the token section does
/// not line up with the meetups.
pub fn load<R: Read>(source: R) -> Result<Meetups, StoreError> {
    let snapshot: SnapshotOwned = serde_json::from_reader(BufReader::new(source))?;
    let mut meetups = snapshot.meetups;

    for (id, tokens) in snapshot.user_tokens {
        let meetup = meetups
            .get_mut(&id)
            .ok_or_else(|| StoreError::Corrupt(format!("tokens listed for unknown meetup {id}")))?;
        if tokens.len() != meetup.invited_people.len() {
            return Err(StoreError::Corrupt(format!(
                "meetup {id} has {} participants but {} tokens",
                meetup.invited_people.len(),
                tokens.len()
            )));
        }
        for (person, token) in meetup.invited_people.iter_mut().zip(tokens) {
            person.user_token = token;
        }
    }

    Ok(meetups)
}

/// Encode every meetup as one snapshot into `target`.
///
/// The target is flushed and then dropped (closed). Whatever it held
/// before is the caller's concern; [`SnapshotFile`] truncates.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if a meetup cannot be encoded
/// (for example a date beyond year 9999) and [`StoreError::Io`] if
/// writing fails.
pub fn persist<W: Write>(target: W, meetups: &Meetups) -> Result<(), StoreError> {
    let user_tokens: BTreeMap<&MeetupId, Vec<&UserToken>> = meetups
        .iter()
        .filter(|(_, meetup)| !meetup.invited_people.is_empty())
        .map(|(id, meetup)| {
            let tokens: Vec<&UserToken> =
                meetup.invited_people.iter().map(|p| &p.user_token).collect();
            (id, tokens)
        })
        .collect();
    let snapshot = SnapshotRef {
        meetups,
        user_tokens,
    };

    let mut writer = BufWriter::new(target);
    serde_json::to_writer(&mut writer, &snapshot)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// A snapshot stored at a fixed path on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Bind to a path. Nothing is touched until [`load`](Self::load) or
    /// [`save`](Self::save).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot. A missing file means a first start and yields an
    /// empty store.
    ///
    /// # Errors
    ///
    /// Any failure other than the file not existing, including a decode
    /// failure, is returned so the caller never proceeds with a partially
    /// loaded store.
    pub fn load(&self) -> Result<Meetups, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No snapshot found, starting with an empty store");
                return Ok(Meetups::new());
            }
            Err(e) => return Err(e.into()),
        };

        let meetups = load(file)?;
        info!(path = %self.path.display(), meetups = meetups.len(), "Snapshot loaded");
        Ok(meetups)
    }

    /// Replace the snapshot with `meetups`.
    ///
    /// # Errors
    ///
    /// Returns the encode or I/O failure. The previous snapshot is left
    /// intact in that case.
    pub fn save(&self, meetups: &Meetups) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        if let Err(e) = write_synced(&temp_path, meetups) {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                debug!(path = %temp_path.display(), error = %cleanup, "Temporary snapshot not removed");
            }
            return Err(e);
        }
        fs::rename(&temp_path, &self.path).inspect_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Failed to move snapshot into place");
        })?;

        info!(path = %self.path.display(), meetups = meetups.len(), "Snapshot persisted");
        Ok(())
    }
}

fn write_synced(path: &Path, meetups: &Meetups) -> Result<(), StoreError> {
    let file = File::create(path)?;
    persist(&file, meetups)?;
    file.sync_all()?;
    Ok(())
}
