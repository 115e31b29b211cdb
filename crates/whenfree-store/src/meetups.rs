//! Meetup creation and retrieval on top of the storage coordinator.

use std::collections::btree_map::Entry;

use tracing::{debug, info};
use whenfree_types::{InvitedPerson, Meetup, MeetupId, UserToken};

use crate::error::AccessError;
use crate::storage::Storage;

impl Storage {
    /// Store a new meetup created by the holder of `token`.
    ///
    /// The creator becomes the only participant and is bound to `token`;
    /// any invite list supplied with `meetup` is discarded. A fresh
    /// identifier is drawn inside the exclusive window, so it can never
    /// replace an existing meetup. Returns the identifier and the meetup
    /// exactly as stored.
    pub async fn create_meetup(
        &self,
        mut meetup: Meetup,
        mut creator: InvitedPerson,
        token: UserToken,
    ) -> (MeetupId, Meetup) {
        creator.user_token = token;
        meetup.invited_people = vec![creator];
        let stored = meetup.clone();

        let id = self
            .with_exclusive(|meetups| loop {
                if let Entry::Vacant(slot) = meetups.entry(MeetupId::generate()) {
                    let id = slot.key().clone();
                    slot.insert(meetup);
                    break id;
                }
            })
            .await;

        info!(meetup_id = %id, "Meetup created");
        (id, stored)
    }

    /// Fetch a meetup on behalf of the holder of `token`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::NotFound`] when nothing is stored under `id`
    /// and [`AccessError::Forbidden`] when the token is not on the
    /// meetup's invite list.
    pub async fn get_meetup(&self, id: &MeetupId, token: &UserToken) -> Result<Meetup, AccessError> {
        let result = self
            .with_shared(|meetups| {
                let meetup = meetups
                    .get(id)
                    .ok_or_else(|| AccessError::NotFound(id.clone()))?;
                if !meetup.has_access(token) {
                    return Err(AccessError::Forbidden(id.clone()));
                }
                Ok(meetup.clone())
            })
            .await;

        if let Err(e) = &result {
            debug!(meetup_id = %id, error = %e, "Meetup lookup refused");
        }
        result
    }
}
