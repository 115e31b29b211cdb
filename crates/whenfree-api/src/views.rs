//! Response bodies that are not plain stored meetups.

use serde::{Deserialize, Serialize};
use whenfree_types::{CalendarDate, InvitedPerson, Meetup, MeetupId};

/// Request body for `POST /meetup`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMeetupRequest {
    /// The meetup to create. Its invite list is ignored.
    pub meetup: Meetup,
    /// The creator, who becomes the only participant.
    pub person: InvitedPerson,
}

/// Response body for `POST /meetup`: the stored meetup plus its new
/// identifier, flattened into one object.
///
/// Built field by field from the stored [`Meetup`] so the wire shape is
/// spelled out here rather than inherited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedMeetup {
    /// Identifier to fetch the meetup with later.
    pub uuid: MeetupId,
    /// What the meetup is about.
    pub description: String,
    /// First day of the window.
    pub from: CalendarDate,
    /// Last day of the window.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<CalendarDate>,
    /// Participants; tokens are never serialized.
    pub invited_person: Vec<InvitedPerson>,
    /// Proposed days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_dates: Option<Vec<CalendarDate>>,
    /// Agreed day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_date: Option<CalendarDate>,
    /// Whether the meetup accepts changes.
    pub locked: bool,
}

impl CreatedMeetup {
    /// Combine an identifier with the meetup stored under it.
    pub fn new(uuid: MeetupId, meetup: Meetup) -> Self {
        Self {
            uuid,
            description: meetup.description,
            from: meetup.from,
            to: meetup.to,
            invited_person: meetup.invited_people,
            suggested_dates: meetup.suggested_dates,
            final_date: meetup.final_date,
            locked: meetup.locked,
        }
    }
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the server is answering.
    pub status: &'static str,
}
