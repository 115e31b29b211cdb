//! Meetups, the people invited to them, and the access rule over both.
//!
//! The serde shape of these structs is the persisted snapshot shape and
//! the shape returned to clients. Capability tokens are skipped by serde
//! entirely, so neither a client response nor a participant object in a
//! snapshot can ever contain one.

use serde::{Deserialize, Serialize};

use crate::date::CalendarDate;
use crate::ids::UserToken;

/// A person invited to a meetup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitedPerson {
    /// Capability token of this participant. Never serialized.
    #[serde(skip)]
    pub user_token: UserToken,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Days the person can make it, if they said so.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_dates: Option<Vec<CalendarDate>>,

    /// The day the person would like best, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<CalendarDate>,
}

impl InvitedPerson {
    /// A participant with a name and token and no date preferences yet.
    pub fn new(name: impl Into<String>, user_token: UserToken) -> Self {
        Self {
            user_token,
            name: name.into(),
            available_dates: None,
            preferred_date: None,
        }
    }
}

/// A meetup being scheduled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meetup {
    /// What the meetup is about.
    #[serde(default)]
    pub description: String,

    /// First day of the window the meetup may happen in.
    #[serde(default)]
    pub from: CalendarDate,

    /// Last day of the window, open-ended when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<CalendarDate>,

    /// Everyone invited, creator first.
    #[serde(rename = "invited_person", default)]
    pub invited_people: Vec<InvitedPerson>,

    /// Days proposed by the participants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_dates: Option<Vec<CalendarDate>>,

    /// The day everyone agreed on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_date: Option<CalendarDate>,

    /// Whether the meetup no longer accepts changes.
    #[serde(default)]
    pub locked: bool,
}

impl Meetup {
    /// A meetup with a description and start day, nobody invited yet.
    pub fn new(description: impl Into<String>, from: CalendarDate) -> Self {
        Self {
            description: description.into(),
            from,
            ..Self::default()
        }
    }

    /// Whether any invited person holds exactly this token.
    ///
    /// Comparison is byte-exact and case-sensitive. This is a linear
    /// scan over the participants.
    pub fn has_access(&self, token: &UserToken) -> bool {
        self.invited_people
            .iter()
            .any(|person| person.user_token == *token)
    }

    /// The creator, i.e. the first invited person.
    pub fn creator(&self) -> Option<&InvitedPerson> {
        self.invited_people.first()
    }

    /// Add a participant at the end of the invite list.
    pub fn invite(&mut self, person: InvitedPerson) {
        self.invited_people.push(person);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn lunch() -> Meetup {
        let mut meetup = Meetup::new("Lunch", "2024-01-01".parse().unwrap());
        meetup.invite(InvitedPerson::new("Alice", UserToken::from("t1")));
        meetup
    }

    #[test]
    fn access_requires_an_exact_token_match() {
        let meetup = lunch();
        assert!(meetup.has_access(&UserToken::from("t1")));
        assert!(!meetup.has_access(&UserToken::from("T1")));
        assert!(!meetup.has_access(&UserToken::from("t1 ")));
        assert!(!meetup.has_access(&UserToken::from("t2")));
        assert!(!meetup.has_access(&UserToken::default()));
    }

    #[test]
    fn access_follows_the_invite_list() {
        let mut meetup = lunch();
        let bob = UserToken::from("t2");
        assert!(!meetup.has_access(&bob));

        meetup.invite(InvitedPerson::new("Bob", bob.clone()));
        assert!(meetup.has_access(&bob));

        meetup.invited_people.retain(|p| p.name != "Bob");
        assert!(!meetup.has_access(&bob));
        assert!(meetup.has_access(&UserToken::from("t1")));
    }

    #[test]
    fn nobody_has_access_to_an_empty_meetup() {
        let meetup = Meetup::new("Empty", CalendarDate::default());
        assert!(!meetup.has_access(&UserToken::from("t1")));
        assert!(meetup.creator().is_none());
    }

    #[test]
    fn tokens_never_serialize() {
        let json = serde_json::to_value(lunch()).unwrap();
        let person = &json["invited_person"][0];
        assert_eq!(person["name"], "Alice");
        assert!(person.get("user_token").is_none());
        assert!(!json.to_string().contains("t1"));
    }

    #[test]
    fn absent_fields_are_omitted() {
        let json = serde_json::to_value(lunch()).unwrap();
        let object = json.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["description", "from", "invited_person", "locked"]);
    }

    #[test]
    fn present_but_empty_lists_survive() {
        let mut meetup = lunch();
        meetup.suggested_dates = Some(Vec::new());
        let json = serde_json::to_string(&meetup).unwrap();
        let back: Meetup = serde_json::from_str(&json).unwrap();
        assert_eq!(back.suggested_dates, Some(Vec::new()));
    }

    #[test]
    fn decodes_the_wire_shape() {
        let json = r#"{
            "description": "Board games",
            "from": "2024-05-01",
            "to": "2024-05-31",
            "invited_person": [
                {"name": "Alice", "available_dates": ["2024-05-03"], "preferred_date": "2024-05-03"}
            ],
            "final_date": null,
            "locked": true
        }"#;
        let meetup: Meetup = serde_json::from_str(json).unwrap();
        assert_eq!(meetup.to, CalendarDate::from_ymd(2024, 5, 31));
        assert_eq!(meetup.final_date, None);
        assert!(meetup.locked);
        let alice = meetup.creator().unwrap();
        assert_eq!(alice.preferred_date, CalendarDate::from_ymd(2024, 5, 3));
        assert!(alice.user_token.is_empty());
    }

    #[test]
    fn null_dates_inside_lists_decode_as_the_default_day() {
        let json = r#"{
            "description": "x",
            "from": null,
            "invited_person": [{"name": "Alice", "available_dates": [null, "2024-01-02"]}],
            "suggested_dates": [null],
            "locked": false
        }"#;
        let meetup: Meetup = serde_json::from_str(json).unwrap();
        assert_eq!(meetup.from, CalendarDate::default());
        assert_eq!(meetup.suggested_dates, Some(vec![CalendarDate::default()]));
        assert_eq!(
            meetup.creator().unwrap().available_dates,
            Some(vec![CalendarDate::default(), CalendarDate::from_ymd(2024, 1, 2).unwrap()])
        );
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let json = r#"{"description": "x", "from": "May 1st", "invited_person": [], "locked": false}"#;
        assert!(serde_json::from_str::<Meetup>(json).is_err());
    }
}
