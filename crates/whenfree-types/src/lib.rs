//! Shared type definitions for the When Are You Free backend.
//!
//! # Modules
//!
//! - [`date`] -- Timezone-free calendar dates with a strict `YYYY-MM-DD` codec
//! - [`ids`] -- Meetup identifiers and participant capability tokens
//! - [`model`] -- Meetups, invited people, and the access predicate

pub mod date;
pub mod ids;
pub mod model;

// Re-export all public types at crate root for convenience.
pub use date::{CalendarDate, DateError};
pub use ids::{MeetupId, UserToken};
pub use model::{InvitedPerson, Meetup};
