//! Calendar dates without time-of-day or timezone.
//!
//! [`CalendarDate`] is the only date representation used by meetups. Its
//! textual form is exactly `YYYY-MM-DD` and that is also its JSON form.
//! Encoding refuses years outside `[0, 9999]` so every serialized date
//! has a four-digit year; decoding is strict about padding and separators.
//!
//! The type wraps [`chrono::NaiveDate`] for calendar arithmetic only. It
//! carries no clock, offset, or timezone.

use core::fmt;
use core::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Smallest year that can be encoded.
pub const MIN_YEAR: i32 = 0;

/// Largest year that can be encoded.
pub const MAX_YEAR: i32 = 9999;

/// Length of the canonical `YYYY-MM-DD` form.
const ENCODED_LEN: usize = 10;

/// Errors produced while encoding or decoding a [`CalendarDate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// The text is not shaped like `YYYY-MM-DD`.
    #[error("date must have the form YYYY-MM-DD, got {0:?}")]
    Format(String),

    /// The text is well-formed but names a day that does not exist.
    #[error("{0:?} is not a day of the calendar")]
    NoSuchDay(String),

    /// The year cannot be written with exactly four digits.
    #[error("year {0} is outside of range [0,9999]")]
    YearOutOfRange(i32),
}

/// A day of the proleptic Gregorian calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Build a date from its parts, returning `None` for days that do not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Calendar year.
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Month of the year, starting at 1.
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Day of the month, starting at 1.
    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// The following day, or `None` past the end of chrono's range.
    pub fn succ(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// Render the canonical `YYYY-MM-DD` form.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::YearOutOfRange`] when the year is negative or
    /// has more than four digits.
    pub fn encode(self) -> Result<String, DateError> {
        let year = self.0.year();
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DateError::YearOutOfRange(year));
        }
        Ok(format!("{year:04}-{:02}-{:02}", self.0.month(), self.0.day()))
    }

    /// Parse the canonical `YYYY-MM-DD` form.
    ///
    /// Exactly ten ASCII characters are accepted: four year digits, a dash,
    /// two month digits, a dash, two day digits.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::Format`] for anything not shaped like
    /// `YYYY-MM-DD` and [`DateError::NoSuchDay`] for impossible days such
    /// as `2023-02-29`.
    pub fn decode(text: &str) -> Result<Self, DateError> {
        let well_formed = text.len() == ENCODED_LEN
            && text.bytes().enumerate().all(|(i, b)| {
                if i == 4 || i == 7 {
                    b == b'-'
                } else {
                    b.is_ascii_digit()
                }
            });
        if !well_formed {
            return Err(DateError::Format(text.to_owned()));
        }

        let year = text.get(0..4).and_then(|s| s.parse::<i32>().ok());
        let month = text.get(5..7).and_then(|s| s.parse::<u32>().ok());
        let day = text.get(8..10).and_then(|s| s.parse::<u32>().ok());
        let (Some(year), Some(month), Some(day)) = (year, month, day) else {
            return Err(DateError::Format(text.to_owned()));
        };

        Self::from_ymd(year, month, day).ok_or_else(|| DateError::NoSuchDay(text.to_owned()))
    }
}

impl Default for CalendarDate {
    /// `0001-01-01`, the value a required date takes when it was never set.
    fn default() -> Self {
        Self(NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or_default())
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = self.encode().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_option(DateVisitor)
    }
}

/// Accepts a date string, or `null` for [`CalendarDate::default`].
///
/// Wherever a bare date is expected (a required field, an element of a
/// date list) `null` decodes to the default day. An `Option<CalendarDate>`
/// still sees `null` as `None`, since `Option` handles it first.
struct DateVisitor;

impl<'de> Visitor<'de> for DateVisitor {
    type Value = CalendarDate;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a date string in YYYY-MM-DD format")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        CalendarDate::decode(v).map_err(E::custom)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(CalendarDate::default())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(CalendarDate::default())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_str(self)
    }
}
