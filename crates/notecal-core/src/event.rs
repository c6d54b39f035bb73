//! Calendar event model.
//!
//! [`CalendarEvent`] is a single concrete occurrence ready for display or
//! scheduling. Its fields are kept in the textual shape they are persisted in
//! (`YYYY-MM-DD` dates and `HH:MM` wall-clock times) so that a saved schedule
//! can be loaded back without loss, including events created by hand.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::time::{format_clock, format_date, parse_clock, parse_date, weekday_index};

/// Location shown for events that do not carry one.
pub const NO_LOCATION: &str = "No location";

fn default_location() -> String {
    NO_LOCATION.to_string()
}

/// A single calendar occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Unique identifier of this occurrence.
    pub id: String,
    /// The event title.
    pub title: String,
    /// Start wall-clock time, `HH:MM`.
    pub start_time: String,
    /// End wall-clock time, `HH:MM`.
    pub end_time: String,
    /// Calendar date, `YYYY-MM-DD`.
    ///
    /// Always set on imported occurrences; events without a date are treated
    /// as always current.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Weekday indices (0 = Sunday .. 6 = Saturday).
    #[serde(default)]
    pub days: Vec<u8>,
    /// The event location, or [`NO_LOCATION`].
    #[serde(default = "default_location")]
    pub location: String,
    /// Whether the event was imported from a calendar feed.
    #[serde(default)]
    pub is_external: bool,
}

impl CalendarEvent {
    /// Creates an imported occurrence spanning `start..end`.
    ///
    /// The date and weekday are taken from `start`; the end is reduced to its
    /// wall-clock time on whatever day it falls. An occurrence crossing
    /// midnight (23:00 to 01:00) therefore has an `endTime` earlier than its
    /// `startTime`, read against the start date: [`has_ended_at`] reports it
    /// ended once the start day's `endTime` has passed and [`is_active_at`]
    /// never matches it.
    ///
    /// [`has_ended_at`]: Self::has_ended_at
    /// [`is_active_at`]: Self::is_active_at
    pub fn occurrence(
        id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start_time: format_clock(start.time()),
            end_time: format_clock(end.time()),
            date: Some(format_date(start.date())),
            days: vec![weekday_index(start.date())],
            location: default_location(),
            is_external: true,
        }
    }

    /// Builder method to set the location.
    ///
    /// Blank locations keep the [`NO_LOCATION`] sentinel.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        let location = location.into();
        if !location.trim().is_empty() {
            self.location = location;
        }
        self
    }

    /// Returns true if a real location is set.
    pub fn has_location(&self) -> bool {
        self.location != NO_LOCATION
    }

    /// Returns true if `date` is set and not blank.
    pub fn has_date(&self) -> bool {
        self.date.as_deref().is_some_and(|d| !d.trim().is_empty())
    }

    /// Returns the parsed calendar date.
    pub fn date_naive(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date)
    }

    /// Returns the parsed start time of day.
    pub fn start_clock(&self) -> Option<NaiveTime> {
        parse_clock(&self.start_time)
    }

    /// Returns the parsed end time of day.
    pub fn end_clock(&self) -> Option<NaiveTime> {
        parse_clock(&self.end_time)
    }

    /// Returns the start instant, combining `date` and `startTime`.
    pub fn start_instant(&self) -> Option<NaiveDateTime> {
        Some(self.date_naive()?.and_time(self.start_clock()?))
    }

    /// Returns the end instant, combining `date` and `endTime`.
    pub fn end_instant(&self) -> Option<NaiveDateTime> {
        Some(self.date_naive()?.and_time(self.end_clock()?))
    }

    /// Checks if the event has ended at the given time.
    ///
    /// Events without a date, or with a blank one, never end. Events whose
    /// date or end time cannot be parsed count as ended.
    pub fn has_ended_at(&self, now: NaiveDateTime) -> bool {
        if !self.has_date() {
            return false;
        }
        self.end_instant().is_none_or(|end| end <= now)
    }

    /// Checks if the event is in progress at the given time.
    ///
    /// Comparison is done on the `HH:MM` strings, so both boundaries are
    /// inclusive at minute precision.
    pub fn is_active_at(&self, now: NaiveDateTime) -> bool {
        let today = format_date(now.date());
        let clock = format_clock(now.time());
        self.date.as_deref() == Some(today.as_str())
            && self.start_time <= clock
            && clock <= self.end_time
    }
}
