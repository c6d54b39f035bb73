//! Recurrence rules and bounded occurrence generation.
//!
//! Only the `FREQ`, `INTERVAL`, `COUNT` and `UNTIL` parts of an `RRULE` are
//! understood; everything else (`BYDAY`, `BYMONTHDAY`, ...) is ignored.
//!
//! [`Expansion`] is the occurrence generator. It is a small state machine
//! over `{cursor, generated}`:
//! - emit the cursor
//! - advance it by one more interval of the frequency
//! - stop once `COUNT`, `UNTIL`, the expansion horizon or the occurrence
//!   ceiling is reached, or when the frequency cannot be advanced
//!
//! `generated` grows on every emitted occurrence and the ceiling caps it, so
//! expansion terminates even for rules that never move the cursor.

use std::fmt;

use chrono::{Days, Months, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use notecal_core::{decode_ics_datetime_at, local_now};

/// Default horizon, in days from now, beyond which no occurrence is generated.
pub const DEFAULT_HORIZON_DAYS: u32 = 60;

/// Default ceiling on the number of occurrences generated per series.
pub const DEFAULT_MAX_OCCURRENCES: u32 = 500;

/// Bounds applied to every recurrence expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionLimits {
    /// Occurrences starting later than `now + horizon_days` are never generated,
    /// even if the rule's `UNTIL` is further out.
    pub horizon_days: u32,
    /// Absolute ceiling on occurrences generated for one series.
    pub max_occurrences: u32,
}

impl Default for ExpansionLimits {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
        }
    }
}

impl ExpansionLimits {
    /// Builder: set the horizon.
    pub fn with_horizon_days(mut self, days: u32) -> Self {
        self.horizon_days = days;
        self
    }

    /// Builder: set the occurrence ceiling.
    pub fn with_max_occurrences(mut self, max: u32) -> Self {
        self.max_occurrences = max;
        self
    }

    /// Returns the last instant an occurrence may start at.
    pub fn horizon_end(&self, now: NaiveDateTime) -> NaiveDateTime {
        now.checked_add_signed(TimeDelta::days(i64::from(self.horizon_days)))
            .unwrap_or(NaiveDateTime::MAX)
    }
}

/// Recurrence frequency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    /// A keyword this engine cannot advance (`HOURLY`, typos, ...).
    Unsupported(String),
}

impl Frequency {
    /// Parses a `FREQ` value, case-insensitively.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Self::Daily,
            "WEEKLY" => Self::Weekly,
            "MONTHLY" => Self::Monthly,
            "YEARLY" => Self::Yearly,
            _ => Self::Unsupported(value.trim().to_string()),
        }
    }

    /// Returns the `FREQ` keyword.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
            Self::Unsupported(value) => value,
        }
    }

    /// Returns true if occurrences can be generated for this frequency.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    /// Moves `anchor` forward by `units` days, weeks, months or years.
    ///
    /// Month and year steps are calendar-aware: a day that does not exist in
    /// the target month is clamped to its last day. Stepping from the series
    /// anchor rather than from the previous occurrence keeps a clamped day
    /// from sticking (Jan 31, Feb 28, Mar 31).
    ///
    /// Returns `None` for unsupported frequencies and on overflow.
    pub fn advance(&self, anchor: NaiveDateTime, units: u32) -> Option<NaiveDateTime> {
        match self {
            Self::Daily => anchor.checked_add_days(Days::new(u64::from(units))),
            Self::Weekly => anchor.checked_add_days(Days::new(u64::from(units) * 7)),
            Self::Monthly => anchor.checked_add_months(Months::new(units)),
            Self::Yearly => anchor.checked_add_months(Months::new(units.checked_mul(12)?)),
            Self::Unsupported(_) => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The supported subset of an `RRULE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// `FREQ`, defaulting to weekly.
    pub frequency: Frequency,
    /// `INTERVAL`, defaulting to 1. Zero is kept as written.
    pub interval: u32,
    /// `COUNT`; `None` is unbounded.
    pub count: Option<u32>,
    /// `UNTIL`; `None` leaves only the expansion horizon. An unreadable
    /// value decodes to the moment of parsing.
    pub until: Option<NaiveDateTime>,
}

impl Default for RecurrenceRule {
    fn default() -> Self {
        Self {
            frequency: Frequency::Weekly,
            interval: 1,
            count: None,
            until: None,
        }
    }
}

impl RecurrenceRule {
    /// Parses an `RRULE` value against the local clock.
    pub fn parse(value: &str) -> Self {
        Self::parse_at(value, local_now())
    }

    /// Parses an `RRULE` value such as `FREQ=DAILY;COUNT=5`.
    ///
    /// Parts are independent. `FREQ`, `INTERVAL` and `COUNT` fall back to
    /// their default when unreadable; `UNTIL` goes through the lenient
    /// decoder and becomes `now`. Unknown parts are ignored.
    pub fn parse_at(value: &str, now: NaiveDateTime) -> Self {
        let mut rule = Self::default();

        for part in value.split(';') {
            let Some((key, val)) = part.split_once('=') else {
                continue;
            };
            let val = val.trim();
            match key.trim().to_ascii_uppercase().as_str() {
                "FREQ" => rule.frequency = Frequency::parse(val),
                "INTERVAL" => rule.interval = val.parse().unwrap_or(1),
                "COUNT" => rule.count = val.parse().ok(),
                "UNTIL" => rule.until = Some(decode_ics_datetime_at(val, now)),
                _ => {}
            }
        }

        rule
    }
}

/// Generator of the start instants of one series.
#[derive(Debug, Clone)]
pub struct Expansion {
    anchor: NaiveDateTime,
    frequency: Frequency,
    interval: u32,
    limit: u32,
    last_start: NaiveDateTime,
    cursor: Option<NaiveDateTime>,
    generated: u32,
}

impl Expansion {
    /// Expands `rule` from `start`.
    ///
    /// Occurrences stop at the earliest of `COUNT`, `UNTIL`, the horizon
    /// measured from `now` and the occurrence ceiling.
    pub fn new(
        start: NaiveDateTime,
        rule: &RecurrenceRule,
        now: NaiveDateTime,
        limits: ExpansionLimits,
    ) -> Self {
        let horizon = limits.horizon_end(now);
        let last_start = rule.until.map_or(horizon, |until| until.min(horizon));
        let limit = rule
            .count
            .map_or(limits.max_occurrences, |count| count.min(limits.max_occurrences));

        Self {
            anchor: start,
            frequency: rule.frequency.clone(),
            interval: rule.interval,
            limit,
            last_start,
            cursor: Some(start),
            generated: 0,
        }
    }

    /// A series of exactly one occurrence at `start`.
    pub fn once(start: NaiveDateTime) -> Self {
        Self {
            anchor: start,
            frequency: Frequency::Daily,
            interval: 1,
            limit: 1,
            last_start: NaiveDateTime::MAX,
            cursor: Some(start),
            generated: 0,
        }
    }

    /// Number of occurrences generated so far.
    pub fn generated(&self) -> u32 {
        self.generated
    }

    /// Returns true once no further occurrence will be produced.
    pub fn is_finished(&self) -> bool {
        self.generated >= self.limit || self.cursor.is_none_or(|c| c > self.last_start)
    }
}

impl Iterator for Expansion {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_finished() {
            self.cursor = None;
            return None;
        }
        let current = self.cursor?;

        self.generated += 1;
        self.cursor = self
            .generated
            .checked_mul(self.interval)
            .and_then(|units| self.frequency.advance(self.anchor, units));

        Some(current)
    }
}

impl std::iter::FusedIterator for Expansion {}
