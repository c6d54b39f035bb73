//! Output rendering for the saved schedule.
//!
//! Two outputs are supported:
//! - **Text**: one line per meeting, for terminals
//! - **JSON**: the stored event records, pretty-printed

use std::fmt::Write as _;

use notecal_core::CalendarEvent;
use notecal_core::time::parse_clock;
use serde::Serialize;

use crate::config::DisplaySettings;
use crate::error::ClientResult;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Text shown by `upcoming` when the schedule is empty.
pub const NO_UPCOMING_TEXT: &str = "No upcoming meetings";

/// Renders events according to the display settings.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    options: DisplaySettings,
}

impl OutputFormatter {
    /// Creates a formatter with the given options.
    pub fn new(options: DisplaySettings) -> Self {
        Self { options }
    }

    /// Creates a formatter with default options.
    pub fn with_defaults() -> Self {
        Self::new(DisplaySettings::default())
    }

    /// Renders one event as a single line:
    /// `2099-01-01 Thu  10:00-11:00  Standup  @ Room 4`.
    pub fn format_line(&self, event: &CalendarEvent) -> String {
        let mut line = format!(
            "{}  {}-{}  {}",
            self.format_day(event),
            self.format_time(&event.start_time),
            self.format_time(&event.end_time),
            event.title
        );
        if event.has_location() {
            line.push_str("  @ ");
            line.push_str(&event.location);
        }
        line
    }

    /// Renders the upcoming list, one line per event.
    pub fn format_upcoming(&self, events: &[CalendarEvent]) -> String {
        if events.is_empty() {
            return NO_UPCOMING_TEXT.to_string();
        }
        events
            .iter()
            .map(|event| self.format_line(event))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders the event in progress, or the configured "no meeting" text.
    pub fn format_active(&self, active: Option<&CalendarEvent>) -> String {
        match active {
            Some(event) => format!("Now: {}", self.format_line(event)),
            None => self.options.no_meeting_text.clone(),
        }
    }

    /// Formats an `HH:MM` value with the configured time format.
    ///
    /// Values that do not parse, and formats chrono rejects, fall back to the
    /// stored text.
    pub fn format_time(&self, clock: &str) -> String {
        let Some(time) = parse_clock(clock) else {
            return clock.to_string();
        };
        let mut out = String::new();
        match write!(out, "{}", time.format(&self.options.time_format)) {
            Ok(()) => out,
            Err(_) => clock.to_string(),
        }
    }

    fn format_day(&self, event: &CalendarEvent) -> String {
        if let Some(date) = event.date_naive() {
            return format!("{} {}", date.format("%Y-%m-%d"), date.format("%a"));
        }
        let days: Vec<&str> = event
            .days
            .iter()
            .filter_map(|&d| WEEKDAYS.get(usize::from(d)).copied())
            .collect();
        if days.is_empty() {
            "undated".to_string()
        } else {
            format!("every {}", days.join(","))
        }
    }
}

/// Serializes `value` as pretty JSON.
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> ClientResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
