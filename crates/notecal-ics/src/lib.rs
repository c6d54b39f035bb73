//! iCalendar feed parsing and recurrence expansion.
//!
//! This crate turns the text of an `.ics` feed into the concrete, upcoming
//! [`CalendarEvent`](notecal_core::CalendarEvent)s the schedule stores:
//!
//! - [`feed`] - Line unfolding, `VEVENT` splitting and property extraction
//! - [`RawEvent`] - The property values of one `VEVENT`, undecoded
//! - [`RecurrenceRule`] / [`Expansion`] - Bounded `RRULE` occurrence generation
//! - [`expand_feed`] - The whole pipeline
//!
//! # Architecture
//!
//! ```text
//!        ICS text
//!           │
//!           ▼ unfold_lines()
//!  ┌─────────────────┐
//!  │ unfolded lines  │
//!  └────────┬────────┘
//!           │
//!           ▼ split_event_blocks() / parse_block()
//!  ┌─────────────────┐
//!  │    RawEvent     │
//!  └────────┬────────┘
//!           │
//!           ▼ RecurrenceRule::parse() / Expansion
//!  ┌─────────────────┐
//!  │ start instants  │
//!  └────────┬────────┘
//!           │
//!           ▼ end > now, sort
//!  ┌─────────────────┐
//!  │  CalendarEvent  │
//!  └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use notecal_ics::expand_feed;
//!
//! let text = std::fs::read_to_string("work.ics")?;
//! for event in expand_feed(&text) {
//!     println!("{} {} {}", event.date.unwrap_or_default(), event.start_time, event.title);
//! }
//! ```

pub mod expand;
pub mod feed;
pub mod raw_event;
pub mod recurrence;

pub use expand::{expand_feed, expand_feed_at, expand_feed_with};
pub use raw_event::RawEvent;
pub use recurrence::{
    DEFAULT_HORIZON_DAYS, DEFAULT_MAX_OCCURRENCES, Expansion, ExpansionLimits, Frequency,
    RecurrenceRule,
};
