//! The `upcoming` and `active` commands.

use chrono::NaiveDateTime;
use notecal_core::{
    CalendarEvent, ScheduleStore, find_active_at, load_schedule, local_now, prune_at,
    save_schedule,
};
use tracing::debug;

use crate::error::ClientResult;
use crate::format::{OutputFormatter, format_json};

/// Loads the saved schedule, drops ended events and saves the result back.
///
/// The store is only written when something was dropped.
pub fn prune_saved_at<S: ScheduleStore + ?Sized>(
    store: &mut S,
    now: NaiveDateTime,
) -> ClientResult<Vec<CalendarEvent>> {
    let events = load_schedule(store)?;
    let before = events.len();
    let events = prune_at(events, now);
    if events.len() != before {
        debug!(dropped = before - events.len(), "Pruned ended events");
        save_schedule(store, &events)?;
    }
    Ok(events)
}

/// Returns the saved event in progress at `now`.
pub fn active_at<S: ScheduleStore + ?Sized>(
    store: &S,
    now: NaiveDateTime,
) -> ClientResult<Option<CalendarEvent>> {
    let events = load_schedule(store)?;
    Ok(find_active_at(&events, now).cloned())
}

/// Prints upcoming meetings.
pub fn upcoming<S: ScheduleStore + ?Sized>(
    store: &mut S,
    formatter: &OutputFormatter,
    json: bool,
    limit: Option<usize>,
) -> ClientResult<()> {
    let mut events = prune_saved_at(store, local_now())?;
    if let Some(limit) = limit {
        events.truncate(limit);
    }

    if json {
        println!("{}", format_json(&events)?);
    } else {
        println!("{}", formatter.format_upcoming(&events));
    }
    Ok(())
}

/// Prints the meeting in progress.
pub fn active<S: ScheduleStore + ?Sized>(
    store: &S,
    formatter: &OutputFormatter,
    json: bool,
) -> ClientResult<()> {
    let active = active_at(store, local_now())?;

    if json {
        println!("{}", format_json(&active)?);
    } else {
        println!("{}", formatter.format_active(active.as_ref()));
    }
    Ok(())
}
