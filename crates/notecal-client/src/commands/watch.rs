//! The `watch` command.
//!
//! Keeps the saved schedule pruned while running and logs whenever the
//! meeting in progress changes. The loop runs until Ctrl-C.

use std::time::Duration;

use chrono::NaiveDateTime;
use notecal_core::{CalendarEvent, ScheduleStore, find_active_at, local_now};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::commands::schedule::prune_saved_at;
use crate::error::ClientResult;

/// Result of one watch tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTick {
    /// Events left in the schedule.
    pub remaining: usize,
    /// The event in progress, if any.
    pub active: Option<CalendarEvent>,
}

/// Prunes the saved schedule and finds the active event.
pub fn tick_at<S: ScheduleStore + ?Sized>(
    store: &mut S,
    now: NaiveDateTime,
) -> ClientResult<WatchTick> {
    let events = prune_saved_at(store, now)?;
    Ok(WatchTick {
        remaining: events.len(),
        active: find_active_at(&events, now).cloned(),
    })
}

/// Runs the watch loop until Ctrl-C.
///
/// A failed tick is logged and retried on the next one.
pub async fn run<S: ScheduleStore + ?Sized>(store: &mut S, interval: Duration) -> ClientResult<()> {
    let interval = interval.max(Duration::from_secs(1));
    info!(interval_secs = interval.as_secs(), "Watching schedule");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut current: Option<Option<String>> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match tick_at(store, local_now()) {
                    Ok(tick) => {
                        debug!(remaining = tick.remaining, "Tick");
                        report_change(&mut current, tick.active.as_ref());
                    }
                    Err(e) => warn!(error = %e, "Watch tick failed"),
                }
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "Failed to listen for Ctrl-C");
                }
                info!("Stopping watch");
                break;
            }
        }
    }

    Ok(())
}

/// Logs when the active event differs from the last one seen.
///
/// `current` is `None` until the first report, so the initial state is
/// always logged, including "No active meeting".
fn report_change(
    current: &mut Option<Option<String>>,
    active: Option<&CalendarEvent>,
) -> bool {
    let id = active.map(|e| e.id.clone());
    if current.as_ref() == Some(&id) {
        return false;
    }
    match active {
        Some(event) => info!(
            id = %event.id,
            title = %event.title,
            start = %event.start_time,
            end = %event.end_time,
            location = %event.location,
            "Meeting in progress"
        ),
        None => info!("No active meeting"),
    }
    *current = Some(id);
    true
}
