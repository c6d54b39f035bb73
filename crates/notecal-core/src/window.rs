//! Upcoming-window filtering.
//!
//! A schedule expanded from a calendar feed goes stale as time passes. The
//! functions here re-filter it against the current moment:
//! - [`prune`] drops events that have ended
//! - [`find_active`] returns the event in progress, if any
//!
//! Both are pure and idempotent. Each has an `_at` form taking an explicit
//! `now` for callers that need a fixed reference point.

use chrono::NaiveDateTime;
use tracing::trace;

use crate::event::CalendarEvent;
use crate::time::local_now;

/// Removes every event whose end is at or before `now`.
///
/// Events without a date, or with a blank one, are retained unconditionally. The relative order of
/// the remaining events is preserved.
pub fn prune_at(mut events: Vec<CalendarEvent>, now: NaiveDateTime) -> Vec<CalendarEvent> {
    let before = events.len();
    events.retain(|event| {
        let keep = !event.has_ended_at(now);
        if !keep {
            trace!(id = %event.id, title = %event.title, "Pruning ended event");
        }
        keep
    });
    let pruned = before - events.len();
    if pruned > 0 {
        trace!(pruned, remaining = events.len(), "Pruned ended events");
    }
    events
}

/// Removes every event that has ended by the local clock.
pub fn prune(events: Vec<CalendarEvent>) -> Vec<CalendarEvent> {
    prune_at(events, local_now())
}

/// Returns the first event in progress at `now`.
///
/// An event is in progress when it is dated today and its `[startTime,
/// endTime]` window contains the current `HH:MM`, both ends inclusive. When
/// several qualify, the earliest-listed wins.
pub fn find_active_at(events: &[CalendarEvent], now: NaiveDateTime) -> Option<&CalendarEvent> {
    events.iter().find(|event| event.is_active_at(now))
}

/// Returns the first event in progress by the local clock.
pub fn find_active(events: &[CalendarEvent]) -> Option<&CalendarEvent> {
    find_active_at(events, local_now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn event(id: &str, start: NaiveDateTime, end: NaiveDateTime) -> CalendarEvent {
        CalendarEvent::occurrence(id, format!("Event {id}"), start, end)
    }

    mod prune {
        use super::*;

        #[test]
        fn drops_ended_events() {
            let now = dt(2025, 2, 5, 12, 0);
            let events = vec![
                event("past", dt(2025, 2, 5, 9, 0), dt(2025, 2, 5, 10, 0)),
                event("ends-now", dt(2025, 2, 5, 11, 0), dt(2025, 2, 5, 12, 0)),
                event("ongoing", dt(2025, 2, 5, 11, 30), dt(2025, 2, 5, 12, 30)),
                event("tomorrow", dt(2025, 2, 6, 9, 0), dt(2025, 2, 6, 10, 0)),
            ];

            let kept: Vec<_> = prune_at(events, now).into_iter().map(|e| e.id).collect();
            assert_eq!(kept, vec!["ongoing", "tomorrow"]);
        }

        #[test]
        fn keeps_dateless_events() {
            let mut manual = event("manual", dt(2000, 1, 1, 9, 0), dt(2000, 1, 1, 10, 0));
            manual.date = None;

            let kept = prune_at(vec![manual.clone()], dt(2025, 2, 5, 12, 0));
            assert_eq!(kept, vec![manual]);
        }

        #[test]
        fn keeps_blank_date_events() {
            let mut manual = event("manual", dt(2000, 1, 1, 9, 0), dt(2000, 1, 1, 10, 0));
            manual.date = Some(String::new());

            let kept = prune_at(vec![manual.clone()], dt(2025, 2, 5, 12, 0));
            assert_eq!(kept, vec![manual]);
        }

        #[test]
        fn is_idempotent() {
            let now = dt(2025, 2, 5, 12, 0);
            let events = vec![
                event("a", dt(2025, 2, 5, 9, 0), dt(2025, 2, 5, 10, 0)),
                event("b", dt(2025, 2, 5, 13, 0), dt(2025, 2, 5, 14, 0)),
            ];

            let once = prune_at(events, now);
            let twice = prune_at(once.clone(), now);
            assert_eq!(once, twice);
        }

        #[test]
        fn empty_schedule() {
            assert!(prune_at(Vec::new(), dt(2025, 2, 5, 12, 0)).is_empty());
        }

        #[test]
        fn clock_variant_keeps_far_future() {
            let future = event("future", dt(2099, 1, 1, 10, 0), dt(2099, 1, 1, 11, 0));
            let past = event("past", dt(2000, 1, 1, 10, 0), dt(2000, 1, 1, 11, 0));
            let kept = prune(vec![past, future.clone()]);
            assert_eq!(kept, vec![future]);
        }
    }

    mod find_active {
        use super::*;

        #[test]
        fn shared_boundary_resolves_to_first_listed() {
            let events = vec![
                event("first", dt(2025, 2, 5, 9, 0), dt(2025, 2, 5, 10, 0)),
                event("second", dt(2025, 2, 5, 10, 0), dt(2025, 2, 5, 11, 0)),
            ];

            let active = find_active_at(&events, dt(2025, 2, 5, 10, 0)).unwrap();
            assert_eq!(active.id, "first");

            let active = find_active_at(&events, dt(2025, 2, 5, 10, 1)).unwrap();
            assert_eq!(active.id, "second");
        }

        #[test]
        fn none_when_nothing_in_progress() {
            let events = vec![event("a", dt(2025, 2, 5, 9, 0), dt(2025, 2, 5, 10, 0))];
            assert!(find_active_at(&events, dt(2025, 2, 5, 10, 1)).is_none());
            assert!(find_active_at(&events, dt(2025, 2, 6, 9, 30)).is_none());
            assert!(find_active_at(&[], dt(2025, 2, 5, 9, 30)).is_none());
        }

        #[test]
        fn ignores_dateless_events() {
            let mut manual = event("manual", dt(2025, 2, 5, 9, 0), dt(2025, 2, 5, 10, 0));
            manual.date = None;
            assert!(find_active_at(&[manual], dt(2025, 2, 5, 9, 30)).is_none());
        }

        #[test]
        fn seconds_do_not_matter() {
            let events = vec![event("a", dt(2025, 2, 5, 9, 0), dt(2025, 2, 5, 10, 0))];
            let now = NaiveDate::from_ymd_opt(2025, 2, 5)
                .unwrap()
                .and_hms_opt(10, 0, 59)
                .unwrap();
            assert!(find_active_at(&events, now).is_some());
        }
    }
}
