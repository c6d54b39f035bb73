//! Feed expansion: ICS text in, ordered upcoming occurrences out.
//!
//! This is the entry point the rest of the application uses. It never fails:
//! blocks that cannot be understood are skipped, and a document without any
//! usable block expands to an empty schedule.

use chrono::{NaiveDateTime, TimeDelta};
use tracing::{debug, warn};

use notecal_core::{CalendarEvent, decode_ics_datetime_at, local_now, parse_ics_datetime};

use crate::feed::{parse_block, split_event_blocks, unfold_lines};
use crate::raw_event::RawEvent;
use crate::recurrence::{Expansion, ExpansionLimits, RecurrenceRule};

/// Hours given to events without a `DTEND`.
const DEFAULT_DURATION_HOURS: i64 = 1;

/// Expands a feed against the local clock with the default limits.
pub fn expand_feed(text: &str) -> Vec<CalendarEvent> {
    expand_feed_with(text, local_now(), ExpansionLimits::default())
}

/// Expands a feed against a fixed `now` with the default limits.
pub fn expand_feed_at(text: &str, now: NaiveDateTime) -> Vec<CalendarEvent> {
    expand_feed_with(text, now, ExpansionLimits::default())
}

/// Expands a feed into concrete occurrences that have not ended at `now`.
///
/// The result is ordered by date, then start time.
pub fn expand_feed_with(
    text: &str,
    now: NaiveDateTime,
    limits: ExpansionLimits,
) -> Vec<CalendarEvent> {
    let unfolded = unfold_lines(text);
    let blocks = split_event_blocks(&unfolded);
    let mut events = Vec::new();
    let mut skipped = 0usize;

    for (index, block) in blocks.iter().enumerate() {
        match parse_block(index, block) {
            Some(raw) => expand_event(&raw, now, limits, &mut events),
            None => {
                skipped += 1;
                debug!(block = index, "Skipping VEVENT without SUMMARY or DTSTART");
            }
        }
    }

    events.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.start_time.cmp(&b.start_time))
    });

    debug!(
        blocks = blocks.len(),
        skipped,
        events = events.len(),
        "Expanded calendar feed"
    );
    events
}

/// Appends the not-yet-ended occurrences of one event to `out`.
fn expand_event(
    raw: &RawEvent,
    now: NaiveDateTime,
    limits: ExpansionLimits,
    out: &mut Vec<CalendarEvent>,
) {
    let Some(start) = parse_ics_datetime(&raw.dtstart) else {
        debug!(block = raw.index, dtstart = %raw.dtstart, "Skipping VEVENT with impossible DTSTART");
        return;
    };
    let duration = event_duration(raw, start, now);

    let mut expansion = match raw.rrule.as_deref() {
        Some(rrule) => {
            let rule = RecurrenceRule::parse_at(rrule, now);
            if !rule.frequency.is_supported() {
                debug!(
                    block = raw.index,
                    frequency = %rule.frequency,
                    "Unsupported recurrence frequency, keeping first occurrence only"
                );
            }
            Expansion::new(start, &rule, now, limits)
        }
        None => Expansion::once(start),
    };

    let before = out.len();
    for (occurrence, start) in expansion.by_ref().enumerate() {
        let end = start.checked_add_signed(duration).unwrap_or(start);
        if end <= now {
            continue;
        }
        let id = format!(
            "ics-{}-{}-{}",
            raw.index,
            occurrence,
            start.format("%Y%m%dT%H%M%S")
        );
        let mut event = CalendarEvent::occurrence(id, &raw.summary, start, end);
        if let Some(ref location) = raw.location {
            event = event.with_location(location);
        }
        out.push(event);
    }

    if raw.is_recurring() {
        debug!(
            block = raw.index,
            title = %raw.summary,
            generated = expansion.generated(),
            kept = out.len() - before,
            "Expanded recurring event"
        );
    }
}

/// Returns `DTEND - DTSTART`, or one hour when there is no `DTEND`.
///
/// An unreadable `DTEND` decodes to `now`, so the duration becomes
/// `now - DTSTART` and is reused for every occurrence of the series.
fn event_duration(raw: &RawEvent, start: NaiveDateTime, now: NaiveDateTime) -> TimeDelta {
    let Some(ref token) = raw.dtend else {
        return TimeDelta::hours(DEFAULT_DURATION_HOURS);
    };
    if parse_ics_datetime(token).is_none() {
        warn!(block = raw.index, dtend = %token, "Unreadable DTEND, decoding as now");
    }
    decode_ics_datetime_at(token, now) - start
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    /// Wraps VEVENT bodies into a calendar document with CRLF line endings.
    fn calendar(events: &[&str]) -> String {
        let mut text = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Test//EN\r\n");
        for body in events {
            text.push_str("BEGIN:VEVENT\r\n");
            for line in body.lines() {
                text.push_str(line.trim_start());
                text.push_str("\r\n");
            }
            text.push_str("END:VEVENT\r\n");
        }
        text.push_str("END:VCALENDAR\r\n");
        text
    }

    mod single {
        use super::*;

        #[test]
        fn standup_far_future() {
            let ics = calendar(&["UID:standup@example.com
                 DTSTART:20990101T100000
                 DTEND:20990101T110000
                 SUMMARY:Standup"]);

            let events = expand_feed(&ics);
            assert_eq!(events.len(), 1);
            let event = &events[0];
            assert_eq!(event.title, "Standup");
            assert_eq!(event.start_time, "10:00");
            assert_eq!(event.end_time, "11:00");
            assert_eq!(event.date.as_deref(), Some("2099-01-01"));
            assert_eq!(event.days, vec![4]);
            assert_eq!(event.id, "ics-0-0-20990101T100000");
            assert_eq!(event.location, notecal_core::NO_LOCATION);
            assert!(event.is_external);
        }

        #[test]
        fn missing_dtend_lasts_one_hour() {
            let ics = calendar(&["SUMMARY:Call
                 DTSTART:20990101T093000"]);
            let events = expand_feed_at(&ics, dt(2025, 1, 1, 0, 0));
            assert_eq!(events[0].start_time, "09:30");
            assert_eq!(events[0].end_time, "10:30");
        }

        #[test]
        fn unreadable_dtend_ends_at_now() {
            let ics = calendar(&["SUMMARY:Call
                 DTSTART:20990101T093000
                 DTEND:whenever"]);
            assert!(expand_feed_at(&ics, dt(2025, 1, 1, 0, 0)).is_empty());
        }

        #[test]
        fn unreadable_dtend_duration_is_reused() {
            let now = dt(2025, 2, 5, 12, 0);
            let ics = calendar(&["SUMMARY:Daily
                 DTSTART:20250205T090000
                 DTEND:20250205T99
                 RRULE:FREQ=DAILY;COUNT=3"]);
            let events = expand_feed_at(&ics, now);
            let dates: Vec<_> = events.iter().filter_map(|e| e.date.clone()).collect();
            assert_eq!(dates, vec!["2025-02-06", "2025-02-07"]);
            assert!(events.iter().all(|e| e.end_time == "12:00"));
        }

        #[test]
        fn ended_event_is_dropped() {
            let ics = calendar(&["SUMMARY:Done
                 DTSTART:20250205T090000
                 DTEND:20250205T100000"]);
            assert!(expand_feed_at(&ics, dt(2025, 2, 5, 10, 0)).is_empty());
            assert_eq!(expand_feed_at(&ics, dt(2025, 2, 5, 9, 59)).len(), 1);
        }

        #[test]
        fn timezone_parameter_and_utc_marker_are_not_converted() {
            let ics = calendar(&[
                "SUMMARY:Berlin
                 DTSTART;TZID=Europe/Berlin:20990101T100000
                 DTEND;TZID=Europe/Berlin:20990101T110000",
                "SUMMARY:Utc
                 DTSTART:20990102T100000Z
                 DTEND:20990102T110000Z",
            ]);
            let events = expand_feed_at(&ics, dt(2025, 1, 1, 0, 0));
            assert_eq!(events.len(), 2);
            assert!(events.iter().all(|e| e.start_time == "10:00"));
        }

        #[test]
        fn all_day_event_starts_at_midnight() {
            let ics = calendar(&["SUMMARY:Holiday
                 DTSTART;VALUE=DATE:20990101
                 DTEND;VALUE=DATE:20990102"]);
            let events = expand_feed_at(&ics, dt(2025, 1, 1, 0, 0));
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].start_time, "00:00");
            assert_eq!(events[0].date.as_deref(), Some("2099-01-01"));
        }

        #[test]
        fn location_is_carried() {
            let ics = calendar(&["SUMMARY:Review
                 DTSTART:20990101T140000
                 LOCATION:Room 4\\, Building B"]);
            let events = expand_feed_at(&ics, dt(2025, 1, 1, 0, 0));
            assert_eq!(events[0].location, "Room 4, Building B");
        }

        #[test]
        fn folded_summary_is_rejoined() {
            let ics = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nSUMMARY:Quarterly plan\r\n ning\r\n\
                       DTSTART:20990101T100000\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
            let events = expand_feed_at(ics, dt(2025, 1, 1, 0, 0));
            assert_eq!(events[0].title, "Quarterly planning");
        }
    }

    mod recurring {
        use super::*;

        #[test]
        fn daily_count_prunes_past_occurrences() {
            let now = dt(2025, 2, 5, 12, 0);
            let ics = calendar(&["SUMMARY:Daily
                 DTSTART:20250205T090000
                 DTEND:20250205T093000
                 RRULE:FREQ=DAILY;COUNT=5"]);

            let events = expand_feed_at(&ics, now);
            assert_eq!(events.len(), 4);
            let dates: Vec<_> = events.iter().filter_map(|e| e.date_naive()).collect();
            for pair in dates.windows(2) {
                assert_eq!(pair[1] - pair[0], TimeDelta::days(1));
            }
            assert_eq!(events[0].date.as_deref(), Some("2025-02-06"));
            assert!(events.iter().all(|e| e.end_time == "09:30"));
        }

        #[test]
        fn occurrence_index_counts_pruned_occurrences() {
            let now = dt(2025, 2, 5, 12, 0);
            let ics = calendar(&["SUMMARY:Daily
                 DTSTART:20250205T090000
                 RRULE:FREQ=DAILY;COUNT=2"]);
            let events = expand_feed_at(&ics, now);
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].id, "ics-0-1-20250206T090000");
        }

        #[test]
        fn biweekly_until_within_horizon() {
            let now = dt(2025, 2, 5, 8, 0);
            let ics = calendar(&["SUMMARY:Sync
                 DTSTART:20250205T100000
                 DTEND:20250205T110000
                 RRULE:FREQ=WEEKLY;INTERVAL=2;UNTIL=20250307T000000"]);
            let dates: Vec<_> = expand_feed_at(&ics, now)
                .into_iter()
                .filter_map(|e| e.date)
                .collect();
            assert_eq!(dates, vec!["2025-02-05", "2025-02-19", "2025-03-05"]);
        }

        #[test]
        fn never_beyond_horizon() {
            let now = dt(2025, 2, 5, 8, 0);
            let ics = calendar(&["SUMMARY:Sync
                 DTSTART:20250205T100000
                 RRULE:FREQ=WEEKLY;INTERVAL=2;UNTIL=20251231T000000"]);
            let horizon = ExpansionLimits::default().horizon_end(now);
            let events = expand_feed_at(&ics, now);
            assert_eq!(events.len(), 5);
            assert!(events
                .iter()
                .all(|e| e.start_instant().is_some_and(|s| s <= horizon)));
        }

        #[test]
        fn default_frequency_is_weekly() {
            let now = dt(2025, 2, 5, 8, 0);
            let ics = calendar(&["SUMMARY:Weekly
                 DTSTART:20250205T100000
                 RRULE:COUNT=3"]);
            let dates: Vec<_> = expand_feed_at(&ics, now)
                .into_iter()
                .filter_map(|e| e.date)
                .collect();
            assert_eq!(dates, vec!["2025-02-05", "2025-02-12", "2025-02-19"]);
        }

        #[test]
        fn non_advancing_rule_is_bounded_with_unique_ids() {
            let now = dt(2025, 2, 5, 8, 0);
            let ics = calendar(&["SUMMARY:Stuck
                 DTSTART:20250206T100000
                 RRULE:FREQ=DAILY;INTERVAL=0"]);
            let events = expand_feed_at(&ics, now);
            assert_eq!(events.len(), 500);
            let ids: HashSet<_> = events.iter().map(|e| e.id.as_str()).collect();
            assert_eq!(ids.len(), 500);
        }

        #[test]
        fn custom_limits() {
            let now = dt(2025, 2, 5, 8, 0);
            let ics = calendar(&["SUMMARY:Daily
                 DTSTART:20250205T100000
                 RRULE:FREQ=DAILY"]);
            // Horizon ends 2025-02-11 08:00, before that day's 10:00 occurrence.
            let limits = ExpansionLimits::default().with_horizon_days(6);
            assert_eq!(expand_feed_with(&ics, now, limits).len(), 6);

            let limits = ExpansionLimits::default().with_max_occurrences(3);
            assert_eq!(expand_feed_with(&ics, now, limits).len(), 3);
        }

        #[test]
        fn horizon_end_is_inclusive() {
            let now = dt(2025, 2, 5, 8, 0);
            let ics = calendar(&["SUMMARY:Daily
                 DTSTART:20250205T080000
                 DTEND:20250205T083000
                 RRULE:FREQ=DAILY"]);
            let limits = ExpansionLimits::default().with_horizon_days(6);
            let events = expand_feed_with(&ics, now, limits);
            assert_eq!(events.len(), 7);
            assert_eq!(events[6].date.as_deref(), Some("2025-02-11"));
        }

        #[test]
        fn unsupported_frequency_keeps_first_occurrence() {
            let now = dt(2025, 2, 5, 8, 0);
            let ics = calendar(&["SUMMARY:Hourly
                 DTSTART:20250205T100000
                 RRULE:FREQ=HOURLY;COUNT=5"]);
            let events = expand_feed_at(&ics, now);
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].start_time, "10:00");
        }

        #[test]
        fn monthly_series() {
            let now = dt(2025, 1, 1, 0, 0);
            let ics = calendar(&["SUMMARY:Report
                 DTSTART:20250131T100000
                 RRULE:FREQ=MONTHLY"]);
            let dates: Vec<_> = expand_feed_at(&ics, now)
                .into_iter()
                .filter_map(|e| e.date)
                .collect();
            assert_eq!(dates, vec!["2025-01-31", "2025-02-28"]);
        }

        #[test]
        fn weekday_follows_occurrence() {
            let now = dt(2025, 2, 5, 8, 0);
            let ics = calendar(&["SUMMARY:Daily
                 DTSTART:20250205T100000
                 RRULE:FREQ=DAILY;COUNT=7"]);
            let days: Vec<_> = expand_feed_at(&ics, now)
                .into_iter()
                .map(|e| e.days)
                .collect();
            // 2025-02-05 is a Wednesday
            assert_eq!(
                days,
                vec![vec![3], vec![4], vec![5], vec![6], vec![0], vec![1], vec![2]]
            );
        }
    }

    mod document {
        use super::*;

        #[test]
        fn missing_summary_yields_empty() {
            let ics = calendar(&["DTSTART:20990101T100000
                 DTEND:20990101T110000"]);
            assert!(expand_feed(&ics).is_empty());
        }

        #[test]
        fn malformed_start_block_is_skipped() {
            let ics = calendar(&[
                "SUMMARY:Broken
                 DTSTART:abc",
                "SUMMARY:Impossible
                 DTSTART:20991399T100000",
                "SUMMARY:Fine
                 DTSTART:20990101T100000",
            ]);
            let events = expand_feed_at(&ics, dt(2025, 1, 1, 0, 0));
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].title, "Fine");
            assert_eq!(events[0].id, "ics-2-0-20990101T100000");
        }

        #[test]
        fn empty_and_markerless_input() {
            assert!(expand_feed("").is_empty());
            assert!(expand_feed("BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n").is_empty());
            assert!(expand_feed("not a calendar at all").is_empty());
        }

        #[test]
        fn ordered_by_date_then_start_time() {
            let ics = calendar(&[
                "SUMMARY:Late
                 DTSTART:20990102T150000",
                "SUMMARY:Early next day
                 DTSTART:20990102T080000",
                "SUMMARY:First
                 DTSTART:20990101T170000",
            ]);
            let titles: Vec<_> = expand_feed_at(&ics, dt(2025, 1, 1, 0, 0))
                .into_iter()
                .map(|e| e.title)
                .collect();
            assert_eq!(titles, vec!["First", "Early next day", "Late"]);
        }

        #[test]
        fn lf_only_documents() {
            let ics = "BEGIN:VCALENDAR\nBEGIN:VEVENT\nSUMMARY:Lf\nDTSTART:20990101T100000\n\
                       END:VEVENT\nEND:VCALENDAR\n";
            assert_eq!(expand_feed_at(ics, dt(2025, 1, 1, 0, 0)).len(), 1);
        }

        #[test]
        fn output_serializes_for_persistence() {
            let ics = calendar(&["SUMMARY:Standup
                 DTSTART:20990101T100000"]);
            let events = expand_feed_at(&ics, dt(2025, 1, 1, 0, 0));
            let json = serde_json::to_string(&events).unwrap();
            let back: Vec<CalendarEvent> = serde_json::from_str(&json).unwrap();
            assert_eq!(back, events);
        }
    }
}
