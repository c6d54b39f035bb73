//! Tolerant ICS feed parsing.
//!
//! The feed is not parsed against the full RFC 5545 grammar. Instead:
//! 1. folded lines are rejoined ([`unfold_lines`])
//! 2. the document is cut into one span per `BEGIN:VEVENT` ([`split_event_blocks`])
//! 3. each span is searched for the handful of properties the engine needs
//!    ([`parse_block`])
//!
//! Property lookups accept an optional parameter list between the name and
//! the value separator (`DTSTART;TZID=Europe/Paris:20250205T100000`). The
//! parameters themselves are ignored.

use std::sync::LazyLock;

use icalendar::parser::unfold;
use regex::Regex;
use tracing::trace;

use crate::raw_event::RawEvent;

/// Builds `^NAME[;PARAM=...]*:VALUE`. Quoted parameter values may contain
/// `:` and `;`.
fn property_regex(name: &str, value: &str) -> Regex {
    Regex::new(&format!(
        r#"(?mi)^{name}(?:;(?:[^:;\n"]|"[^"\n]*")*)*:{value}"#
    ))
    .expect("Invalid property regex")
}

static BEGIN_EVENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^BEGIN:VEVENT[ \t]*$").expect("Invalid BEGIN regex"));

static END_EVENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mi)^END:VEVENT[ \t]*$").expect("Invalid END regex"));

// VALARM components may carry their own SUMMARY/DESCRIPTION.
static ALARM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?msi)^BEGIN:VALARM[ \t]*$.*?^END:VALARM[ \t]*$").expect("Invalid VALARM regex")
});

static SUMMARY_REGEX: LazyLock<Regex> = LazyLock::new(|| property_regex("SUMMARY", r"(.*)$"));

static DTSTART_REGEX: LazyLock<Regex> =
    LazyLock::new(|| property_regex("DTSTART", r"[ \t]*([0-9]{8}(?:T[0-9]{6}Z?)?)"));

static DTEND_REGEX: LazyLock<Regex> = LazyLock::new(|| property_regex("DTEND", r"(.*)$"));

static RRULE_REGEX: LazyLock<Regex> = LazyLock::new(|| property_regex("RRULE", r"(.*)$"));

static LOCATION_REGEX: LazyLock<Regex> = LazyLock::new(|| property_regex("LOCATION", r"(.*)$"));

/// Rejoins folded lines.
///
/// Line endings are normalized to CRLF so that folds written with bare `\n`
/// or `\r` are recognized by [`icalendar::parser::unfold`], which removes a
/// line break followed by one space or tab. The result uses `\n` endings.
pub fn unfold_lines(text: &str) -> String {
    let crlf = text
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "\r\n");
    unfold(&crlf).replace("\r\n", "\n")
}

/// Splits an unfolded document into `VEVENT` bodies.
///
/// Content before the first `BEGIN:VEVENT` is discarded. Each body runs up to
/// its `END:VEVENT`, or to the next `BEGIN:VEVENT` when the end marker is
/// missing.
pub fn split_event_blocks(unfolded: &str) -> Vec<&str> {
    BEGIN_EVENT_REGEX
        .split(unfolded)
        .skip(1)
        .map(|span| match END_EVENT_REGEX.find(span) {
            Some(end) => &span[..end.start()],
            None => span,
        })
        .collect()
}

/// Extracts the properties of one `VEVENT` body.
///
/// Returns `None` when `SUMMARY` is missing or blank, or when `DTSTART` is
/// missing or not a numeric `YYYYMMDD[THHMMSS[Z]]` token.
pub fn parse_block(index: usize, block: &str) -> Option<RawEvent> {
    let block = ALARM_REGEX.replace_all(block, "");

    let Some(summary) = capture_text(&SUMMARY_REGEX, &block) else {
        trace!(block = index, "VEVENT has no SUMMARY");
        return None;
    };
    let Some(dtstart) = capture(&DTSTART_REGEX, &block) else {
        trace!(block = index, "VEVENT has no usable DTSTART");
        return None;
    };

    let mut raw = RawEvent::new(index, summary, dtstart);
    if let Some(dtend) = capture(&DTEND_REGEX, &block) {
        raw = raw.with_dtend(dtend);
    }
    if let Some(rrule) = capture(&RRULE_REGEX, &block) {
        raw = raw.with_rrule(rrule);
    }
    if let Some(location) = capture_text(&LOCATION_REGEX, &block) {
        raw = raw.with_location(location);
    }

    Some(raw)
}

/// Returns the trimmed first capture, if it is not empty.
fn capture(regex: &Regex, block: &str) -> Option<String> {
    let value = regex.captures(block)?.get(1)?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Like [`capture`], for TEXT values that need unescaping.
fn capture_text(regex: &Regex, block: &str) -> Option<String> {
    let value = unescape_text(&capture(regex, block)?);
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Resolves the backslash escapes of an ICS TEXT value.
///
/// `\n`/`\N` become a newline and `\,` `\;` `\\` their literal character.
/// Unknown escapes are kept as written.
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(escaped @ (',' | ';' | '\\')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
