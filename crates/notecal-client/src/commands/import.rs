//! The `import` command.

use std::path::Path;

use chrono::NaiveDateTime;
use notecal_core::{ScheduleStore, local_now, save_schedule};
use notecal_ics::{ExpansionLimits, expand_feed_with};
use tracing::{info, warn};

use crate::error::{ClientError, ClientResult};

/// Outcome of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Number of upcoming occurrences saved.
    pub events: usize,
    /// True when the input had content but yielded no upcoming occurrence.
    pub nothing_found: bool,
}

/// Expands `text` and replaces the saved schedule with the result.
pub fn import_text_at<S: ScheduleStore + ?Sized>(
    store: &mut S,
    text: &str,
    limits: ExpansionLimits,
    now: NaiveDateTime,
) -> ClientResult<ImportSummary> {
    let events = expand_feed_with(text, now, limits);
    save_schedule(store, &events)?;
    Ok(ImportSummary {
        events: events.len(),
        nothing_found: events.is_empty() && !text.trim().is_empty(),
    })
}

/// Reads an ICS file and imports it.
///
/// An unreadable file is an error; anything inside the file that cannot be
/// understood is skipped.
pub fn run<S: ScheduleStore + ?Sized>(
    path: &Path,
    store: &mut S,
    limits: ExpansionLimits,
) -> ClientResult<()> {
    let text = std::fs::read_to_string(path).map_err(|source| ClientError::ReadFeed {
        path: path.to_path_buf(),
        source,
    })?;

    let summary = import_text_at(store, &text, limits, local_now())?;
    info!(path = %path.display(), events = summary.events, "Imported calendar");

    if summary.nothing_found {
        warn!(path = %path.display(), "No upcoming events found in calendar file");
        println!("No upcoming events found in {}.", path.display());
    } else {
        println!("Imported {} events from {}.", summary.events, path.display());
    }
    Ok(())
}
