//! Schedule persistence.
//!
//! The expanded schedule is saved between runs through a [`ScheduleStore`],
//! a minimal key-value interface. The store is passed explicitly to
//! [`load_schedule`] and [`save_schedule`] so the engine never touches
//! ambient state and tests can use [`MemoryStore`].

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::event::CalendarEvent;

/// Key under which the expanded schedule is saved.
pub const SCHEDULE_KEY: &str = "schedule";

/// A key-value text store.
pub trait ScheduleStore {
    /// Returns the text stored under `key`, if any.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
}

/// An in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ScheduleStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads the saved schedule.
///
/// A missing entry is an empty schedule. An entry that no longer matches the
/// event model is discarded with a warning and also loads as empty.
pub fn load_schedule<S: ScheduleStore + ?Sized>(store: &S) -> StoreResult<Vec<CalendarEvent>> {
    let Some(text) = store.get(SCHEDULE_KEY)? else {
        debug!("No saved schedule");
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<CalendarEvent>>(&text) {
        Ok(events) => {
            debug!(count = events.len(), "Loaded saved schedule");
            Ok(events)
        }
        Err(e) => {
            warn!(error = %e, "Discarding unreadable saved schedule");
            Ok(Vec::new())
        }
    }
}

/// Saves the schedule, replacing the previous one.
pub fn save_schedule<S: ScheduleStore + ?Sized>(
    store: &mut S,
    events: &[CalendarEvent],
) -> StoreResult<()> {
    let text = serde_json::to_string(events)?;
    store.set(SCHEDULE_KEY, &text)?;
    debug!(count = events.len(), "Saved schedule");
    Ok(())
}
