//! Core types: calendar events, ICS date decoding, upcoming-window filters,
//! schedule store.

pub mod error;
pub mod event;
pub mod store;
pub mod time;
pub mod tracing;
pub mod window;

pub use error::{StoreError, StoreResult};
pub use event::{CalendarEvent, NO_LOCATION};
pub use store::{MemoryStore, SCHEDULE_KEY, ScheduleStore, load_schedule, save_schedule};
pub use time::{decode_ics_datetime, decode_ics_datetime_at, local_now, parse_ics_datetime};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use window::{find_active, find_active_at, prune, prune_at};
