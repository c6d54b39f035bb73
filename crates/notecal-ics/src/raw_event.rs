//! Raw VEVENT data.
//!
//! [`RawEvent`] holds the property values extracted from one `VEVENT` block
//! exactly as they appear in the feed, after unfolding and text unescaping
//! but before any date decoding or recurrence expansion.

/// The properties of one `VEVENT` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Position of the block in the feed, counting skipped blocks.
    pub index: usize,
    /// The `SUMMARY` value, trimmed and never empty.
    pub summary: String,
    /// The `DTSTART` token (`YYYYMMDD[THHMMSS[Z]]`).
    pub dtstart: String,
    /// The `DTEND` token, if present.
    pub dtend: Option<String>,
    /// The `RRULE` value, if present.
    pub rrule: Option<String>,
    /// The `LOCATION` value, if present and not blank.
    pub location: Option<String>,
}

impl RawEvent {
    /// Creates a raw event with the required fields.
    pub fn new(index: usize, summary: impl Into<String>, dtstart: impl Into<String>) -> Self {
        Self {
            index,
            summary: summary.into(),
            dtstart: dtstart.into(),
            dtend: None,
            rrule: None,
            location: None,
        }
    }

    /// Builder method to set the end token.
    pub fn with_dtend(mut self, dtend: impl Into<String>) -> Self {
        self.dtend = Some(dtend.into());
        self
    }

    /// Builder method to set the recurrence rule.
    pub fn with_rrule(mut self, rrule: impl Into<String>) -> Self {
        self.rrule = Some(rrule.into());
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Returns true if the event carries a recurrence rule.
    pub fn is_recurring(&self) -> bool {
        self.rrule.is_some()
    }
}
