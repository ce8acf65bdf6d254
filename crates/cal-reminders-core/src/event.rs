//! Event types for calendar events.
//!
//! This module provides the [`Event`] value type: the canonical
//! representation of a timed calendar event after fetching and
//! normalization. Events are constructed fresh on every fetch cycle; no
//! identity persists across refreshes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A timed calendar event.
///
/// All-day events never reach this type; the calendar adapter drops them
/// during normalization. Times are UTC-normalized. `start_time <= end_time`
/// is assumed from the upstream store and not independently validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// The event title. The adapter substitutes a placeholder when the
    /// store returns none, so this is never empty.
    pub title: String,
    /// When the event starts.
    pub start_time: DateTime<Utc>,
    /// When the event ends.
    pub end_time: DateTime<Utc>,
    /// The raw notes/description field, if present.
    pub notes: Option<String>,
    /// The raw location field, if present.
    pub location: Option<String>,
    /// The URL attached to the event, if present.
    pub url: Option<String>,
}

impl Event {
    /// Creates a new Event with the required fields.
    pub fn new(title: impl Into<String>, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            start_time,
            end_time,
            notes: None,
            location: None,
            url: None,
        }
    }

    /// Builder method to set the notes field.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builder method to set the location field.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the event URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Returns true if the event has started at the given time.
    ///
    /// A started event is no longer eligible for selection, even while
    /// it is still running.
    pub fn has_started_at(&self, now: DateTime<Utc>) -> bool {
        self.start_time <= now
    }

    /// Returns the duration of the event in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn sample_event() -> Event {
        Event::new(
            "Team Standup",
            utc(2025, 2, 5, 10, 0, 0),
            utc(2025, 2, 5, 10, 30, 0),
        )
    }

    #[test]
    fn basic_creation() {
        let event = sample_event();
        assert_eq!(event.title, "Team Standup");
        assert_eq!(event.duration_minutes(), 30);
        assert!(event.notes.is_none());
        assert!(event.location.is_none());
        assert!(event.url.is_none());
    }

    #[test]
    fn builder_pattern() {
        let event = sample_event()
            .with_notes("Agenda: https://zoom.us/j/123")
            .with_location("Room 101")
            .with_url("https://example.com/event");

        assert_eq!(event.notes.as_deref(), Some("Agenda: https://zoom.us/j/123"));
        assert_eq!(event.location.as_deref(), Some("Room 101"));
        assert_eq!(event.url.as_deref(), Some("https://example.com/event"));
    }

    #[test]
    fn started_detection() {
        let event = sample_event(); // starts 10:00 UTC

        assert!(!event.has_started_at(utc(2025, 2, 5, 9, 59, 59)));
        // Exactly at the start counts as started
        assert!(event.has_started_at(utc(2025, 2, 5, 10, 0, 0)));
        assert!(event.has_started_at(utc(2025, 2, 5, 10, 15, 0)));
    }

    #[test]
    fn serde_roundtrip() {
        let event = sample_event().with_location("Room 101");
        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }
}
