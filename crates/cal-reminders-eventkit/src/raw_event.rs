//! Raw event type from calendar sources.
//!
//! This module defines [`RawEvent`], the representation of calendar event
//! data as it comes back from a source (the EventKit bridge or a fixture
//! file) before normalization.
//!
//! The field names double as the JSON schema the bridge scripts emit, so
//! changing a serde name here requires changing the scripts as well.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw calendar event from a source.
///
/// Only the fields the display pipeline needs are carried; everything else
/// EventKit knows about an event is dropped at the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// The event title. Empty titles get a fallback during normalization.
    #[serde(default)]
    pub title: Option<String>,

    /// When the event starts.
    pub start_time: DateTime<Utc>,

    /// When the event ends.
    pub end_time: DateTime<Utc>,

    /// Whether this is an all-day entry.
    #[serde(default)]
    pub all_day: bool,

    /// Free-form notes attached to the event.
    #[serde(default)]
    pub notes: Option<String>,

    /// The event location.
    #[serde(default)]
    pub location: Option<String>,

    /// A URL attached to the event.
    #[serde(default)]
    pub url: Option<String>,

    /// Title of the calendar the event belongs to.
    #[serde(default)]
    pub calendar: Option<String>,
}

impl RawEvent {
    /// Creates a new raw event covering the given times.
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            title: None,
            start_time,
            end_time,
            all_day: false,
            notes: None,
            location: None,
            url: None,
            calendar: None,
        }
    }

    /// Returns the effective title, falling back to "(No title)" if empty.
    pub fn effective_title(&self) -> &str {
        self.title
            .as_ref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.as_str())
            .unwrap_or("(No title)")
    }

    /// Builder method to set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder method to mark the event as all-day.
    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// Builder method to set the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Builder method to set the calendar title.
    pub fn with_calendar(mut self, calendar: impl Into<String>) -> Self {
        self.calendar = Some(calendar.into());
        self
    }
}
