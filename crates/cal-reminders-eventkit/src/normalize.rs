//! RawEvent to Event conversion.
//!
//! The normalization step turns bridge data into the [`Event`] type the
//! display pipeline works with:
//!
//! 1. All-day entries are dropped; a countdown to midnight is meaningless.
//! 2. Missing titles get the "(No title)" fallback.
//! 3. Events are sorted by start time so selection can take a prefix.

use cal_reminders_core::Event;

use crate::raw_event::RawEvent;

/// Converts a single [`RawEvent`] to an [`Event`].
pub fn normalize_event(raw: &RawEvent) -> Event {
    let mut event = Event::new(raw.effective_title(), raw.start_time, raw.end_time);

    if let Some(ref notes) = raw.notes {
        event = event.with_notes(notes);
    }

    if let Some(ref location) = raw.location {
        event = event.with_location(location);
    }

    if let Some(ref url) = raw.url {
        event = event.with_url(url);
    }

    event
}

/// Batch normalize raw events: drop all-day entries, sort by start time.
pub fn normalize_events(raw_events: &[RawEvent]) -> Vec<Event> {
    let mut events: Vec<Event> = raw_events
        .iter()
        .filter(|raw| !raw.all_day)
        .map(normalize_event)
        .collect();

    events.sort_by_key(|event| event.start_time);
    events
}
