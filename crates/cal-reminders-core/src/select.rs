//! Selection of the next upcoming events.
//!
//! The calendar adapter hands over a list that is already free of all-day
//! events and sorted ascending by start time; selection only decides which
//! of those are still ahead of the clock.

use chrono::{DateTime, Utc};

use crate::event::Event;

/// Selects the earliest `count` events that have not yet begun.
///
/// Walks `events` in order, retaining an event only if its start time is
/// strictly after `now`, and stops once `count` have been retained. An event
/// starting exactly at `now` is excluded. Returns fewer than `count` when
/// insufficient future events exist, and an empty vector when none do.
///
/// The result is a prefix, by start time, of the future events.
pub fn select_upcoming(events: &[Event], now: DateTime<Utc>, count: usize) -> Vec<Event> {
    events
        .iter()
        .filter(|event| event.start_time > now)
        .take(count)
        .cloned()
        .collect()
}
