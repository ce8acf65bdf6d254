//! Countdown and relative-time formatting for the menu bar.
//!
//! The menu-bar title is re-rendered once per second by the caller, so every
//! function here is pure over an explicit `now`: same inputs, same string.
//!
//! # Example
//!
//! ```
//! use cal_reminders_core::{format_countdown, Event};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let now = Utc.with_ymd_and_hms(2025, 2, 5, 10, 0, 0).unwrap();
//! let event = Event::new("Standup", now + Duration::minutes(45), now + Duration::hours(1));
//! assert_eq!(format_countdown(&event, now), "⏱ 45m — Standup");
//! ```

use std::borrow::Cow;
use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

use crate::event::Event;

/// Maximum title width, in characters, for the menu-bar countdown.
pub const TITLE_WIDTH: usize = 20;

/// Maximum title width for entries in the "Next up:" dropdown section.
pub const NEXT_UP_TITLE_WIDTH: usize = 25;

/// Marker shown while an event is starting or has started.
const MARKER_ALERT: &str = "🔴";
/// Marker alternated with the alert marker during the final-seconds pulse.
const MARKER_PULSE_OFF: &str = "⚪";
/// Marker shown for an ordinary upcoming countdown.
const MARKER_CLOCK: &str = "⏱";

/// Formats the menu-bar countdown for an event.
///
/// The shape depends on how much time remains until the start:
/// - already started (remaining ≤ 0): `🔴 NOW — <title>`
/// - an hour or more: `⏱ 2h 15m — <title>`, minutes omitted when zero
/// - more than five minutes: `⏱ 45m — <title>`
/// - five minutes or less: `⏱ 4:59 — <title>`, with seconds
///
/// During the final ten seconds the marker pulses between red and white on
/// alternating seconds, which reads as a blink when the caller re-renders
/// once per second. Titles are truncated to [`TITLE_WIDTH`] characters.
pub fn format_countdown(event: &Event, now: DateTime<Utc>) -> String {
    let total_seconds = (event.start_time - now).num_seconds();

    if total_seconds <= 0 {
        return format!("{MARKER_ALERT} NOW — {}", truncate_title(&event.title, TITLE_WIDTH));
    }

    let total_minutes = total_seconds / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    let seconds = total_seconds % 60;

    // Marker pulses during the final ten seconds.
    let marker = if total_seconds <= 10 {
        if total_seconds % 2 == 0 {
            MARKER_ALERT
        } else {
            MARKER_PULSE_OFF
        }
    } else {
        MARKER_CLOCK
    };

    let clock = if hours > 0 {
        if minutes > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{hours}h")
        }
    } else if total_minutes > 5 {
        format!("{total_minutes}m")
    } else {
        format!("{minutes}:{seconds:02}")
    };

    format!("{marker} {clock} — {}", truncate_title(&event.title, TITLE_WIDTH))
}

/// Formats a relative start time like `"in 4 min"` or `"in 1h 30m"`.
///
/// Events starting in under a minute (or already started) render as `"now"`.
pub fn format_relative(event: &Event, now: DateTime<Utc>) -> String {
    let total_minutes = (event.start_time - now).num_minutes();

    if total_minutes < 1 {
        "now".to_string()
    } else if total_minutes < 60 {
        format!("in {total_minutes} min")
    } else {
        let hours = total_minutes / 60;
        let minutes = total_minutes % 60;
        if minutes == 0 {
            format!("in {hours}h")
        } else {
            format!("in {hours}h {minutes}m")
        }
    }
}

/// Formats an event's clock times as `"10:30 - 11:00 AM"`.
///
/// The start omits the meridiem, the end carries it. Generic over the
/// timezone so callers pass `Local` while tests pin a fixed offset.
pub fn format_time_range<Tz>(event: &Event, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let start = event.start_time.with_timezone(tz);
    let end = event.end_time.with_timezone(tz);
    format!("{} - {}", start.format("%-I:%M"), end.format("%-I:%M %p"))
}

/// Truncates a title to `max_chars` characters, replacing the last kept
/// character with an ellipsis when truncation happens.
///
/// Counts `char`s, not bytes, so multi-byte titles stay intact.
pub fn truncate_title(title: &str, max_chars: usize) -> Cow<'_, str> {
    if title.chars().count() <= max_chars {
        return Cow::Borrowed(title);
    }

    let mut truncated: String = title.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    Cow::Owned(truncated)
}


#[cfg(test)]
mod golden_tests;
