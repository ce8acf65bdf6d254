//! Golden tests for status-line and menu output.
//!
//! These tests use insta inline snapshots to lock the exact strings the menu
//! bar shows. Run with `cargo insta review` to update after intentional
//! changes.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

use crate::event::Event;
use crate::links::{MeetingLink, MeetingProvider};
use crate::menu::{render_menu, status_title, MenuView};

/// Create a UTC datetime for testing.
fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

/// The reference time for all golden tests: 2025-02-05 10:00:00 UTC.
/// Using a fixed time ensures reproducible snapshots.
fn reference_time() -> DateTime<Utc> {
    utc(2025, 2, 5, 10, 0, 0)
}

/// Snapshots must not depend on the machine's timezone.
fn fixed_tz() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

/// Create a sample event starting at a given offset from `now`.
fn sample_event(now: DateTime<Utc>, offset_minutes: i64, title: &str) -> Event {
    let start = now + Duration::minutes(offset_minutes);
    Event::new(title, start, start + Duration::minutes(30))
}

/// Create a sample event at second granularity, for the final-stretch tiers.
fn sample_event_seconds(now: DateTime<Utc>, offset_seconds: i64, title: &str) -> Event {
    let start = now + Duration::seconds(offset_seconds);
    Event::new(title, start, start + Duration::minutes(30))
}

fn upcoming(event: Event) -> MenuView {
    MenuView::from_selection(vec![event], None, false)
}

// =============================================================================
// Status Line Golden Tests
// =============================================================================

#[test]
fn golden_status_loading() {
    let now = reference_time();
    insta::assert_snapshot!(status_title(&MenuView::loading(), now), @"⏱ Loading...");
}

#[test]
fn golden_status_no_access() {
    let now = reference_time();
    insta::assert_snapshot!(status_title(&MenuView::no_access(), now), @"⚠️ No calendar access");
}

#[test]
fn golden_status_no_events() {
    let now = reference_time();
    let view = MenuView::from_selection(vec![], None, false);
    insta::assert_snapshot!(status_title(&view, now), @"⏱ No events");
}

#[test]
fn golden_status_hours_and_minutes() {
    let now = reference_time();
    let view = upcoming(sample_event(now, 150, "Design Review"));
    insta::assert_snapshot!(status_title(&view, now), @"⏱ 2h 30m — Design Review");
}

#[test]
fn golden_status_whole_hours() {
    let now = reference_time();
    let view = upcoming(sample_event(now, 120, "Design Review"));
    insta::assert_snapshot!(status_title(&view, now), @"⏱ 2h — Design Review");
}

#[test]
fn golden_status_minutes() {
    let now = reference_time();
    let view = upcoming(sample_event(now, 12, "Team Standup"));
    insta::assert_snapshot!(status_title(&view, now), @"⏱ 12m — Team Standup");
}

#[test]
fn golden_status_final_stretch() {
    let now = reference_time();
    let view = upcoming(sample_event_seconds(now, 245, "Team Standup"));
    insta::assert_snapshot!(status_title(&view, now), @"⏱ 4:05 — Team Standup");
}

#[test]
fn golden_status_pulse_even_second() {
    let now = reference_time();
    let view = upcoming(sample_event_seconds(now, 8, "Team Standup"));
    insta::assert_snapshot!(status_title(&view, now), @"🔴 0:08 — Team Standup");
}

#[test]
fn golden_status_pulse_odd_second() {
    let now = reference_time();
    let view = upcoming(sample_event_seconds(now, 7, "Team Standup"));
    insta::assert_snapshot!(status_title(&view, now), @"⚪ 0:07 — Team Standup");
}

#[test]
fn golden_status_started() {
    let now = reference_time();
    let view = upcoming(sample_event(now, -5, "Team Standup"));
    insta::assert_snapshot!(status_title(&view, now), @"🔴 NOW — Team Standup");
}

#[test]
fn golden_status_title_truncation() {
    let now = reference_time();
    let view = upcoming(sample_event(
        now,
        15,
        "Very Long Meeting Title That Should Be Truncated",
    ));
    insta::assert_snapshot!(status_title(&view, now), @"⏱ 15m — Very Long Meeting T…");
}

// =============================================================================
// Menu Golden Tests
// =============================================================================

#[test]
fn golden_menu_upcoming_with_link() {
    let now = reference_time();
    let link = MeetingLink {
        url: "https://zoom.us/j/123456789".to_string(),
        provider: MeetingProvider::Zoom,
    };
    let view = MenuView::from_selection(
        vec![
            sample_event(now, 15, "Team Standup"),
            sample_event(now, 60, "Design Review"),
            sample_event(now, 150, "1:1"),
        ],
        Some(link),
        false,
    );

    let items = render_menu(&view, now, &fixed_tz());

    insta::assert_debug_snapshot!(items, @r#"
    [
        Label(
            "📅 Team Standup",
        ),
        Label(
            "   in 15 min · 10:15 - 10:45 AM",
        ),
        Action {
            label: "🔗 Join Zoom",
            action: Join(
                "https://zoom.us/j/123456789",
            ),
        },
        Action {
            label: "Copy link",
            action: CopyLink(
                "https://zoom.us/j/123456789",
            ),
        },
        Separator,
        Label(
            "Next up:",
        ),
        Label(
            "   📅 Design Review (11:00 AM)",
        ),
        Label(
            "   📅 1:1 (12:30 PM)",
        ),
        Separator,
        Action {
            label: "Open Calendar",
            action: OpenCalendar,
        },
        Action {
            label: "Refresh Now",
            action: Refresh,
        },
        Toggle {
            label: "Launch at Login",
            checked: false,
            action: ToggleLoginItem,
        },
        Separator,
        Action {
            label: "Quit",
            action: Quit,
        },
    ]
    "#);
}

#[test]
fn golden_menu_no_access() {
    let now = reference_time();
    let items = render_menu(&MenuView::no_access(), now, &fixed_tz());

    insta::assert_debug_snapshot!(items, @r#"
    [
        Label(
            "Calendar access required",
        ),
        Action {
            label: "Open Privacy Settings...",
            action: OpenPrivacySettings,
        },
        Separator,
        Action {
            label: "Quit",
            action: Quit,
        },
    ]
    "#);
}

#[test]
fn golden_menu_no_events() {
    let now = reference_time();
    let view = MenuView::from_selection(vec![], None, true);
    let items = render_menu(&view, now, &fixed_tz());

    insta::assert_debug_snapshot!(items, @r#"
    [
        Label(
            "No upcoming events",
        ),
        Separator,
        Action {
            label: "Open Calendar",
            action: OpenCalendar,
        },
        Action {
            label: "Refresh Now",
            action: Refresh,
        },
        Toggle {
            label: "Launch at Login",
            checked: true,
            action: ToggleLoginItem,
        },
        Separator,
        Action {
            label: "Quit",
            action: Quit,
        },
    ]
    "#);
}
