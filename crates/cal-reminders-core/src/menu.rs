//! Declarative menu model for the menu-bar dropdown.
//!
//! The dropdown is never mutated in place. Each refresh builds an immutable
//! [`MenuView`] and [`render_menu`] derives the whole menu description from
//! it; frontends translate the resulting [`MenuItem`]s into their own row
//! format and swap the menu wholesale.

use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::format::{
    format_countdown, format_relative, format_time_range, truncate_title, NEXT_UP_TITLE_WIDTH,
};
use crate::links::MeetingLink;

/// Menu-bar title while the first fetch is still running.
pub const STATUS_LOADING: &str = "⏱ Loading...";
/// Menu-bar title when calendar access was denied or timed out.
pub const STATUS_NO_ACCESS: &str = "⚠️ No calendar access";
/// Menu-bar title for a successful fetch with no upcoming events.
pub const STATUS_NO_EVENTS: &str = "⏱ No events";

/// The next event and its companions, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingView {
    /// The event whose countdown occupies the menu bar.
    pub next: Event,
    /// Events after `next`, shown in the "Next up:" section.
    pub later: Vec<Event>,
    /// Meeting link extracted from `next`, if any.
    pub link: Option<MeetingLink>,
}

/// What the menu bar is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    /// Startup, before the first fetch has completed.
    Loading,
    /// Calendar access denied or timed out; persistent degraded state.
    NoAccess,
    /// Fetch succeeded but nothing upcoming was selected.
    NoEvents,
    /// A next event is on display.
    Upcoming(UpcomingView),
}

/// Immutable view-model for one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuView {
    /// The display state derived from the last refresh.
    pub state: DisplayState,
    /// Whether the app is currently registered as a login item.
    pub login_item: bool,
}

impl MenuView {
    /// The view shown until the first refresh completes.
    pub fn loading() -> Self {
        Self {
            state: DisplayState::Loading,
            login_item: false,
        }
    }

    /// The persistent degraded view when calendar access is unavailable.
    pub fn no_access() -> Self {
        Self {
            state: DisplayState::NoAccess,
            login_item: false,
        }
    }

    /// Builds the view from a fresh selection.
    ///
    /// The first selected event becomes the countdown event, the rest feed
    /// the "Next up:" section. An empty selection yields the NoEvents state.
    pub fn from_selection(
        mut selected: Vec<Event>,
        link: Option<MeetingLink>,
        login_item: bool,
    ) -> Self {
        if selected.is_empty() {
            return Self {
                state: DisplayState::NoEvents,
                login_item,
            };
        }

        let next = selected.remove(0);
        Self {
            state: DisplayState::Upcoming(UpcomingView {
                next,
                later: selected,
                link,
            }),
            login_item,
        }
    }

    /// The event currently on display, if any.
    pub fn next_event(&self) -> Option<&Event> {
        match &self.state {
            DisplayState::Upcoming(upcoming) => Some(&upcoming.next),
            _ => None,
        }
    }
}

/// A side effect a menu row can trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuAction {
    /// Open the meeting URL in the default browser.
    Join(String),
    /// Copy the meeting URL to the clipboard.
    CopyLink(String),
    /// Launch the native calendar application.
    OpenCalendar,
    /// Open the system settings pane for calendar privacy.
    OpenPrivacySettings,
    /// Trigger an immediate data refresh.
    Refresh,
    /// Flip the login-item registration.
    ToggleLoginItem,
    /// Stop the running menu process.
    Quit,
}

/// One row of the dropdown menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuItem {
    /// Informational row without an action.
    Label(String),
    /// Actionable row.
    Action { label: String, action: MenuAction },
    /// Actionable row carrying a checkmark state.
    Toggle {
        label: String,
        checked: bool,
        action: MenuAction,
    },
    /// Divider between sections.
    Separator,
}

impl MenuItem {
    /// Shorthand for an informational row.
    pub fn label(text: impl Into<String>) -> Self {
        Self::Label(text.into())
    }

    /// Shorthand for an actionable row.
    pub fn action(label: impl Into<String>, action: MenuAction) -> Self {
        Self::Action {
            label: label.into(),
            action,
        }
    }
}

/// Renders the menu-bar title for the current view.
pub fn status_title(view: &MenuView, now: DateTime<Utc>) -> String {
    match &view.state {
        DisplayState::Loading => STATUS_LOADING.to_string(),
        DisplayState::NoAccess => STATUS_NO_ACCESS.to_string(),
        DisplayState::NoEvents => STATUS_NO_EVENTS.to_string(),
        DisplayState::Upcoming(upcoming) => format_countdown(&upcoming.next, now),
    }
}

/// Renders the dropdown menu for the current view.
///
/// Pure projection of the view-model; `tz` localizes the clock times shown
/// next to events (callers pass `Local`, tests pin a fixed offset).
pub fn render_menu<Tz>(view: &MenuView, now: DateTime<Utc>, tz: &Tz) -> Vec<MenuItem>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match &view.state {
        DisplayState::Loading => vec![
            MenuItem::label("Loading..."),
            MenuItem::Separator,
            MenuItem::action("Refresh Now", MenuAction::Refresh),
            MenuItem::Separator,
            MenuItem::action("Quit", MenuAction::Quit),
        ],
        DisplayState::NoAccess => vec![
            MenuItem::label("Calendar access required"),
            MenuItem::action("Open Privacy Settings...", MenuAction::OpenPrivacySettings),
            MenuItem::Separator,
            MenuItem::action("Quit", MenuAction::Quit),
        ],
        DisplayState::NoEvents => {
            let mut items = vec![MenuItem::label("No upcoming events"), MenuItem::Separator];
            items.extend(common_actions(view));
            items.push(MenuItem::Separator);
            items.push(MenuItem::action("Quit", MenuAction::Quit));
            items
        }
        DisplayState::Upcoming(upcoming) => {
            let mut items = vec![
                MenuItem::label(format!("📅 {}", upcoming.next.title)),
                MenuItem::label(format!(
                    "   {} · {}",
                    format_relative(&upcoming.next, now),
                    format_time_range(&upcoming.next, tz),
                )),
            ];

            if let Some(link) = &upcoming.link {
                items.push(MenuItem::action(
                    format!("🔗 Join {}", link.provider.label()),
                    MenuAction::Join(link.url.clone()),
                ));
                items.push(MenuItem::action(
                    "Copy link",
                    MenuAction::CopyLink(link.url.clone()),
                ));
            }

            if !upcoming.later.is_empty() {
                items.push(MenuItem::Separator);
                items.push(MenuItem::label("Next up:"));
                for event in upcoming.later.iter().take(2) {
                    let clock = event.start_time.with_timezone(tz).format("%-I:%M %p");
                    items.push(MenuItem::label(format!(
                        "   📅 {} ({clock})",
                        truncate_title(&event.title, NEXT_UP_TITLE_WIDTH),
                    )));
                }
            }

            items.push(MenuItem::Separator);
            items.extend(common_actions(view));
            items.push(MenuItem::Separator);
            items.push(MenuItem::action("Quit", MenuAction::Quit));
            items
        }
    }
}

/// The action block shared by the NoEvents and Upcoming menus.
fn common_actions(view: &MenuView) -> Vec<MenuItem> {
    vec![
        MenuItem::action("Open Calendar", MenuAction::OpenCalendar),
        MenuItem::action("Refresh Now", MenuAction::Refresh),
        MenuItem::Toggle {
            label: "Launch at Login".to_string(),
            checked: view.login_item,
            action: MenuAction::ToggleLoginItem,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::MeetingProvider;
    use chrono::{Duration, FixedOffset, TimeZone};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn reference_time() -> DateTime<Utc> {
        utc(2025, 2, 5, 10, 0, 0)
    }

    fn tz_utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn event_in(minutes: i64, title: &str) -> Event {
        let start = reference_time() + Duration::minutes(minutes);
        Event::new(title, start, start + Duration::minutes(30))
    }

    fn zoom_link() -> MeetingLink {
        MeetingLink {
            url: "https://zoom.us/j/123456789".to_string(),
            provider: MeetingProvider::Zoom,
        }
    }

    mod view_building {
        use super::*;

        #[test]
        fn empty_selection_becomes_no_events() {
            let view = MenuView::from_selection(vec![], None, true);
            assert_eq!(view.state, DisplayState::NoEvents);
            assert!(view.login_item);
            assert!(view.next_event().is_none());
        }

        #[test]
        fn first_selected_event_becomes_next() {
            let view = MenuView::from_selection(
                vec![event_in(10, "First"), event_in(60, "Second"), event_in(90, "Third")],
                None,
                false,
            );

            assert_eq!(view.next_event().unwrap().title, "First");
            match &view.state {
                DisplayState::Upcoming(upcoming) => {
                    let later: Vec<&str> =
                        upcoming.later.iter().map(|e| e.title.as_str()).collect();
                    assert_eq!(later, ["Second", "Third"]);
                }
                other => panic!("unexpected state: {other:?}"),
            }
        }
    }

    mod status {
        use super::*;

        #[test]
        fn degraded_states() {
            let now = reference_time();
            assert_eq!(status_title(&MenuView::loading(), now), STATUS_LOADING);
            assert_eq!(status_title(&MenuView::no_access(), now), STATUS_NO_ACCESS);
            assert_eq!(
                status_title(&MenuView::from_selection(vec![], None, false), now),
                STATUS_NO_EVENTS
            );
        }

        #[test]
        fn upcoming_shows_countdown() {
            let now = reference_time();
            let view = MenuView::from_selection(vec![event_in(45, "Standup")], None, false);
            assert_eq!(status_title(&view, now), "⏱ 45m — Standup");
        }
    }

    mod rendering {
        use super::*;

        fn labels(items: &[MenuItem]) -> Vec<String> {
            items
                .iter()
                .map(|item| match item {
                    MenuItem::Label(text) => text.clone(),
                    MenuItem::Action { label, .. } => label.clone(),
                    MenuItem::Toggle { label, checked, .. } => {
                        format!("{label} [{}]", if *checked { "x" } else { " " })
                    }
                    MenuItem::Separator => "---".to_string(),
                })
                .collect()
        }

        #[test]
        fn no_access_menu() {
            let items = render_menu(&MenuView::no_access(), reference_time(), &tz_utc());
            assert_eq!(
                labels(&items),
                [
                    "Calendar access required",
                    "Open Privacy Settings...",
                    "---",
                    "Quit"
                ]
            );
        }

        #[test]
        fn no_events_menu_keeps_action_block() {
            let view = MenuView::from_selection(vec![], None, false);
            let items = render_menu(&view, reference_time(), &tz_utc());
            assert_eq!(
                labels(&items),
                [
                    "No upcoming events",
                    "---",
                    "Open Calendar",
                    "Refresh Now",
                    "Launch at Login [ ]",
                    "---",
                    "Quit"
                ]
            );
        }

        #[test]
        fn upcoming_menu_full_layout() {
            let view = MenuView::from_selection(
                vec![
                    event_in(12, "Standup"),
                    event_in(60, "Design Review"),
                    event_in(150, "1:1"),
                ],
                Some(zoom_link()),
                true,
            );
            let items = render_menu(&view, reference_time(), &tz_utc());

            assert_eq!(
                labels(&items),
                [
                    "📅 Standup",
                    "   in 12 min · 10:12 - 10:42 AM",
                    "🔗 Join Zoom",
                    "Copy link",
                    "---",
                    "Next up:",
                    "   📅 Design Review (11:00 AM)",
                    "   📅 1:1 (12:30 PM)",
                    "---",
                    "Open Calendar",
                    "Refresh Now",
                    "Launch at Login [x]",
                    "---",
                    "Quit"
                ]
            );
        }

        #[test]
        fn join_rows_absent_without_link() {
            let view = MenuView::from_selection(vec![event_in(12, "Standup")], None, false);
            let items = render_menu(&view, reference_time(), &tz_utc());

            assert!(!labels(&items).iter().any(|l| l.starts_with("🔗 Join")));
            assert!(!labels(&items).iter().any(|l| l == "Copy link"));
        }

        #[test]
        fn next_up_rows_cap_at_two() {
            let view = MenuView::from_selection(
                vec![
                    event_in(10, "A"),
                    event_in(20, "B"),
                    event_in(30, "C"),
                    event_in(40, "D"),
                ],
                None,
                false,
            );
            let items = render_menu(&view, reference_time(), &tz_utc());

            let next_up_rows = labels(&items)
                .iter()
                .filter(|l| l.starts_with("   📅"))
                .count();
            assert_eq!(next_up_rows, 2);
        }

        #[test]
        fn next_up_titles_truncate_at_twenty_five() {
            let long = "C".repeat(30);
            let view = MenuView::from_selection(
                vec![event_in(10, "A"), event_in(20, &long)],
                None,
                false,
            );
            let items = render_menu(&view, reference_time(), &tz_utc());

            let row = labels(&items)
                .into_iter()
                .find(|l| l.contains("CCC"))
                .unwrap();
            assert!(row.contains(&format!("{}…", "C".repeat(24))));
        }

        #[test]
        fn join_label_carries_provider_and_url() {
            let view =
                MenuView::from_selection(vec![event_in(12, "Standup")], Some(zoom_link()), false);
            let items = render_menu(&view, reference_time(), &tz_utc());

            let join = items
                .iter()
                .find_map(|item| match item {
                    MenuItem::Action { label, action: MenuAction::Join(url) }
                        if label.starts_with("🔗") =>
                    {
                        Some(url.clone())
                    }
                    _ => None,
                })
                .unwrap();
            assert_eq!(join, "https://zoom.us/j/123456789");
        }
    }
}
