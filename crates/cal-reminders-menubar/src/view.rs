//! The state the plugin loop renders from.
//!
//! A refresh replaces the whole [`MenuView`]; display ticks only read it.
//! Everything runs on the one loop task, so a render never sees a
//! half-applied refresh.

use chrono::{DateTime, Utc};

use cal_reminders_core::{extract_meeting_link, Event, MenuView};

/// State held between refreshes.
#[derive(Debug, Clone)]
pub struct AppState {
    view: MenuView,
}

impl AppState {
    /// Starts in the loading state, shown until the first fetch completes.
    pub fn new() -> Self {
        Self {
            view: MenuView::loading(),
        }
    }

    /// Switches to the persistent no-access state.
    pub fn deny_access(&mut self) {
        self.view = MenuView::no_access();
    }

    /// Replaces the view with a fresh selection.
    ///
    /// The first selected event drives the countdown; its meeting link, if
    /// one can be extracted, feeds the Join and Copy rows.
    pub fn apply_selection(&mut self, selected: Vec<Event>, login_item: bool) {
        let link = selected.first().and_then(extract_meeting_link);
        self.view = MenuView::from_selection(selected, link, login_item);
    }

    /// The current view.
    pub fn view(&self) -> &MenuView {
        &self.view
    }

    /// Returns true once the displayed event's start time has passed, which
    /// is the loop's cue to reselect.
    pub fn next_event_started(&self, now: DateTime<Utc>) -> bool {
        self.view
            .next_event()
            .is_some_and(|event| event.has_started_at(now))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cal_reminders_core::DisplayState;
    use chrono::{Duration, TimeZone};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn event_at(start: DateTime<Utc>, title: &str) -> Event {
        Event::new(title, start, start + Duration::minutes(30))
    }

    #[test]
    fn starts_loading() {
        let state = AppState::new();
        assert_eq!(state.view().state, DisplayState::Loading);
        assert!(!state.next_event_started(utc(2025, 2, 5, 10, 0, 0)));
    }

    #[test]
    fn selection_extracts_link_from_the_next_event() {
        let now = utc(2025, 2, 5, 10, 0, 0);
        let next = event_at(now + Duration::minutes(12), "Standup")
            .with_notes("Join: https://zoom.us/j/123456789");
        let later = event_at(now + Duration::hours(2), "1:1");

        let mut state = AppState::new();
        state.apply_selection(vec![next, later], false);

        match &state.view().state {
            DisplayState::Upcoming(upcoming) => {
                assert_eq!(upcoming.next.title, "Standup");
                assert_eq!(upcoming.later.len(), 1);
                let link = upcoming.link.as_ref().unwrap();
                assert_eq!(link.url, "https://zoom.us/j/123456789");
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[test]
    fn empty_selection_shows_no_events() {
        let mut state = AppState::new();
        state.apply_selection(Vec::new(), true);

        assert_eq!(state.view().state, DisplayState::NoEvents);
        assert!(state.view().login_item);
    }

    #[test]
    fn reports_when_the_displayed_event_starts() {
        let now = utc(2025, 2, 5, 10, 0, 0);
        let mut state = AppState::new();
        state.apply_selection(vec![event_at(now + Duration::minutes(5), "Standup")], false);

        assert!(!state.next_event_started(now));
        assert!(state.next_event_started(now + Duration::minutes(5)));
        assert!(state.next_event_started(now + Duration::minutes(6)));
    }

    #[test]
    fn deny_access_is_persistent_until_replaced() {
        let mut state = AppState::new();
        state.deny_access();
        assert_eq!(state.view().state, DisplayState::NoAccess);
    }
}
