//! A canned calendar source for tests and development.
//!
//! `cal-reminders run --fixture events.json` points the app at a JSON file
//! instead of EventKit, which makes the whole pipeline drivable on any
//! machine without calendar access.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use crate::error::{SourceError, SourceResult};
use crate::raw_event::RawEvent;
use crate::source::{AccessState, BoxFuture, CalendarInfo, CalendarSource, FetchWindow};

/// Calendar source serving a fixed set of events.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    events: Vec<RawEvent>,
    access: AccessState,
}

impl FixtureSource {
    /// Creates a fixture source with the given events and access granted.
    pub fn new(events: Vec<RawEvent>) -> Self {
        Self {
            events,
            access: AccessState::Granted,
        }
    }

    /// Loads a fixture source from a JSON file containing an array of
    /// raw events.
    ///
    /// # Errors
    ///
    /// Returns a `Fixture` error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> SourceResult<Self> {
        let data = std::fs::read_to_string(path).map_err(|err| {
            SourceError::fixture(format!("failed to read {}", path.display())).with_source(err)
        })?;

        let events: Vec<RawEvent> = serde_json::from_str(&data).map_err(|err| {
            SourceError::fixture(format!("invalid fixture {}", path.display())).with_source(err)
        })?;

        Ok(Self::new(events))
    }

    /// Builder method to override the access decision.
    pub fn with_access(mut self, access: AccessState) -> Self {
        self.access = access;
        self
    }
}

impl CalendarSource for FixtureSource {
    fn name(&self) -> &str {
        "fixture"
    }

    fn request_access(&self, _timeout: Duration) -> BoxFuture<'_, SourceResult<AccessState>> {
        let access = self.access;
        Box::pin(async move { Ok(access) })
    }

    fn has_access(&self) -> bool {
        self.access.is_granted()
    }

    fn fetch_events(&self, window: FetchWindow) -> BoxFuture<'_, SourceResult<Vec<RawEvent>>> {
        let events: Vec<RawEvent> = self
            .events
            .iter()
            .filter(|event| {
                event.start_time < window.end() && event.end_time > window.start
            })
            .filter(|event| match (&window.calendars, &event.calendar) {
                (None, _) => true,
                (Some(wanted), Some(calendar)) => wanted.contains(calendar),
                (Some(_), None) => false,
            })
            .cloned()
            .collect();

        Box::pin(async move { Ok(events) })
    }

    fn list_calendars(&self) -> BoxFuture<'_, SourceResult<Vec<CalendarInfo>>> {
        let titles: BTreeSet<&String> = self.events.iter().filter_map(|e| e.calendar.as_ref()).collect();
        let calendars: Vec<CalendarInfo> = titles.into_iter().map(CalendarInfo::new).collect();

        Box::pin(async move { Ok(calendars) })
    }
}
