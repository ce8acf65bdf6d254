//! CalendarSource trait definition.
//!
//! This module defines the [`CalendarSource`] trait, the seam between the
//! app and whatever supplies calendar data. The real implementation talks
//! to EventKit; tests and the `--fixture` flag swap in a canned source.

use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SourceResult;
use crate::raw_event::RawEvent;

/// Information about a calendar known to the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarInfo {
    /// The calendar title as shown in Calendar.app.
    pub title: String,
    /// The store's stable identifier for the calendar, if known.
    #[serde(default)]
    pub identifier: Option<String>,
}

impl CalendarInfo {
    /// Creates a new CalendarInfo with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            identifier: None,
        }
    }

    /// Builder method to set the identifier.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }
}

/// Outcome of the calendar permission gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    /// The user granted calendar access.
    Granted,
    /// The user denied access, or the request timed out.
    Denied,
}

impl AccessState {
    /// Returns true if access was granted.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// The window of events a fetch should cover.
///
/// Events intersecting `[start, end())` are returned, so an event that is
/// already underway at `start` is still included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchWindow {
    /// Start of the window; callers pass the current time.
    pub start: DateTime<Utc>,
    /// How far past `start` to look.
    pub lookahead_hours: u32,
    /// Restrict the fetch to calendars with these titles. `None` means all.
    pub calendars: Option<BTreeSet<String>>,
}

impl FetchWindow {
    /// Creates a window covering all calendars.
    pub fn new(start: DateTime<Utc>, lookahead_hours: u32) -> Self {
        Self {
            start,
            lookahead_hours,
            calendars: None,
        }
    }

    /// Builder method to restrict the window to specific calendar titles.
    pub fn with_calendars<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.calendars = Some(titles.into_iter().map(Into::into).collect());
        self
    }

    /// End of the window.
    pub fn end(&self) -> DateTime<Utc> {
        self.start + chrono::Duration::hours(i64::from(self.lookahead_hours))
    }
}

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe, so the app can hold a
/// `Box<dyn CalendarSource>` and pick the implementation at startup.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The seam between the app and its calendar data.
///
/// Implementations must be `Send + Sync` so a source can be shared across
/// the refresh and display tasks.
pub trait CalendarSource: Send + Sync {
    /// Returns the name of this source (e.g. "eventkit", "fixture").
    fn name(&self) -> &str;

    /// Requests calendar access, resolving when the user answers or the
    /// timeout elapses.
    ///
    /// The platform remembers the user's decision, so repeated calls after
    /// the first prompt resolve immediately.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the request itself could not be made; an
    /// elapsed timeout surfaces as a `Timeout`-coded error. A denial is not
    /// an error and is reported as [`AccessState::Denied`].
    fn request_access(&self, timeout: Duration) -> BoxFuture<'_, SourceResult<AccessState>>;

    /// Returns true once a `request_access` call has resolved to
    /// [`AccessState::Granted`]. Cheap, never prompts.
    fn has_access(&self) -> bool;

    /// Fetches raw events intersecting the window.
    ///
    /// Order is unspecified; normalization sorts by start time.
    ///
    /// # Errors
    ///
    /// Returns `SourceError` on bridge failures or revoked access.
    fn fetch_events(&self, window: FetchWindow) -> BoxFuture<'_, SourceResult<Vec<RawEvent>>>;

    /// Lists the calendars the source can read.
    fn list_calendars(&self) -> BoxFuture<'_, SourceResult<Vec<CalendarInfo>>>;
}
