//! Meeting-link extraction from calendar events.
//!
//! Providers are recognized by a fixed, ordered list of URL patterns. The
//! notes, location, and URL fields of an event are concatenated into one
//! search text and the first pattern that matches anywhere wins, so pattern
//! order, not position in the text, breaks ties.
//!
//! # Example
//!
//! ```
//! use cal_reminders_core::links::{find_meeting_link, MeetingProvider};
//!
//! let link = find_meeting_link("Join: https://zoom.us/j/123456789?pwd=abc").unwrap();
//! assert_eq!(link.provider, MeetingProvider::Zoom);
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Regex for Zoom join URLs, including vanity subdomains.
static ZOOM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://[\w.-]*zoom\.us/j/[\w?=&-]+").expect("Invalid Zoom regex")
});

/// Regex for Google Meet room URLs.
static MEET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://meet\.google\.com/[\w-]+").expect("Invalid Meet regex")
});

/// Regex for Microsoft Teams meetup-join URLs.
static TEAMS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://teams\.microsoft\.com/l/meetup-join/[\w%/-]+").expect("Invalid Teams regex")
});

/// Regex for Webex meeting URLs, including site subdomains.
static WEBEX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://[\w.-]*webex\.com/[\w/.-]+").expect("Invalid Webex regex")
});

/// A recognized video-meeting vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingProvider {
    Zoom,
    GoogleMeet,
    Teams,
    Webex,
}

impl MeetingProvider {
    /// Returns the human-readable provider label, as shown in the menu.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Zoom => "Zoom",
            Self::GoogleMeet => "Google Meet",
            Self::Teams => "Teams",
            Self::Webex => "Webex",
        }
    }
}

/// A meeting link extracted from an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingLink {
    /// The matched URL, verbatim.
    pub url: String,
    /// Which vendor's pattern matched.
    pub provider: MeetingProvider,
}

/// Extracts the meeting link from an event's notes, location, and URL.
///
/// Absent fields are skipped; the rest are joined with a space and searched
/// as one text. Returns `None` when no provider pattern matches.
pub fn extract_meeting_link(event: &Event) -> Option<MeetingLink> {
    let fields: Vec<&str> = [
        event.notes.as_deref(),
        event.location.as_deref(),
        event.url.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();

    find_meeting_link(&fields.join(" "))
}

/// Finds the first meeting link in a text.
///
/// Patterns are tried in a fixed precedence order (Zoom, Google Meet, Teams,
/// Webex); the first pattern with a match anywhere in the text wins, even if
/// another provider's URL appears earlier.
pub fn find_meeting_link(text: &str) -> Option<MeetingLink> {
    let patterns: [(&Regex, MeetingProvider); 4] = [
        (&ZOOM_REGEX, MeetingProvider::Zoom),
        (&MEET_REGEX, MeetingProvider::GoogleMeet),
        (&TEAMS_REGEX, MeetingProvider::Teams),
        (&WEBEX_REGEX, MeetingProvider::Webex),
    ];

    for (regex, provider) in patterns {
        if let Some(m) = regex.find(text) {
            return Some(MeetingLink {
                url: m.as_str().to_string(),
                provider,
            });
        }
    }

    None
}
