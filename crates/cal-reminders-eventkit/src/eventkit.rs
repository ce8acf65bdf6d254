//! EventKit-backed calendar source.
//!
//! Talks to the macOS EventKit store through `osascript` running embedded
//! JavaScript for Automation (JXA) snippets. Keeping the bridge behind a
//! subprocess avoids Objective-C linkage in the binary; the scripts print
//! JSON on stdout and the source deserializes it into [`RawEvent`]s.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{SourceError, SourceResult};
use crate::raw_event::RawEvent;
use crate::source::{AccessState, BoxFuture, CalendarInfo, CalendarSource, FetchWindow};

/// Ceiling for a single osascript invocation outside the permission gate.
const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(15);

/// Error code osascript prints when Apple events are blocked by privacy
/// settings ("Not authorized to send Apple events").
const NOT_AUTHORIZED_MARKER: &str = "(-1743)";

/// Prompts for calendar access and blocks until the user answers.
/// Prints "granted" or "denied".
const ACCESS_SCRIPT: &str = r#"
ObjC.import('Cocoa');
ObjC.import('EventKit');

function run() {
    const store = $.EKEventStore.alloc.init;
    let granted = false;
    const sema = $.dispatch_semaphore_create(0);
    const completion = (ok, err) => {
        granted = ok;
        $.dispatch_semaphore_signal(sema);
    };
    if (typeof store.requestFullAccessToEventsWithCompletion === 'function') {
        store.requestFullAccessToEventsWithCompletion(completion);
    } else {
        store.requestAccessToEntityTypeCompletion($.EKEntityTypeEvent, completion);
    }
    $.dispatch_semaphore_wait(sema, $.DISPATCH_TIME_FOREVER);
    return granted ? 'granted' : 'denied';
}
"#;

/// Fetches events intersecting [argv[0], argv[1]), optionally restricted to
/// the calendar titles in argv[2] (a JSON array). Prints a JSON array whose
/// object keys match the [`RawEvent`] serde names.
const EVENTS_SCRIPT: &str = r#"
ObjC.import('EventKit');

function run(argv) {
    const start = new Date(argv[0]);
    const end = new Date(argv[1]);
    const wanted = argv.length > 2 ? JSON.parse(argv[2]) : null;

    const store = $.EKEventStore.alloc.init;
    const all = store.calendarsForEntityType($.EKEntityTypeEvent);
    const calendars = [];
    for (let i = 0; i < all.count; i++) {
        const cal = all.objectAtIndex(i);
        if (wanted === null || wanted.indexOf(ObjC.unwrap(cal.title)) !== -1) {
            calendars.push(cal);
        }
    }

    const predicate = store.predicateForEventsWithStartDateEndDateCalendars(start, end, calendars);
    const matches = store.eventsMatchingPredicate(predicate);

    const out = [];
    for (let i = 0; i < matches.count; i++) {
        const ev = matches.objectAtIndex(i);
        out.push({
            title: ObjC.unwrap(ev.title),
            start_time: new Date(ev.startDate.timeIntervalSince1970 * 1000).toISOString(),
            end_time: new Date(ev.endDate.timeIntervalSince1970 * 1000).toISOString(),
            all_day: !!ev.allDay,
            notes: ObjC.unwrap(ev.notes) || null,
            location: ObjC.unwrap(ev.location) || null,
            url: ev.URL.isNil() ? null : ObjC.unwrap(ev.URL.absoluteString),
            calendar: ObjC.unwrap(ev.calendar.title),
        });
    }
    return JSON.stringify(out);
}
"#;

/// Lists event calendars. Prints a JSON array of {title, identifier}.
const CALENDARS_SCRIPT: &str = r#"
ObjC.import('EventKit');

function run() {
    const store = $.EKEventStore.alloc.init;
    const all = store.calendarsForEntityType($.EKEntityTypeEvent);
    const out = [];
    for (let i = 0; i < all.count; i++) {
        const cal = all.objectAtIndex(i);
        out.push({
            title: ObjC.unwrap(cal.title),
            identifier: ObjC.unwrap(cal.calendarIdentifier) || null,
        });
    }
    return JSON.stringify(out);
}
"#;

/// Calendar source backed by the macOS EventKit store.
pub struct EventKitSource {
    /// Cached access decision; the platform remembers the user's answer,
    /// so one probe per process is enough.
    access: OnceLock<AccessState>,
    /// Ceiling for a single osascript invocation.
    script_timeout: Duration,
    /// The bridge interpreter; tests substitute a stand-in.
    program: PathBuf,
}

impl EventKitSource {
    /// Creates a new EventKit source.
    pub fn new() -> Self {
        Self {
            access: OnceLock::new(),
            script_timeout: DEFAULT_SCRIPT_TIMEOUT,
            program: PathBuf::from("osascript"),
        }
    }

    /// Builder method to override the per-script timeout.
    pub fn with_script_timeout(mut self, timeout: Duration) -> Self {
        self.script_timeout = timeout;
        self
    }

    /// Builder method to override the bridge program.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }
}

impl Default for EventKitSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarSource for EventKitSource {
    fn name(&self) -> &str {
        "eventkit"
    }

    fn request_access(&self, timeout: Duration) -> BoxFuture<'_, SourceResult<AccessState>> {
        Box::pin(async move {
            if let Some(state) = self.access.get() {
                return Ok(*state);
            }

            debug!(timeout_secs = timeout.as_secs(), "requesting calendar access");
            // An elapsed timeout propagates as a Timeout-coded error rather
            // than masquerading as a denial; the outcome is only cached once
            // the user has actually answered.
            let state = match run_script(&self.program, ACCESS_SCRIPT, &[], timeout).await {
                Ok(output) if output == "granted" => AccessState::Granted,
                Ok(_) => AccessState::Denied,
                Err(err) if err.is_access_denied() => AccessState::Denied,
                Err(err) => return Err(err),
            };

            if state.is_granted() {
                debug!("calendar access granted");
            } else {
                warn!("calendar access denied");
            }

            Ok(*self.access.get_or_init(|| state))
        })
    }

    fn has_access(&self) -> bool {
        self.access.get().is_some_and(AccessState::is_granted)
    }

    fn fetch_events(&self, window: FetchWindow) -> BoxFuture<'_, SourceResult<Vec<RawEvent>>> {
        Box::pin(async move {
            let args = fetch_args(&window)?;

            debug!(start = %window.start, end = %window.end(), "fetching events");
            let stdout =
                run_script(&self.program, EVENTS_SCRIPT, &args, self.script_timeout).await?;

            let events: Vec<RawEvent> = serde_json::from_str(&stdout).map_err(|err| {
                SourceError::invalid_output("unexpected event payload from osascript")
                    .with_source(err)
            })?;

            debug!(count = events.len(), "fetched events");
            Ok(events)
        })
    }

    fn list_calendars(&self) -> BoxFuture<'_, SourceResult<Vec<CalendarInfo>>> {
        Box::pin(async move {
            let stdout =
                run_script(&self.program, CALENDARS_SCRIPT, &[], self.script_timeout).await?;

            let calendars: Vec<CalendarInfo> = serde_json::from_str(&stdout).map_err(|err| {
                SourceError::invalid_output("unexpected calendar payload from osascript")
                    .with_source(err)
            })?;

            Ok(calendars)
        })
    }
}

/// Builds the argv for the events script.
fn fetch_args(window: &FetchWindow) -> SourceResult<Vec<String>> {
    let mut args = vec![window.start.to_rfc3339(), window.end().to_rfc3339()];

    if let Some(calendars) = &window.calendars {
        let titles: Vec<&String> = calendars.iter().collect();
        let encoded = serde_json::to_string(&titles).map_err(|err| {
            SourceError::invalid_output("failed to encode calendar filter").with_source(err)
        })?;
        args.push(encoded);
    }

    Ok(args)
}

/// Classifies a non-zero osascript exit from its stderr.
fn script_failure(stderr: &str) -> SourceError {
    if stderr.contains(NOT_AUTHORIZED_MARKER) {
        SourceError::access_denied("calendar access not granted")
    } else {
        SourceError::script(format!("osascript failed: {}", stderr.trim()))
    }
}

/// Runs a JXA script through the bridge program, feeding it on stdin.
async fn run_script(
    program: &Path,
    script: &str,
    args: &[String],
    timeout: Duration,
) -> SourceResult<String> {
    let mut command = Command::new(program);
    command.args(["-l", "JavaScript", "-"]);
    command.args(args);
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .map_err(|err| SourceError::launch("failed to spawn osascript").with_source(err))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| SourceError::launch("osascript stdin unavailable"))?;
    stdin
        .write_all(script.as_bytes())
        .await
        .map_err(|err| SourceError::launch("failed to write script to osascript").with_source(err))?;
    drop(stdin);

    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| {
            SourceError::timeout(format!(
                "osascript did not finish within {}s",
                timeout.as_secs()
            ))
        })?
        .map_err(|err| {
            SourceError::launch("failed to collect osascript output").with_source(err)
        })?;

    if !output.status.success() {
        return Err(script_failure(&String::from_utf8_lossy(&output.stderr)));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceErrorCode;
    use chrono::{TimeZone, Utc};

    #[test]
    fn no_access_before_first_probe() {
        let source = EventKitSource::new();
        assert!(!source.has_access());
    }

    /// Writes an executable stand-in bridge that sleeps past any timeout.
    #[cfg(unix)]
    fn stalling_bridge(dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let program = dir.join("stalling-bridge");
        std::fs::write(&program, "#!/bin/sh\nsleep 5\n").unwrap();
        let mut perms = std::fs::metadata(&program).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&program, perms).unwrap();
        program
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn request_access_surfaces_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let source = EventKitSource::new().with_program(stalling_bridge(dir.path()));

        let err = source
            .request_access(Duration::from_millis(200))
            .await
            .unwrap_err();

        assert_eq!(err.code(), SourceErrorCode::Timeout);
        // An unanswered prompt must not be cached as an outcome.
        assert!(!source.has_access());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn fetch_surfaces_timeout_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = EventKitSource::new()
            .with_program(stalling_bridge(dir.path()))
            .with_script_timeout(Duration::from_millis(200));

        let start = Utc.with_ymd_and_hms(2025, 2, 5, 10, 0, 0).unwrap();
        let err = source
            .fetch_events(FetchWindow::new(start, 8))
            .await
            .unwrap_err();

        assert_eq!(err.code(), SourceErrorCode::Timeout);
    }

    #[test]
    fn script_failure_detects_blocked_apple_events() {
        let stderr = "execution error: Not authorized to send Apple events. (-1743)";
        let err = script_failure(stderr);
        assert!(err.is_access_denied());
    }

    #[test]
    fn script_failure_keeps_stderr_for_other_errors() {
        let err = script_failure("execution error: ReferenceError (-2700)\n");
        assert_eq!(err.code(), SourceErrorCode::Script);
        assert!(err.message().contains("ReferenceError"));
    }

    #[test]
    fn fetch_args_covers_window() {
        let start = Utc.with_ymd_and_hms(2025, 2, 5, 10, 0, 0).unwrap();
        let window = FetchWindow::new(start, 8);

        let args = fetch_args(&window).unwrap();

        assert_eq!(args.len(), 2);
        assert_eq!(args[0], "2025-02-05T10:00:00+00:00");
        assert_eq!(args[1], "2025-02-05T18:00:00+00:00");
    }

    #[test]
    fn fetch_args_encodes_calendar_filter() {
        let start = Utc.with_ymd_and_hms(2025, 2, 5, 10, 0, 0).unwrap();
        let window = FetchWindow::new(start, 8).with_calendars(["Work", "Home"]);

        let args = fetch_args(&window).unwrap();

        assert_eq!(args.len(), 3);
        assert_eq!(args[2], r#"["Home","Work"]"#);
    }

    #[test]
    fn events_script_emits_raw_event_schema() {
        // RawEvent's serde names are the contract with the bridge script.
        for key in [
            "title",
            "start_time",
            "end_time",
            "all_day",
            "notes",
            "location",
            "url",
            "calendar",
        ] {
            assert!(
                EVENTS_SCRIPT.contains(&format!("{key}:")),
                "events script is missing the {key} field"
            );
        }
    }
}
