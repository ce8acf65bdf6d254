//! System actions dispatched from menu rows.
//!
//! Each menu row re-invokes this binary with `action <verb>`, so everything
//! here runs in a short-lived process separate from the plugin loop. The
//! loop itself is reached through its PID file (refresh, quit).

use std::process::Command;

use tracing::info;

use crate::error::{MenubarError, MenubarResult};
#[cfg(unix)]
use crate::pidfile;

/// Name under which the app registers itself in login items.
const LOGIN_ITEM_NAME: &str = "Cal Reminders";

/// Application bundle registered as the login item.
const APP_BUNDLE_PATH: &str = "/Applications/Cal Reminders.app";

/// Deep link to the Calendars privacy pane in System Settings.
const PRIVACY_SETTINGS_URL: &str =
    "x-apple.systempreferences:com.apple.preference.security?Privacy_Calendars";

/// Opens a meeting URL in the default browser.
pub fn join(url: &str) -> MenubarResult<()> {
    info!(url = %url, "opening meeting URL");
    open::that(url).map_err(|e| MenubarError::Action(format!("failed to open URL: {}", e)))
}

/// Copies a meeting URL to the clipboard.
pub fn copy_link(url: &str) -> MenubarResult<()> {
    info!(url = %url, "copying meeting URL to clipboard");

    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| MenubarError::Action(format!("failed to access clipboard: {}", e)))?;
    clipboard
        .set_text(url)
        .map_err(|e| MenubarError::Action(format!("failed to copy to clipboard: {}", e)))?;

    println!("{}", url);
    Ok(())
}

/// Opens the Calendar app.
pub fn open_calendar() -> MenubarResult<()> {
    info!("opening Calendar.app");
    run_checked(Command::new("open").args(["-a", "Calendar"]), "open")
}

/// Opens the Calendars privacy pane in System Settings.
pub fn open_privacy_settings() -> MenubarResult<()> {
    info!("opening Calendars privacy settings");
    run_checked(Command::new("open").arg(PRIVACY_SETTINGS_URL), "open")
}

/// Returns whether the app is registered as a login item.
pub fn is_login_item() -> MenubarResult<bool> {
    let names = run_osascript(
        "tell application \"System Events\" to get the name of every login item",
    )?;
    Ok(names.contains(LOGIN_ITEM_NAME))
}

/// Registers or removes the login item.
pub fn set_login_item(enabled: bool) -> MenubarResult<()> {
    info!(enabled = enabled, "updating login item");
    run_osascript(&login_item_script(enabled))?;
    Ok(())
}

/// Flips the login item state; returns the new state.
pub fn toggle_login_item() -> MenubarResult<bool> {
    let next = !is_login_item()?;
    set_login_item(next)?;
    Ok(next)
}

/// Asks the running plugin loop to refetch events now.
pub fn request_refresh() -> MenubarResult<()> {
    #[cfg(unix)]
    {
        signal_running(libc::SIGUSR1, "SIGUSR1")
    }
    #[cfg(not(unix))]
    {
        Err(MenubarError::Action(
            "refresh signaling is only supported on unix".into(),
        ))
    }
}

/// Asks the running plugin loop to exit.
pub fn request_quit() -> MenubarResult<()> {
    #[cfg(unix)]
    {
        signal_running(libc::SIGTERM, "SIGTERM")
    }
    #[cfg(not(unix))]
    {
        Err(MenubarError::Action(
            "quit signaling is only supported on unix".into(),
        ))
    }
}

/// Builds the System Events script that adds or removes the login item.
fn login_item_script(enabled: bool) -> String {
    if enabled {
        format!(
            "tell application \"System Events\" to make login item at end with properties {{path:\"{}\", hidden:false}}",
            APP_BUNDLE_PATH
        )
    } else {
        format!(
            "tell application \"System Events\" to delete login item \"{}\"",
            LOGIN_ITEM_NAME
        )
    }
}

/// Runs an AppleScript one-liner and returns its trimmed stdout.
fn run_osascript(script: &str) -> MenubarResult<String> {
    let output = Command::new("osascript")
        .arg("-e")
        .arg(script)
        .output()
        .map_err(|e| MenubarError::Action(format!("failed to run osascript: {}", e)))?;

    if !output.status.success() {
        return Err(MenubarError::Action(format!(
            "osascript failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Runs a command and treats a non-zero exit as a failed action.
fn run_checked(command: &mut Command, name: &str) -> MenubarResult<()> {
    let output = command
        .output()
        .map_err(|e| MenubarError::Action(format!("failed to run {}: {}", name, e)))?;

    if !output.status.success() {
        return Err(MenubarError::Action(format!(
            "{} failed: {}",
            name,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(())
}

/// Signals the running loop through its PID file.
#[cfg(unix)]
fn signal_running(signal: i32, name: &str) -> MenubarResult<()> {
    let path = pidfile::default_pid_path();
    let pid = pidfile::read_running_pid(&path).ok_or_else(|| {
        MenubarError::Action(format!(
            "no running instance found (looked for {})",
            path.display()
        ))
    })?;

    tracing::debug!(pid = pid, signal = name, "signaling running instance");
    let rc = unsafe { libc::kill(pid as libc::pid_t, signal) };
    if rc != 0 {
        return Err(MenubarError::Action(format!(
            "failed to signal pid {}: {}",
            pid,
            std::io::Error::last_os_error()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_item_scripts_name_the_app() {
        let add = login_item_script(true);
        assert!(add.contains("make login item"));
        assert!(add.contains(APP_BUNDLE_PATH));

        let remove = login_item_script(false);
        assert!(remove.contains("delete login item"));
        assert!(remove.contains(LOGIN_ITEM_NAME));
    }

    #[test]
    fn privacy_url_targets_the_calendars_pane() {
        assert!(PRIVACY_SETTINGS_URL.starts_with("x-apple.systempreferences:"));
        assert!(PRIVACY_SETTINGS_URL.ends_with("Privacy_Calendars"));
    }
}
